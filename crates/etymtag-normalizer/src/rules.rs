//! Ordered decision rules
//!
//! Scanned [`Signals`] are mapped to a tag by the first rule whose
//! condition holds. The order is significant: conflicts are settled before
//! the single-signal rules get a chance to fire.

use crate::markers::Signals;
use etymtag_domain::{Confidence, Language, OriginTag};
use std::collections::BTreeSet;
use std::fmt;

/// Identifies which decision rule produced a normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationRule {
    /// Evidence was absent or blank
    NoEvidence,
    /// Native markers and explicit donors; the borrowing wins
    ConflictPreferBorrowing,
    /// Native markers and a borrowing marker with no resolvable language
    ConflictUnresolved,
    /// Native markers only
    Native,
    /// Exactly one explicit donor
    SingleDonor,
    /// Several explicit donors
    MultipleDonors,
    /// Borrowing marker without a language the taxonomy covers
    UnresolvedBorrowing,
    /// One donor language mentioned without a marker
    ImpliedDonor,
    /// Several donor languages mentioned without a marker
    ImpliedMultiple,
    /// Nothing recognizable
    NoMarkers,
}

impl NormalizationRule {
    /// Stable identifier for logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationRule::NoEvidence => "no-evidence",
            NormalizationRule::ConflictPreferBorrowing => "conflict-prefer-borrowing",
            NormalizationRule::ConflictUnresolved => "conflict-unresolved",
            NormalizationRule::Native => "native",
            NormalizationRule::SingleDonor => "single-donor",
            NormalizationRule::MultipleDonors => "multiple-donors",
            NormalizationRule::UnresolvedBorrowing => "unresolved-borrowing",
            NormalizationRule::ImpliedDonor => "implied-donor",
            NormalizationRule::ImpliedMultiple => "implied-multiple",
            NormalizationRule::NoMarkers => "no-markers",
        }
    }
}

impl fmt::Display for NormalizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one rule
pub(crate) struct Decision {
    pub tag: OriginTag,
    pub confidence: Confidence,
    pub rationale: String,
}

struct DecisionRule {
    rule: NormalizationRule,
    applies: fn(&Signals) -> bool,
    decide: fn(&Signals) -> Decision,
}

/// Rules in evaluation order; the last one always applies
const DECISION_RULES: &[DecisionRule] = &[
    DecisionRule {
        rule: NormalizationRule::NoEvidence,
        applies: is_empty,
        decide: no_evidence,
    },
    DecisionRule {
        rule: NormalizationRule::ConflictPreferBorrowing,
        applies: native_with_donors,
        decide: prefer_borrowing,
    },
    DecisionRule {
        rule: NormalizationRule::ConflictUnresolved,
        applies: native_with_bare_marker,
        decide: unresolved_conflict,
    },
    DecisionRule {
        rule: NormalizationRule::Native,
        applies: native_only,
        decide: native,
    },
    DecisionRule {
        rule: NormalizationRule::SingleDonor,
        applies: one_explicit_donor,
        decide: single_donor,
    },
    DecisionRule {
        rule: NormalizationRule::MultipleDonors,
        applies: several_explicit_donors,
        decide: multiple_donors,
    },
    DecisionRule {
        rule: NormalizationRule::UnresolvedBorrowing,
        applies: marker_without_donor,
        decide: unresolved_borrowing,
    },
    DecisionRule {
        rule: NormalizationRule::ImpliedDonor,
        applies: one_implied_donor,
        decide: implied_donor,
    },
    DecisionRule {
        rule: NormalizationRule::ImpliedMultiple,
        applies: several_implied_donors,
        decide: implied_multiple,
    },
    DecisionRule {
        rule: NormalizationRule::NoMarkers,
        applies: always,
        decide: no_markers,
    },
];

/// Run the rule table against scanned signals
pub(crate) fn decide(signals: &Signals) -> (NormalizationRule, Decision) {
    for entry in DECISION_RULES {
        if (entry.applies)(signals) {
            return (entry.rule, (entry.decide)(signals));
        }
    }
    (NormalizationRule::NoMarkers, no_markers(signals))
}

fn is_empty(s: &Signals) -> bool {
    s.empty
}

fn native_with_donors(s: &Signals) -> bool {
    s.has_native() && !s.explicit_donors.is_empty()
}

fn native_with_bare_marker(s: &Signals) -> bool {
    s.has_native() && s.has_borrowing()
}

fn native_only(s: &Signals) -> bool {
    s.has_native()
}

fn one_explicit_donor(s: &Signals) -> bool {
    s.explicit_donors.len() == 1
}

fn several_explicit_donors(s: &Signals) -> bool {
    s.explicit_donors.len() > 1
}

fn marker_without_donor(s: &Signals) -> bool {
    s.has_borrowing() || !s.unmapped.is_empty()
}

fn one_implied_donor(s: &Signals) -> bool {
    s.implied_donors.len() == 1
}

fn several_implied_donors(s: &Signals) -> bool {
    s.implied_donors.len() > 1
}

fn always(_: &Signals) -> bool {
    true
}

fn no_evidence(_: &Signals) -> Decision {
    Decision {
        tag: OriginTag::Unknown,
        confidence: Confidence::NONE,
        rationale: "no evidence".to_string(),
    }
}

fn prefer_borrowing(s: &Signals) -> Decision {
    let (tag, _) = donor_tag(&s.explicit_donors);
    Decision {
        tag,
        confidence: Confidence::MEDIUM,
        rationale: format!(
            "conflicting evidence: native marker(s) {} overridden by borrowing from {}",
            s.native_markers.join(", "),
            join_languages(&s.explicit_donors)
        ),
    }
}

fn unresolved_conflict(s: &Signals) -> Decision {
    Decision {
        tag: OriginTag::Unknown,
        confidence: Confidence::AMBIGUOUS,
        rationale: format!(
            "ambiguous evidence: native marker(s) {} and borrowing marker(s) {} without resolvable language",
            s.native_markers.join(", "),
            s.borrowing_markers.join(", ")
        ),
    }
}

fn native(s: &Signals) -> Decision {
    Decision {
        tag: OriginTag::NativeFinnic,
        confidence: Confidence::HIGH,
        rationale: format!("native marker(s): {}", s.native_markers.join(", ")),
    }
}

fn single_donor(s: &Signals) -> Decision {
    let (tag, confidence) = donor_tag(&s.explicit_donors);
    Decision {
        tag,
        confidence,
        rationale: format!("borrowed from {}", join_languages(&s.explicit_donors)),
    }
}

fn multiple_donors(s: &Signals) -> Decision {
    Decision {
        tag: OriginTag::LoanMultiple,
        confidence: Confidence::MEDIUM,
        rationale: format!(
            "multiple donor candidates: {}",
            join_languages(&s.explicit_donors)
        ),
    }
}

fn unresolved_borrowing(s: &Signals) -> Decision {
    let mut rationale = "borrowing marker without resolvable language".to_string();
    if !s.unmapped.is_empty() {
        rationale.push_str(&format!("; unmapped: {}", s.unmapped.join(", ")));
    }
    Decision {
        tag: OriginTag::Unknown,
        confidence: Confidence::LOW,
        rationale,
    }
}

fn implied_donor(s: &Signals) -> Decision {
    let tag = s
        .implied_donors
        .iter()
        .next()
        .map(|lang| OriginTag::Loan(*lang))
        .unwrap_or(OriginTag::LoanMultiple);
    Decision {
        tag,
        confidence: Confidence::IMPLIED,
        rationale: format!(
            "donor language mentioned without explicit marker: {}",
            join_languages(&s.implied_donors)
        ),
    }
}

fn implied_multiple(s: &Signals) -> Decision {
    Decision {
        tag: OriginTag::LoanMultiple,
        confidence: Confidence::MEDIUM,
        rationale: format!(
            "multiple donor languages mentioned: {}",
            join_languages(&s.implied_donors)
        ),
    }
}

fn no_markers(_: &Signals) -> Decision {
    Decision {
        tag: OriginTag::Unknown,
        confidence: Confidence::MINIMAL,
        rationale: "no recognizable markers".to_string(),
    }
}

/// `loan:<lang>` at high confidence for one donor, `loan:multiple` otherwise
fn donor_tag(donors: &BTreeSet<Language>) -> (OriginTag, Confidence) {
    let mut iter = donors.iter();
    match (iter.next(), iter.next()) {
        (Some(lang), None) => (OriginTag::Loan(*lang), Confidence::HIGH),
        _ => (OriginTag::LoanMultiple, Confidence::MEDIUM),
    }
}

fn join_languages(languages: &BTreeSet<Language>) -> String {
    languages
        .iter()
        .map(|lang| lang.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
