//! Property tests for the normalizer decision rules

use etymtag_domain::origin::LANGUAGE_ALIASES;
use etymtag_domain::{Confidence, OriginTag};
use etymtag_normalizer::{normalize, NormalizationRule};
use proptest::prelude::*;

fn alias() -> impl Strategy<Value = (&'static str, etymtag_domain::Language)> {
    prop::sample::select(LANGUAGE_ALIASES.to_vec())
}

fn marker() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Borrowed from", "Loanword from", "Laen", "<"])
}

proptest! {
    #[test]
    fn one_explicit_donor_is_a_confident_loan((name, lang) in alias(), marker in marker()) {
        let result = normalize(Some(&format!("{} {} word", marker, name)));
        prop_assert_eq!(result.tag, OriginTag::Loan(lang));
        prop_assert_eq!(result.confidence, Confidence::HIGH);
    }

    #[test]
    fn two_distinct_donors_are_multiple((a, la) in alias(), (b, lb) in alias()) {
        prop_assume!(la != lb);
        let result = normalize(Some(&format!("borrowed from {} or {}", a, b)));
        prop_assert_eq!(result.tag, OriginTag::LoanMultiple);
        prop_assert_eq!(result.rule, NormalizationRule::MultipleDonors);
    }

    #[test]
    fn blank_text_is_unknown(text in "[ \t\n]{0,12}") {
        let result = normalize(Some(&text));
        prop_assert_eq!(result.tag, OriginTag::Unknown);
        prop_assert_eq!(result.confidence, Confidence::NONE);
    }

    #[test]
    fn any_text_yields_a_valid_band(text in "\\PC{0,80}") {
        let result = normalize(Some(&text));
        let value = result.confidence.value();
        prop_assert!((0.0..=1.0).contains(&value));
        prop_assert!(!result.rationale.is_empty());
    }
}
