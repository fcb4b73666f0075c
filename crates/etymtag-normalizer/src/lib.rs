//! etymtag Etymology Normalizer
//!
//! Deterministic mapping from free-form etymology text (English or
//! Estonian dictionary prose) to one origin tag, a confidence band and a
//! short rationale.
//!
//! # Pipeline
//!
//! 1. Strip dots from dictionary abbreviations and split into clauses
//! 2. Mask native markers (Finno-Ugric, Uralic, "soome-ugri", ...)
//! 3. Cut each clause at its comparison marker; compared words never name
//!    donors, and only a cognate listing counts as inheritance
//! 4. Collect borrowing markers and donor languages from what is left
//! 5. Apply the ordered decision rules
//!
//! Same input always gives the same output. Nothing here performs I/O.
//!
//! # Examples
//!
//! ```
//! use etymtag_normalizer::normalize;
//! use etymtag_domain::{Confidence, Language, OriginTag};
//!
//! let result = normalize(Some("Laen saksa keelest: Spiegel"));
//! assert_eq!(result.tag, OriginTag::Loan(Language::German));
//! assert_eq!(result.confidence, Confidence::HIGH);
//! ```

#![warn(missing_docs)]

pub mod markers;
pub mod rules;

use etymtag_domain::{Confidence, OriginTag};
use tracing::trace;

pub use markers::{scan, Signals};
pub use rules::NormalizationRule;

/// Result of normalizing one piece of evidence
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    /// Assigned origin tag
    pub tag: OriginTag,

    /// Confidence band for the tag
    pub confidence: Confidence,

    /// Short human-readable explanation
    pub rationale: String,

    /// Decision rule that fired
    pub rule: NormalizationRule,
}

/// Normalize etymology evidence into an origin tag
///
/// Absent or blank text yields `unknown` with confidence 0.0.
pub fn normalize(raw_text: Option<&str>) -> Normalization {
    let signals = scan(raw_text.unwrap_or(""));
    let (rule, decision) = rules::decide(&signals);

    trace!(
        "Normalized evidence via rule {}: {} ({})",
        rule,
        decision.tag,
        decision.confidence
    );

    Normalization {
        tag: decision.tag,
        confidence: decision.confidence,
        rationale: decision.rationale,
        rule,
    }
}
