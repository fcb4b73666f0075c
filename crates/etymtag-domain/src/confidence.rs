//! Confidence scores and the fixed confidence bands

/// Certainty of an assigned origin tag given its evidence, in [0.0, 1.0]
///
/// `0.0` means "no evidence", not "definitely wrong". Scores are produced
/// from a small set of fixed bands rather than a learned model so that the
/// same evidence always yields the same, explainable score.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// No evidence at all
    pub const NONE: Confidence = Confidence(0.0);

    /// No recognizable markers in otherwise present evidence
    pub const MINIMAL: Confidence = Confidence(0.1);

    /// Weak or unresolvable signals (e.g. a borrowing marker without a language)
    pub const LOW: Confidence = Confidence(0.2);

    /// Contradictory signals that could not be reconciled
    pub const AMBIGUOUS: Confidence = Confidence(0.3);

    /// Several competing donor languages
    pub const MEDIUM: Confidence = Confidence(0.6);

    /// A single donor language implied by a bare mention
    pub const IMPLIED: Confidence = Confidence(0.7);

    /// A single explicit, uncontested signal
    pub const HIGH: Confidence = Confidence(0.9);

    /// Create a confidence score
    ///
    /// Returns `None` if the value is NaN or outside [0.0, 1.0].
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a confidence score, clamping into [0.0, 1.0] (NaN becomes 0.0)
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::NONE
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Value rounded to two decimals, as reported in output records
    pub fn rounded(&self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Check whether this score reaches a threshold
    pub fn meets(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
