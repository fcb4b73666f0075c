//! Persisted lexicon records and per-token results

use crate::{normalize_lemma, Confidence, Evidence, OriginTag, Provenance};

/// The persisted unit: one record per normalized lemma
///
/// Writes are upserts keyed by `lemma`. Records are created on the first
/// successful resolution (or by manual seeding) and are never deleted
/// automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconRecord {
    /// Normalized (trimmed, lower-cased) lemma
    pub lemma: String,

    /// Resolved origin tag
    pub tag: OriginTag,

    /// Confidence of the tag
    pub confidence: Confidence,

    /// Evidence the tag was derived from
    pub evidence: Evidence,

    /// Unix timestamp (seconds) of the last write
    pub last_updated: u64,
}

impl LexiconRecord {
    /// Create a record; the lemma is normalized here
    pub fn new(
        lemma: &str,
        tag: OriginTag,
        confidence: Confidence,
        evidence: Evidence,
        last_updated: u64,
    ) -> Self {
        Self {
            lemma: normalize_lemma(lemma),
            tag,
            confidence,
            evidence,
            last_updated,
        }
    }

    /// Create a manually curated record
    pub fn manual(
        lemma: &str,
        tag: OriginTag,
        confidence: Confidence,
        text: Option<String>,
        last_updated: u64,
    ) -> Self {
        Self::new(
            lemma,
            tag,
            confidence,
            Evidence::new(Provenance::Manual, text),
            last_updated,
        )
    }

    /// Provenance of the stored evidence
    pub fn provenance(&self) -> Provenance {
        self.evidence.source
    }

    /// Whether the record was curated by hand
    pub fn is_manual(&self) -> bool {
        self.provenance() == Provenance::Manual
    }
}

/// One token as supplied by the external tokenizer/lemmatizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInput {
    /// Surface form as it appears in the text
    pub surface: String,

    /// Lemma (dictionary form); normalized by the pipeline
    pub lemma: String,

    /// Part-of-speech tag, passed through untouched
    pub pos: Option<String>,
}

impl TokenInput {
    /// Create a token tuple
    pub fn new(surface: impl Into<String>, lemma: impl Into<String>, pos: Option<String>) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos,
        }
    }
}

/// Per-token output record
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    /// Surface form
    pub token: String,

    /// Normalized lemma
    pub lemma: String,

    /// Part-of-speech tag (opaque passthrough)
    pub pos: Option<String>,

    /// Resolved origin tag
    pub tag: OriginTag,

    /// Confidence of the tag
    pub confidence: Confidence,

    /// Evidence and its provenance
    pub evidence: Evidence,

    /// Compound components; reserved for compound analysis, always empty
    pub components: Vec<ResolvedToken>,

    /// Set when the token fell under the confidence threshold and the
    /// threshold policy keeps such tokens
    pub flagged: bool,
}
