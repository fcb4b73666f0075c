//! Trait definitions for external interactions
//!
//! These traits define the boundaries between resolution logic and
//! infrastructure. Implementations live in other crates.

use crate::LexiconRecord;

/// Trait for the durable lexicon cache
///
/// Implemented by the infrastructure layer (etymtag-store). Keys are
/// normalized lemmas; implementations must normalize incoming keys.
pub trait LexiconStore {
    /// Error type for store operations
    type Error;

    /// Get the record for a lemma
    fn get(&self, lemma: &str) -> Result<Option<LexiconRecord>, Self::Error>;

    /// Insert or replace the record for `record.lemma`
    fn put(&mut self, record: LexiconRecord) -> Result<(), Self::Error>;

    /// Check whether a record exists for a lemma
    fn exists(&self, lemma: &str) -> Result<bool, Self::Error> {
        Ok(self.get(lemma)?.is_some())
    }

    /// Remove the record for a lemma; returns whether one existed
    fn purge(&mut self, lemma: &str) -> Result<bool, Self::Error>;
}

/// Raw etymology evidence returned by a lookup source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEvidence {
    /// Free-text etymology description
    pub text: String,

    /// Source-specific identifier (page id, entry id)
    pub source_id: Option<String>,
}

/// Trait for sources of etymology evidence
///
/// Implemented by the infrastructure layer (etymtag-lookup). A source may be
/// unreachable, slow, or return nothing; callers must tolerate all three.
pub trait LookupSource {
    /// Error type for lookup operations
    type Error;

    /// Fetch evidence for a lemma
    ///
    /// `Ok(None)` means the source answered but has no evidence.
    fn fetch(&self, lemma: &str) -> Result<Option<FetchedEvidence>, Self::Error>;

    /// Whether this source can reach anything at all
    ///
    /// The offline stub returns `false`; resolution then never calls `fetch`.
    fn is_online(&self) -> bool {
        true
    }

    /// Short name for logs
    fn name(&self) -> &str;
}
