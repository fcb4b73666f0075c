//! Error types for resolution runs

use thiserror::Error;

/// Errors that can occur while resolving lemmas
///
/// Lookup failures are not errors here: they degrade to an `unknown`
/// result. Only the cache itself can abort a run.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The lexicon cache could not be read
    #[error("Cache read error: {0}")]
    CacheRead(String),

    /// The lexicon cache could not be written
    #[error("Cache write error: {0}")]
    CacheWrite(String),

    /// A write would replace a more trusted (manual) record
    #[error("Refusing to overwrite manually curated record for '{lemma}'")]
    ManualOverrideConflict {
        /// Lemma of the protected record
        lemma: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolveError {
    /// Whether the error must abort the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::CacheRead(_) | ResolveError::CacheWrite(_))
    }
}
