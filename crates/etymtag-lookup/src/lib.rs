//! etymtag Lookup Source Layer
//!
//! Pluggable sources of etymology evidence.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LookupSource` trait from
//! `etymtag-domain`. Resolution only ever sees the trait, so switching
//! between a live dictionary and offline operation is a configuration
//! choice rather than a conditional inside the resolver.
//!
//! # Sources
//!
//! - `WiktionarySource`: Estonian Wiktionary extracts API
//! - `OfflineSource`: no-op stub used when remote lookups are disabled
//! - `MockSource`: Deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use etymtag_lookup::MockSource;
//! use etymtag_domain::traits::LookupSource;
//!
//! let mut source = MockSource::new();
//! source.add_evidence("peegel", "Laen saksa keelest: Spiegel");
//! let evidence = source.fetch("peegel").unwrap().unwrap();
//! assert_eq!(evidence.text, "Laen saksa keelest: Spiegel");
//! ```

#![warn(missing_docs)]

pub mod wiktionary;

use etymtag_domain::normalize_lemma;
use etymtag_domain::traits::{FetchedEvidence, LookupSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use wiktionary::WiktionarySource;

/// Errors that can occur during lookups
#[derive(Error, Debug)]
pub enum LookupError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Malformed response from the source
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request did not complete in time
    #[error("Lookup timed out")]
    Timeout,

    /// The source is not available (e.g. offline mode)
    #[error("Lookup source unavailable: {0}")]
    Unavailable(String),

    /// Generic error
    #[error("Lookup error: {0}")]
    Other(String),
}

/// Lookup source used when remote lookups are disabled
///
/// Never reaches the network. `is_online` is `false`, so the resolver does
/// not call `fetch`; if something does, it answers with `Unavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl OfflineSource {
    /// Create the offline stub
    pub fn new() -> Self {
        Self
    }
}

impl LookupSource for OfflineSource {
    type Error = LookupError;

    fn fetch(&self, _lemma: &str) -> Result<Option<FetchedEvidence>, Self::Error> {
        Err(LookupError::Unavailable("offline mode".to_string()))
    }

    fn is_online(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Canned answer for one lemma
#[derive(Debug, Clone)]
enum MockAnswer {
    Evidence(String),
    Empty,
    Error,
}

/// Mock lookup source for deterministic testing
///
/// Returns pre-configured evidence without making any network calls and
/// counts calls per lemma. Lemmas without a configured answer have no
/// evidence.
///
/// # Examples
///
/// ```
/// use etymtag_lookup::MockSource;
/// use etymtag_domain::traits::LookupSource;
///
/// let mut source = MockSource::new();
/// source.add_evidence("tere", "Soome-ugri algupära");
/// source.add_error("katki");
///
/// assert!(source.fetch("tere").unwrap().is_some());
/// assert!(source.fetch("katki").is_err());
/// assert!(source.fetch("muu").unwrap().is_none());
/// assert_eq!(source.call_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    answers: Arc<Mutex<HashMap<String, MockAnswer>>>,
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockSource {
    /// Create a mock with no configured answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `text` as evidence for `lemma`
    pub fn add_evidence(&mut self, lemma: &str, text: impl Into<String>) {
        self.set(lemma, MockAnswer::Evidence(text.into()));
    }

    /// Answer `lemma` with "no evidence"
    pub fn add_empty(&mut self, lemma: &str) {
        self.set(lemma, MockAnswer::Empty);
    }

    /// Fail lookups for `lemma`
    pub fn add_error(&mut self, lemma: &str) {
        self.set(lemma, MockAnswer::Error);
    }

    /// Total number of fetch calls
    pub fn call_count(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Number of fetch calls for one lemma
    pub fn calls_for(&self, lemma: &str) -> usize {
        lock(&self.calls)
            .get(&normalize_lemma(lemma))
            .copied()
            .unwrap_or(0)
    }

    /// Reset the call counts
    pub fn reset_call_count(&self) {
        lock(&self.calls).clear();
    }

    fn set(&mut self, lemma: &str, answer: MockAnswer) {
        lock(&self.answers).insert(normalize_lemma(lemma), answer);
    }
}

impl LookupSource for MockSource {
    type Error = LookupError;

    fn fetch(&self, lemma: &str) -> Result<Option<FetchedEvidence>, Self::Error> {
        let key = normalize_lemma(lemma);
        *lock(&self.calls).entry(key.clone()).or_insert(0) += 1;

        match lock(&self.answers).get(&key) {
            Some(MockAnswer::Evidence(text)) => Ok(Some(FetchedEvidence {
                text: text.clone(),
                source_id: Some(format!("mock:{}", key)),
            })),
            Some(MockAnswer::Error) => Err(LookupError::Other("Mock error".to_string())),
            Some(MockAnswer::Empty) | None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Lock a mock's shared state; a poisoned lock still holds usable data
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
