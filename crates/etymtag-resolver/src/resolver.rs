//! Resolution orchestrator
//!
//! Per lemma: cache first, then (when allowed) one lookup, normalization
//! and a cache write. Every lemma ends in exactly one [`ResolutionState`].

use crate::control::RunControl;
use crate::error::ResolveError;
use crate::stats::RunStats;
use etymtag_domain::traits::{FetchedEvidence, LexiconStore, LookupSource};
use etymtag_domain::{
    normalize_lemma, Confidence, Evidence, LexiconRecord, OriginTag, Provenance,
};
use etymtag_normalizer::normalize;
use std::collections::HashMap;
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Per-call resolution switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Never call the lookup source
    pub offline: bool,

    /// Re-fetch even when the lemma is cached
    pub refresh: bool,

    /// Let a remote result replace a curated record
    pub allow_override: bool,
}

impl ResolveOptions {
    /// Cache-only resolution
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    /// Cache first, lookup on miss
    pub fn online() -> Self {
        Self::default()
    }
}

/// How a lemma was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Served from the cache without a lookup
    Cached,
    /// Not cached and lookups are disabled
    MissOffline,
    /// Fetched, normalized and persisted
    MissOnline,
    /// The lookup failed
    FetchFailed,
    /// The lookup answered without usable evidence
    NoEvidence,
    /// The run was cancelled before the lemma could be resolved
    Cancelled,
}

impl ResolutionState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionState::Cached => "cached",
            ResolutionState::MissOffline => "miss_offline",
            ResolutionState::MissOnline => "miss_online",
            ResolutionState::FetchFailed => "fetch_failed",
            ResolutionState::NoEvidence => "no_evidence",
            ResolutionState::Cancelled => "cancelled",
        }
    }
}

/// Outcome of resolving one lemma
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    /// Normalized lemma
    pub lemma: String,

    /// Origin tag
    pub tag: OriginTag,

    /// Confidence of the tag
    pub confidence: Confidence,

    /// Evidence as reported to callers
    pub evidence: Evidence,

    /// Which path produced the entry
    pub state: ResolutionState,

    /// Normalizer rationale, when evidence was normalized in this run
    pub rationale: Option<String>,
}

impl ResolvedEntry {
    /// `(unknown, 0.0, source = none)`
    pub fn unknown(lemma: &str, state: ResolutionState) -> Self {
        Self {
            lemma: lemma.to_string(),
            tag: OriginTag::Unknown,
            confidence: Confidence::NONE,
            evidence: Evidence::none(),
            state,
            rationale: None,
        }
    }

    /// Entry for a stored record
    ///
    /// Curated records keep `manual` provenance; anything else is reported
    /// as served from the cache.
    pub fn from_cache(record: &LexiconRecord) -> Self {
        let evidence = if record.is_manual() {
            record.evidence.clone()
        } else {
            record.evidence.relabel(Provenance::Cache)
        };

        Self {
            lemma: record.lemma.clone(),
            tag: record.tag,
            confidence: record.confidence,
            evidence,
            state: ResolutionState::Cached,
            rationale: None,
        }
    }
}

/// Check whether a result with `incoming` provenance may replace `existing`
///
/// A write may not lower the trust rank of a record unless the caller
/// allows it explicitly.
pub fn check_write_trust(
    existing: &LexiconRecord,
    incoming: Provenance,
    allow_override: bool,
) -> Result<(), ResolveError> {
    if allow_override || incoming.trust() >= existing.provenance().trust() {
        Ok(())
    } else {
        Err(ResolveError::ManualOverrideConflict {
            lemma: existing.lemma.clone(),
        })
    }
}

/// The resolution orchestrator
///
/// Owns the store handle for the run and borrows nothing global. The memo
/// guarantees at most one lookup and one write per lemma until
/// [`Resolver::begin_run`] starts a new run.
pub struct Resolver<S, L>
where
    S: LexiconStore,
    L: LookupSource,
{
    store: S,
    source: L,
    control: RunControl,
    memo: HashMap<String, ResolvedEntry>,
    stats: RunStats,
}

impl<S, L> Resolver<S, L>
where
    S: LexiconStore,
    L: LookupSource,
    S::Error: Display,
    L::Error: Display,
{
    /// Create a resolver over a store and a lookup source
    pub fn new(store: S, source: L) -> Self {
        Self {
            store,
            source,
            control: RunControl::new(),
            memo: HashMap::new(),
            stats: RunStats::new(),
        }
    }

    /// Use a shared cancel flag / deadline
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    /// Forget memoized results and counters
    pub fn begin_run(&mut self) {
        self.memo.clear();
        self.stats = RunStats::new();
    }

    /// Counters for the current run
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    /// The run control in use
    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Borrow the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Borrow the lookup source
    pub fn source(&self) -> &L {
        &self.source
    }

    /// Resolve one lemma
    ///
    /// # Errors
    ///
    /// Only cache failures are returned; they are fatal for the run.
    /// Lookup failures degrade to `unknown` with source `none`.
    pub fn resolve(
        &mut self,
        lemma: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedEntry, ResolveError> {
        let key = normalize_lemma(lemma);
        if key.is_empty() {
            return Ok(ResolvedEntry::unknown(&key, ResolutionState::NoEvidence));
        }

        if let Some(entry) = self.memo.get(&key) {
            return Ok(entry.clone());
        }

        let entry = self.resolve_uncached(&key, options)?;
        self.memo.insert(key, entry.clone());
        Ok(entry)
    }

    fn resolve_uncached(
        &mut self,
        key: &str,
        options: &ResolveOptions,
    ) -> Result<ResolvedEntry, ResolveError> {
        let stored = self
            .store
            .get(key)
            .map_err(|e| ResolveError::CacheRead(e.to_string()))?;
        let offline = options.offline || !self.source.is_online();

        if let Some(record) = &stored {
            if !options.refresh || offline {
                debug!("Cache hit for '{}': {}", key, record.tag);
                self.stats.cache_hits += 1;
                return Ok(ResolvedEntry::from_cache(record));
            }

            if let Err(conflict) =
                check_write_trust(record, Provenance::Remote, options.allow_override)
            {
                warn!("{}; keeping stored record", conflict);
                self.stats.override_conflicts += 1;
                self.stats.cache_hits += 1;
                return Ok(ResolvedEntry::from_cache(record));
            }
        } else if offline {
            debug!("Cache miss for '{}' in offline mode", key);
            self.stats.offline_misses += 1;
            return Ok(ResolvedEntry::unknown(key, ResolutionState::MissOffline));
        }

        let entry = self.fetch_and_persist(key)?;

        // A failed refresh keeps serving what is already cached
        match (&stored, entry.state) {
            (Some(record), state) if state != ResolutionState::MissOnline => {
                self.stats.cache_hits += 1;
                Ok(ResolvedEntry::from_cache(record))
            }
            _ => Ok(entry),
        }
    }

    fn fetch_and_persist(&mut self, key: &str) -> Result<ResolvedEntry, ResolveError> {
        if self.control.should_stop() {
            debug!("Run cancelled; not looking up '{}'", key);
            self.stats.cancelled += 1;
            return Ok(ResolvedEntry::unknown(key, ResolutionState::Cancelled));
        }

        debug!("Looking up '{}' via {}", key, self.source.name());
        self.stats.fetches += 1;
        let result = self.source.fetch(key);

        if self.control.should_stop() {
            debug!("Run cancelled during lookup of '{}'; result abandoned", key);
            self.stats.cancelled += 1;
            return Ok(ResolvedEntry::unknown(key, ResolutionState::Cancelled));
        }

        let evidence = match result {
            Ok(fetched) => fetched.map(remote_evidence).filter(Evidence::has_text),
            Err(e) => {
                warn!("Lookup for '{}' via {} failed: {}", key, self.source.name(), e);
                self.stats.fetch_failures += 1;
                return Ok(ResolvedEntry::unknown(key, ResolutionState::FetchFailed));
            }
        };
        let Some(evidence) = evidence else {
            debug!("No etymology evidence for '{}'", key);
            self.stats.empty_lookups += 1;
            return Ok(ResolvedEntry::unknown(key, ResolutionState::NoEvidence));
        };

        let (record, rationale) = build_record(key, evidence, now_secs());
        self.store
            .put(record.clone())
            .map_err(|e| ResolveError::CacheWrite(e.to_string()))?;
        self.stats.persisted += 1;

        debug!(
            "Persisted '{}' as {} ({}): {}",
            key, record.tag, record.confidence, rationale
        );

        Ok(ResolvedEntry {
            lemma: record.lemma,
            tag: record.tag,
            confidence: record.confidence,
            evidence: record.evidence,
            state: ResolutionState::MissOnline,
            rationale: Some(rationale),
        })
    }
}

fn remote_evidence(fetched: FetchedEvidence) -> Evidence {
    let evidence = Evidence::new(Provenance::Remote, Some(fetched.text));
    match fetched.source_id {
        Some(source_id) => evidence.with_source_id(source_id),
        None => evidence,
    }
}

/// Normalize remote evidence into a record
fn build_record(key: &str, evidence: Evidence, now: u64) -> (LexiconRecord, String) {
    let normalization = normalize(evidence.text.as_deref());
    let record = LexiconRecord::new(
        key,
        normalization.tag,
        normalization.confidence,
        evidence,
        now,
    );
    (record, normalization.rationale)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
