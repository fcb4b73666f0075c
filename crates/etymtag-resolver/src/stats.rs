//! Statistics collected during a run

/// Counters for one resolution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Tokens received by the pipeline
    pub tokens: usize,

    /// Distinct normalized lemmas among them
    pub distinct_lemmas: usize,

    /// Lemmas answered from the cache
    pub cache_hits: usize,

    /// Cache misses while offline
    pub offline_misses: usize,

    /// Lookup calls made
    pub fetches: usize,

    /// Lookup calls that failed
    pub fetch_failures: usize,

    /// Lookups that answered without usable evidence
    pub empty_lookups: usize,

    /// Records written to the cache
    pub persisted: usize,

    /// Writes refused to protect a curated record
    pub override_conflicts: usize,

    /// Lemmas abandoned because the run was cancelled or timed out
    pub cancelled: usize,

    /// Tokens removed by the confidence threshold
    pub filtered: usize,

    /// Tokens kept but flagged by the confidence threshold
    pub flagged: usize,
}

impl RunStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another run's counters to this one
    pub fn merge(&mut self, other: &RunStats) {
        self.tokens += other.tokens;
        self.distinct_lemmas += other.distinct_lemmas;
        self.cache_hits += other.cache_hits;
        self.offline_misses += other.offline_misses;
        self.fetches += other.fetches;
        self.fetch_failures += other.fetch_failures;
        self.empty_lookups += other.empty_lookups;
        self.persisted += other.persisted;
        self.override_conflicts += other.override_conflicts;
        self.cancelled += other.cancelled;
        self.filtered += other.filtered;
        self.flagged += other.flagged;
    }

    /// Tokens present in the output
    pub fn emitted(&self) -> usize {
        self.tokens.saturating_sub(self.filtered)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Run Summary".to_string(),
            "===========".to_string(),
            format!(
                "Tokens: {} ({} distinct lemmas, {} emitted)",
                self.tokens,
                self.distinct_lemmas,
                self.emitted()
            ),
            format!("Cache hits: {}", self.cache_hits),
            format!("Offline misses: {}", self.offline_misses),
            format!(
                "Lookups: {} ({} failed, {} empty)",
                self.fetches, self.fetch_failures, self.empty_lookups
            ),
            format!("Records persisted: {}", self.persisted),
        ];

        if self.override_conflicts > 0 {
            lines.push(format!("Curated records protected: {}", self.override_conflicts));
        }
        if self.cancelled > 0 {
            lines.push(format!("Abandoned by cancellation: {}", self.cancelled));
        }
        if self.filtered > 0 || self.flagged > 0 {
            lines.push(format!(
                "Below threshold: {} dropped, {} flagged",
                self.filtered, self.flagged
            ));
        }

        lines.join("\n")
    }
}
