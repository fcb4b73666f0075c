//! Pipeline driver
//!
//! Takes the token stream from the lemmatizer, resolves each distinct
//! lemma once, and fans the result back out to every token.

use crate::config::{ResolverConfig, ThresholdPolicy};
use crate::error::ResolveError;
use crate::resolver::{ResolveOptions, ResolvedEntry, Resolver};
use crate::stats::RunStats;
use etymtag_domain::traits::{LexiconStore, LookupSource};
use etymtag_domain::{normalize_lemma, ResolvedToken, TokenInput};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, info};

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// One record per emitted token, in input order
    pub tokens: Vec<ResolvedToken>,

    /// Counters for the run
    pub stats: RunStats,
}

/// Drives a resolver over a token stream
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ResolverConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolution options derived from the configuration
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            offline: self.config.offline,
            refresh: self.config.refresh,
            allow_override: self.config.allow_override,
        }
    }

    /// Resolve a token stream
    ///
    /// Starts a new run on the resolver, so the at-most-one-lookup
    /// guarantee covers exactly this batch.
    ///
    /// # Errors
    ///
    /// Returns the first fatal cache error; nothing else aborts a run.
    pub fn run<S, L>(
        &self,
        resolver: &mut Resolver<S, L>,
        tokens: &[TokenInput],
    ) -> Result<PipelineRun, ResolveError>
    where
        S: LexiconStore,
        L: LookupSource,
        S::Error: Display,
        L::Error: Display,
    {
        self.config.validate().map_err(ResolveError::Config)?;
        resolver.begin_run();

        info!(
            "Resolving {} tokens ({})",
            tokens.len(),
            if self.config.offline { "offline" } else { "online" }
        );
        if self.config.allow_compound_analysis {
            debug!("Compound analysis requested but not available; components stay empty");
        }

        let options = self.options();
        let mut resolved: HashMap<String, ResolvedEntry> = HashMap::new();
        for token in tokens {
            let key = normalize_lemma(&token.lemma);
            if !resolved.contains_key(&key) {
                let entry = resolver.resolve(&key, &options)?;
                debug!("'{}' -> {} [{}]", key, entry.tag, entry.state.as_str());
                resolved.insert(key, entry);
            }
        }

        let mut output = Vec::with_capacity(tokens.len());
        let mut filtered = 0;
        let mut flagged = 0;
        for token in tokens {
            let key = normalize_lemma(&token.lemma);
            let Some(entry) = resolved.get(&key) else {
                continue;
            };

            let below = !entry.confidence.meets(self.config.min_confidence);
            if below && self.config.threshold_policy == ThresholdPolicy::Drop {
                filtered += 1;
                continue;
            }
            if below {
                flagged += 1;
            }

            output.push(ResolvedToken {
                token: token.surface.clone(),
                lemma: key,
                pos: token.pos.clone(),
                tag: entry.tag,
                confidence: entry.confidence,
                evidence: entry.evidence.clone(),
                components: Vec::new(),
                flagged: below,
            });
        }

        let stats = resolver.stats_mut();
        stats.tokens = tokens.len();
        stats.distinct_lemmas = resolved.len();
        stats.filtered = filtered;
        stats.flagged = flagged;
        let stats = stats.clone();

        info!(
            "Resolved {} tokens ({} distinct lemmas, {} cache hits, {} lookups, {} persisted)",
            stats.tokens, stats.distinct_lemmas, stats.cache_hits, stats.fetches, stats.persisted
        );

        Ok(PipelineRun {
            tokens: output,
            stats,
        })
    }
}
