//! Configuration for resolution runs

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens to tokens below `min_confidence`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// Remove them from the output
    #[default]
    Drop,
    /// Keep them and set `flagged`
    Flag,
}

/// Configuration for the resolver and pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Never call the lookup source; rely on the cache only
    pub offline: bool,

    /// Post-filter threshold in [0.0, 1.0]
    pub min_confidence: f64,

    /// Drop or flag tokens under the threshold
    pub threshold_policy: ThresholdPolicy,

    /// Compound analysis request; accepted but has no effect
    pub allow_compound_analysis: bool,

    /// Re-fetch lemmas that are already cached
    pub refresh: bool,

    /// Allow remote results to replace manually curated records
    pub allow_override: bool,

    /// Timeout for a single lookup request (seconds)
    pub fetch_timeout_secs: u64,

    /// Optional wall-clock budget for a whole run (seconds)
    pub run_timeout_secs: Option<u64>,
}

impl ResolverConfig {
    /// Get the lookup timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get the run budget as a Duration
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        if self.run_timeout_secs == Some(0) {
            return Err("run_timeout_secs must be greater than 0 when set".to_string());
        }
        if self.offline && self.refresh {
            return Err("refresh has no effect in offline mode".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            offline: false,
            min_confidence: 0.0,
            threshold_policy: ThresholdPolicy::Drop,
            allow_compound_analysis: true,
            refresh: false,
            allow_override: false,
            fetch_timeout_secs: 8,
            run_timeout_secs: None,
        }
    }
}
