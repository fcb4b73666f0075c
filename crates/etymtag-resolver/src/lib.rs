//! etymtag Resolution Engine
//!
//! Orchestrates cache lookups, remote fetches, normalization and cache
//! writes for each lemma, and drives that over a token stream.
//!
//! # Guarantees
//!
//! - At most one lookup and one cache write per distinct lemma per run
//! - Offline misses, failed lookups and absent evidence are never persisted
//! - Curated (`manual`) records are not replaced without explicit override
//! - Lookup failures degrade to `unknown`; only cache failures abort a run
//!
//! # Examples
//!
//! ```
//! use etymtag_domain::TokenInput;
//! use etymtag_lookup::MockSource;
//! use etymtag_resolver::{Pipeline, Resolver, ResolverConfig};
//! use etymtag_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! let mut source = MockSource::new();
//! source.add_evidence("peegel", "Laen saksa keelest: Spiegel");
//!
//! let mut resolver = Resolver::new(store, source);
//! let pipeline = Pipeline::new(ResolverConfig::default());
//! let tokens = vec![TokenInput::new("peeglid", "peegel", Some("S".into()))];
//!
//! let run = pipeline.run(&mut resolver, &tokens).unwrap();
//! assert_eq!(run.tokens[0].tag.as_str(), "loan:german");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod stats;

pub use config::{ResolverConfig, ThresholdPolicy};
pub use control::RunControl;
pub use error::ResolveError;
pub use pipeline::{Pipeline, PipelineRun};
pub use resolver::{check_write_trust, ResolutionState, ResolveOptions, ResolvedEntry, Resolver};
pub use stats::RunStats;
