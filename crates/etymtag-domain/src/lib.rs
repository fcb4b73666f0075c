//! etymtag Domain Layer
//!
//! This crate contains the vocabulary shared by every other etymtag crate.
//! It has ZERO external dependencies and defines the origin taxonomy, the
//! persisted and per-token records, provenance, and the trait interfaces
//! the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Lemma**: normalized dictionary form of a word; the cache key
//! - **Origin tag**: closed, versioned set of etymological labels
//! - **Evidence**: free text from a lookup source plus its provenance
//! - **Lexicon record**: the persisted unit, one per normalized lemma
//! - **Resolved token**: per-token output record
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and policy only
//! - Storage and network implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod lemma;
pub mod origin;
pub mod provenance;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use confidence::Confidence;
pub use lemma::normalize_lemma;
pub use origin::{classify_language, Language, OriginTag, TAXONOMY_VERSION};
pub use provenance::{Evidence, Provenance};
pub use record::{LexiconRecord, ResolvedToken, TokenInput};
