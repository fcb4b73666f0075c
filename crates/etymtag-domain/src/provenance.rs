//! Provenance tracking for etymology evidence

use std::fmt;

/// Where a piece of evidence (and the record built from it) came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Served from the local lexicon cache during this run
    Cache,
    /// Fetched from a remote lookup source
    Remote,
    /// Curated by hand and seeded into the cache
    Manual,
    /// No evidence exists
    None,
}

impl Provenance {
    /// Get the provenance name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Cache => "cache",
            Provenance::Remote => "remote",
            Provenance::Manual => "manual",
            Provenance::None => "none",
        }
    }

    /// Parse a provenance from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cache" => Some(Provenance::Cache),
            "remote" => Some(Provenance::Remote),
            "manual" => Some(Provenance::Manual),
            "none" => Some(Provenance::None),
            _ => None,
        }
    }

    /// Trust rank used when deciding whether a write may replace a record
    ///
    /// manual > remote > cache > none
    pub fn trust(&self) -> u8 {
        match self {
            Provenance::None => 0,
            Provenance::Cache => 1,
            Provenance::Remote => 2,
            Provenance::Manual => 3,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text etymology evidence and where it came from
///
/// Immutable once fetched. `text` is `None` (with [`Provenance::None`])
/// when no evidence exists; curated records may also carry no text.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    /// Provenance marker
    pub source: Provenance,

    /// Raw evidence text, if any
    pub text: Option<String>,

    /// Source-specific identifier (e.g. "et.wiktionary:12345")
    pub source_id: Option<String>,
}

impl Evidence {
    /// Evidence with the given provenance and text
    pub fn new(source: Provenance, text: Option<String>) -> Self {
        Self {
            source,
            text,
            source_id: None,
        }
    }

    /// The "no evidence" value
    pub fn none() -> Self {
        Self::new(Provenance::None, None)
    }

    /// Attach a source-specific identifier
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Same evidence, re-labelled with a different provenance
    pub fn relabel(&self, source: Provenance) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    /// Whether any non-blank text is present
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_order() {
        assert!(Provenance::Manual.trust() > Provenance::Remote.trust());
        assert!(Provenance::Remote.trust() > Provenance::Cache.trust());
        assert!(Provenance::Cache.trust() > Provenance::None.trust());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Provenance::parse("MANUAL"), Some(Provenance::Manual));
        assert_eq!(Provenance::parse("Wiktionary"), None);
    }

    #[test]
    fn test_evidence_has_text() {
        assert!(!Evidence::none().has_text());
        assert!(!Evidence::new(Provenance::Remote, Some("  ".into())).has_text());
        assert!(Evidence::new(Provenance::Remote, Some("< sks".into())).has_text());
    }

    #[test]
    fn test_relabel_keeps_text_and_id() {
        let ev = Evidence::new(Provenance::Remote, Some("text".into())).with_source_id("wik:1");
        let hit = ev.relabel(Provenance::Cache);
        assert_eq!(hit.source, Provenance::Cache);
        assert_eq!(hit.text.as_deref(), Some("text"));
        assert_eq!(hit.source_id.as_deref(), Some("wik:1"));
    }
}
