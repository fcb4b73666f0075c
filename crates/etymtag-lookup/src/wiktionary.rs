//! Wiktionary Source Implementation
//!
//! Fetches etymology evidence from the Estonian Wiktionary through the
//! MediaWiki extracts API and cuts out the "Etümoloogia" section.
//!
//! # Features
//!
//! - Blocking HTTP client (run it off the async executor)
//! - Configurable endpoint, user agent and timeout
//! - Exactly one request per call; retry policy belongs to the caller
//!
//! # Examples
//!
//! ```no_run
//! use etymtag_lookup::WiktionarySource;
//! use etymtag_domain::traits::LookupSource;
//!
//! let source = WiktionarySource::default_endpoint().unwrap();
//! let evidence = source.fetch("peegel").unwrap();
//! ```

use crate::LookupError;
use etymtag_domain::traits::{FetchedEvidence, LookupSource};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

/// Default Wiktionary API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://et.wiktionary.org/w/api.php";

/// Default timeout for a lookup request (8 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("etymtag/", env!("CARGO_PKG_VERSION"));

/// Title of the etymology section in Estonian Wiktionary articles
const ETYMOLOGY_HEADING: &str = "etümoloogia";

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(=+)[ \t]*([^=\n]+?)[ \t]*=+[ \t]*$").expect("valid heading regex")
});

/// Estonian Wiktionary lookup source
pub struct WiktionarySource {
    endpoint: String,
    client: reqwest::blocking::Client,
}

/// Response from the MediaWiki query API
#[derive(Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Deserialize)]
struct Page {
    pageid: Option<u64>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
}

impl WiktionarySource {
    /// Create a new Wiktionary source
    ///
    /// # Parameters
    ///
    /// - `endpoint`: MediaWiki API endpoint
    /// - `user_agent`: User-Agent header sent with every request
    /// - `timeout`: per-request timeout
    pub fn new(
        endpoint: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| LookupError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Create a source for the public Estonian Wiktionary with default settings
    pub fn default_endpoint() -> Result<Self, LookupError> {
        Self::new(
            DEFAULT_ENDPOINT,
            DEFAULT_USER_AGENT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// The configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, lemma: &str) -> Result<QueryResponse, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("exsectionformat", "wiki"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", lemma),
            ])
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Communication(format!("HTTP {}", status)));
        }

        response
            .json::<QueryResponse>()
            .map_err(|e| LookupError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

impl LookupSource for WiktionarySource {
    type Error = LookupError;

    fn fetch(&self, lemma: &str) -> Result<Option<FetchedEvidence>, Self::Error> {
        let response = self.request(lemma)?;
        let evidence = evidence_from_response(response);

        debug!(
            "Wiktionary lookup for '{}': {}",
            lemma,
            if evidence.is_some() { "etymology found" } else { "no etymology" }
        );

        Ok(evidence)
    }

    fn name(&self) -> &str {
        "wiktionary"
    }
}

fn map_transport_error(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Communication(format!("Request failed: {}", e))
    }
}

/// Pick the first existing page with an etymology section
fn evidence_from_response(response: QueryResponse) -> Option<FetchedEvidence> {
    let pages = response.query?.pages;

    pages
        .into_values()
        .filter(|page| page.missing.is_none())
        .find_map(|page| {
            let text = extract_etymology(page.extract.as_deref()?)?;
            Some(FetchedEvidence {
                text,
                source_id: page.pageid.map(|id| format!("et.wiktionary:{}", id)),
            })
        })
}

/// Cut the etymology section out of a plain-text article extract
///
/// Handles wiki-style headings (`== Etümoloogia ==`), where the section
/// ends at the next heading, and plain headings (a line reading just
/// `Etümoloogia`), where it ends at the first blank line after content.
pub fn extract_etymology(extract: &str) -> Option<String> {
    let headings: Vec<_> = HEADING.captures_iter(extract).collect();

    if let Some(pos) = headings
        .iter()
        .position(|c| c[2].to_lowercase().starts_with(ETYMOLOGY_HEADING))
    {
        let start = headings[pos].get(0)?.end();
        let end = headings
            .get(pos + 1)
            .and_then(|c| c.get(0))
            .map(|m| m.start())
            .unwrap_or(extract.len());
        return non_empty(&extract[start..end]);
    }

    let mut lines = extract.lines();
    lines.find(|line| line.trim().to_lowercase() == ETYMOLOGY_HEADING)?;
    let body: Vec<&str> = lines
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty())
        .collect();
    non_empty(&body.join("\n"))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
