//! etymtag Storage Layer
//!
//! Implements the `LexiconStore` trait on SQLite.
//!
//! # Architecture
//!
//! - One row per normalized lemma, written with an upsert
//! - WAL journal plus a busy timeout so independent runs (threads or
//!   processes, each with its own connection) can share one cache file
//! - Last writer wins; no read-modify-write transactions are needed
//!
//! # Examples
//!
//! ```no_run
//! use etymtag_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for lexicon operations
//! ```

#![warn(missing_docs)]

use etymtag_domain::traits::LexiconStore;
use etymtag_domain::{
    normalize_lemma, Confidence, Evidence, LexiconRecord, OriginTag, Provenance, TAXONOMY_VERSION,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Evidence text longer than this is truncated before it is stored
pub const MAX_EVIDENCE_CHARS: usize = 5000;

/// How long a writer waits on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-based implementation of `LexiconStore`
///
/// # Thread Safety
///
/// SQLite connections are not shared between threads. Each thread (or
/// parallel batch) should open its own `SqliteStore` on the same file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    /// Parent directories of a file path are created if missing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use etymtag_store::SqliteStore;
    ///
    /// let store = SqliteStore::new(".cache_origin.sqlite3").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path != Path::new(":memory:") {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;

        // The pragma answers with the resulting mode ("wal", or "memory"
        // for in-memory databases), so it has to be read as a row.
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("Opened lexicon store at {} (journal mode {})", path.display(), mode);

        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    ///
    /// The origin taxonomy version is kept in `user_version`. A file
    /// written under another taxonomy is refused; an unstamped file
    /// is stamped with the current version.
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let stored: u32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if stored != 0 && stored != TAXONOMY_VERSION {
            return Err(StoreError::InvalidData(format!(
                "Cache was written with origin taxonomy v{}, this build uses v{}; delete the file to rebuild it",
                stored, TAXONOMY_VERSION
            )));
        }

        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        if stored == 0 {
            self.conn
                .execute_batch(&format!("PRAGMA user_version = {}", TAXONOMY_VERSION))?;
        }
        Ok(())
    }

    /// Origin taxonomy version the cache was written with
    pub fn taxonomy_version(&self) -> Result<u32, StoreError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Number of records in the cache
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lexicon", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// List records ordered by lemma
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<LexiconRecord>, StoreError> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT lemma, origin, confidence, source, source_id, evidence_text, updated_at
             FROM lexicon ORDER BY lemma LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Write many records in one transaction (used for seeding)
    pub fn put_all(&mut self, records: Vec<LexiconRecord>) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let count = records.len();
        for record in records {
            Self::upsert(&tx, &record)?;
        }
        tx.commit()?;
        Ok(count)
    }

    fn upsert(conn: &Connection, record: &LexiconRecord) -> Result<(), StoreError> {
        let lemma = normalize_lemma(&record.lemma);
        if lemma.is_empty() {
            return Err(StoreError::InvalidData("Empty lemma".to_string()));
        }

        let text = record.evidence.text.as_deref().map(truncate_evidence);

        conn.execute(
            "INSERT INTO lexicon (lemma, origin, confidence, source, source_id, evidence_text, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(lemma) DO UPDATE SET
             origin = excluded.origin, confidence = excluded.confidence,
             source = excluded.source, source_id = excluded.source_id,
             evidence_text = excluded.evidence_text, updated_at = excluded.updated_at",
            params![
                &lemma,
                record.tag.as_str(),
                record.confidence.value(),
                record.evidence.source.as_str(),
                &record.evidence.source_id,
                text,
                record.last_updated as i64,
            ],
        )?;

        Ok(())
    }

    /// Convert a row into a record, rejecting tags outside the taxonomy
    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<LexiconRecord> {
        let origin: String = row.get(1)?;
        let tag = OriginTag::parse(&origin).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown origin tag: {}", origin))),
            )
        })?;

        let confidence_value: f64 = row.get(2)?;
        let confidence = Confidence::new(confidence_value).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Real,
                Box::new(StoreError::InvalidData(format!(
                    "Confidence out of range: {}",
                    confidence_value
                ))),
            )
        })?;

        let source: String = row.get(3)?;
        let provenance = Provenance::parse(&source).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown source: {}", source))),
            )
        })?;

        Ok(LexiconRecord {
            lemma: row.get(0)?,
            tag,
            confidence,
            evidence: Evidence {
                source: provenance,
                source_id: row.get(4)?,
                text: row.get(5)?,
            },
            last_updated: row.get::<_, i64>(6)? as u64,
        })
    }
}

impl LexiconStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, lemma: &str) -> Result<Option<LexiconRecord>, Self::Error> {
        let key = normalize_lemma(lemma);

        let record = self
            .conn
            .query_row(
                "SELECT lemma, origin, confidence, source, source_id, evidence_text, updated_at
                 FROM lexicon WHERE lemma = ?1",
                params![&key],
                Self::row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    fn put(&mut self, record: LexiconRecord) -> Result<(), Self::Error> {
        Self::upsert(&self.conn, &record)?;
        debug!("Stored lexicon record for '{}' ({})", record.lemma, record.tag);
        Ok(())
    }

    fn exists(&self, lemma: &str) -> Result<bool, Self::Error> {
        let key = normalize_lemma(lemma);
        let exists = self
            .conn
            .query_row("SELECT 1 FROM lexicon WHERE lemma = ?1", params![&key], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn purge(&mut self, lemma: &str) -> Result<bool, Self::Error> {
        let key = normalize_lemma(lemma);
        let deleted = self
            .conn
            .execute("DELETE FROM lexicon WHERE lemma = ?1", params![&key])?;
        Ok(deleted > 0)
    }
}

/// Cut evidence text to [`MAX_EVIDENCE_CHARS`] characters
fn truncate_evidence(text: &str) -> String {
    match text.char_indices().nth(MAX_EVIDENCE_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
