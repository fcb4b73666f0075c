//! Integration tests for etymtag-store
//!
//! These tests verify upsert semantics, key normalization and durability.

use etymtag_domain::traits::LexiconStore;
use etymtag_domain::{Confidence, Evidence, Language, LexiconRecord, OriginTag, Provenance};
use etymtag_store::{SqliteStore, MAX_EVIDENCE_CHARS};
use tempfile::TempDir;

fn remote_record(lemma: &str, tag: OriginTag, text: &str) -> LexiconRecord {
    LexiconRecord::new(
        lemma,
        tag,
        Confidence::HIGH,
        Evidence::new(Provenance::Remote, Some(text.to_string())).with_source_id("et.wiktionary:1"),
        1_700_000_000,
    )
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert_eq!(store.unwrap().count().unwrap(), 0);
}

#[test]
fn test_put_and_get_record() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let record = remote_record("peegel", OriginTag::Loan(Language::German), "< sks Spiegel");

    store.put(record.clone()).unwrap();

    let retrieved = store.get("peegel").unwrap().expect("record should exist");
    assert_eq!(retrieved, record);
}

#[test]
fn test_get_missing_lemma() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert!(store.get("tere").unwrap().is_none());
    assert!(!store.exists("tere").unwrap());
}

#[test]
fn test_keys_are_normalized() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .put(remote_record("Peegel", OriginTag::Loan(Language::German), "saksa"))
        .unwrap();

    assert!(store.exists("peegel").unwrap());
    assert!(store.exists("  PEEGEL ").unwrap());
    assert_eq!(store.get("PeeGel").unwrap().unwrap().lemma, "peegel");
}

#[test]
fn test_diacritics_are_distinct_keys() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .put(LexiconRecord::manual("käima", OriginTag::NativeFinnic, Confidence::HIGH, None, 1))
        .unwrap();

    assert!(store.exists("Käima").unwrap());
    assert!(!store.exists("kaima").unwrap());
}

#[test]
fn test_put_is_upsert() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .put(remote_record("siluett", OriginTag::Unknown, "first"))
        .unwrap();
    store
        .put(remote_record("siluett", OriginTag::Loan(Language::French), "prantsuse keelest"))
        .unwrap();

    assert_eq!(store.count().unwrap(), 1, "Upsert must keep one record per lemma");
    let record = store.get("siluett").unwrap().unwrap();
    assert_eq!(record.tag, OriginTag::Loan(Language::French));
    assert_eq!(record.evidence.text.as_deref(), Some("prantsuse keelest"));
}

#[test]
fn test_manual_record_without_text() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .put(LexiconRecord::manual(
            "lasteaed",
            OriginTag::Loan(Language::German),
            Confidence::HIGH,
            None,
            5,
        ))
        .unwrap();

    let record = store.get("lasteaed").unwrap().unwrap();
    assert_eq!(record.evidence.source, Provenance::Manual);
    assert_eq!(record.evidence.text, None);
    assert_eq!(record.evidence.source_id, None);
    assert_eq!(record.confidence, Confidence::HIGH);
    assert_eq!(record.last_updated, 5);
}

#[test]
fn test_long_evidence_is_truncated() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let long_text = "x".repeat(MAX_EVIDENCE_CHARS * 2);
    store
        .put(remote_record("pikk", OriginTag::Unknown, &long_text))
        .unwrap();

    let record = store.get("pikk").unwrap().unwrap();
    assert_eq!(record.evidence.text.unwrap().len(), MAX_EVIDENCE_CHARS);
}

#[test]
fn test_purge() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .put(LexiconRecord::manual("mina", OriginTag::NativeFinnic, Confidence::HIGH, None, 1))
        .unwrap();

    assert!(store.purge("MINA").unwrap());
    assert!(!store.exists("mina").unwrap());
    assert!(!store.purge("mina").unwrap(), "Second purge finds nothing");
}

#[test]
fn test_list_and_put_all() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let records = vec![
        LexiconRecord::manual("tema", OriginTag::NativeFinnic, Confidence::HIGH, None, 1),
        LexiconRecord::manual("ja", OriginTag::NativeFinnic, Confidence::HIGH, None, 1),
        LexiconRecord::manual("peegel", OriginTag::Loan(Language::German), Confidence::HIGH, None, 1),
    ];

    assert_eq!(store.put_all(records).unwrap(), 3);

    let all = store.list(None).unwrap();
    let lemmas: Vec<&str> = all.iter().map(|r| r.lemma.as_str()).collect();
    assert_eq!(lemmas, vec!["ja", "peegel", "tema"]);

    assert_eq!(store.list(Some(2)).unwrap().len(), 2);
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache").join("lexicon.sqlite3");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store
            .put(remote_record("peegel", OriginTag::Loan(Language::German), "saksa"))
            .unwrap();
    }

    let reopened = SqliteStore::new(&path).unwrap();
    let record = reopened.get("peegel").unwrap().expect("record should persist");
    assert_eq!(record.tag, OriginTag::Loan(Language::German));
    assert_eq!(record.evidence.source_id.as_deref(), Some("et.wiktionary:1"));
}

#[test]
fn test_two_connections_share_one_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.sqlite3");

    let mut first = SqliteStore::new(&path).unwrap();
    let mut second = SqliteStore::new(&path).unwrap();

    first
        .put(remote_record("tool", OriginTag::Unknown, "one"))
        .unwrap();
    second
        .put(remote_record("tool", OriginTag::Loan(Language::Swedish), "rootsi"))
        .unwrap();

    // Last writer wins, and both connections see the same row
    assert_eq!(first.get("tool").unwrap().unwrap().tag, OriginTag::Loan(Language::Swedish));
    assert_eq!(first.count().unwrap(), 1);
}

#[test]
fn test_parallel_writers_on_one_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("parallel.sqlite3");
    SqliteStore::new(&path).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut store = SqliteStore::new(&path).unwrap();
                for i in 0..25 {
                    store
                        .put(LexiconRecord::manual(
                            &format!("sõna{}", i),
                            OriginTag::NativeFinnic,
                            Confidence::HIGH,
                            Some(format!("worker {}", worker)),
                            i,
                        ))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.count().unwrap(), 25);
}
