//! Integration tests for etymtag-resolver
//!
//! These run the pipeline against a real SQLite store and the mock lookup
//! source.

use etymtag_domain::traits::LexiconStore;
use etymtag_domain::{
    Confidence, Language, LexiconRecord, OriginTag, Provenance, TokenInput,
};
use etymtag_lookup::{MockSource, OfflineSource};
use etymtag_resolver::{
    Pipeline, ResolutionState, ResolveError, ResolveOptions, Resolver, ResolverConfig,
    RunControl, ThresholdPolicy,
};
use etymtag_store::{SqliteStore, StoreError};
use tempfile::TempDir;

fn token(surface: &str, lemma: &str, pos: &str) -> TokenInput {
    TokenInput::new(surface, lemma, Some(pos.to_string()))
}

fn memory_store() -> SqliteStore {
    SqliteStore::new(":memory:").unwrap()
}

#[test]
fn test_shared_lemma_is_resolved_once() {
    let mut source = MockSource::new();
    source.add_evidence("tere", "Läänemeresoome tüvi");
    let calls = source.clone();

    let mut resolver = Resolver::new(memory_store(), source);
    let tokens = vec![token("Tere", "tere", "I"), token("tere", "tere", "I")];

    let run = Pipeline::default().run(&mut resolver, &tokens).unwrap();

    assert_eq!(calls.calls_for("tere"), 1);
    assert_eq!(run.tokens.len(), 2);
    assert_eq!(run.tokens[0].token, "Tere");
    assert_eq!(run.tokens[1].token, "tere");
    assert_eq!(run.tokens[0].tag, run.tokens[1].tag);
    assert_eq!(run.tokens[0].confidence, run.tokens[1].confidence);
    assert_eq!(run.tokens[0].evidence, run.tokens[1].evidence);
    assert_eq!(run.stats.distinct_lemmas, 1);
    assert_eq!(run.stats.persisted, 1);
}

#[test]
fn test_manual_record_end_to_end_offline() {
    let mut store = memory_store();
    store
        .put(LexiconRecord::manual(
            "lasteaed",
            OriginTag::Loan(Language::German),
            Confidence::HIGH,
            None,
            1,
        ))
        .unwrap();

    let mut resolver = Resolver::new(store, OfflineSource::new());
    let pipeline = Pipeline::new(ResolverConfig {
        offline: true,
        ..Default::default()
    });

    let run = pipeline
        .run(&mut resolver, &[token("lasteaias", "lasteaed", "S")])
        .unwrap();

    assert_eq!(run.tokens.len(), 1);
    let resolved = &run.tokens[0];
    assert_eq!(resolved.token, "lasteaias");
    assert_eq!(resolved.lemma, "lasteaed");
    assert_eq!(resolved.pos.as_deref(), Some("S"));
    assert_eq!(resolved.tag.as_str(), "loan:german");
    assert_eq!(resolved.confidence.value(), 0.9);
    assert_eq!(resolved.evidence.source, Provenance::Manual);
    assert_eq!(resolved.evidence.text, None);
    assert!(resolved.components.is_empty());
    assert!(!resolved.flagged);
}

#[test]
fn test_offline_miss_then_online_success() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lexicon.sqlite3");

    {
        let mut resolver = Resolver::new(SqliteStore::new(&path).unwrap(), OfflineSource::new());
        let entry = resolver.resolve("siluett", &ResolveOptions::offline()).unwrap();

        assert_eq!(entry.state, ResolutionState::MissOffline);
        assert_eq!(entry.tag, OriginTag::Unknown);
        assert_eq!(entry.confidence, Confidence::NONE);
        assert_eq!(entry.evidence.source, Provenance::None);
        assert!(!resolver.store().exists("siluett").unwrap());
    }

    let mut source = MockSource::new();
    source.add_evidence("siluett", "Laen prantsuse keelest: silhouette");
    let mut resolver = Resolver::new(SqliteStore::new(&path).unwrap(), source);

    let entry = resolver.resolve("siluett", &ResolveOptions::online()).unwrap();
    assert_eq!(entry.state, ResolutionState::MissOnline);
    assert_eq!(entry.tag, OriginTag::Loan(Language::French));

    let stored = resolver.store().get("siluett").unwrap().unwrap();
    assert_eq!(stored.evidence.source, Provenance::Remote);
    assert_eq!(stored.evidence.source_id.as_deref(), Some("mock:siluett"));
}

#[test]
fn test_manual_record_is_protected_online() {
    let mut store = memory_store();
    store
        .put(LexiconRecord::manual(
            "peegel",
            OriginTag::Loan(Language::German),
            Confidence::HIGH,
            Some("Laen saksa keelest: Spiegel".to_string()),
            1,
        ))
        .unwrap();

    let mut source = MockSource::new();
    source.add_evidence("peegel", "Borrowed from Swedish spegel");
    let calls = source.clone();
    let mut resolver = Resolver::new(store, source);

    for options in [
        ResolveOptions::online(),
        ResolveOptions {
            refresh: true,
            ..Default::default()
        },
    ] {
        resolver.begin_run();
        let entry = resolver.resolve("peegel", &options).unwrap();
        assert_eq!(entry.tag, OriginTag::Loan(Language::German));
        assert_eq!(entry.evidence.source, Provenance::Manual);
    }

    assert_eq!(calls.call_count(), 0);
    assert!(resolver.store().get("peegel").unwrap().unwrap().is_manual());
}

#[test]
fn test_min_confidence_drops_low_tokens() {
    let mut source = MockSource::new();
    source.add_evidence("peegel", "Laen saksa keelest: Spiegel");
    source.add_evidence("kummaline", "Päritolu ebaselge");

    let mut resolver = Resolver::new(memory_store(), source);
    let pipeline = Pipeline::new(ResolverConfig {
        min_confidence: 0.5,
        ..Default::default()
    });
    let tokens = vec![
        token("peegel", "peegel", "S"),
        token("kummaline", "kummaline", "A"),
        token("xyz", "xyz", "X"),
    ];

    let run = pipeline.run(&mut resolver, &tokens).unwrap();

    assert_eq!(run.tokens.len(), 1);
    assert_eq!(run.tokens[0].lemma, "peegel");
    assert_eq!(run.tokens[0].confidence, Confidence::HIGH);
    assert_eq!(run.stats.filtered, 2);
}

#[test]
fn test_min_confidence_flag_policy_keeps_tokens() {
    let mut source = MockSource::new();
    source.add_evidence("peegel", "Laen saksa keelest: Spiegel");

    let mut resolver = Resolver::new(memory_store(), source);
    let pipeline = Pipeline::new(ResolverConfig {
        min_confidence: 0.5,
        threshold_policy: ThresholdPolicy::Flag,
        ..Default::default()
    });
    let tokens = vec![token("peegel", "peegel", "S"), token("xyz", "xyz", "X")];

    let run = pipeline.run(&mut resolver, &tokens).unwrap();

    assert_eq!(run.tokens.len(), 2);
    assert!(!run.tokens[0].flagged);
    assert!(run.tokens[1].flagged);
    assert_eq!(run.stats.flagged, 1);
    assert_eq!(run.stats.filtered, 0);
}

#[test]
fn test_fetch_failure_does_not_abort_or_persist() {
    let mut source = MockSource::new();
    source.add_error("katki");
    source.add_evidence("peegel", "Borrowed from German");

    let mut resolver = Resolver::new(memory_store(), source);
    let tokens = vec![token("katki", "katki", "A"), token("peegel", "peegel", "S")];

    let run = Pipeline::default().run(&mut resolver, &tokens).unwrap();

    assert_eq!(run.tokens.len(), 2);
    assert_eq!(run.tokens[0].tag, OriginTag::Unknown);
    assert_eq!(run.tokens[0].evidence.source, Provenance::None);
    assert_eq!(run.tokens[1].tag, OriginTag::Loan(Language::German));
    assert_eq!(run.stats.fetch_failures, 1);
    assert!(!resolver.store().exists("katki").unwrap());
}

#[test]
fn test_absent_evidence_is_not_persisted() {
    let mut source = MockSource::new();
    source.add_empty("tühi");

    let mut resolver = Resolver::new(memory_store(), source);
    let entry = resolver.resolve("tühi", &ResolveOptions::online()).unwrap();

    assert_eq!(entry.state, ResolutionState::NoEvidence);
    assert!(!resolver.store().exists("tühi").unwrap());
}

#[test]
fn test_cache_hit_skips_lookup() {
    let mut source = MockSource::new();
    source.add_evidence("tool", "From Swedish tull");
    let calls = source.clone();
    let mut resolver = Resolver::new(memory_store(), source);
    let tokens = vec![token("tooli", "tool", "S")];

    Pipeline::default().run(&mut resolver, &tokens).unwrap();
    let second = Pipeline::default().run(&mut resolver, &tokens).unwrap();

    assert_eq!(calls.calls_for("tool"), 1);
    assert_eq!(second.stats.cache_hits, 1);
    assert_eq!(second.tokens[0].evidence.source, Provenance::Cache);
    assert_eq!(second.tokens[0].tag, OriginTag::Loan(Language::Swedish));
}

#[test]
fn test_cancelled_run_resolves_unknown_without_writes() {
    let mut source = MockSource::new();
    source.add_evidence("peegel", "Borrowed from German");
    let calls = source.clone();

    let control = RunControl::new();
    control.cancel();
    let mut resolver = Resolver::new(memory_store(), source).with_control(control);

    let run = Pipeline::default()
        .run(&mut resolver, &[token("peegel", "peegel", "S")])
        .unwrap();

    assert_eq!(run.tokens[0].tag, OriginTag::Unknown);
    assert_eq!(run.stats.cancelled, 1);
    assert_eq!(calls.call_count(), 0);
    assert_eq!(resolver.store().count().unwrap(), 0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut resolver = Resolver::new(memory_store(), MockSource::new());
    let pipeline = Pipeline::new(ResolverConfig {
        min_confidence: 2.0,
        ..Default::default()
    });

    let result = pipeline.run(&mut resolver, &[]);
    assert!(matches!(result, Err(ResolveError::Config(_))));
}

/// Store whose writes always fail
struct ReadOnlyStore(SqliteStore);

impl LexiconStore for ReadOnlyStore {
    type Error = StoreError;

    fn get(&self, lemma: &str) -> Result<Option<LexiconRecord>, StoreError> {
        self.0.get(lemma)
    }

    fn put(&mut self, _record: LexiconRecord) -> Result<(), StoreError> {
        Err(StoreError::InvalidData("store is read-only".to_string()))
    }

    fn purge(&mut self, _lemma: &str) -> Result<bool, StoreError> {
        Err(StoreError::InvalidData("store is read-only".to_string()))
    }
}

#[test]
fn test_cache_write_failure_is_fatal() {
    let mut source = MockSource::new();
    source.add_evidence("peegel", "Borrowed from German");

    let mut resolver = Resolver::new(ReadOnlyStore(memory_store()), source);
    let result = Pipeline::default().run(&mut resolver, &[token("peegel", "peegel", "S")]);

    match result {
        Err(e @ ResolveError::CacheWrite(_)) => assert!(e.is_fatal()),
        other => panic!("expected CacheWrite, got {:?}", other.map(|r| r.tokens.len())),
    }
}

#[test]
fn test_parallel_runs_share_one_cache_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.sqlite3");
    SqliteStore::new(&path).unwrap();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut source = MockSource::new();
                source.add_evidence("peegel", "Laen saksa keelest");
                source.add_evidence("mina", "Soome-ugri algupära");
                let mut resolver = Resolver::new(SqliteStore::new(&path).unwrap(), source);
                let tokens = vec![token("peegel", "peegel", "S"), token("mina", "mina", "P")];
                Pipeline::default().run(&mut resolver, &tokens).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let run = handle.join().unwrap();
        assert_eq!(run.tokens.len(), 2);
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.get("mina").unwrap().unwrap().tag, OriginTag::NativeFinnic);
}
