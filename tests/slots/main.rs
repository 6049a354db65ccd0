#[path = "../support/mod.rs"]
mod support;

use std::fs;

use payloads::{cache, repo, LinesReport, RepoCache, RewrittenRepoCache};
use stowage::{Envelope, Persist, PersistError, Severity, SlotStore, StoreConfig};
use support::logs::capture_logs;
use tracing::Level;

// =============================================================================
// store: idempotence and atomic replacement
// =============================================================================

#[test]
fn storing_same_payload_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("cache/repos");
    let store = SlotStore::new();
    let payload = cache("alice", vec![repo("persist", 3), repo("reports", 7)]);

    assert!(store.store(&payload, &slot).unwrap());
    let first = fs::read(&slot).unwrap();

    assert!(!store.store(&payload, &slot).unwrap());
    let second = fs::read(&slot).unwrap();

    assert_eq!(first, second);
    assert!(!store.tmp_path(&slot).exists());
}

#[test]
fn changed_payload_replaces_slot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::new();

    store.store(&cache("alice", vec![repo("a", 1)]), &slot).unwrap();
    assert!(store
        .store(&cache("alice", vec![repo("a", 2)]), &slot)
        .unwrap());

    let loaded: RepoCache = store.try_load(&slot).unwrap();
    assert_eq!(loaded.repos[0].stars, 2);
}

#[test]
fn store_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("tmp/cache/github/alice");
    let store = SlotStore::new();

    assert!(store.store(&cache("alice", vec![]), &slot).unwrap());
    assert!(slot.is_file());
}

#[test]
fn leftover_temp_file_does_not_affect_slot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::new();
    let original = cache("alice", vec![repo("a", 1)]);
    store.store(&original, &slot).unwrap();

    // Process died after writing the temp file but before the rename
    fs::write(store.tmp_path(&slot), b"{\"type\":\"slots::payloads::Rep").unwrap();

    let loaded: RepoCache = store.try_load(&slot).unwrap();
    assert_eq!(loaded, original);

    // The next store simply overwrites the stale temp file
    let updated = cache("alice", vec![repo("b", 2)]);
    assert!(store.store(&updated, &slot).unwrap());
    assert_eq!(store.try_load::<RepoCache>(&slot).unwrap(), updated);
    assert!(!store.tmp_path(&slot).exists());
}

#[test]
fn torn_temp_file_never_appears_at_slot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::new();

    fs::write(store.tmp_path(&slot), b"{\"type\":").unwrap();

    assert!(!slot.exists());
    let err = store.try_load::<RepoCache>(&slot).unwrap_err();
    assert!(matches!(err, PersistError::NotFound { .. }));
}

#[test]
fn store_into_unwritable_location_is_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let err = SlotStore::new()
        .store(&cache("alice", vec![]), blocker.join("repos"))
        .unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
    assert_eq!(err.severity(), Severity::Hard);
}

#[test]
fn pretty_output_is_still_an_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::with_config(StoreConfig::default().with_pretty(true));

    store.store(&cache("bob", vec![repo("x", 9)]), &slot).unwrap();

    let text = fs::read_to_string(&slot).unwrap();
    assert!(text.contains('\n'));
    let envelope = Envelope::from_slice(text.as_bytes()).unwrap();
    assert_eq!(envelope.type_name, RepoCache::TYPE_NAME);
    assert_eq!(envelope.version, None);
}

// =============================================================================
// load: soft and hard failures
// =============================================================================

#[test]
fn default_identity_is_module_path() {
    assert_eq!(RepoCache::TYPE_NAME, "slots::payloads::RepoCache");
    assert_eq!(LinesReport::TYPE_NAME, "gen::reports::LinesReport");
}

#[test]
fn missing_slot_with_silent_logs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SlotStore::new();
    let fallback = cache("nobody", vec![]);

    let (loaded, logs) = capture_logs(Level::WARN, || {
        store
            .load(dir.path().join("absent"), fallback.clone(), true)
            .unwrap()
    });

    assert_eq!(loaded, fallback);
    assert!(logs.is_empty(), "unexpected logs: {logs}");
}

#[test]
fn missing_slot_without_silent_warns() {
    let dir = tempfile::tempdir().unwrap();
    let store = SlotStore::new();

    let (loaded, logs) = capture_logs(Level::WARN, || {
        store
            .load(dir.path().join("absent"), RepoCache::default(), false)
            .unwrap()
    });

    assert_eq!(loaded, RepoCache::default());
    assert!(logs.contains("WARN"));
    assert!(logs.contains("failed to load"));
}

#[test]
fn slot_holding_other_type_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("report");
    let store = SlotStore::new();
    store.store(&LinesReport { total: 42 }, &slot).unwrap();

    let err = store.try_load::<RepoCache>(&slot).unwrap_err();
    assert!(matches!(err, PersistError::TypeUnresolved { .. }));

    let loaded = store.load(&slot, RepoCache::default(), true).unwrap();
    assert_eq!(loaded, RepoCache::default());
}

#[test]
fn wrong_shape_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::new();
    store.store(&cache("alice", vec![repo("a", 1)]), &slot).unwrap();

    let err = store.try_load::<RewrittenRepoCache>(&slot).unwrap_err();
    assert!(matches!(err, PersistError::Malformed { .. }));

    let (loaded, logs) = capture_logs(Level::WARN, || {
        store
            .load(&slot, RewrittenRepoCache { user: 7 }, false)
            .unwrap()
    });
    assert_eq!(loaded.user, 7);
    assert!(logs.contains("does not match the shape"));
}

#[test]
fn corrupt_slot_is_logged_and_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    fs::write(&slot, b"\x00\x01 definitely not json").unwrap();
    let store = SlotStore::new();

    let (result, logs) = capture_logs(Level::WARN, || {
        store.load(&slot, RepoCache::default(), true)
    });

    let err = result.unwrap_err();
    assert!(matches!(err, PersistError::Corrupt { .. }));
    assert!(!err.is_soft());
    // silent only suppresses soft failures
    assert!(logs.contains("ERROR"));
}

#[test]
fn json_without_envelope_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join("repos");
    let store = SlotStore::new();

    for document in ["{}", "[]", "\"hello\"", "42"] {
        fs::write(&slot, document).unwrap();
        let err = store
            .load(&slot, RepoCache::default(), true)
            .unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { .. }), "{document}: {err}");
        assert_eq!(err.severity(), Severity::Hard);
    }
}
