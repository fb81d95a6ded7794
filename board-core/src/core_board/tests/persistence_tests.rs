/*
    persistence_tests.rs - Durable log replay and recovery

    A store reopened on the same data directory must come back with the
    same records, the same author index and the next index continuing
    where it left off.
*/

use super::actor;
use crate::config::StoreConfig;
use crate::core_board::{BoardError, ManualClock, RecordStore};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::broadcast::error::TryRecvError;

#[test]
fn test_reopen_restores_records_and_author_index() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open(&config).unwrap();
    assert!(store.is_persistent());
    store.post(actor(1), "Address1 message 1").unwrap();
    store.post(actor(2), "Address2 message 1").unwrap();
    store.post(actor(1), "Address1 message 2").unwrap();
    let before = store.get_all();
    drop(store);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.count(), 3);
    assert_eq!(store.get_all(), before);
    assert_eq!(store.get_by_author(&actor(1)).len(), 2);
    assert_eq!(store.get_by_author(&actor(2)).len(), 1);

    assert_eq!(store.post(actor(2), "after restart").unwrap(), 3);
    assert_eq!(store.get_by_author(&actor(2))[1].index, 3);
}

#[test]
fn test_rejected_posts_are_not_persisted() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open(&config).unwrap();
    store.post(actor(1), "ok").unwrap();
    let size = store.stats().log_bytes.unwrap();
    let _ = store.post(actor(1), "");
    let _ = store.post(actor(1), "b".repeat(281));
    assert_eq!(store.stats().log_bytes, Some(size));
    drop(store);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.count(), 1);
}

#[test]
fn test_timestamps_survive_restart_and_stay_monotonic() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open_with_clock(&config, Arc::new(ManualClock::new(500))).unwrap();
    store.post(actor(1), "at 500").unwrap();
    drop(store);

    // The clock on the next run is behind the last stored record
    let store = RecordStore::open_with_clock(&config, Arc::new(ManualClock::new(400))).unwrap();
    assert_eq!(store.get(0).unwrap().created_at.as_secs(), 500);
    store.post(actor(1), "clock behind").unwrap();
    assert_eq!(store.get(1).unwrap().created_at.as_secs(), 500);
}

#[test]
fn test_torn_final_frame_is_dropped() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open(&config).unwrap();
    store.post(actor(1), "survives").unwrap();
    drop(store);

    let mut file = OpenOptions::new().append(true).open(config.log_path()).unwrap();
    file.write_all(&[1, 0, 0, 0, 0, 0, 0, 0, 9, 9]).unwrap();
    drop(file);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.count(), 1);
    assert_eq!(store.post(actor(1), "next").unwrap(), 1);
    drop(store);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.count(), 2);
}

#[test]
fn test_corrupted_log_refuses_to_open() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open(&config).unwrap();
    store.post(actor(1), "soon to be damaged").unwrap();
    drop(store);

    let mut bytes = std::fs::read(config.log_path()).unwrap();
    let last_payload_byte = bytes.len() - 5;
    bytes[last_payload_byte] ^= 0x55;
    std::fs::write(config.log_path(), bytes).unwrap();

    assert!(matches!(RecordStore::open(&config), Err(BoardError::CorruptedData(_))));
}

#[test]
fn test_in_memory_config_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = StoreConfig { data_dir: dir.path().to_path_buf(), ..StoreConfig::in_memory() };

    let store = RecordStore::open(&config).unwrap();
    store.post(actor(1), "gone on exit").unwrap();

    assert!(!config.log_path().exists());
}

#[test]
fn test_data_dir_has_a_single_writer() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let serving = RecordStore::open(&config).unwrap();
    let second = RecordStore::open(&config);
    assert!(matches!(second, Err(BoardError::Storage(msg)) if msg.contains("in use")));

    assert_eq!(serving.post(actor(1), "only writer").unwrap(), 0);
    drop(serving);

    let store = RecordStore::open(&config).unwrap();
    assert_eq!(store.count(), 1);
    assert_eq!(store.post(actor(2), "next run").unwrap(), 1);
}

#[test]
fn test_failed_durable_append_changes_nothing() {
    let dir = tempdir().unwrap();
    let config = StoreConfig::persistent(dir.path());

    let store = RecordStore::open(&config).unwrap();
    store.post(actor(1), "kept").unwrap();
    let log_bytes = store.stats().log_bytes;
    let mut events = store.subscribe();

    store.with_log(|log| log.make_read_only()).unwrap().unwrap();
    let result = store.post(actor(1), "never lands");
    assert!(matches!(result, Err(BoardError::Storage(_))));

    assert_eq!(store.count(), 1);
    assert_eq!(store.get_by_author(&actor(1)).len(), 1);
    assert!(matches!(store.get(1), Err(BoardError::NotFound(1))));
    assert_eq!(store.stats().log_bytes, log_bytes);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    // Once the log accepts writes again the index is not skipped
    store.with_log(|log| log.make_writable()).unwrap().unwrap();
    assert_eq!(store.post(actor(1), "retried").unwrap(), 1);
    assert_eq!(events.try_recv().unwrap().index, 1);
    drop(store);

    let store = RecordStore::open(&config).unwrap();
    let contents: Vec<String> = store.get_all().into_iter().map(|r| r.content).collect();
    assert_eq!(contents, vec!["kept", "retried"]);
}
