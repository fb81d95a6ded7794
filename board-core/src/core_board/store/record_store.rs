/*
    record_store.rs - The board's record store

    Owns the ordered record log and the per-author index derived from it.

    Concurrency:
    - All posts go through one write lock, so indices are handed out
      strictly in sequence and the author index never drifts from the log
    - Reads share a read lock and only ever see fully appended records
    - The durable append, the in-memory append and the notification all
      happen under the same write lock; a failure before the in-memory
      append leaves nothing behind
    - A persistent store owns its data directory: a second open of the
      same directory fails while this one is alive
*/

use crate::config::StoreConfig;
use crate::core_board::events::{EventBroadcaster, PostObserver, Posted};
use crate::core_board::model::{ActorId, Record, Timestamp};
use crate::core_board::store::author_index::AuthorIndex;
use crate::core_board::store::clock::{Clock, SystemClock};
use crate::core_board::store::commit_log::CommitLog;
use crate::core_board::store::dir_lock::DirLock;
use crate::core_board::store::errors::{BoardError, BoardResult};
use crate::core_board::store::validator::validate_content;
use crate::metrics::{record_post_accepted, record_post_rejected, record_read};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

struct Inner {
    records: Vec<Record>,
    by_author: AuthorIndex,
    log: Option<CommitLog>,
    // Held, never read: dropping it releases the data directory
    _dir_lock: Option<DirLock>,
}

/// Append-only store of board records
pub struct RecordStore {
    inner: RwLock<Inner>,
    clock: Arc<dyn Clock>,
    events: EventBroadcaster,
    observers: RwLock<Vec<Arc<dyn PostObserver>>>,
}

/// Storage statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub records: u64,
    pub authors: usize,
    /// Size of the durable log, if there is one
    pub log_bytes: Option<u64>,
}

impl RecordStore {
    /// Empty in-memory store on the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty in-memory store on a caller-supplied clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(
            Vec::new(),
            AuthorIndex::new(),
            None,
            None,
            clock,
            EventBroadcaster::default(),
        )
    }

    /// Open a store as configured, replaying the durable log when `persist` is set
    pub fn open(config: &StoreConfig) -> BoardResult<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: &StoreConfig, clock: Arc<dyn Clock>) -> BoardResult<Self> {
        if config.event_capacity == 0 {
            return Err(BoardError::InvalidConfig(
                "event_capacity must be greater than 0".to_string(),
            ));
        }

        let mut records = Vec::new();
        let mut by_author = AuthorIndex::new();

        let (log, dir_lock) = if config.persist {
            // Taken before the log is touched: opening may truncate a torn tail
            let dir_lock = DirLock::acquire(&config.data_dir)?;
            let (log, entries) = CommitLog::open(config.log_path())?;

            for entry in entries {
                let record: Record = bincode::deserialize(&entry.data).map_err(|e| {
                    BoardError::CorruptedData(format!(
                        "Undecodable record at seq {}: {}",
                        entry.seq, e
                    ))
                })?;

                if record.index != entry.seq {
                    return Err(BoardError::CorruptedData(format!(
                        "Record index {} stored at seq {}",
                        record.index, entry.seq
                    )));
                }

                by_author.insert(record.author, record.index);
                records.push(record);
            }

            info!(
                path = %log.path().display(),
                records = records.len(),
                authors = by_author.author_count(),
                "Replayed record log"
            );
            (Some(log), Some(dir_lock))
        } else {
            (None, None)
        };

        let events = EventBroadcaster::new(config.event_capacity);
        Ok(Self::from_parts(records, by_author, log, dir_lock, clock, events))
    }

    fn from_parts(
        records: Vec<Record>,
        by_author: AuthorIndex,
        log: Option<CommitLog>,
        dir_lock: Option<DirLock>,
        clock: Arc<dyn Clock>,
        events: EventBroadcaster,
    ) -> Self {
        RecordStore {
            inner: RwLock::new(Inner { records, by_author, log, _dir_lock: dir_lock }),
            clock,
            events,
            observers: RwLock::new(Vec::new()),
        }
    }

    // Observers run after the commit, so a panic in one leaves the state
    // consistent and a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record by `author` and return its index.
    ///
    /// Fails with `EmptyContent` or `ContentTooLong` before touching any
    /// state, or with `Storage` if the durable log rejects the write.
    pub fn post(&self, author: ActorId, content: impl Into<String>) -> BoardResult<u64> {
        let content = content.into();

        if let Err(err) = validate_content(&content) {
            debug!(author = %author, len = content.len(), error = %err, "Rejected post");
            record_post_rejected(err.kind());
            return Err(err);
        }

        let mut guard = self.write();
        let inner = &mut *guard;

        let index = inner.records.len() as u64;
        let floor = inner.records.last().map(|r| r.created_at.as_secs()).unwrap_or(0);
        let created_at = Timestamp::from_secs(self.clock.now_secs().max(floor));
        let record = Record::new(index, author, content, created_at);

        if let Some(log) = inner.log.as_mut() {
            let persisted = bincode::serialize(&record)
                .map_err(BoardError::from)
                .and_then(|data| log.append(created_at.as_secs(), &data));
            if let Err(err) = persisted {
                error!(index, error = %err, "Failed to persist record");
                record_post_rejected(err.kind());
                return Err(err);
            }
        }

        let event = Posted::from(&record);
        inner.by_author.insert(author, index);
        inner.records.push(record);
        let count = inner.records.len() as u64;

        self.events.emit(event.clone());
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner).clone();
        for observer in &observers {
            observer.on_posted(&event);
        }
        drop(guard);

        info!(index, author = %author, created_at = %created_at, "Accepted post");
        record_post_accepted(count);
        Ok(index)
    }

    /// The record at `index`, or `NotFound` past the end of the log
    pub fn get(&self, index: u64) -> BoardResult<Record> {
        record_read("get");
        let inner = self.read();
        usize::try_from(index)
            .ok()
            .and_then(|i| inner.records.get(i))
            .cloned()
            .ok_or(BoardError::NotFound(index))
    }

    /// Number of records on the board
    pub fn count(&self) -> u64 {
        self.read().records.len() as u64
    }

    /// Every record in posting order. Later posts do not show up in the returned copy.
    pub fn get_all(&self) -> Vec<Record> {
        record_read("get_all");
        let inner = self.read();
        debug!(records = inner.records.len(), "Listing all records");
        inner.records.clone()
    }

    /// Records written by `author`, in posting order
    pub fn get_by_author(&self, author: &ActorId) -> Vec<Record> {
        record_read("get_by_author");
        let inner = self.read();
        let records: Vec<Record> = inner
            .by_author
            .indices(author)
            .iter()
            .filter_map(|&i| inner.records.get(i as usize))
            .cloned()
            .collect();
        debug!(author = %author, records = records.len(), "Listing records by author");
        records
    }

    /// Receive a `Posted` event for every post accepted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Posted> {
        self.events.subscribe()
    }

    /// Register a synchronous listener for accepted posts
    pub fn add_observer(&self, observer: Arc<dyn PostObserver>) {
        self.observers.write().unwrap_or_else(PoisonError::into_inner).push(observer);
    }

    pub fn is_persistent(&self) -> bool {
        self.read().log.is_some()
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.read();
        StoreStats {
            records: inner.records.len() as u64,
            authors: inner.by_author.author_count(),
            log_bytes: inner.log.as_ref().map(CommitLog::size),
        }
    }

    /// Run `f` against the durable log, if there is one
    #[cfg(test)]
    pub(crate) fn with_log<R>(&self, f: impl FnOnce(&mut CommitLog) -> R) -> Option<R> {
        self.write().log.as_mut().map(f)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
