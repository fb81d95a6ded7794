/*
    Store subsystem - The record store and what it is built from
*/

pub mod author_index;
pub mod clock;
pub mod commit_log;
pub mod dir_lock;
pub mod errors;
pub mod record_store;
pub mod validator;

pub use author_index::AuthorIndex;
pub use clock::{Clock, ManualClock, SystemClock};
pub use commit_log::{CommitLog, LogEntry};
pub use dir_lock::DirLock;
pub use errors::*;
pub use record_store::{RecordStore, StoreStats};
pub use validator::{validate_content, MAX_CONTENT_LEN};
