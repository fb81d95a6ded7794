/*
    core_board - Append-only public message board

    The record store behind the board. Handles:
    - Data model (actor ids, records, timestamps)
    - Content validation
    - Sequential index assignment and the per-author index
    - Durable commit log and replay on open
    - Change notifications for accepted posts
*/

pub mod events;
pub mod model;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export commonly used types
pub use events::{EventBroadcaster, PostObserver, Posted};
pub use model::{ActorId, Record, Timestamp, ACTOR_ID_LEN};
pub use store::{
    BoardError, BoardResult, Clock, ManualClock, RecordStore, StoreStats, SystemClock,
    MAX_CONTENT_LEN,
};
