/*
    Events subsystem - Notifications for accepted posts

    Every successful post produces exactly one `Posted` event. Events are
    emitted while the append lock is still held, so every subscriber sees
    them in the order the posts were accepted.
*/

pub mod broadcaster;

pub use broadcaster::EventBroadcaster;

use crate::core_board::model::{ActorId, Record, Timestamp};
use serde::{Deserialize, Serialize};

/// A record was appended to the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posted {
    pub author: ActorId,
    pub content: String,
    pub created_at: Timestamp,
    pub index: u64,
}

impl From<&Record> for Posted {
    fn from(record: &Record) -> Self {
        Posted {
            author: record.author,
            content: record.content.clone(),
            created_at: record.created_at,
            index: record.index,
        }
    }
}

/// Synchronous in-process listener for accepted posts.
///
/// Called with the store's append lock held: implementations must return
/// quickly and must not call back into the store.
pub trait PostObserver: Send + Sync {
    fn on_posted(&self, event: &Posted);
}
