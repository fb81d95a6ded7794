/*
    Integration tests for core_board

    Test suite covering:
    - Posting and reading scenarios
    - Ordering and author-filter properties
    - Concurrent writers and readers
    - Durable log replay and recovery
    - Change notifications
*/

pub mod concurrency_tests;
pub mod persistence_tests;

use crate::core_board::model::{ActorId, ACTOR_ID_LEN};

/// Deterministic actor id for tests
pub fn actor(n: u8) -> ActorId {
    ActorId::from_bytes([n; ACTOR_ID_LEN])
}
