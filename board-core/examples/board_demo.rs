//! Example posting to an in-memory board and watching its notifications
//!
//! Run with:
//! ```bash
//! cargo run --example board_demo
//! ```

use board_core::core_board::{ActorId, RecordStore};
use board_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging_with_config(LogConfig::new(LogLevel::Debug).with_target(false))?;

    let store = Arc::new(RecordStore::new());
    let mut events = store.subscribe();

    let alice: ActorId = "0x00000000000000000000000000000000000000aa".parse()?;
    let bob: ActorId = "0x00000000000000000000000000000000000000bb".parse()?;

    let watcher = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(index = event.index, author = %event.author, "Saw post: {}", event.content);
        }
    });

    store.post(alice, "Hello, world!")?;
    store.post(bob, "Hi Alice")?;
    store.post(alice, "Welcome to the board")?;

    if let Err(e) = store.post(bob, "") {
        warn!("Post refused: {}", e);
    }

    for record in store.get_by_author(&alice) {
        info!(index = record.index, created_at = %record.created_at, "Alice wrote: {}", record.content);
    }
    info!(count = store.count(), "Board holds {} records", store.count());

    // Closing the last sender ends the watcher loop
    drop(store);
    watcher.await?;
    Ok(())
}
