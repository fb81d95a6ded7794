pub mod config;
pub mod core_board;
pub mod http_api;
pub mod logging;
pub mod metrics;

pub use config::Config;
pub use core_board::{ActorId, BoardError, BoardResult, Posted, Record, RecordStore, Timestamp};
pub use http_api::BoardServer;
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Ensure the main exports are accessible
        let _ = LogLevel::Info;
        let _ = Config::default();
        assert_eq!(RecordStore::new().count(), 0);
    }
}
