/*
    Model subsystem - Data structures for board entries
*/

pub mod record;
pub mod types;

pub use record::*;
pub use types::*;
