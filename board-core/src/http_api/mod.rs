//! HTTP API for the board
//!
//! Exposes the record store over JSON. The calling actor is taken from a
//! request header that the fronting authentication layer is trusted to set.

pub mod api;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use api::build_router;
pub use server::BoardServer;
pub use state::AppState;
