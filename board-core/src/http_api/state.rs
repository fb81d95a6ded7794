//! Shared state for request handlers

use crate::config::ServerConfig;
use crate::core_board::RecordStore;
use anyhow::{Context, Result};
use axum::http::HeaderName;
use std::sync::Arc;

/// Server state shared across requests
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,

    /// Header the authentication layer fills with the caller's actor id
    pub actor_header: HeaderName,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>, actor_header: HeaderName) -> Self {
        Self { store, actor_header }
    }

    pub fn from_config(store: Arc<RecordStore>, config: &ServerConfig) -> Result<Self> {
        let actor_header = HeaderName::from_bytes(config.actor_header.as_bytes())
            .with_context(|| format!("invalid actor header name: {}", config.actor_header))?;
        Ok(Self::new(store, actor_header))
    }
}
