//! HTTP server for the board API

use super::api::build_router;
use super::state::AppState;
use crate::config::ServerConfig;
use crate::core_board::RecordStore;
use anyhow::Result;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Board HTTP server
pub struct BoardServer {
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown_timeout: Duration,
}

impl BoardServer {
    /// Create a new server over `store`
    pub fn new(store: Arc<RecordStore>, config: &ServerConfig) -> Result<Self> {
        let state = Arc::new(AppState::from_config(store, config)?);
        Ok(Self {
            state,
            addr: config.bind_address,
            shutdown_timeout: config.shutdown_timeout,
        })
    }

    /// Start the server and run until Ctrl-C
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Start the server and run until `signal` resolves
    pub async fn run_until<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener, signal).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// In-flight requests get `shutdown_timeout` to finish once the signal fires.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let router = build_router(self.state);
        info!("Board API listening on {}", local_addr);

        let (fired_tx, fired_rx) = oneshot::channel::<()>();
        let graceful = async move {
            signal.await;
            info!("Shutting down board API");
            let _ = fired_tx.send(());
        };

        let server = axum::serve(listener, router).with_graceful_shutdown(graceful).into_future();
        tokio::pin!(server);

        let timeout = self.shutdown_timeout;
        tokio::select! {
            result = &mut server => result?,
            _ = async {
                // Only counts down once the signal has fired
                if fired_rx.await.is_ok() {
                    tokio::time::sleep(timeout).await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {
                warn!("Graceful shutdown timed out after {:?}, dropping open connections", timeout);
            }
        }

        info!("Board API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
