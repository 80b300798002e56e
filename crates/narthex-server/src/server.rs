use std::sync::Arc;

use narthex_store::{FsKeyStore, FsStoreConfig, KeyStore, Registrar};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Narthex key-registration server.
pub struct NarthexServer {
    config: ServerConfig,
    registrar: Registrar,
}

impl NarthexServer {
    /// Open the file store under `config.store_root` and build the server.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store_config = FsStoreConfig {
            sync_on_write: config.sync_on_write,
            ..FsStoreConfig::default()
        };
        let store = FsKeyStore::with_config(&config.store_root, store_config)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build the server on top of an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn KeyStore>) -> Self {
        Self {
            config,
            registrar: Registrar::new(store),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.registrar.clone(), self.config.max_body_size)
    }

    /// Start serving requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            root = %self.config.store_root.display(),
            "narthex listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
