//! # Application Context
//!
//! Wires configuration, the database clients, repositories and services
//! together once at startup, and runs the HTTP server.
//!
//! # Examples
//!
//! ```ignore
//! use market_info_storage::app::AppContext;
//! use market_info_storage::config::AppConfig;
//!
//! let context = AppContext::connect(AppConfig::load()?).await?;
//! context.serve().await?;
//! ```

use crate::api::rest::{AppState, create_router};
use crate::application::services::{OrderBookService, OrderHistoryService};
use crate::config::{AppConfig, ConfigError};
use crate::infrastructure::persistence::in_memory::{
    InMemoryHistoryOrderRepository, InMemoryOrderBookRepository,
};
use crate::infrastructure::persistence::clickhouse::{self, ClickHouseHistoryOrderRepository};
use crate::infrastructure::persistence::postgres::{self, PostgresOrderBookRepository};
use crate::infrastructure::persistence::traits::RepositoryError;
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Startup and serving errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database setup failed.
    #[error("database setup failed: {0}")]
    Database(#[from] RepositoryError),

    /// The server could not bind or stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Result type for application startup.
pub type AppResult<T> = Result<T, AppError>;

/// Everything the running service needs, built once.
#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    pool: Option<PgPool>,
    state: Arc<AppState>,
}

impl AppContext {
    /// Connects to PostgreSQL and ClickHouse and builds the services on top.
    ///
    /// Applies migrations first when `database.run_migrations` or
    /// `clickhouse.run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if either store is unreachable or a migration fails.
    pub async fn connect(config: AppConfig) -> AppResult<Self> {
        let pool = postgres::connect(&config.database).await?;
        if config.database.run_migrations {
            postgres::run_migrations(&pool).await?;
        }

        let history_client = clickhouse::connect(&config.clickhouse).await?;
        if config.clickhouse.run_migrations {
            clickhouse::run_migrations(&history_client).await?;
        }

        let state = AppState {
            order_book_service: OrderBookService::new(Arc::new(
                PostgresOrderBookRepository::new(pool.clone()),
            )),
            order_history_service: OrderHistoryService::new(Arc::new(
                ClickHouseHistoryOrderRepository::new(history_client),
            )),
        };

        Ok(Self {
            config,
            pool: Some(pool),
            state: Arc::new(state),
        })
    }

    /// Builds the services on in-memory repositories.
    #[must_use]
    pub fn in_memory(config: AppConfig) -> Self {
        let state = AppState {
            order_book_service: OrderBookService::new(Arc::new(
                InMemoryOrderBookRepository::new(),
            )),
            order_history_service: OrderHistoryService::new(Arc::new(
                InMemoryHistoryOrderRepository::new(),
            )),
        };

        Self {
            config,
            pool: None,
            state: Arc::new(state),
        }
    }

    /// Returns the configuration the context was built with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the shared handler state.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Returns the HTTP router with all middleware applied.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(self.state(), self.config.rest.request_timeout())
    }

    /// Serves HTTP until SIGINT or SIGTERM.
    ///
    /// After the signal, in-flight requests get `rest.shutdown_timeout_secs`
    /// to finish before the remaining connections are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(self) -> AppResult<()> {
        let addr = self.config.rest.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Server(format!("bind {addr}: {e}")))?;
        info!(%addr, "REST server listening");

        let shutdown = Arc::new(Notify::new());
        let notified = Arc::clone(&shutdown);
        let router = self.router();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { notified.notified().await })
                .await
        });

        tokio::select! {
            result = &mut server => return flatten(result),
            () = shutdown_signal() => {}
        }

        info!("Shutting down server");
        shutdown.notify_one();

        let grace = self.config.rest.shutdown_timeout();
        match tokio::time::timeout(grace, server).await {
            Ok(result) => flatten(result)?,
            Err(_) => warn!(
                timeout_secs = grace.as_secs(),
                "Shutdown timed out, dropping open connections"
            ),
        }

        if let Some(pool) = self.pool {
            pool.close().await;
        }
        info!("Server exited");
        Ok(())
    }
}

fn flatten(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> AppResult<()> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::Server(e.to_string())),
        Err(e) => Err(AppError::Server(e.to_string())),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
