//! PostgreSQL connection management
//!
//! Jobs run a handful of statements per guild, minutes apart, so no pool is
//! kept: every repository operation opens a connection, runs its statements,
//! and closes it again.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::debug;

use guild_common::{ConfigError, DatabaseConfig};
use guild_core::error::DomainError;
use guild_core::traits::RepoResult;

use crate::repositories::map_db_error;

/// Opens one store connection per operation
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl ConnectionFactory {
    /// Validate the connection URL without connecting
    pub fn new(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| ConfigError::InvalidValue("DATABASE_URL", e.to_string()))?;

        Ok(Self {
            options,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    /// Open a fresh connection, bounded by the configured timeout
    pub async fn connect(&self) -> RepoResult<PgConnection> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(result) => result.map_err(map_db_error),
            Err(_) => Err(DomainError::Connectivity(format!(
                "connection attempt timed out after {}s",
                self.connect_timeout.as_secs()
            ))),
        }
    }
}

/// Close a connection; a failed close only matters for diagnostics
pub async fn release(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "Failed to close store connection cleanly");
    }
}
