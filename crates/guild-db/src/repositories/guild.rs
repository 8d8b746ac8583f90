//! PostgreSQL implementation of GuildRepository

use async_trait::async_trait;
use tracing::instrument;

use guild_core::entities::Guild;
use guild_core::traits::{GuildRepository, RepoResult};

use crate::connection::{release, ConnectionFactory};
use crate::models::GuildModel;

use super::error::map_db_error;

/// PostgreSQL implementation of GuildRepository
#[derive(Clone)]
pub struct PgGuildRepository {
    connections: ConnectionFactory,
}

impl PgGuildRepository {
    /// Create a new PgGuildRepository
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl GuildRepository for PgGuildRepository {
    #[instrument(skip(self))]
    async fn list_guilds(&self) -> RepoResult<Vec<Guild>> {
        let mut conn = self.connections.connect().await?;
        let result = sqlx::query_as::<_, GuildModel>(
            r#"
            SELECT guild_id::text AS guild_id, guild_name, reset_time::time AS reset_time, spreadsheet
            FROM guild
            ORDER BY guild_name
            "#,
        )
        .fetch_all(&mut conn)
        .await
        .map_err(map_db_error);
        release(conn).await;

        Ok(result?.into_iter().map(Guild::from).collect())
    }
}
