//! PostgreSQL implementation of ViewRepository

use async_trait::async_trait;
use tracing::{debug, instrument};

use guild_core::entities::{RaidScoreLog, ViewKind};
use guild_core::traits::{RepoResult, ViewRepository};
use guild_core::value_objects::{Cell, GuildId, MemberId, OrderClause, Timeframe};

use crate::connection::{release, ConnectionFactory};
use crate::mappers::row_to_cells;
use crate::models::RaidPerformanceModel;
use crate::queries::{view_source, view_sql, RAID_PERFORMANCE_SQL};

use super::error::map_db_error;

/// PostgreSQL implementation of ViewRepository
#[derive(Clone)]
pub struct PgViewRepository {
    connections: ConnectionFactory,
}

impl PgViewRepository {
    /// Create a new PgViewRepository
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl ViewRepository for PgViewRepository {
    #[instrument(skip(self), fields(source = %view_source(kind, timeframe)))]
    async fn read_view(
        &self,
        guild_id: &GuildId,
        kind: ViewKind,
        order: OrderClause,
        timeframe: Timeframe,
    ) -> RepoResult<Vec<Vec<Cell>>> {
        let sql = view_sql(kind, &order, timeframe);
        let spec = kind.spec();

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query(&sql)
            .bind(guild_id.as_str())
            .fetch_all(&mut conn)
            .await;
        release(conn).await;

        let rows = result.map_err(map_db_error)?;
        let fetched = rows.len();
        let mut table = Vec::with_capacity(fetched);
        for row in &rows {
            if let Some(cells) = row_to_cells(row, &spec).map_err(map_db_error)? {
                table.push(cells);
            }
        }

        debug!(fetched, kept = table.len(), "Read view");
        Ok(table)
    }

    #[instrument(skip(self))]
    async fn list_raid_performance(&self, guild_id: &GuildId) -> RepoResult<Vec<RaidScoreLog>> {
        let mut conn = self.connections.connect().await?;
        let result = sqlx::query_as::<_, RaidPerformanceModel>(RAID_PERFORMANCE_SQL)
            .bind(guild_id.as_str())
            .fetch_all(&mut conn)
            .await
            .map_err(map_db_error);
        release(conn).await;

        Ok(result?
            .into_iter()
            .map(|model| RaidScoreLog {
                member_id: MemberId::new(model.player_id),
                raid_score: model.score,
                percent_of_average: model.percent_of_average,
            })
            .collect())
    }
}
