//! PostgreSQL implementation of ActivityLogRepository

use async_trait::async_trait;
use tracing::{info, instrument};

use guild_core::entities::{GpLog, RaidScoreLog, TicketLog};
use guild_core::traits::{ActivityLogRepository, RepoResult};

use crate::connection::{release, ConnectionFactory};

use super::error::map_db_error;

/// PostgreSQL implementation of ActivityLogRepository
#[derive(Clone)]
pub struct PgActivityLogRepository {
    connections: ConnectionFactory,
}

impl PgActivityLogRepository {
    /// Create a new PgActivityLogRepository
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl ActivityLogRepository for PgActivityLogRepository {
    #[instrument(skip(self, logs), fields(batch_size = logs.len()))]
    async fn insert_ticket_logs(&self, logs: &[TicketLog]) -> RepoResult<u64> {
        if logs.is_empty() {
            return Ok(0);
        }
        let (player_ids, tickets): (Vec<String>, Vec<i64>) = logs
            .iter()
            .map(|log| (log.member_id.as_str().to_owned(), log.tickets_lost))
            .unzip();

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO ticket_log (player_id, created_at, tickets_lost)
            SELECT u.player_id, NOW(), u.tickets_lost
            FROM UNNEST($1::text[], $2::bigint[]) AS u(player_id, tickets_lost)
            "#,
        )
        .bind(player_ids)
        .bind(tickets)
        .execute(&mut conn)
        .await
        .map_err(map_db_error);
        release(conn).await;

        let inserted = result?.rows_affected();
        info!(inserted, "Inserted ticket logs");
        Ok(inserted)
    }

    #[instrument(skip(self, logs), fields(batch_size = logs.len()))]
    async fn insert_gp_logs(&self, logs: &[GpLog]) -> RepoResult<u64> {
        if logs.is_empty() {
            return Ok(0);
        }
        let (player_ids, total_gp): (Vec<String>, Vec<i64>) = logs
            .iter()
            .map(|log| (log.member_id.as_str().to_owned(), log.galactic_power))
            .unzip();

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO gp_history (player_id, total_gp, timestamp)
            SELECT u.player_id, u.total_gp, NOW()
            FROM UNNEST($1::text[], $2::bigint[]) AS u(player_id, total_gp)
            "#,
        )
        .bind(player_ids)
        .bind(total_gp)
        .execute(&mut conn)
        .await
        .map_err(map_db_error);
        release(conn).await;

        let inserted = result?.rows_affected();
        info!(inserted, "Inserted GP logs");
        Ok(inserted)
    }

    #[instrument(skip(self, logs), fields(batch_size = logs.len()))]
    async fn insert_raid_score_logs(&self, logs: &[RaidScoreLog]) -> RepoResult<u64> {
        if logs.is_empty() {
            return Ok(0);
        }
        let mut player_ids = Vec::with_capacity(logs.len());
        let mut scores = Vec::with_capacity(logs.len());
        let mut percents = Vec::with_capacity(logs.len());
        for log in logs {
            player_ids.push(log.member_id.as_str().to_owned());
            scores.push(log.raid_score);
            percents.push(log.percent_of_average);
        }

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO raid_score_log (player_id, raid_score, percent_of_avg)
            SELECT * FROM UNNEST($1::text[], $2::float8[], $3::float8[])
            "#,
        )
        .bind(player_ids)
        .bind(scores)
        .bind(percents)
        .execute(&mut conn)
        .await
        .map_err(map_db_error);
        release(conn).await;

        let inserted = result?.rows_affected();
        info!(inserted, "Inserted raid score logs");
        Ok(inserted)
    }
}
