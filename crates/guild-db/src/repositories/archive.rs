//! PostgreSQL implementation of ArchiveRepository

use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use tracing::{debug, instrument, warn};

use guild_core::entities::ArchiveRecord;
use guild_core::error::DomainError;
use guild_core::traits::{ArchiveRepository, RepoResult};
use guild_core::value_objects::MemberId;

use crate::connection::{release, ConnectionFactory};
use crate::mappers::ArchiveColumns;

use super::error::map_db_error;

/// PostgreSQL implementation of ArchiveRepository
#[derive(Clone)]
pub struct PgArchiveRepository {
    connections: ConnectionFactory,
}

impl PgArchiveRepository {
    /// Create a new PgArchiveRepository
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }

    /// Insert the whole batch in one transaction
    async fn insert_batch(conn: &mut PgConnection, records: &[ArchiveRecord]) -> RepoResult<u64> {
        let columns = ArchiveColumns::new(records);
        let mut tx = conn.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO players_archive (player_id, nickname, total_gp, guild_id)
            SELECT * FROM UNNEST($1::text[], $2::text[], $3::bigint[], $4::text[])
            ON CONFLICT (player_id) DO NOTHING
            "#,
        )
        .bind(columns.player_ids)
        .bind(columns.nicknames)
        .bind(columns.total_gp)
        .bind(columns.guild_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        tx.commit().await.map_err(map_db_error)?;
        Ok(inserted)
    }

    /// Insert records one at a time, skipping the ones the store rejects
    async fn insert_each(conn: &mut PgConnection, records: &[ArchiveRecord]) -> u64 {
        let mut inserted = 0;
        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO players_archive (player_id, nickname, total_gp, guild_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (player_id) DO NOTHING
                "#,
            )
            .bind(record.member_id().as_str())
            .bind(record.display_name())
            .bind(record.galactic_power())
            .bind(record.former_guild_id().map(|id| id.as_str()))
            .execute(&mut *conn)
            .await;

            match result {
                Ok(done) => inserted += done.rows_affected(),
                Err(e) => {
                    let e = map_db_error(e);
                    warn!(
                        member_id = %record.member_id(),
                        error = %e,
                        code = e.code(),
                        "Failed to archive member"
                    );
                }
            }
        }
        inserted
    }

    /// Ids among `records` that are present in the archive
    async fn confirmed(conn: &mut PgConnection, records: &[ArchiveRecord]) -> RepoResult<Vec<MemberId>> {
        let ids: Vec<&str> = records.iter().map(|r| r.member_id().as_str()).collect();

        let confirmed = sqlx::query_scalar::<_, String>(
            "SELECT player_id::text FROM players_archive WHERE player_id::text = ANY($1::text[])",
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

        Ok(confirmed.into_iter().map(MemberId::new).collect())
    }

    async fn archive(conn: &mut PgConnection, records: &[ArchiveRecord]) -> RepoResult<Vec<MemberId>> {
        match Self::insert_batch(conn, records).await {
            Ok(inserted) => debug!(inserted, "Archived batch"),
            Err(DomainError::Connectivity(reason)) => {
                return Err(DomainError::Connectivity(reason));
            }
            Err(e) => {
                warn!(
                    batch_size = records.len(),
                    error = %e,
                    code = e.code(),
                    "Batch archive insert failed, retrying row by row"
                );
                let inserted = Self::insert_each(conn, records).await;
                debug!(inserted, "Archived rows individually");
            }
        }

        Self::confirmed(conn, records).await
    }
}

#[async_trait]
impl ArchiveRepository for PgArchiveRepository {
    #[instrument(skip(self, records), fields(batch_size = records.len()))]
    async fn insert_archive_records(&self, records: &[ArchiveRecord]) -> RepoResult<Vec<MemberId>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connections.connect().await?;
        let result = Self::archive(&mut conn, records).await;
        release(conn).await;

        result
    }
}
