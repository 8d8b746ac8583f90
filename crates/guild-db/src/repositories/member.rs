//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use tracing::{debug, instrument};

use guild_core::entities::{Member, RaidResult};
use guild_core::traits::{MemberRepository, RepoResult};
use guild_core::value_objects::{GuildId, MemberId};

use crate::connection::{release, ConnectionFactory};
use crate::mappers::{MemberColumns, MemberStatColumns, RenameColumns};
use crate::models::MemberModel;

use super::error::map_db_error;

/// Columns read for every member, normalized by explicit casts
const MEMBER_COLUMNS: &str = r#"
    player_id::text AS player_id,
    nickname::text AS nickname,
    total_gp::bigint AS total_gp,
    NULLIF(TRIM(guild_id::text), '') AS guild_id,
    last_activity_time::timestamptz AS last_activity_time
"#;

fn id_strings(ids: &[MemberId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_owned()).collect()
}

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    connections: ConnectionFactory,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(connections: ConnectionFactory) -> Self {
        Self { connections }
    }

    /// Run one write statement on a fresh connection
    async fn execute<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> RepoResult<u64> {
        let mut conn = self.connections.connect().await?;
        let result = query.execute(&mut conn).await.map_err(map_db_error);
        release(conn).await;

        Ok(result?.rows_affected())
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn list_members(&self, guild_id: Option<&GuildId>) -> RepoResult<Vec<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM players \
             WHERE $1::text IS NULL OR guild_id::text = $1 \
             ORDER BY nickname DESC"
        );

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(guild_id.map(GuildId::as_str))
            .fetch_all(&mut conn)
            .await
            .map_err(map_db_error);
        release(conn).await;

        Ok(result?.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_archive_candidates(&self, configured: &[GuildId]) -> RepoResult<Vec<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM players \
             WHERE NULLIF(TRIM(guild_id::text), '') IS NULL \
                OR guild_id::text <> ALL($1::text[]) \
             ORDER BY nickname DESC"
        );
        let configured: Vec<&str> = configured.iter().map(GuildId::as_str).collect();

        let mut conn = self.connections.connect().await?;
        let result = sqlx::query_as::<_, MemberModel>(&sql)
            .bind(configured)
            .fetch_all(&mut conn)
            .await
            .map_err(map_db_error);
        release(conn).await;

        Ok(result?.into_iter().map(Member::from).collect())
    }

    #[instrument(skip(self, members), fields(batch_size = members.len()))]
    async fn insert_members(&self, members: &[Member]) -> RepoResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let columns = MemberColumns::new(members);

        let inserted = self
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO players (player_id, nickname, total_gp, guild_id, last_activity_time)
                    SELECT * FROM UNNEST($1::text[], $2::text[], $3::bigint[], $4::text[], $5::timestamptz[])
                    ON CONFLICT (player_id) DO NOTHING
                    "#,
                )
                .bind(columns.player_ids)
                .bind(columns.nicknames)
                .bind(columns.total_gp)
                .bind(columns.guild_ids)
                .bind(columns.last_activity),
            )
            .await?;

        debug!(inserted, "Inserted members");
        Ok(inserted)
    }

    #[instrument(skip(self, members), fields(batch_size = members.len()))]
    async fn update_member_stats(&self, members: &[Member]) -> RepoResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let columns = MemberStatColumns::new(members);

        self.execute(
            sqlx::query(
                r#"
                UPDATE players AS p
                SET total_gp = u.total_gp,
                    last_activity_time = u.last_activity_time,
                    guild_id = COALESCE(u.guild_id, p.guild_id)
                FROM UNNEST($1::text[], $2::bigint[], $3::timestamptz[], $4::text[])
                    AS u(player_id, total_gp, last_activity_time, guild_id)
                WHERE p.player_id::text = u.player_id
                "#,
            )
            .bind(columns.player_ids)
            .bind(columns.total_gp)
            .bind(columns.last_activity)
            .bind(columns.guild_ids),
        )
        .await
    }

    #[instrument(skip(self, members), fields(batch_size = members.len()))]
    async fn rename_members(&self, members: &[Member]) -> RepoResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let columns = RenameColumns::new(members);

        self.execute(
            sqlx::query(
                r#"
                UPDATE players AS p
                SET nickname = u.nickname
                FROM UNNEST($1::text[], $2::text[]) AS u(player_id, nickname)
                WHERE p.player_id::text = u.player_id
                "#,
            )
            .bind(columns.player_ids)
            .bind(columns.nicknames),
        )
        .await
    }

    #[instrument(skip(self, member_ids), fields(batch_size = member_ids.len()))]
    async fn clear_guild(&self, member_ids: &[MemberId]) -> RepoResult<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        self.execute(
            sqlx::query("UPDATE players SET guild_id = NULL WHERE player_id::text = ANY($1::text[])")
                .bind(id_strings(member_ids)),
        )
        .await
    }

    #[instrument(skip(self, member_ids), fields(batch_size = member_ids.len()))]
    async fn delete_members(&self, member_ids: &[MemberId]) -> RepoResult<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        self.execute(
            sqlx::query("DELETE FROM players WHERE player_id::text = ANY($1::text[])")
                .bind(id_strings(member_ids)),
        )
        .await
    }

    #[instrument(skip(self, results), fields(batch_size = results.len()))]
    async fn update_raid_results(&self, results: &[RaidResult]) -> RepoResult<u64> {
        if results.is_empty() {
            return Ok(0);
        }
        let (player_ids, progress): (Vec<String>, Vec<Option<i64>>) = results
            .iter()
            .map(|r| (r.member_id.as_str().to_owned(), r.last_raid_result))
            .unzip();

        self.execute(
            sqlx::query(
                r#"
                UPDATE players AS p
                SET last_raid_result = u.last_raid_result
                FROM UNNEST($1::text[], $2::bigint[]) AS u(player_id, last_raid_result)
                WHERE p.player_id::text = u.player_id
                "#,
            )
            .bind(player_ids)
            .bind(progress),
        )
        .await
    }
}
