//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the players table.
///
/// Selected with explicit casts so that column type drift in the externally
/// managed schema does not break decoding.
#[derive(Debug, Clone, FromRow)]
pub struct MemberModel {
    pub player_id: String,
    pub nickname: String,
    pub total_gp: Option<i64>,
    /// Blank affiliations are normalized to NULL by the query
    pub guild_id: Option<String>,
    pub last_activity_time: Option<DateTime<Utc>>,
}
