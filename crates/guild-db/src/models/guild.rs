//! Guild database model

use chrono::NaiveTime;
use sqlx::FromRow;

/// Database model for the guild table
#[derive(Debug, Clone, FromRow)]
pub struct GuildModel {
    pub guild_id: String,
    pub guild_name: String,
    pub reset_time: NaiveTime,
    pub spreadsheet: String,
}
