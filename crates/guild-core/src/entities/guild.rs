//! Guild entity - externally managed reference data for one guild

use chrono::NaiveTime;

use crate::value_objects::GuildId;

/// Guild configuration row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub guild_id: GuildId,
    pub display_name: String,
    /// Local time of day at which the guild's daily counters reset
    pub reset_time: NaiveTime,
    /// Name of the sink target (spreadsheet) the guild's views are pushed to
    pub sink_target: String,
}

impl Guild {
    pub fn new(
        guild_id: GuildId,
        display_name: impl Into<String>,
        reset_time: NaiveTime,
        sink_target: impl Into<String>,
    ) -> Self {
        Self {
            guild_id,
            display_name: display_name.into(),
            reset_time,
            sink_target: sink_target.into(),
        }
    }
}
