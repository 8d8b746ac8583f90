//! Guild entity <-> model mapper

use guild_core::entities::Guild;
use guild_core::value_objects::GuildId;

use crate::models::GuildModel;

impl From<GuildModel> for Guild {
    fn from(model: GuildModel) -> Self {
        Guild {
            guild_id: GuildId::new(model.guild_id),
            display_name: model.guild_name,
            reset_time: model.reset_time,
            sink_target: model.spreadsheet,
        }
    }
}
