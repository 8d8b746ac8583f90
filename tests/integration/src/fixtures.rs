//! Test fixtures and data builders

use chrono::NaiveTime;

use guild_core::entities::{Guild, Member};
use guild_core::value_objects::{Cell, GuildId, MemberId};
use guild_source::{GuildSnapshot, RaidProgress};

/// Guild with a 19:30 reset and a sink target named after it
pub fn guild(id: &str) -> Guild {
    let reset = NaiveTime::from_hms_opt(19, 30, 0).unwrap_or_default();
    Guild::new(GuildId::from(id), format!("Guild {id}"), reset, format!("{id} Sheet"))
}

/// Member attached to `guild_id` with some power
pub fn member(id: &str, name: &str, guild_id: &str) -> Member {
    let mut member = Member::new(MemberId::from(id), name, GuildId::from(guild_id));
    member.galactic_power = 5_000_000;
    member
}

/// Member that lost `tickets` today
pub fn member_with_tickets(id: &str, name: &str, guild_id: &str, tickets: i64) -> Member {
    let mut member = member(id, name, guild_id);
    member.current_tickets = tickets;
    member
}

/// Live roster of `guild_id` made of `(member_id, name)` pairs
pub fn roster(guild_id: &str, members: &[(&str, &str)]) -> GuildSnapshot {
    GuildSnapshot::new(
        GuildId::from(guild_id),
        members
            .iter()
            .map(|(id, name)| member(id, name, guild_id))
            .collect(),
    )
}

/// Recent raid result with `(member_id, progress)` pairs
pub fn raid(raid_id: &str, progress: &[(&str, i64)]) -> RaidProgress {
    RaidProgress {
        raid_id: raid_id.to_string(),
        progress: progress
            .iter()
            .map(|(id, score)| (MemberId::from(*id), *score))
            .collect(),
    }
}

/// Row of view cells: a name followed by numbers
pub fn view_row(name: &str, values: &[f64]) -> Vec<Cell> {
    std::iter::once(Cell::from(name))
        .chain(values.iter().map(|v| Cell::from(*v)))
        .collect()
}
