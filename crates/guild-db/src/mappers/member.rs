//! Member entity <-> model mapper

use chrono::{DateTime, Utc};

use guild_core::entities::Member;
use guild_core::value_objects::{GuildId, MemberId};

use crate::models::MemberModel;

/// Convert MemberModel to Member entity
/// Note: fleet/ground power and tickets are not persisted and load as zero
impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member {
            member_id: MemberId::new(model.player_id),
            display_name: model.nickname,
            guild_id: model.guild_id.map(GuildId::new),
            galactic_power: model.total_gp.unwrap_or_default(),
            fleet_power: 0,
            ground_power: 0,
            last_activity: model.last_activity_time,
            current_tickets: 0,
        }
    }
}

/// Column arrays for inserting members
#[derive(Debug, Default)]
pub struct MemberColumns {
    pub player_ids: Vec<String>,
    pub nicknames: Vec<String>,
    pub total_gp: Vec<i64>,
    pub guild_ids: Vec<Option<String>>,
    pub last_activity: Vec<Option<DateTime<Utc>>>,
}

impl MemberColumns {
    pub fn new(members: &[Member]) -> Self {
        let mut columns = Self::default();
        for member in members {
            columns.player_ids.push(member.member_id.as_str().to_owned());
            columns.nicknames.push(member.display_name.clone());
            columns.total_gp.push(member.galactic_power);
            columns
                .guild_ids
                .push(member.guild_id.as_ref().map(|id| id.as_str().to_owned()));
            columns.last_activity.push(member.last_activity);
            columns
                .guild_ids
                .push(member.guild_id.as_ref().map(|g| g.as_str().to_owned()));
        }
        columns
    }
}

/// Column arrays for refreshing member stats
#[derive(Debug, Default)]
pub struct MemberStatColumns {
    pub player_ids: Vec<String>,
    pub total_gp: Vec<i64>,
    pub last_activity: Vec<Option<DateTime<Utc>>>,
    pub guild_ids: Vec<Option<String>>,
}

impl MemberStatColumns {
    pub fn new(members: &[Member]) -> Self {
        let mut columns = Self::default();
        for member in members {
            columns.player_ids.push(member.member_id.as_str().to_owned());
            columns.total_gp.push(member.galactic_power);
            columns.last_activity.push(member.last_activity);
            columns
                .guild_ids
                .push(member.guild_id.as_ref().map(|g| g.as_str().to_owned()));
        }
        columns
    }
}

/// Column arrays for nickname updates
#[derive(Debug, Default)]
pub struct RenameColumns {
    pub player_ids: Vec<String>,
    pub nicknames: Vec<String>,
}

impl RenameColumns {
    pub fn new(members: &[Member]) -> Self {
        members.iter().fold(Self::default(), |mut columns, member| {
            columns.player_ids.push(member.member_id.as_str().to_owned());
            columns.nicknames.push(member.display_name.clone());
            columns
        })
    }
}
