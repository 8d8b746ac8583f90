//! Archive record - immutable snapshot of a member at removal time

use crate::entities::Member;
use crate::value_objects::{GuildId, MemberId};

/// Append-only archive entry; at most one exists per member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    member_id: MemberId,
    display_name: String,
    galactic_power: i64,
    former_guild_id: Option<GuildId>,
}

impl ArchiveRecord {
    /// Snapshot a member that is about to leave the active store
    pub fn from_member(member: &Member) -> Self {
        Self {
            member_id: member.member_id.clone(),
            display_name: member.display_name.clone(),
            galactic_power: member.galactic_power,
            former_guild_id: member.guild_id.clone(),
        }
    }

    /// Rebuild a record read back from the store
    pub fn restore(
        member_id: MemberId,
        display_name: String,
        galactic_power: i64,
        former_guild_id: Option<GuildId>,
    ) -> Self {
        Self {
            member_id,
            display_name,
            galactic_power,
            former_guild_id,
        }
    }

    #[inline]
    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn galactic_power(&self) -> i64 {
        self.galactic_power
    }

    #[inline]
    pub fn former_guild_id(&self) -> Option<&GuildId> {
        self.former_guild_id.as_ref()
    }
}
