//! Member entity - one player's affiliation record in the active store

use chrono::{DateTime, Utc};

use crate::value_objects::{GuildId, MemberId};

/// Active-store member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub member_id: MemberId,
    pub display_name: String,
    /// `None` once the member has been soft-removed from its guild
    pub guild_id: Option<GuildId>,
    pub galactic_power: i64,
    pub fleet_power: i64,
    pub ground_power: i64,
    pub last_activity: Option<DateTime<Utc>>,
    /// Tickets lost against today's quota
    pub current_tickets: i64,
}

impl Member {
    /// Create a new Member affiliated with `guild_id`
    pub fn new(member_id: MemberId, display_name: impl Into<String>, guild_id: GuildId) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            guild_id: Some(guild_id),
            galactic_power: 0,
            fleet_power: 0,
            ground_power: 0,
            last_activity: None,
            current_tickets: 0,
        }
    }

    /// Identity and human-readable name used by diffing
    pub fn key(&self) -> MemberKey {
        MemberKey {
            member_id: self.member_id.clone(),
            display_name: self.display_name.clone(),
        }
    }

    /// Check whether the member is still affiliated with `guild_id`
    #[inline]
    pub fn belongs_to(&self, guild_id: &GuildId) -> bool {
        self.guild_id.as_ref() == Some(guild_id)
    }

    /// Clear the guild affiliation (soft remove)
    pub fn detach(&mut self) {
        self.guild_id = None;
    }
}

/// Matching key of a member as reported in diffs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub member_id: MemberId,
    pub display_name: String,
}

/// A member whose display name changed between the store and the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub member_id: MemberId,
    pub previous_name: String,
    pub current_name: String,
}
