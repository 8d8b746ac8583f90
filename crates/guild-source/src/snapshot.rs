//! Decoded roster of one guild

use std::collections::HashMap;

use guild_core::entities::{Member, TicketLog};
use guild_core::value_objects::{GuildId, MemberId};

use crate::error::SourceResult;
use crate::payloads::{GuildPayload, RaidResultPayload, TicketRules};

/// Per-member progress of one recent raid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaidProgress {
    pub raid_id: String,
    pub progress: HashMap<MemberId, i64>,
}

impl From<RaidResultPayload> for RaidProgress {
    fn from(payload: RaidResultPayload) -> Self {
        Self {
            raid_id: payload.raid_id,
            progress: payload
                .raid_member
                .into_iter()
                .map(|m| (MemberId::new(m.player_id), m.member_progress))
                .collect(),
        }
    }
}

/// Live roster snapshot as returned by a [`RosterSource`](crate::RosterSource)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSnapshot {
    pub guild_id: GuildId,
    pub members: Vec<Member>,
    pub raids: Vec<RaidProgress>,
}

impl GuildSnapshot {
    pub fn new(guild_id: GuildId, members: Vec<Member>) -> Self {
        Self {
            guild_id,
            members,
            raids: Vec::new(),
        }
    }

    /// Convert a decoded payload, deriving ticket losses with `rules`
    pub fn from_payload(
        guild_id: GuildId,
        payload: GuildPayload,
        rules: TicketRules,
    ) -> SourceResult<Self> {
        let members = payload
            .member
            .into_iter()
            .map(|m| m.into_member(&guild_id, rules))
            .collect::<SourceResult<Vec<_>>>()?;
        let raids = payload
            .recent_raid_result
            .into_iter()
            .map(RaidProgress::from)
            .collect();

        Ok(Self {
            guild_id,
            members,
            raids,
        })
    }

    /// Progress table of the most recent raid with id `raid_id`
    pub fn raid(&self, raid_id: &str) -> Option<&RaidProgress> {
        self.raids.iter().find(|r| r.raid_id == raid_id)
    }

    /// Ticket log entries for members who lost tickets today
    pub fn ticket_losses(&self) -> Vec<TicketLog> {
        self.members
            .iter()
            .map(|m| TicketLog::new(m.member_id.clone(), m.current_tickets))
            .filter(TicketLog::is_loss)
            .collect()
    }
}
