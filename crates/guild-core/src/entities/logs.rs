//! Append-only activity records written by the logging jobs

use crate::value_objects::MemberId;

/// Tickets a member lost against the daily quota
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketLog {
    pub member_id: MemberId,
    pub tickets_lost: i64,
}

impl TicketLog {
    pub fn new(member_id: MemberId, tickets_lost: i64) -> Self {
        Self {
            member_id,
            tickets_lost,
        }
    }

    /// Only a positive shortfall is worth recording
    #[inline]
    pub fn is_loss(&self) -> bool {
        self.tickets_lost > 0
    }
}

/// Galactic power snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpLog {
    pub member_id: MemberId,
    pub galactic_power: i64,
}

/// Raid performance snapshot copied out of the `raid_performance` view
#[derive(Debug, Clone, PartialEq)]
pub struct RaidScoreLog {
    pub member_id: MemberId,
    pub raid_score: Option<f64>,
    pub percent_of_average: Option<f64>,
}

/// Latest raid progress of one member, `None` if they did not take part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaidResult {
    pub member_id: MemberId,
    pub last_raid_result: Option<i64>,
}
