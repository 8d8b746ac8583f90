//! Wire format of the guild roster API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use guild_core::entities::Member;
use guild_core::value_objects::{GuildId, MemberId};

use crate::error::{SourceError, SourceResult};

/// Request body for one guild
#[derive(Debug, Serialize)]
pub struct GuildRequest<'a> {
    pub payload: GuildRequestPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildRequestPayload<'a> {
    pub guild_id: &'a str,
    pub include_recent_guild_activity_info: bool,
}

impl<'a> GuildRequest<'a> {
    pub fn new(guild_id: &'a GuildId) -> Self {
        Self {
            payload: GuildRequestPayload {
                guild_id: guild_id.as_str(),
                include_recent_guild_activity_info: true,
            },
        }
    }
}

/// Top-level response
#[derive(Debug, Deserialize)]
pub struct GuildResponse {
    pub guild: GuildPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildPayload {
    pub member: Vec<MemberPayload>,
    /// Absent when the guild has not raided recently
    #[serde(default)]
    pub recent_raid_result: Vec<RaidResultPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub player_id: String,
    pub player_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub galactic_power: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub ship_galactic_power: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub character_galactic_power: i64,
    /// Milliseconds since the epoch
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub last_activity_time: Option<i64>,
    #[serde(default)]
    pub member_contribution: Vec<ContributionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPayload {
    #[serde(rename = "type", deserialize_with = "lenient_i64")]
    pub kind: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub current_value: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidResultPayload {
    pub raid_id: String,
    #[serde(default)]
    pub raid_member: Vec<RaidMemberPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidMemberPayload {
    pub player_id: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub member_progress: i64,
}

/// Decode a response body into the guild section.
///
/// A body without `guild.member` is rejected rather than read as an empty
/// roster.
pub fn decode_response(body: &[u8]) -> SourceResult<GuildPayload> {
    serde_json::from_slice::<GuildResponse>(body)
        .map(|response| response.guild)
        .map_err(|e| SourceError::Decode(e.to_string()))
}

/// Integer encoded as a JSON number or a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            Self::Float(f) => Err(E::custom(format!("non-finite number {f}"))),
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .or_else(|_| trimmed.parse::<f64>().map(|f| f.trunc() as i64))
                    .map_err(|_| E::custom(format!("invalid number {s:?}")))
            }
        }
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Lenient::deserialize(deserializer)?.into_i64()
}

fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<Lenient>::deserialize(deserializer)?
        .map(Lenient::into_i64)
        .transpose()
}

/// Rules for deriving member fields that the API does not report directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketRules {
    /// Tickets each member is expected to earn per day
    pub daily_quota: i64,
    /// `memberContribution` type holding today's tickets
    pub contribution_type: i64,
}

impl Default for TicketRules {
    fn default() -> Self {
        Self {
            daily_quota: 600,
            contribution_type: 2,
        }
    }
}

impl MemberPayload {
    /// Tickets lost today: the quota minus the tickets earned so far
    pub fn tickets_lost(&self, rules: TicketRules) -> SourceResult<i64> {
        self.member_contribution
            .iter()
            .find(|c| c.kind == rules.contribution_type)
            .map(|c| rules.daily_quota - c.current_value)
            .ok_or_else(|| SourceError::MissingField {
                member: self.player_id.clone(),
                field: format!("memberContribution[type={}]", rules.contribution_type),
            })
    }

    pub fn into_member(self, guild_id: &GuildId, rules: TicketRules) -> SourceResult<Member> {
        let current_tickets = self.tickets_lost(rules)?;
        let last_activity: Option<DateTime<Utc>> =
            self.last_activity_time.and_then(DateTime::from_timestamp_millis);

        Ok(Member {
            member_id: MemberId::new(self.player_id),
            display_name: self.player_name,
            guild_id: Some(guild_id.clone()),
            galactic_power: self.galactic_power,
            fleet_power: self.ship_galactic_power,
            ground_power: self.character_galactic_power,
            last_activity,
            current_tickets,
        })
    }
}
