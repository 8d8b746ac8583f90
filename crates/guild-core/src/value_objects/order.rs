//! Whitelisted sort and timeframe directives
//!
//! Sort directives and timeframes are read back from the sinks, which are
//! edited by hand, so they are untrusted input. An ORDER BY column or a view
//! name cannot be a bound parameter, so the only way such a directive reaches
//! SQL text is through the closed mappings below: every rendered fragment is
//! assembled from `&'static str` tables, never from the candidate string.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// Columns a view may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Nickname,
    ScoreDifference,
    LastRaidResult,
    TotalGp,
    RaidScore,
    AveragePercent,
    ZeffoReady,
    TicketsLostWeek,
    TotalPoints,
    LastActivityP,
    AveragePercentP,
    ZeroRaidScore,
    TicketsWeekly,
    TicketsLost,
    DaysTicketsLost,
    FullDaysLost,
    TotalTerritoryPoints,
    TotalWavesCompleted,
    TotalMissionsCompleted,
    WaveCompletionRatio,
    PhasesMissed,
}

impl SortColumn {
    /// Every whitelisted column
    pub const ALL: [SortColumn; 21] = [
        Self::Nickname,
        Self::ScoreDifference,
        Self::LastRaidResult,
        Self::TotalGp,
        Self::RaidScore,
        Self::AveragePercent,
        Self::ZeffoReady,
        Self::TicketsLostWeek,
        Self::TotalPoints,
        Self::LastActivityP,
        Self::AveragePercentP,
        Self::ZeroRaidScore,
        Self::TicketsWeekly,
        Self::TicketsLost,
        Self::DaysTicketsLost,
        Self::FullDaysLost,
        Self::TotalTerritoryPoints,
        Self::TotalWavesCompleted,
        Self::TotalMissionsCompleted,
        Self::WaveCompletionRatio,
        Self::PhasesMissed,
    ];

    /// SQL identifier for this column
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nickname => "nickname",
            Self::ScoreDifference => "score_difference",
            Self::LastRaidResult => "last_raid_result",
            Self::TotalGp => "total_gp",
            Self::RaidScore => "raid_score",
            Self::AveragePercent => "average_percent",
            Self::ZeffoReady => "zeffo_ready",
            Self::TicketsLostWeek => "tickets_lost_week",
            Self::TotalPoints => "total_points",
            Self::LastActivityP => "last_activity_p",
            Self::AveragePercentP => "average_percent_p",
            Self::ZeroRaidScore => "zero_raid_score",
            Self::TicketsWeekly => "tickets_weekly",
            Self::TicketsLost => "tickets_lost",
            Self::DaysTicketsLost => "days_tickets_lost",
            Self::FullDaysLost => "full_days_lost",
            Self::TotalTerritoryPoints => "total_territory_points",
            Self::TotalWavesCompleted => "total_waves_completed",
            Self::TotalMissionsCompleted => "total_missions_completed",
            Self::WaveCompletionRatio => "wave_completion_ratio",
            Self::PhasesMissed => "phases_missed",
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| format!("Unknown sort column: {s}"))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort direction: {s}")),
        }
    }
}

/// A validated `"{column} {ASC|DESC}"` ORDER BY fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderClause {
    column: SortColumn,
    direction: Direction,
}

impl OrderClause {
    /// Fallback used whenever a directive is missing or not whitelisted
    pub const DEFAULT: Self = Self {
        column: SortColumn::Nickname,
        direction: Direction::Asc,
    };

    pub const fn new(column: SortColumn, direction: Direction) -> Self {
        Self { column, direction }
    }

    #[inline]
    pub const fn column(&self) -> SortColumn {
        self.column
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Render the fragment for splicing after `ORDER BY`
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl Default for OrderClause {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for OrderClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column.as_str(), self.direction.as_str())
    }
}

/// Exact match only: one column name, one space, `ASC` or `DESC`.
impl FromStr for OrderClause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = s
            .split_once(' ')
            .ok_or_else(|| format!("Malformed order directive: {s}"))?;
        Ok(Self {
            column: column.parse()?,
            direction: direction.parse()?,
        })
    }
}

/// Aggregation window of the raid progression views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    #[default]
    TwoWeeks,
    Month,
}

impl Timeframe {
    /// Suffix of the `raid_progression_*` view backing this timeframe
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoWeeks => "two_weeks",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two_weeks" => Ok(Self::TwoWeeks),
            "month" => Ok(Self::Month),
            _ => Err(format!("Unknown timeframe: {s}")),
        }
    }
}

/// Map an untrusted sort directive onto the whitelist.
///
/// Never fails: anything outside the whitelist is logged and replaced by
/// [`OrderClause::DEFAULT`].
pub fn validate_order(candidate: &str) -> OrderClause {
    candidate.parse().unwrap_or_else(|_: String| {
        warn!(
            candidate = ?candidate,
            fallback = %OrderClause::DEFAULT,
            "Invalid order parameter"
        );
        OrderClause::DEFAULT
    })
}

/// Map an untrusted timeframe onto the whitelist, defaulting to two weeks.
pub fn validate_timeframe(candidate: &str) -> Timeframe {
    candidate.parse().unwrap_or_else(|_: String| {
        warn!(
            candidate = ?candidate,
            fallback = %Timeframe::default(),
            "Invalid timeframe parameter"
        );
        Timeframe::default()
    })
}
