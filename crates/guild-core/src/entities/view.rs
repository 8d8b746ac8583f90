//! Sink views - the derived tables republished to each guild's sink target

use std::fmt;

use crate::value_objects::SortColumn;

/// How a store value is rendered into a sink cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text; NULL renders as an empty cell
    Text,
    /// Plain number; NULL renders as an empty cell
    Number,
    /// Score-like number; NULL renders as `-`
    Metric,
    /// Boolean flag
    Flag,
    /// Timestamp rendered as `%Y-%m-%dT%H:%M:%S`
    Timestamp,
}

/// One output column of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ViewColumn {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// Shape of a view as pushed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSpec {
    pub columns: &'static [ViewColumn],
    /// Rows with any NULL column are dropped before syncing
    pub drop_incomplete_rows: bool,
    /// The view reads a timeframe directive from the sink
    pub timeframe_aware: bool,
}

impl ViewSpec {
    /// Whether `column` is one of this view's output columns
    pub fn sorts_by(&self, column: SortColumn) -> bool {
        self.columns.iter().any(|c| c.name == column.as_str())
    }
}

const fn col(name: &'static str, kind: ColumnKind) -> ViewColumn {
    ViewColumn::new(name, kind)
}

const MAIN_COLUMNS: &[ViewColumn] = &[
    col("nickname", ColumnKind::Text),
    col("last_activity", ColumnKind::Text),
    col("total_gp", ColumnKind::Metric),
    col("raid_score", ColumnKind::Metric),
    col("average_percent", ColumnKind::Metric),
    col("zeffo_ready", ColumnKind::Flag),
    col("tickets_lost_week", ColumnKind::Number),
    col("days_tickets_lost", ColumnKind::Number),
];

const TICKET_COLUMNS: &[ViewColumn] = &[
    col("nickname", ColumnKind::Text),
    col("tickets_lost", ColumnKind::Number),
    col("days_tickets_lost", ColumnKind::Number),
    col("full_days_lost", ColumnKind::Number),
];

const POINTS_COLUMNS: &[ViewColumn] = &[
    col("nickname", ColumnKind::Text),
    col("last_activity_p", ColumnKind::Number),
    col("average_percent_p", ColumnKind::Number),
    col("zero_raid_score", ColumnKind::Number),
    col("zeffo_ready", ColumnKind::Number),
    col("tickets_weekly", ColumnKind::Number),
    col("total_points", ColumnKind::Number),
];

const TERRITORY_BATTLE_COLUMNS: &[ViewColumn] = &[
    col("nickname", ColumnKind::Text),
    col("total_territory_points", ColumnKind::Number),
    col("total_waves_completed", ColumnKind::Number),
    col("total_missions_attempted", ColumnKind::Number),
    col("wave_completion_ratio", ColumnKind::Metric),
    col("phases_missed", ColumnKind::Number),
    col("created_at", ColumnKind::Timestamp),
];

const RAID_PROGRESSION_COLUMNS: &[ViewColumn] = &[
    col("nickname", ColumnKind::Text),
    col("last_raid_result", ColumnKind::Metric),
    col("score_difference", ColumnKind::Metric),
];

/// Every view pushed to a guild's sink target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Main,
    TicketsWeekly,
    TicketsMonthly,
    PointsWeekly,
    LastTerritoryBattle,
    RaidProgression,
}

impl ViewKind {
    /// Push order
    pub const ALL: [ViewKind; 6] = [
        Self::Main,
        Self::TicketsWeekly,
        Self::TicketsMonthly,
        Self::PointsWeekly,
        Self::LastTerritoryBattle,
        Self::RaidProgression,
    ];

    /// Name of the sheet this view is written to
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::TicketsWeekly => "Tickets_weekly",
            Self::TicketsMonthly => "Tickets_monthly",
            Self::PointsWeekly => "Points_weekly",
            Self::LastTerritoryBattle => "Last TB Data",
            Self::RaidProgression => "Raid_progression",
        }
    }

    /// A1 range the view occupies, header row excluded
    pub const fn range(self) -> &'static str {
        match self {
            Self::Main => "A2:H51",
            Self::TicketsWeekly | Self::TicketsMonthly => "A2:D51",
            Self::PointsWeekly | Self::LastTerritoryBattle => "A2:G51",
            Self::RaidProgression => "A2:C51",
        }
    }

    pub const fn spec(self) -> ViewSpec {
        match self {
            Self::Main => ViewSpec {
                columns: MAIN_COLUMNS,
                drop_incomplete_rows: false,
                timeframe_aware: false,
            },
            Self::TicketsWeekly | Self::TicketsMonthly => ViewSpec {
                columns: TICKET_COLUMNS,
                drop_incomplete_rows: true,
                timeframe_aware: false,
            },
            Self::PointsWeekly => ViewSpec {
                columns: POINTS_COLUMNS,
                drop_incomplete_rows: false,
                timeframe_aware: false,
            },
            Self::LastTerritoryBattle => ViewSpec {
                columns: TERRITORY_BATTLE_COLUMNS,
                drop_incomplete_rows: false,
                timeframe_aware: false,
            },
            Self::RaidProgression => ViewSpec {
                columns: RAID_PROGRESSION_COLUMNS,
                drop_incomplete_rows: false,
                timeframe_aware: true,
            },
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}
