//! View query builder
//!
//! The only fragments spliced into view SQL are the column list of the view
//! definition, the rendered [`OrderClause`] and the [`Timeframe`] table suffix.
//! All three come from closed `&'static str` tables; the guild id is always
//! bound as `$1`.

use std::fmt::Write;

use guild_core::entities::{ColumnKind, ViewColumn, ViewKind};
use guild_core::value_objects::{OrderClause, Timeframe};

/// Members of the guild bound as `$1`, matched by nickname
const GUILD_NICKNAMES: &str = "nickname IN (SELECT nickname FROM players WHERE guild_id::text = $1)";

/// Table alias a column is read from, including the trailing dot
fn qualifier(kind: ViewKind, column: &ViewColumn) -> &'static str {
    match kind {
        ViewKind::TicketsWeekly | ViewKind::TicketsMonthly => "t.",
        ViewKind::LastTerritoryBattle if column.name == "nickname" => "gm.",
        ViewKind::LastTerritoryBattle => "tbi.",
        ViewKind::Main | ViewKind::PointsWeekly | ViewKind::RaidProgression => "",
    }
}

/// Select expression with an explicit cast matching how the cell is decoded
fn select_expr(kind: ViewKind, column: &ViewColumn) -> String {
    let source = format!("{}{}", qualifier(kind, column), column.name);
    let name = column.name;
    match column.kind {
        ColumnKind::Text => format!("{source}::text AS {name}"),
        ColumnKind::Number | ColumnKind::Metric => format!("{source}::float8 AS {name}"),
        ColumnKind::Flag => format!("{source}::boolean AS {name}"),
        ColumnKind::Timestamp => {
            format!("to_char({source}, 'YYYY-MM-DD\"T\"HH24:MI:SS') AS {name}")
        }
    }
}

/// FROM and WHERE clauses of a view, restricted to the guild bound as `$1`
fn from_clause(kind: ViewKind, timeframe: Timeframe) -> String {
    match kind {
        ViewKind::Main => format!("FROM players_data WHERE {GUILD_NICKNAMES}"),
        ViewKind::TicketsWeekly => "FROM players p \
             LEFT JOIN tickets_aggregated_weekly t ON p.nickname = t.nickname \
             WHERE p.guild_id::text = $1"
            .to_string(),
        ViewKind::TicketsMonthly => "FROM players p \
             LEFT JOIN tickets_aggregated_monthly t ON p.nickname = t.nickname \
             WHERE p.guild_id::text = $1"
            .to_string(),
        ViewKind::PointsWeekly => format!("FROM member_points WHERE {GUILD_NICKNAMES}"),
        ViewKind::LastTerritoryBattle => "FROM guild_members gm \
             LEFT JOIN players p ON gm.player_id = p.player_id \
             LEFT JOIN tb_import tbi ON gm.nickname = tbi.nickname \
             WHERE p.guild_id::text = $1 \
             AND tbi.created_at = (SELECT MAX(created_at) FROM tb_import)"
            .to_string(),
        ViewKind::RaidProgression => format!(
            "FROM raid_progression_{} WHERE {GUILD_NICKNAMES}",
            timeframe.as_str()
        ),
    }
}

/// Name of the relation a view reads from, for logs
pub fn view_source(kind: ViewKind, timeframe: Timeframe) -> String {
    match kind {
        ViewKind::Main => "players_data".to_string(),
        ViewKind::TicketsWeekly => "tickets_aggregated_weekly".to_string(),
        ViewKind::TicketsMonthly => "tickets_aggregated_monthly".to_string(),
        ViewKind::PointsWeekly => "member_points".to_string(),
        ViewKind::LastTerritoryBattle => "tb_import".to_string(),
        ViewKind::RaidProgression => format!("raid_progression_{}", timeframe.as_str()),
    }
}

/// Build the SQL for one view, ordered by an already validated clause.
///
/// `timeframe` is only used by timeframe-aware views.
pub fn view_sql(kind: ViewKind, order: &OrderClause, timeframe: Timeframe) -> String {
    let columns: Vec<String> = kind
        .spec()
        .columns
        .iter()
        .map(|column| select_expr(kind, column))
        .collect();

    let mut sql = format!("SELECT {} ", columns.join(", "));
    sql.push_str(&from_clause(kind, timeframe));
    // Writing to a String cannot fail
    let _ = write!(sql, " ORDER BY {}", order.to_sql());
    sql
}

/// Members with their current raid performance
pub const RAID_PERFORMANCE_SQL: &str = r#"
    SELECT p.player_id::text AS player_id,
           rp.score::float8 AS score,
           rp.percent_of_average::float8 AS percent_of_average
    FROM players p
    LEFT JOIN raid_performance rp ON p.nickname = rp.nickname
    WHERE p.guild_id::text = $1
"#;
