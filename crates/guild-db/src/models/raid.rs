//! Raid performance row

use sqlx::FromRow;

/// A member joined against the raid_performance view
#[derive(Debug, Clone, FromRow)]
pub struct RaidPerformanceModel {
    pub player_id: String,
    pub score: Option<f64>,
    pub percent_of_average: Option<f64>,
}
