//! Sort and timeframe directives read back from a view
//!
//! Operators steer each view from the sheet itself: the trailing metadata
//! column holds the sort column in data row 1, the direction in data row 2,
//! and for timeframe-aware views the timeframe in data row 3.

use tracing::{debug, warn};

use guild_core::entities::ViewSpec;
use guild_core::value_objects::{
    validate_order, validate_timeframe, Cell, OrderClause, Timeframe,
};

use crate::client::SheetTable;
use crate::table::metadata_column;

/// Validated directives for one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directives {
    pub order: OrderClause,
    pub timeframe: Timeframe,
}

fn text_of(cell: Option<&Cell>) -> Option<String> {
    cell.filter(|c| !c.is_empty()).map(ToString::to_string)
}

/// Resolve directives from cached view content; `None` yields the defaults.
///
/// A whitelisted sort column that the view does not output also falls back
/// to the default order.
pub fn read_directives(table: Option<&SheetTable>, spec: ViewSpec) -> Directives {
    let Some(table) = table else {
        debug!("No view content, using default directives");
        return Directives::default();
    };
    let metadata = metadata_column(table);

    let order = match (text_of(metadata.first()), text_of(metadata.get(1))) {
        (Some(column), Some(direction)) => {
            let order = validate_order(&format!("{column} {direction}"));
            if spec.sorts_by(order.column()) {
                order
            } else {
                warn!(
                    order = %order,
                    fallback = %OrderClause::DEFAULT,
                    "Sort column is not part of this view"
                );
                OrderClause::DEFAULT
            }
        }
        _ => {
            debug!("View has no sort directive");
            OrderClause::DEFAULT
        }
    };

    let timeframe = if spec.timeframe_aware {
        text_of(metadata.get(2)).map_or_else(Timeframe::default, |t| validate_timeframe(&t))
    } else {
        Timeframe::default()
    };

    Directives { order, timeframe }
}
