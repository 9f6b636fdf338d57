/// Chart layer: per-chart configuration, aggregation, conclusion text, and
/// rasterization.
pub mod aggregate;
pub mod conclusion;
pub mod palette;
pub mod render;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on charts per build pass.
pub const MAX_CHARTS: usize = 10;

/// The three supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "Bar Chart"),
            ChartKind::Line => write!(f, "Line Chart"),
            ChartKind::Pie => write!(f, "Pie Chart"),
        }
    }
}

/// One chart's user configuration. Immutable once the chart is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Categorical column partitioning the rows.
    pub group_column: String,
    /// Column whose values are summed (numeric) or counted (categorical).
    pub value_column: String,
}
