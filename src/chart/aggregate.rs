use std::collections::BTreeMap;

use crate::data::model::{ColumnKind, Table, Value};
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Group-and-aggregate: the table a chart is drawn from
// ---------------------------------------------------------------------------

/// Whether a chart's numbers represent sums or counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggKind {
    Sum,
    Count,
}

impl AggKind {
    /// Capitalized word used in chart titles.
    pub fn title_word(self) -> &'static str {
        match self {
            AggKind::Sum => "Sum",
            AggKind::Count => "Count",
        }
    }
}

/// Two-column aggregate: one row per distinct group value, ascending by
/// group key, paired with the summed or counted value.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub groups: Vec<Value>,
    pub values: Vec<f64>,
    pub kind: AggKind,
    /// Effective value-column name for downstream labels: the original
    /// column name for sums, `"count"` for counts.
    pub value_label: String,
    /// Group-column name, kept for axis labels and titles.
    pub group_label: String,
}

impl Aggregate {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// `"{Sum|Count} of {value} by {group}"`
    pub fn title(&self) -> String {
        format!(
            "{} of {} by {}",
            self.kind.title_word(),
            self.value_label,
            self.group_label
        )
    }
}

/// Group `table` by `group_column` and aggregate `value_column`.
///
/// The value column's declared kind picks the aggregation: numeric columns
/// are summed per group, categorical columns are counted. Rows with a
/// missing group value never form a group of their own and are dropped.
pub fn aggregate(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> Result<Aggregate, ChartError> {
    let group = table
        .column(group_column)
        .ok_or_else(|| ChartError::MissingColumn(group_column.to_string()))?;
    let value = table
        .column(value_column)
        .ok_or_else(|| ChartError::MissingColumn(value_column.to_string()))?;

    let mut acc: BTreeMap<Value, f64> = BTreeMap::new();
    let (kind, value_label) = match value.kind() {
        ColumnKind::Numeric => {
            for (key, cell) in group.values().iter().zip(value.values()) {
                if key.is_null() {
                    continue;
                }
                let entry = acc.entry(key.clone()).or_insert(0.0);
                if let Some(v) = cell.as_f64() {
                    *entry += v;
                }
            }
            (AggKind::Sum, value_column.to_string())
        }
        ColumnKind::Categorical => {
            for (key, cell) in group.values().iter().zip(value.values()) {
                if key.is_null() {
                    continue;
                }
                let entry = acc.entry(key.clone()).or_insert(0.0);
                if !cell.is_null() {
                    *entry += 1.0;
                }
            }
            (AggKind::Count, "count".to_string())
        }
    };

    let (groups, values): (Vec<Value>, Vec<f64>) = acc.into_iter().unzip();
    Ok(Aggregate {
        groups,
        values,
        kind,
        value_label,
        group_label: group_column.to_string(),
    })
}
