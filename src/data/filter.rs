use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per designated column
// ---------------------------------------------------------------------------

/// The pair of columns the sidebar offers membership filters for, when
/// present in the table. Absent columns are silently skipped.
pub const FILTER_COLUMNS: [&str; 2] = ["OUT OF SERVICE CATEGORY", "arrival_date_year"];

/// Per-column selection state: maps column_name → set of selected values.
/// An absent column or an empty set means "no filter" (show all rows).
pub type FilterState = BTreeMap<String, BTreeSet<Value>>;

/// The selectable options per designated filter column: distinct non-missing
/// values, ascending. Columns missing from the table are omitted.
pub fn filter_options(table: &Table) -> Vec<(String, Vec<Value>)> {
    FILTER_COLUMNS
        .iter()
        .filter_map(|&name| {
            let column = table.column(name)?;
            let options: Vec<Value> = column.distinct_non_null().into_iter().collect();
            Some((name.to_string(), options))
        })
        .collect()
}

/// Reduce `table` to the rows matching all active filters (logical AND).
///
/// A row passes a column filter when:
/// * The selection set is empty → passes (no constraint)
/// * The column is not in the table → passes (filter skipped)
/// * The row's value is non-missing and in the selected set → passes
///
/// Rows with a missing value in an actively filtered column are dropped.
pub fn apply_filters(table: &Table, filters: &FilterState) -> Table {
    let active: Vec<(&str, &BTreeSet<Value>)> = filters
        .iter()
        .filter(|(name, selected)| !selected.is_empty() && table.column(name).is_some())
        .map(|(name, selected)| (name.as_str(), selected))
        .collect();

    if active.is_empty() {
        return table.clone();
    }

    let keep: Vec<usize> = (0..table.n_rows())
        .filter(|&row| {
            active.iter().all(|(name, selected)| {
                let value = &table.column(name).unwrap().values()[row];
                !value.is_null() && selected.contains(value)
            })
        })
        .collect();

    table.select_rows(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "OUT OF SERVICE CATEGORY",
                vec![
                    Value::parse("trip"),
                    Value::parse("fault"),
                    Value::parse("trip"),
                    Value::Null,
                ],
            ),
            Column::new(
                "arrival_date_year",
                vec![
                    Value::parse("2016"),
                    Value::parse("2017"),
                    Value::parse("2016"),
                    Value::parse("2017"),
                ],
            ),
        ])
    }

    #[test]
    fn empty_selection_is_no_constraint() {
        let t = sample_table();
        let mut filters = FilterState::new();
        filters.insert("OUT OF SERVICE CATEGORY".into(), BTreeSet::new());
        assert_eq!(apply_filters(&t, &filters).n_rows(), t.n_rows());
    }

    #[test]
    fn filters_and_across_columns_and_drop_nulls() {
        let t = sample_table();
        let mut filters = FilterState::new();
        filters.insert(
            "OUT OF SERVICE CATEGORY".into(),
            [Value::parse("trip")].into_iter().collect(),
        );
        filters.insert(
            "arrival_date_year".into(),
            [Value::Integer(2016)].into_iter().collect(),
        );
        let filtered = apply_filters(&t, &filters);
        assert_eq!(filtered.n_rows(), 2);

        // null category row never matches an active filter
        let mut null_filter = FilterState::new();
        null_filter.insert(
            "arrival_date_year".into(),
            [Value::Integer(2017)].into_iter().collect(),
        );
        null_filter.insert(
            "OUT OF SERVICE CATEGORY".into(),
            [Value::parse("fault"), Value::parse("trip")]
                .into_iter()
                .collect(),
        );
        assert_eq!(apply_filters(&t, &null_filter).n_rows(), 1);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = sample_table();
        let mut filters = FilterState::new();
        filters.insert(
            "arrival_date_year".into(),
            [Value::Integer(2016)].into_iter().collect(),
        );
        let once = apply_filters(&t, &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once.n_rows(), twice.n_rows());
    }

    #[test]
    fn unknown_filter_column_is_skipped() {
        let t = sample_table();
        let mut filters = FilterState::new();
        filters.insert("no_such_column".into(), [Value::parse("x")].into_iter().collect());
        assert_eq!(apply_filters(&t, &filters).n_rows(), t.n_rows());
    }

    #[test]
    fn options_are_sorted_and_skip_missing_columns() {
        let t = sample_table();
        let opts = filter_options(&t);
        assert_eq!(opts.len(), 2);
        assert_eq!(
            opts[0].1,
            vec![Value::parse("fault"), Value::parse("trip")]
        );
        assert_eq!(opts[1].1, vec![Value::Integer(2016), Value::Integer(2017)]);

        let small = Table::new(vec![Column::new("other", vec![Value::parse("x")])]);
        assert!(filter_options(&small).is_empty());
    }
}
