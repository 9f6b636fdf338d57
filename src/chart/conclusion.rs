use super::aggregate::Aggregate;
use super::ChartKind;
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Dominant-category sentence
// ---------------------------------------------------------------------------

/// Derive the one-line conclusion for a chart: the group with the maximum
/// aggregate value and its share of the total, worded per chart kind.
///
/// Ties are broken by first occurrence in grouping order.
pub fn derive_conclusion(agg: &Aggregate, kind: ChartKind) -> Result<String, ChartError> {
    if agg.is_empty() {
        return Err(ChartError::EmptyAggregate);
    }

    let mut max_idx = 0;
    for i in 1..agg.values.len() {
        if agg.values[i] > agg.values[max_idx] {
            max_idx = i;
        }
    }

    let total = agg.total();
    let share = if total == 0.0 {
        0.0
    } else {
        agg.values[max_idx] / total * 100.0
    };
    let percent = format_percent(share);
    let group = &agg.groups[max_idx];

    Ok(match kind {
        ChartKind::Line => format!(
            "'{group}' shows the peak {} with {percent}% share.",
            agg.value_label
        ),
        ChartKind::Bar | ChartKind::Pie => format!(
            "'{group}' has the highest {} with {percent}% of the total.",
            agg.value_label
        ),
    })
}

/// Round to two decimal places, then trim trailing zeros down to one decimal
/// digit: `50.0`, `66.67`, `100.0`.
fn format_percent(p: f64) -> String {
    let s = format!("{:.2}", (p * 100.0).round() / 100.0);
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::aggregate::AggKind;
    use crate::data::model::Value;

    fn agg(groups: Vec<&str>, values: Vec<f64>, kind: AggKind, label: &str) -> Aggregate {
        Aggregate {
            groups: groups.into_iter().map(Value::parse).collect(),
            values,
            kind,
            value_label: label.to_string(),
            group_label: "Region".to_string(),
        }
    }

    #[test]
    fn tie_breaks_to_first_group_in_grouping_order() {
        let a = agg(vec!["A", "B"], vec![30.0, 30.0], AggKind::Sum, "Cost");
        assert_eq!(
            derive_conclusion(&a, ChartKind::Bar).unwrap(),
            "'A' has the highest Cost with 50.0% of the total."
        );
    }

    #[test]
    fn count_conclusion_uses_count_label() {
        let a = agg(vec!["A", "B"], vec![2.0, 1.0], AggKind::Count, "count");
        assert_eq!(
            derive_conclusion(&a, ChartKind::Pie).unwrap(),
            "'A' has the highest count with 66.67% of the total."
        );
    }

    #[test]
    fn line_chart_wording_differs() {
        let a = agg(vec!["A", "B"], vec![10.0, 30.0], AggKind::Sum, "Cost");
        assert_eq!(
            derive_conclusion(&a, ChartKind::Line).unwrap(),
            "'B' shows the peak Cost with 75.0% share."
        );
    }

    #[test]
    fn single_group_share_is_exactly_100() {
        let a = agg(vec!["A"], vec![12.3], AggKind::Sum, "Cost");
        let sentence = derive_conclusion(&a, ChartKind::Bar).unwrap();
        assert!(sentence.contains("100.0%"), "{sentence}");
    }

    #[test]
    fn empty_aggregate_is_an_error() {
        let a = agg(vec![], vec![], AggKind::Sum, "Cost");
        assert!(matches!(
            derive_conclusion(&a, ChartKind::Bar),
            Err(ChartError::EmptyAggregate)
        ));
    }

    #[test]
    fn percent_formatting_matches_round_two_places() {
        assert_eq!(format_percent(50.0), "50.0");
        assert_eq!(format_percent(100.0), "100.0");
        assert_eq!(format_percent(200.0 / 3.0), "66.67");
        assert_eq!(format_percent(33.333333), "33.33");
    }
}
