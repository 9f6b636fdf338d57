//! End-to-end properties of the load → filter → aggregate → report pipeline.

use std::collections::BTreeSet;

use chartforge::chart::aggregate::{aggregate, AggKind};
use chartforge::chart::conclusion::derive_conclusion;
use chartforge::data::filter::{apply_filters, FilterState};
use chartforge::data::loader::load_bytes;
use chartforge::data::model::{ColumnKind, Table, Value};
use chartforge::report::excel::table_to_xlsx;
use chartforge::{ChartKind, ChartSpec, Session};

const HOTEL_CSV: &[u8] = b"\
OUT OF SERVICE CATEGORY,arrival_date_year,Region,Cost
trip,2016,A,10
fault,2016,A,20
trip,2017,B,30
fault,2017,B,5
trip,2016,A,15
";

fn hotel_table() -> Table {
    load_bytes("hotel.csv", HOTEL_CSV).unwrap()
}

fn selection(values: &[Value]) -> BTreeSet<Value> {
    values.iter().cloned().collect()
}

#[test]
fn filtering_yields_a_subset_and_is_idempotent() {
    let table = hotel_table();
    let mut filters = FilterState::new();
    filters.insert(
        "OUT OF SERVICE CATEGORY".into(),
        selection(&[Value::parse("trip")]),
    );
    filters.insert("arrival_date_year".into(), selection(&[Value::parse("2016")]));

    let once = apply_filters(&table, &filters);
    assert!(once.n_rows() <= table.n_rows());
    assert_eq!(once.n_rows(), 2);
    assert_eq!(once.n_cols(), table.n_cols());

    let twice = apply_filters(&once, &filters);
    assert_eq!(twice.n_rows(), once.n_rows());
    for (a, b) in once.columns().iter().zip(twice.columns()) {
        assert_eq!(a.values(), b.values());
    }
}

#[test]
fn numeric_aggregation_conserves_the_column_sum() {
    let table = hotel_table();
    let agg = aggregate(&table, "Region", "Cost").unwrap();
    assert_eq!(agg.kind, AggKind::Sum);

    let column_sum: f64 = table
        .column("Cost")
        .unwrap()
        .values()
        .iter()
        .filter_map(Value::as_f64)
        .sum();
    assert_eq!(agg.total(), column_sum);
}

#[test]
fn categorical_aggregation_conserves_the_row_count() {
    let table = hotel_table();
    let agg = aggregate(&table, "Region", "OUT OF SERVICE CATEGORY").unwrap();
    assert_eq!(agg.kind, AggKind::Count);
    assert_eq!(agg.total(), table.n_rows() as f64);
}

#[test]
fn conclusion_share_is_bounded_and_exact_for_single_group() {
    let table = hotel_table();
    let agg = aggregate(&table, "Region", "Cost").unwrap();
    let sentence = derive_conclusion(&agg, ChartKind::Bar).unwrap();
    let percent: f64 = sentence
        .split_whitespace()
        .find_map(|w| w.strip_suffix('%').and_then(|p| p.parse().ok()))
        .unwrap();
    assert!((0.0..=100.0).contains(&percent));

    // Region is not a designated filter column, so narrow by row selection
    let only_a: Vec<usize> = table
        .column("Region")
        .unwrap()
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == Value::parse("A"))
        .map(|(i, _)| i)
        .collect();
    let single = aggregate(&table.select_rows(&only_a), "Region", "Cost").unwrap();
    let sentence = derive_conclusion(&single, ChartKind::Bar).unwrap();
    assert!(sentence.contains("100.0%"), "{sentence}");
}

#[test]
fn spreadsheet_export_round_trips_through_the_loader() {
    let table = hotel_table();
    let bytes = table_to_xlsx(&table).unwrap();
    let reloaded = load_bytes("hotel_data.xlsx", &bytes).unwrap();

    assert_eq!(reloaded.n_rows(), table.n_rows());
    let orig_names: Vec<_> = table.column_names().collect();
    let back_names: Vec<_> = reloaded.column_names().collect();
    assert_eq!(orig_names, back_names);
    for (orig, back) in table.columns().iter().zip(reloaded.columns()) {
        assert_eq!(orig.values(), back.values(), "column {}", orig.name());
        assert_eq!(orig.kind(), back.kind(), "column {}", orig.name());
    }
}

#[test]
fn spec_scenario_sum_with_tie_break() {
    let table = load_bytes("t.csv", b"Region,Cost\nA,10\nA,20\nB,30\n").unwrap();
    assert_eq!(table.column("Cost").unwrap().kind(), ColumnKind::Numeric);

    let agg = aggregate(&table, "Region", "Cost").unwrap();
    assert_eq!(agg.groups, vec![Value::parse("A"), Value::parse("B")]);
    assert_eq!(agg.values, vec![30.0, 30.0]);

    let sentence = derive_conclusion(&agg, ChartKind::Bar).unwrap();
    assert_eq!(sentence, "'A' has the highest Cost with 50.0% of the total.");
}

#[test]
fn spec_scenario_count_of_group_column_itself() {
    let table = load_bytes("t.csv", b"Region,Cost\nA,10\nA,20\nB,30\n").unwrap();
    let agg = aggregate(&table, "Region", "Region").unwrap();
    assert_eq!(agg.values, vec![2.0, 1.0]);

    let sentence = derive_conclusion(&agg, ChartKind::Bar).unwrap();
    assert_eq!(
        sentence,
        "'A' has the highest count with 66.67% of the total."
    );
}

#[test]
fn session_runs_a_full_pass_over_filtered_data() {
    let mut session = Session::default();
    session.load_dataset("hotel.csv", HOTEL_CSV).unwrap();
    session.filters.insert(
        "arrival_date_year".into(),
        selection(&[Value::parse("2016")]),
    );
    session
        .set_chart_specs(vec![ChartSpec {
            kind: ChartKind::Pie,
            group_column: "Region".into(),
            value_column: "Cost".into(),
        }])
        .unwrap();

    let filtered = session.filtered_table().unwrap();
    assert_eq!(filtered.n_rows(), 3);

    let report = session.build_charts();
    assert_eq!(report.charts.len(), 1);
    let conclusions = report.conclusions();
    assert_eq!(conclusions.len(), 1);
    assert_eq!(
        conclusions[0].1,
        "'A' has the highest Cost with 100.0% of the total."
    );

    // spreadsheet export reflects the filtered view
    let artifact = session.export_excel().unwrap();
    assert_eq!(artifact.filename, "hotel_data.xlsx");
    let reloaded = load_bytes(artifact.filename, &artifact.bytes).unwrap();
    assert_eq!(reloaded.n_rows(), 3);
}
