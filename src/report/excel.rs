use rust_xlsxwriter::Workbook;

use crate::data::model::{Table, Value};
use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Spreadsheet export
// ---------------------------------------------------------------------------

/// Serialize a table to an xlsx byte stream: one sheet named `Data`, a
/// header row, then every row of every column. Independent of chart state.
///
/// Re-parsing the stream with the loader reproduces the table.
pub fn table_to_xlsx(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Data")?;

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = col_idx as u16;
        sheet.write_string(0, col, column.name())?;
        for (row_idx, value) in column.values().iter().enumerate() {
            let row = (row_idx + 1) as u32;
            match value {
                Value::String(s) => {
                    sheet.write_string(row, col, s)?;
                }
                Value::Integer(i) => {
                    sheet.write_number(row, col, *i as f64)?;
                }
                Value::Float(f) => {
                    sheet.write_number(row, col, *f)?;
                }
                Value::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Value::Null => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::model::Column;

    #[test]
    fn export_then_reload_round_trips() {
        let table = Table::new(vec![
            Column::new(
                "Region",
                vec![Value::parse("A"), Value::parse("B"), Value::Null],
            ),
            Column::new(
                "Cost",
                vec![Value::parse("10"), Value::parse("2.5"), Value::parse("30")],
            ),
        ]);

        let bytes = table_to_xlsx(&table).unwrap();
        let reloaded = load_bytes("hotel_data.xlsx", &bytes).unwrap();

        assert_eq!(reloaded.n_rows(), table.n_rows());
        let names: Vec<_> = reloaded.column_names().collect();
        assert_eq!(names, vec!["Region", "Cost"]);
        for (orig, back) in table.columns().iter().zip(reloaded.columns()) {
            assert_eq!(orig.values(), back.values(), "column {}", orig.name());
        }
    }
}
