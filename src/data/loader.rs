use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, Xlsx};
use log::info;

use super::model::{Column, Table, Value};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded byte stream into a [`Table`]. Dispatch by extension.
///
/// * `.xlsx` / `.xls` – first sheet, first row as headers
/// * anything else (`.csv` primarily) – delimited text, first row as headers
pub fn load_bytes(filename: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xls" => load_spreadsheet(&ext, bytes)?,
        _ => load_delimited(bytes)?,
    };

    info!(
        "loaded '{}': {} rows x {} columns",
        filename,
        table.n_rows(),
        table.n_cols()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn load_delimited(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(LoadError::EmptyTable);
    }

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        // the csv crate rejects ragged rows by default, so alignment holds
        let record = record?;
        for (col_idx, raw) in record.iter().enumerate() {
            cells[col_idx].push(Value::parse(raw));
        }
    }

    Ok(build_table(headers, cells))
}

// ---------------------------------------------------------------------------
// Spreadsheet
// ---------------------------------------------------------------------------

fn load_spreadsheet(ext: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    let range = match ext {
        "xls" => {
            let mut workbook: Xls<_> =
                open_workbook_from_rs(Cursor::new(bytes)).map_err(calamine::Error::from)?;
            first_sheet_range(&mut workbook)?
        }
        _ => {
            let mut workbook: Xlsx<_> =
                open_workbook_from_rs(Cursor::new(bytes)).map_err(calamine::Error::from)?;
            first_sheet_range(&mut workbook)?
        }
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) if !header_row.is_empty() => {
            header_row.iter().map(cell_to_header).collect()
        }
        _ => return Err(LoadError::EmptyTable),
    };

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(col_idx).map_or(Value::Null, cell_to_value));
        }
    }

    Ok(build_table(headers, cells))
}

fn first_sheet_range<RS, R>(workbook: &mut R) -> Result<Range<Data>, LoadError>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    calamine::Error: From<R::Error>,
{
    workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyTable)?
        .map_err(|e| LoadError::Spreadsheet(calamine::Error::from(e)))
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Integer(*i),
        // whole floats become integers so a written-then-reloaded sheet
        // reproduces the original values
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Value::Integer(*f as i64)
        }
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.trim().to_string()),
        other => Value::String(other.to_string()),
    }
}

fn build_table(headers: Vec<String>, cells: Vec<Vec<Value>>) -> Table {
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Table::new(columns)
}
