//! Workbook loading: every worksheet becomes a `Table` of JSON cell values,
//! in the order the sheets appear in the file.

use calamine::{open_workbook_auto, Data, DataType, Reader};
use serde_json::Value;
use std::path::Path;

use crate::config::TenantConfig;
use crate::ledger::RunLedger;
use crate::types::Table;

/// Read every sheet of the workbook. A sheet that cannot be read is reported
/// through the ledger and skipped; a workbook that cannot be opened at all is
/// the fatal case and comes back as `Err`.
pub fn load_tables(
    path: &Path,
    config: &TenantConfig,
    ledger: &mut RunLedger,
) -> Result<Vec<Table>, String> {
    if !path.exists() {
        return Err(format!("No existe el archivo '{}'.", path.display()));
    }
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("no se pudo abrir el libro: {}", e))?;
    let sheet_names = workbook.sheet_names().to_vec();
    let mut tables = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        match workbook.worksheet_range(&name) {
            Ok(range) => tables.push(read_sheet(&name, &range, config)),
            Err(e) => {
                ledger.error("", format!("Error al procesar la hoja '{}': {}", name, e));
            }
        }
    }
    Ok(tables)
}

/// First row is the header row (trailing empty headers trimmed); every other
/// non-empty row becomes a row of values padded to the header width.
fn read_sheet(name: &str, range: &calamine::Range<Data>, config: &TenantConfig) -> Table {
    let mut rows_iter = range.rows();
    let raw_headers: Vec<String> = rows_iter
        .next()
        .map(|row| {
            row.iter()
                .map(|c| c.as_string().unwrap_or_default().trim().to_string())
                .collect()
        })
        .unwrap_or_default();
    let mut keep = raw_headers.len();
    while keep > 0 && raw_headers[keep - 1].is_empty() {
        keep -= 1;
    }
    let headers: Vec<String> = raw_headers.into_iter().take(keep).collect();

    let text_columns = config.text_columns(name);
    let text_flags: Vec<bool> = headers
        .iter()
        .map(|h| text_columns.contains(&h.as_str()))
        .collect();

    let mut rows = Vec::new();
    for row in rows_iter {
        if row.iter().all(|c| c.is_empty()) {
            continue;
        }
        let mut cells = Vec::with_capacity(headers.len());
        for (index, force_text) in text_flags.iter().enumerate() {
            let value = match row.get(index) {
                Some(cell) => cell_to_value(cell, *force_text),
                None => Value::Null,
            };
            cells.push(value);
        }
        rows.push(cells);
    }
    Table::new(name, headers, rows)
}

/// Map one cell to JSON. `force_text` keeps coded values intact ("01" must
/// not become the number 1); empty cells and non-finite numbers are null from
/// here on, never a sentinel.
fn cell_to_value(cell: &Data, force_text: bool) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => {
            if force_text {
                Value::String(b.to_string())
            } else {
                Value::Bool(*b)
            }
        }
        Data::Int(i) => {
            if force_text {
                Value::String(i.to_string())
            } else {
                Value::from(*i)
            }
        }
        Data::Float(f) => number_value(*f, force_text),
        Data::DateTime(serial) => number_value(serial.as_f64(), force_text),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn number_value(f: f64, force_text: bool) -> Value {
    if !f.is_finite() {
        return Value::Null;
    }
    if force_text {
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Value::String((f as i64).to_string())
        } else {
            Value::String(f.to_string())
        }
    } else {
        serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
