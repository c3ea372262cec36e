//! Groups sheet rows into one nested record per document identifier.

use serde_json::{Map, Value};

use crate::config::TenantConfig;
use crate::ledger::RunLedger;
use crate::services::transforms;
use crate::types::{cell_text, Table};

/// Build the record map from the table set, in sheet discovery order.
///
/// The first table contributes its non-identifier columns as scalars at the
/// record root; every later table appends one object per row under a section
/// named after its sheet. Rows with a blank identifier and rows whose
/// transforms fail are skipped individually and reported through the ledger;
/// the sheet keeps processing.
pub fn group_rows(
    tables: &[Table],
    config: &TenantConfig,
    ledger: &mut RunLedger,
) -> Map<String, Value> {
    let mut records = Map::new();
    for (sheet_index, table) in tables.iter().enumerate() {
        if table.is_empty() {
            ledger.error("", format!("La hoja '{}' está vacía.", table.name));
            continue;
        }
        let id_index = match table.column_index(&config.id_column) {
            Some(index) => index,
            None => {
                ledger.error(
                    "",
                    format!(
                        "La hoja '{}' no tiene la columna '{}'.",
                        table.name, config.id_column
                    ),
                );
                continue;
            }
        };
        let rules = config.rules_for(&table.name);
        for (row_index, row) in table.rows.iter().enumerate() {
            let id = match row.get(id_index).and_then(cell_text) {
                Some(id) => id,
                None => {
                    // fila 1 is the header row in the workbook
                    ledger.error(
                        "",
                        format!(
                            "La columna '{}' no puede estar vacía. Hoja: '{}', fila {}.",
                            config.id_column,
                            table.name,
                            row_index + 2
                        ),
                    );
                    continue;
                }
            };
            let record = records
                .entry(id.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            let Some(record) = record.as_object_mut() else {
                continue;
            };
            if sheet_index == 0 {
                for (header, value) in table.headers.iter().zip(row) {
                    if header != &config.id_column {
                        record.insert(header.clone(), value.clone());
                    }
                }
            } else {
                let mut entry = Map::new();
                for (header, value) in table.headers.iter().zip(row) {
                    if header != &config.id_column {
                        entry.insert(header.clone(), value.clone());
                    }
                }
                if let Err(err) = transforms::apply_rules(&mut entry, rules) {
                    ledger.error(
                        id,
                        format!("{} Hoja: '{}', fila {}.", err, table.name, row_index + 2),
                    );
                    continue;
                }
                let section = record
                    .entry(table.name.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match section.as_array_mut() {
                    Some(entries) => entries.push(Value::Object(entry)),
                    None => ledger.error(
                        id,
                        format!(
                            "La sección '{}' ya contiene un valor escalar. Hoja: '{}', fila {}.",
                            table.name,
                            table.name,
                            row_index + 2
                        ),
                    ),
                }
            }
        }
    }
    records
}
