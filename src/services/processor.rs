//! End-to-end run: tables in, record map plus ledger out.

use std::path::{Path, PathBuf};

use log::info;
use serde_json::{Map, Value};

use crate::config::{DocumentKind, TenantConfig};
use crate::excel;
use crate::ledger::RunLedger;
use crate::output;
use crate::services::{columns, grouper, normalize, overlay};
use crate::types::Table;

/// Files and counts produced by one run.
#[derive(Debug)]
pub struct RunArtifacts {
    pub json_path: PathBuf,
    pub ledger_path: PathBuf,
    pub documents: usize,
    pub errors: usize,
}

/// Run the merge engine over an already-loaded table set.
///
/// Pipeline: header handling → row grouping (transform rules inline) →
/// template overlay → singleton collapsing → text-field coercion → missing
/// value guard. One SUCCESS ledger row is appended per emitted record.
pub fn process_tables(
    tables: &[Table],
    kind: DocumentKind,
    config: &TenantConfig,
    ledger: &mut RunLedger,
) -> Map<String, Value> {
    let tables: Vec<Table> = tables
        .iter()
        .map(|t| columns::apply_header_mode(t, &config.header_mode))
        .collect();
    let mut records = grouper::group_rows(&tables, config, ledger);
    if let Some(template) = config.template_for(kind) {
        overlay::apply_template(&mut records, template, ledger);
    }
    for (_, record) in records.iter_mut() {
        if let Value::Object(obj) = record {
            normalize::collapse_singletons(obj);
            normalize::coerce_text_fields(obj, &config.type_map);
        }
        normalize::normalize_missing(record);
    }
    let ids: Vec<String> = records.keys().cloned().collect();
    for id in ids {
        ledger.success(id);
    }
    records
}

/// Full run for one workbook: load, merge, write the JSON and the ledger CSV.
/// A fatal load error still writes the ledger (with its single entry) before
/// returning the error.
pub fn process_file(
    input: &Path,
    kind: DocumentKind,
    config: &TenantConfig,
) -> Result<RunArtifacts, String> {
    let mut ledger = RunLedger::new();
    let tables = match excel::load_tables(input, config, &mut ledger) {
        Ok(tables) => tables,
        Err(err) => {
            let message = format!("Error al cargar el archivo Excel: {}", err);
            ledger.error("", message.clone());
            if let Err(write_err) = output::write_ledger(input, &ledger) {
                log::error!("No se pudo escribir la bitácora: {}", write_err);
            }
            return Err(message);
        }
    };
    info!(
        "procesando {} hojas de '{}' como tipo {} (cliente {})",
        tables.len(),
        input.display(),
        kind.code(),
        config.tenant
    );
    let records = process_tables(&tables, kind, config, &mut ledger);
    let json_path = output::write_json(input, &records)?;
    let ledger_path = output::write_ledger(input, &ledger)?;
    info!(
        "{} documentos emitidos, {} errores",
        records.len(),
        ledger.error_count()
    );
    Ok(RunArtifacts {
        json_path,
        ledger_path,
        documents: records.len(),
        errors: ledger.error_count(),
    })
}
