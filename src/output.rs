//! Output files: the record-map JSON and the run-ledger CSV, written next to
//! the input workbook.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::ledger::{RunLedger, LEDGER_COLUMNS};

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "salida".to_string())
}

fn output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write `<stem>.json`. serde_json leaves non-ASCII characters unescaped, so
/// names and addresses survive byte-for-byte in UTF-8.
pub fn write_json(input: &Path, records: &Map<String, Value>) -> Result<PathBuf, String> {
    let path = output_dir(input).join(format!("{}.json", file_stem(input)));
    let json = serde_json::to_string(records)
        .map_err(|e| format!("No se pudo serializar el resultado: {}", e))?;
    fs::write(&path, json)
        .map_err(|e| format!("No se pudo escribir '{}': {}", path.display(), e))?;
    Ok(path)
}

/// Write `<stem><YYYYmmddHHMMSS>.csv`: the fixed header row, then every
/// ledger entry in the order it was recorded.
pub fn write_ledger(input: &Path, ledger: &RunLedger) -> Result<PathBuf, String> {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let path = output_dir(input).join(format!("{}{}.csv", file_stem(input), stamp));
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| format!("No se pudo crear '{}': {}", path.display(), e))?;
    writer
        .write_record(LEDGER_COLUMNS)
        .map_err(|e| e.to_string())?;
    for entry in ledger.entries() {
        writer
            .write_record([
                entry.identifier.as_str(),
                entry.message.as_str(),
                entry.timestamp.as_str(),
                entry.status.as_str(),
            ])
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;
    Ok(path)
}
