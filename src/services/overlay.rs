//! Overlays a document-type template onto every grouped record.

use serde_json::{Map, Value};

use crate::config::{DocumentTemplate, SectionDefault};
use crate::ledger::RunLedger;

/// Merge the template into every record. Section defaults follow the
/// `Scalar`/`Repeated` rule; root keys fill only where absent. Row data always
/// wins over defaults. A failure for one identifier/section pair is reported
/// and the record keeps whatever state it reached.
pub fn apply_template(
    records: &mut Map<String, Value>,
    template: &DocumentTemplate,
    ledger: &mut RunLedger,
) {
    for (id, record) in records.iter_mut() {
        let Some(record) = record.as_object_mut() else {
            continue;
        };
        for (section, default) in &template.sections {
            if let Err(err) = merge_section(record, section, default) {
                ledger.error(
                    id.clone(),
                    format!(
                        "Error al integrar los datos fijos de la sección '{}' para el IDDTE '{}': {}",
                        section, id, err
                    ),
                );
            }
        }
        for (key, value) in &template.root {
            if !record.contains_key(key) {
                record.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_section(
    record: &mut Map<String, Value>,
    section: &str,
    default: &SectionDefault,
) -> Result<(), String> {
    match default {
        SectionDefault::Scalar(defaults) => {
            // seeding with the defaults makes the merge below a no-op
            let slot = record
                .entry(section.to_string())
                .or_insert_with(|| Value::Array(vec![Value::Object(defaults.clone())]));
            match slot {
                Value::Array(entries) => {
                    for entry in entries {
                        let obj = entry.as_object_mut().ok_or_else(|| {
                            "la sección contiene un elemento que no es un objeto".to_string()
                        })?;
                        fill_absent(obj, defaults);
                    }
                }
                Value::Object(obj) => fill_absent(obj, defaults),
                _ => return Err("la sección no es una lista de objetos".to_string()),
            }
        }
        SectionDefault::Repeated(items) => {
            let slot = record
                .entry(section.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(entries) => entries.extend(items.iter().cloned()),
                _ => return Err("la sección no es una lista".to_string()),
            }
        }
    }
    Ok(())
}

fn fill_absent(obj: &mut Map<String, Value>, defaults: &Map<String, Value>) {
    for (key, value) in defaults {
        if !obj.contains_key(key) {
            obj.insert(key.clone(), value.clone());
        }
    }
}
