//! Row-scoped field cleanup applied before a row joins its section list.
//! Rules are table-driven (sheet → field → rule) so tenant differences stay
//! in configuration.

use serde_json::{Map, Value};

use crate::config::{FieldRule, RuleBinding};
use crate::types::cell_text;

/// Apply the sheet's rule table to one row object. A rule only fires when its
/// field is present on the row; errors name the offending column.
pub fn apply_rules(row: &mut Map<String, Value>, rules: &[RuleBinding]) -> Result<(), String> {
    for binding in rules {
        if !row.contains_key(&binding.field) {
            continue;
        }
        match &binding.rule {
            FieldRule::SplitCommaList => split_comma_list(row, &binding.field)?,
            FieldRule::StripHyphens => strip_hyphens(row, &binding.field),
            FieldRule::StripHyphensWhenTypeIn { type_field, codes } => {
                let code = row.get(type_field).and_then(cell_text);
                if code.map(|c| codes.contains(&c)).unwrap_or(false) {
                    strip_hyphens(row, &binding.field);
                }
            }
        }
    }
    Ok(())
}

/// Comma-separated cell → list of trimmed strings. A lone value becomes a
/// one-element list, a blank cell an empty list.
fn split_comma_list(row: &mut Map<String, Value>, field: &str) -> Result<(), String> {
    let list = match row.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                Vec::new()
            } else {
                s.split(',')
                    .map(|part| Value::String(part.trim().to_string()))
                    .collect()
            }
        }
        Some(other) => match cell_text(other) {
            Some(text) => vec![Value::String(text)],
            None => {
                return Err(format!(
                    "Error en la columna '{}': el valor no se puede convertir en lista.",
                    field
                ))
            }
        },
    };
    row.insert(field.to_string(), Value::Array(list));
    Ok(())
}

/// Remove hyphens from a string value; other value kinds are left alone.
fn strip_hyphens(row: &mut Map<String, Value>, field: &str) {
    if let Some(Value::String(s)) = row.get_mut(field) {
        *s = s.replace('-', "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn tributos_rule() -> Vec<RuleBinding> {
        vec![RuleBinding {
            field: "Tributos".to_string(),
            rule: FieldRule::SplitCommaList,
        }]
    }

    fn dui_rule() -> Vec<RuleBinding> {
        vec![RuleBinding {
            field: "NumeroDocumentoIdentificacion".to_string(),
            rule: FieldRule::StripHyphensWhenTypeIn {
                type_field: "TipoDocumentoIdentificacion".to_string(),
                codes: vec!["13".to_string(), "36".to_string()],
            },
        }]
    }

    #[test]
    fn tributos_splits_on_commas() {
        let mut r = row(&[("Tributos", json!("20, C3"))]);
        apply_rules(&mut r, &tributos_rule()).unwrap();
        assert_eq!(r["Tributos"], json!(["20", "C3"]));
    }

    #[test]
    fn single_tributo_becomes_one_element_list() {
        let mut r = row(&[("Tributos", json!("20"))]);
        apply_rules(&mut r, &tributos_rule()).unwrap();
        assert_eq!(r["Tributos"], json!(["20"]));
    }

    #[test]
    fn blank_tributos_becomes_empty_list() {
        let mut r = row(&[("Tributos", Value::Null)]);
        apply_rules(&mut r, &tributos_rule()).unwrap();
        assert_eq!(r["Tributos"], json!([]));

        let mut r = row(&[("Tributos", json!(""))]);
        apply_rules(&mut r, &tributos_rule()).unwrap();
        assert_eq!(r["Tributos"], json!([]));
    }

    #[test]
    fn missing_tributos_column_is_untouched() {
        let mut r = row(&[("Codigo", json!("X1"))]);
        apply_rules(&mut r, &tributos_rule()).unwrap();
        assert!(!r.contains_key("Tributos"));
    }

    #[test]
    fn hyphens_stripped_only_for_matching_type_codes() {
        let mut r = row(&[
            ("TipoDocumentoIdentificacion", json!("13")),
            ("NumeroDocumentoIdentificacion", json!("01234567-8")),
        ]);
        apply_rules(&mut r, &dui_rule()).unwrap();
        assert_eq!(r["NumeroDocumentoIdentificacion"], json!("012345678"));

        let mut r = row(&[
            ("TipoDocumentoIdentificacion", json!("02")),
            ("NumeroDocumentoIdentificacion", json!("01234567-8")),
        ]);
        apply_rules(&mut r, &dui_rule()).unwrap();
        assert_eq!(r["NumeroDocumentoIdentificacion"], json!("01234567-8"));
    }

    #[test]
    fn numeric_type_code_still_matches() {
        let mut r = row(&[
            ("TipoDocumentoIdentificacion", json!(13)),
            ("NumeroDocumentoIdentificacion", json!("06140101-1")),
        ]);
        apply_rules(&mut r, &dui_rule()).unwrap();
        assert_eq!(r["NumeroDocumentoIdentificacion"], json!("061401011"));
    }

    #[test]
    fn unconditional_strip_ignores_non_strings() {
        let rules = vec![RuleBinding {
            field: "Nrc".to_string(),
            rule: FieldRule::StripHyphens,
        }];
        let mut r = row(&[("Nrc", json!("123-456"))]);
        apply_rules(&mut r, &rules).unwrap();
        assert_eq!(r["Nrc"], json!("123456"));

        let mut r = row(&[("Nrc", json!(123456))]);
        apply_rules(&mut r, &rules).unwrap();
        assert_eq!(r["Nrc"], json!(123456));
    }
}
