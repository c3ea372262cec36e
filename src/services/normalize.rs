//! Record finishing passes: singleton collapsing, text-field zero-padding,
//! and the final missing-value guard.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::FieldType;

/// Sections the downstream loader requires as lists even with one entry.
pub const ALWAYS_LIST_SECTIONS: [&str; 2] = ["Detalles", "DocumentosRelacionados"];

/// Coded values are at least this many digits ("1" → "01").
const MIN_CODE_WIDTH: usize = 2;

/// Replace every one-element list section with its single object, except the
/// always-list sections, which are wrapped into a list if anything else got
/// there. Runs after the overlay, which can seed one-element sections.
pub fn collapse_singletons(record: &mut Map<String, Value>) {
    for (key, value) in record.iter_mut() {
        if ALWAYS_LIST_SECTIONS.contains(&key.as_str()) {
            if !value.is_array() {
                let single = value.take();
                *value = Value::Array(vec![single]);
            }
            continue;
        }
        if let Value::Array(items) = value {
            if items.len() == 1 {
                let single = items.remove(0);
                *value = single;
            }
        }
    }
}

/// Reformat numeric values left in Text-declared fields as zero-padded code
/// strings. The record root is covered by the "dte" type-map entry (the
/// header sheet's fields live at the root); every other entry applies to the
/// section of the same name, whether collapsed or still a list.
pub fn coerce_text_fields(
    record: &mut Map<String, Value>,
    type_map: &BTreeMap<String, BTreeMap<String, FieldType>>,
) {
    if let Some(root_fields) = type_map.get("dte") {
        coerce_object(record, root_fields);
    }
    for (section, fields) in type_map {
        if section == "dte" {
            continue;
        }
        match record.get_mut(section) {
            Some(Value::Array(entries)) => {
                for entry in entries {
                    if let Value::Object(obj) = entry {
                        coerce_object(obj, fields);
                    }
                }
            }
            Some(Value::Object(obj)) => coerce_object(obj, fields),
            _ => {}
        }
    }
}

fn coerce_object(obj: &mut Map<String, Value>, fields: &BTreeMap<String, FieldType>) {
    for (field, ftype) in fields {
        if *ftype != FieldType::Text {
            continue;
        }
        if let Some(value) = obj.get_mut(field) {
            if let Some(text) = zero_padded(value) {
                *value = Value::String(text);
            }
        }
    }
}

/// Zero-padded text form of a numeric value. Booleans and strings pass
/// through untouched; digits are never truncated.
fn zero_padded(value: &Value) -> Option<String> {
    let n = match value {
        Value::Number(n) => n,
        _ => return None,
    };
    if let Some(i) = n.as_i64() {
        return Some(format!("{:0width$}", i, width = MIN_CODE_WIDTH));
    }
    if let Some(u) = n.as_u64() {
        return Some(format!("{:0width$}", u, width = MIN_CODE_WIDTH));
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(format!("{:0width$}", f as i64, width = MIN_CODE_WIDTH))
    } else {
        Some(format!("{:0width$}", f, width = MIN_CODE_WIDTH))
    }
}

/// Final guard before serialization: any non-finite number anywhere in the
/// value becomes an explicit null. Containers map element-wise, everything
/// else passes through, so applying it twice changes nothing.
pub fn normalize_missing(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    *value = Value::Null;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_missing(item);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                normalize_missing(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TenantConfig;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("record literal must be an object"),
        }
    }

    #[test]
    fn singleton_sections_collapse_to_objects() {
        let mut r = record(json!({
            "Identificacion": [{ "TipoDte": "01" }],
            "Receptor": [{ "Nrc": null }]
        }));
        collapse_singletons(&mut r);
        assert_eq!(r["Identificacion"], json!({ "TipoDte": "01" }));
        assert_eq!(r["Receptor"], json!({ "Nrc": null }));
    }

    #[test]
    fn exempt_sections_stay_lists() {
        let mut r = record(json!({
            "Detalles": [{ "Codigo": "X1" }],
            "DocumentosRelacionados": [{ "TipoDte": "03" }],
            "Apendices": []
        }));
        collapse_singletons(&mut r);
        assert_eq!(r["Detalles"], json!([{ "Codigo": "X1" }]));
        assert_eq!(
            r["DocumentosRelacionados"],
            json!([{ "TipoDte": "03" }])
        );
        // empty lists are not singletons, they stay as they are
        assert_eq!(r["Apendices"], json!([]));
    }

    #[test]
    fn exempt_sections_are_rewrapped_when_scalar() {
        let mut r = record(json!({ "Detalles": { "Codigo": "X1" } }));
        collapse_singletons(&mut r);
        assert_eq!(r["Detalles"], json!([{ "Codigo": "X1" }]));
    }

    #[test]
    fn multi_entry_sections_are_untouched() {
        let mut r = record(json!({
            "Apendices": [{ "Campo": "a" }, { "Campo": "b" }]
        }));
        collapse_singletons(&mut r);
        assert_eq!(r["Apendices"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn text_fields_zero_pad_to_two_digits() {
        let type_map = TenantConfig::for_tenant(None).unwrap().type_map;
        let mut r = record(json!({
            "Identificacion": { "TipoDte": 1, "Moneda": "USD" },
            "Detalles": [{ "Codigo": 5, "Cantidad": 3 }, { "Codigo": 123 }]
        }));
        coerce_text_fields(&mut r, &type_map);
        assert_eq!(r["Identificacion"]["TipoDte"], json!("01"));
        assert_eq!(r["Identificacion"]["Moneda"], json!("USD"));
        assert_eq!(r["Detalles"][0]["Codigo"], json!("05"));
        // Cantidad is Float-typed, not coerced
        assert_eq!(r["Detalles"][0]["Cantidad"], json!(3));
        // three digits are preserved, never truncated
        assert_eq!(r["Detalles"][1]["Codigo"], json!("123"));
    }

    #[test]
    fn root_fields_use_the_header_sheet_types() {
        let type_map = TenantConfig::for_tenant(None).unwrap().type_map;
        let mut r = record(json!({
            "CodigoCondicionOperacion": 1,
            "NumeroIntentos": 0
        }));
        coerce_text_fields(&mut r, &type_map);
        assert_eq!(r["CodigoCondicionOperacion"], json!("01"));
        // Integer-typed, left numeric
        assert_eq!(r["NumeroIntentos"], json!(0));
    }

    #[test]
    fn integral_floats_pad_like_integers() {
        let type_map = TenantConfig::for_tenant(None).unwrap().type_map;
        let mut r = record(json!({
            "Identificacion": { "TipoDte": 7.0 }
        }));
        coerce_text_fields(&mut r, &type_map);
        assert_eq!(r["Identificacion"]["TipoDte"], json!("07"));
    }

    #[test]
    fn booleans_are_never_coerced() {
        let type_map = TenantConfig::for_tenant(None).unwrap().type_map;
        let mut r = record(json!({
            "Identificacion": { "TipoDte": true }
        }));
        coerce_text_fields(&mut r, &type_map);
        assert_eq!(r["Identificacion"]["TipoDte"], json!(true));
    }

    #[test]
    fn zero_pad_covers_the_two_digit_range() {
        for n in 0..100i64 {
            let padded = zero_padded(&json!(n)).unwrap();
            assert_eq!(padded.len(), 2);
            assert_eq!(padded.parse::<i64>().unwrap(), n);
        }
        assert_eq!(zero_padded(&json!(100)).unwrap(), "100");
    }

    #[test]
    fn normalize_missing_is_idempotent() {
        let mut value = json!({
            "a": null,
            "b": [1, null, { "c": null }],
            "d": "x"
        });
        normalize_missing(&mut value);
        let once = value.clone();
        normalize_missing(&mut value);
        assert_eq!(value, once);
    }

    #[test]
    fn normalize_missing_walks_nested_containers() {
        let mut value = json!([{ "a": [null, 2] }, 3]);
        normalize_missing(&mut value);
        assert_eq!(value, json!([{ "a": [null, 2] }, 3]));
    }
}
