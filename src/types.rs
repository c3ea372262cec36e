use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One worksheet as the engine sees it: header names plus rows of cell values.
/// Empty cells are `Value::Null`; rows are padded/truncated to the header width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Table {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Text form of a scalar cell, used for record-map keys and code comparisons.
/// Integral numbers drop the decimal part (`100.0` → `"100"`), so a numeric
/// identifier and its text form key the same record. Returns `None` for
/// null/blank cells and for non-scalar values.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some((f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
