//! Tenant configuration: header handling, transform rules, document-type
//! templates, and the canonical per-sheet type map. Resolved once at startup
//! and passed into the engine by value.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod tenants;

/// Document families accepted by the converter, keyed by their selector code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// "01" - factura
    Factura,
    /// "03" - comprobante de crédito fiscal
    CreditoFiscal,
    /// "05" - nota de crédito
    NotaCredito,
    /// "11" - factura de exportación
    FacturaExportacion,
    /// "14" - factura de sujeto excluido
    SujetoExcluido,
    /// "cancel" - invalidación (no template defaults)
    Invalidacion,
}

impl DocumentKind {
    pub fn from_code(code: &str) -> Result<DocumentKind, String> {
        match code {
            "01" => Ok(DocumentKind::Factura),
            "03" => Ok(DocumentKind::CreditoFiscal),
            "05" => Ok(DocumentKind::NotaCredito),
            "11" => Ok(DocumentKind::FacturaExportacion),
            "14" => Ok(DocumentKind::SujetoExcluido),
            "cancel" => Ok(DocumentKind::Invalidacion),
            other => Err(format!(
                "Tipo de DTE desconocido: '{}'. Valores soportados: 01, 03, 05, 11, 14, cancel.",
                other
            )),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DocumentKind::Factura => "01",
            DocumentKind::CreditoFiscal => "03",
            DocumentKind::NotaCredito => "05",
            DocumentKind::FacturaExportacion => "11",
            DocumentKind::SujetoExcluido => "14",
            DocumentKind::Invalidacion => "cancel",
        }
    }
}

/// Declared field type. Only `Text` is enforced (forced-text load plus
/// zero-pad coercion); the rest document the downstream contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
}

/// Default payload for one section of a document-type template.
/// A `Scalar` object is merged into every entry of the section (seeding a
/// one-element list when the section is absent); a `Repeated` list has each
/// element appended independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionDefault {
    Repeated(Vec<Value>),
    Scalar(Map<String, Value>),
}

/// Fixed fields for one document type: a root object whose keys fill absent
/// record-root keys, plus per-section defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    #[serde(default)]
    pub root: Map<String, Value>,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionDefault>,
}

/// How raw sheet headers become canonical field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HeaderMode {
    /// Per-sheet rename tables; unmapped headers pass through unchanged.
    Rename(BTreeMap<String, BTreeMap<String, String>>),
    /// Accent-strip + first-letter-capitalize transform, for clients whose
    /// sheets carry free-form headers and no rename tables.
    Normalize,
}

/// Row-scoped mutation applied before a row joins its section list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldRule {
    /// Comma-separated cell becomes a list of trimmed strings.
    SplitCommaList,
    /// Remove every hyphen from a string value.
    StripHyphens,
    /// Remove hyphens only when a sibling type-code field matches `codes`.
    StripHyphensWhenTypeIn {
        type_field: String,
        codes: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBinding {
    pub field: String,
    pub rule: FieldRule,
}

/// Everything tenant-specific the engine needs, bundled as one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub tenant: String,
    /// Name of the document-identifier column after header handling.
    pub id_column: String,
    pub header_mode: HeaderMode,
    #[serde(default)]
    pub transform_rules: BTreeMap<String, Vec<RuleBinding>>,
    /// Document-type templates keyed by selector code. A missing entry means
    /// no defaults for that type (the overlay pass is skipped).
    #[serde(default)]
    pub templates: BTreeMap<String, DocumentTemplate>,
    /// Sheet name → field name → declared type.
    #[serde(default)]
    pub type_map: BTreeMap<String, BTreeMap<String, FieldType>>,
}

impl TenantConfig {
    /// Built-in configuration for a tenant id; `None` selects the standard
    /// configuration. Unknown ids fail fast.
    pub fn for_tenant(tenant: Option<&str>) -> Result<TenantConfig, String> {
        match tenant {
            None => Ok(tenants::standard::config()),
            Some("2") => Ok(tenants::red_abierta::config()),
            Some(other) => Err(format!("Cliente desconocido: '{}'.", other)),
        }
    }

    /// Load a tenant configuration from a JSON document instead of code.
    pub fn from_json_file(path: &Path) -> Result<TenantConfig, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Could not read tenant config {}: {}", path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| format!("Invalid tenant config {}: {}", path.display(), e))
    }

    /// Headers of `sheet` that must be read in text mode so coded values keep
    /// their leading zeros.
    pub fn text_columns(&self, sheet: &str) -> Vec<&str> {
        self.type_map
            .get(sheet)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, t)| matches!(t, FieldType::Text))
                    .map(|(name, _)| name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn template_for(&self, kind: DocumentKind) -> Option<&DocumentTemplate> {
        self.templates.get(kind.code())
    }

    pub fn rules_for(&self, sheet: &str) -> &[RuleBinding] {
        self.transform_rules
            .get(sheet)
            .map(|r| r.as_slice())
            .unwrap_or(&[])
    }
}

/// Shorthand for template literals: unwraps a `json!` object into its map.
pub(crate) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
