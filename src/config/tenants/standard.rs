//! Standard tenant: the full document-type template set, the canonical type
//! map, and the common cleanup rules.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::config::FieldType::{Boolean, Float, Integer, Text};
use crate::config::{
    object, DocumentTemplate, FieldRule, FieldType, HeaderMode, RuleBinding, SectionDefault,
    TenantConfig,
};

pub fn config() -> TenantConfig {
    TenantConfig {
        tenant: "standard".to_string(),
        id_column: "IDDTE".to_string(),
        header_mode: HeaderMode::Rename(rename_tables()),
        transform_rules: transform_rules(),
        templates: templates(),
        type_map: type_map(),
    }
}

/// Header fixes for known legacy spellings seen in client workbooks.
fn rename_tables() -> BTreeMap<String, BTreeMap<String, String>> {
    let mut tables = BTreeMap::new();
    tables.insert(
        "Resumen".to_string(),
        BTreeMap::from([("DescuentoExcento".to_string(), "DescuentoExento".to_string())]),
    );
    tables.insert(
        "Receptor".to_string(),
        BTreeMap::from([
            ("NRC".to_string(), "Nrc".to_string()),
            ("NIT".to_string(), "Nit".to_string()),
        ]),
    );
    tables
}

fn binding(field: &str, rule: FieldRule) -> RuleBinding {
    RuleBinding {
        field: field.to_string(),
        rule,
    }
}

/// Hyphens are stripped from identification numbers only for DUI ("13") and
/// NIT ("36") document types.
fn strip_for_dui_or_nit(type_field: &str) -> FieldRule {
    FieldRule::StripHyphensWhenTypeIn {
        type_field: type_field.to_string(),
        codes: vec!["13".to_string(), "36".to_string()],
    }
}

pub(crate) fn transform_rules() -> BTreeMap<String, Vec<RuleBinding>> {
    let mut rules = BTreeMap::new();
    rules.insert(
        "Detalles".to_string(),
        vec![binding("Tributos", FieldRule::SplitCommaList)],
    );
    rules.insert(
        "Receptor".to_string(),
        vec![
            binding("Nrc", FieldRule::StripHyphens),
            binding("Nit", FieldRule::StripHyphens),
            binding(
                "NumeroDocumentoIdentificacion",
                strip_for_dui_or_nit("TipoDocumentoIdentificacion"),
            ),
        ],
    );
    rules.insert(
        "Resumen".to_string(),
        vec![
            binding(
                "NumDocIdentResponsable",
                strip_for_dui_or_nit("TipoDocIdentResponsable"),
            ),
            binding(
                "NumDocIdentSolicita",
                strip_for_dui_or_nit("TipoDocIdentSolicita"),
            ),
        ],
    );
    rules.insert(
        "Extension".to_string(),
        vec![
            binding("DocumentoEntrega", FieldRule::StripHyphens),
            binding("DocumentoRecibe", FieldRule::StripHyphens),
        ],
    );
    rules
}

fn scalar(value: Value) -> SectionDefault {
    SectionDefault::Scalar(object(value))
}

fn empty_list() -> SectionDefault {
    SectionDefault::Repeated(Vec::new())
}

fn template(root: Value, sections: Vec<(&str, SectionDefault)>) -> DocumentTemplate {
    DocumentTemplate {
        root: object(root),
        sections: sections
            .into_iter()
            .map(|(name, default)| (name.to_string(), default))
            .collect(),
    }
}

pub(crate) fn factura_template() -> DocumentTemplate {
    template(
        json!({
            "CodigoGeneracionContingencia": null,
            "NumeroIntentos": 0,
            "VentaTercero": false,
            "NitTercero": null,
            "NombreTercero": null
        }),
        vec![
            ("Identificacion", scalar(json!({ "TipoDte": "01" }))),
            ("Receptor", scalar(json!({ "Nrc": null }))),
            (
                "Detalles",
                scalar(json!({
                    "Descuento": 0,
                    "Codigo": null,
                    "CodGenDocRelacionado": null,
                    "CodigoTributo": null
                })),
            ),
            (
                "Resumen",
                scalar(json!({
                    "DescuentoNoSujeto": 0,
                    "DescuentoGravado": 0,
                    "RetencionRenta": false,
                    "DescuentoExento": 0
                })),
            ),
            ("DocumentosRelacionados", empty_list()),
            ("OtrosDocumentosRelacionados", empty_list()),
            ("Apendices", empty_list()),
        ],
    )
}

fn credito_fiscal_template() -> DocumentTemplate {
    template(
        json!({
            "CodigoGeneracionContingencia": null,
            "NumeroIntentos": 0,
            "VentaTercero": false,
            "NitTercero": null,
            "NombreTercero": null,
            "Rechazado": false
        }),
        vec![
            ("Identificacion", scalar(json!({ "TipoDte": "03" }))),
            (
                "Resumen",
                scalar(json!({
                    "DescuentoNoSujeto": 0,
                    "DescuentoGravado": 0,
                    "DescuentoExento": 0,
                    "RetencionRenta": false
                })),
            ),
            ("DocumentosRelacionados", empty_list()),
            ("OtrosDocumentosRelacionados", empty_list()),
            ("Apendices", empty_list()),
        ],
    )
}

fn nota_credito_template() -> DocumentTemplate {
    template(
        json!({
            "CodigoGeneracionContingencia": null,
            "NumeroIntentos": 0,
            "VentaTercero": false,
            "NitTercero": null,
            "NombreTercero": null
        }),
        vec![
            ("Identificacion", scalar(json!({ "TipoDte": "05" }))),
            (
                "Resumen",
                scalar(json!({
                    "DescuentoNoSujeto": 0,
                    "DescuentoGravado": 0,
                    "DescuentoExento": 0,
                    "RetencionRenta": false
                })),
            ),
            ("Apendices", empty_list()),
        ],
    )
}

fn exportacion_template() -> DocumentTemplate {
    template(
        json!({
            "CodigoGeneracionContingencia": null,
            "NumeroIntentos": 0,
            "VentaTercero": false,
            "NitTercero": null,
            "NombreTercero": null
        }),
        vec![
            ("Identificacion", scalar(json!({ "TipoDte": "11" }))),
            (
                "Resumen",
                scalar(json!({
                    "Seguro": 0.0,
                    "Flete": 0.0,
                    "CodigoIncoterm": null,
                    "DescripcionIncoterm": null,
                    "Observaciones": null
                })),
            ),
            ("OtrosDocumentosRelacionados", empty_list()),
            ("Apendices", empty_list()),
        ],
    )
}

fn sujeto_excluido_template() -> DocumentTemplate {
    template(
        json!({
            "CodigoGeneracionContingencia": null,
            "NumeroIntentos": 0,
            "Rechazado": false,
            "Observaciones": ""
        }),
        vec![
            ("Identificacion", scalar(json!({ "TipoDte": "14" }))),
            ("Apendices", empty_list()),
        ],
    )
}

fn templates() -> BTreeMap<String, DocumentTemplate> {
    BTreeMap::from([
        ("01".to_string(), factura_template()),
        ("03".to_string(), credito_fiscal_template()),
        ("05".to_string(), nota_credito_template()),
        ("11".to_string(), exportacion_template()),
        ("14".to_string(), sujeto_excluido_template()),
    ])
}

fn fields(entries: &[(&str, FieldType)]) -> BTreeMap<String, FieldType> {
    entries
        .iter()
        .map(|(name, ftype)| (name.to_string(), *ftype))
        .collect()
}

pub(crate) fn type_map() -> BTreeMap<String, BTreeMap<String, FieldType>> {
    let mut map = BTreeMap::new();
    map.insert(
        "dte".to_string(),
        fields(&[
            ("CodigoGeneracionContingencia", Text),
            ("NumeroIntentos", Integer),
            ("VentaTercero", Boolean),
            ("NitTercero", Text),
            ("NombreTercero", Text),
            ("CodigoCondicionOperacion", Text),
            ("Rechazado", Boolean),
            ("TipoInvalidacion", Text),
            ("CodigoEstablecimientoMH", Text),
            ("MotivoInvalidacion", Text),
        ]),
    );
    map.insert(
        "Identificacion".to_string(),
        fields(&[
            ("TipoDte", Text),
            ("CodigoEstablecimientoMH", Text),
            ("Moneda", Text),
        ]),
    );
    map.insert(
        "Receptor".to_string(),
        fields(&[
            ("TipoDocumentoIdentificacion", Text),
            ("NumeroDocumentoIdentificacion", Text),
            ("CodigoDepartamento", Text),
            ("CodigoMunicipio", Text),
            ("Direccion", Text),
            ("Nrc", Text),
            ("CodigoActividadEconomica", Text),
            ("DescripcionActividadEconomica", Text),
            ("Correo", Text),
            ("Telefono", Text),
            ("Nit", Text),
            ("Nombres", Text),
            ("CodigoTipoPersona", Integer),
            ("DireccionComplemento", Text),
            ("CodigoPais", Text),
            ("NombrePais", Text),
        ]),
    );
    map.insert(
        "Detalles".to_string(),
        fields(&[
            ("TipoMonto", Integer),
            ("CodigoTipoItem", Integer),
            ("Cantidad", Float),
            ("Codigo", Text),
            ("CodGenDocRelacionado", Text),
            ("CodigoTributo", Text),
            ("CodigoUnidadMedida", Text),
            ("Descripcion", Text),
            ("Tributos", Text),
            ("PrecioUnitario", Float),
            ("IvaItem", Float),
            ("Descuento", Float),
            ("Subtotal", Float),
        ]),
    );
    map.insert(
        "Resumen".to_string(),
        fields(&[
            ("DescuentoNoSujeto", Float),
            ("DescuentoGravado", Float),
            ("DescuentoExento", Float),
            ("RetencionRenta", Boolean),
            ("CodigoRetencionIva", Text),
            ("PercepcionIva", Boolean),
            ("Seguro", Float),
            ("Flete", Float),
            ("CodigoIncoterm", Text),
            ("DescripcionIncoterm", Text),
            ("Observaciones", Text),
            ("TipoDocIdentResponsable", Text),
            ("NumDocIdentResponsable", Text),
            ("NombresResponsable", Text),
            ("TipoDocIdentSolicita", Text),
            ("NumDocIdentSolicita", Text),
            ("NombresSolicita", Text),
        ]),
    );
    map.insert(
        "Extension".to_string(),
        fields(&[
            ("NombreEntrega", Text),
            ("DocumentoEntrega", Text),
            ("NombreRecibe", Text),
            ("DocumentoRecibe", Text),
            ("Observaciones", Text),
            ("PlacaVehiculo", Text),
        ]),
    );
    map.insert(
        "DocumentosRelacionados".to_string(),
        fields(&[
            ("TipoDte", Text),
            ("CodigoGeneracion", Text),
            ("CodigoTipoGeneracion", Integer),
            ("FechaEmision", Text),
        ]),
    );
    map.insert(
        "Detalle".to_string(),
        fields(&[
            ("TipoDte", Text),
            ("CodigoGeneracion", Text),
            ("CodigoGeneracionDocumentoReemplazo", Text),
            ("TipoDteReemplazo", Text),
            ("NombreCliente", Text),
            ("CorreoCliente", Text),
            ("TelefonoCliente", Text),
        ]),
    );
    map
}
