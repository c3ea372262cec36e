//! Tenant "2" (Red Abierta). Only issues facturas; shares the canonical type
//! map and cleanup rules, carries no header renames.

use std::collections::BTreeMap;

use super::standard;
use crate::config::{HeaderMode, TenantConfig};

pub fn config() -> TenantConfig {
    TenantConfig {
        tenant: "red_abierta".to_string(),
        id_column: "IDDTE".to_string(),
        header_mode: HeaderMode::Rename(BTreeMap::new()),
        transform_rules: standard::transform_rules(),
        templates: BTreeMap::from([("01".to_string(), standard::factura_template())]),
        type_map: standard::type_map(),
    }
}
