//! Built-in tenant configurations. One module per client set; new clients can
//! ship a JSON document instead (see `TenantConfig::from_json_file`).

pub mod red_abierta;
pub mod standard;
