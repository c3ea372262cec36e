pub mod config;
pub mod excel;
pub mod ledger;
pub mod output;
pub mod services;
pub mod types;

pub use config::{DocumentKind, TenantConfig};
pub use ledger::RunLedger;
pub use services::processor::{process_file, process_tables, RunArtifacts};
pub use types::Table;
