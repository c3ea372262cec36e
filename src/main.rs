use std::env;
use std::path::Path;
use std::process::ExitCode;

use log::{error, info};

use dte_converter::config::{DocumentKind, TenantConfig};
use dte_converter::process_file;

fn main() -> ExitCode {
    // .env next to the binary carries RUST_LOG and future deployment settings
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Uso: dte-converter <archivo.xlsx> <tipo_dte> [cliente]");
        return ExitCode::from(2);
    }
    let input = Path::new(&args[1]);
    let kind = match DocumentKind::from_code(&args[2]) {
        Ok(kind) => kind,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let config = match TenantConfig::for_tenant(args.get(3).map(String::as_str)) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match process_file(input, kind, &config) {
        Ok(run) => {
            info!(
                "listo: {} documentos, {} errores -> {} / {}",
                run.documents,
                run.errors,
                run.json_path.display(),
                run.ledger_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
