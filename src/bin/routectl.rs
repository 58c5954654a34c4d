use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gateway_router::admin::{list_routes, resolve};
use gateway_router::config::loader::{build_registry, load_routes_dir};
use gateway_router::observability::logging;
use gateway_router::SharedRegistry;

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "Offline checks and queries against a routes directory", long_about = None)]
struct Cli {
    /// Log level for diagnostics on stderr
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every route file and build the table
    Check { dir: PathBuf },
    /// List registered routes
    List {
        dir: PathBuf,
        /// Only routes of this app key
        #[arg(short, long)]
        tenant: Option<String>,
    },
    /// Show the candidates a request would be routed to
    Find {
        dir: PathBuf,
        method: String,
        path: String,
    },
}

#[derive(Serialize)]
struct CheckReport {
    ok: bool,
    tenants: usize,
    routes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn load(dir: &Path) -> Result<(usize, SharedRegistry), Box<dyn std::error::Error>> {
    let files = load_routes_dir(dir)?;
    let registry = build_registry(&files)?;
    Ok((files.len(), SharedRegistry::new(registry)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check { dir } => {
            let report = match load(&dir) {
                Ok((tenants, shared)) => CheckReport {
                    ok: true,
                    tenants,
                    routes: shared.load().len(),
                    error: None,
                },
                Err(e) => CheckReport {
                    ok: false,
                    tenants: 0,
                    routes: 0,
                    error: Some(e.to_string()),
                },
            };
            print_json(&report)?;
            Ok(report.ok)
        }
        Commands::List { dir, tenant } => {
            let (_, shared) = load(&dir)?;
            print_json(&list_routes(&shared, tenant.as_deref()))?;
            Ok(true)
        }
        Commands::Find { dir, method, path } => {
            let (_, shared) = load(&dir)?;
            match resolve(&shared, &method, &path) {
                Some(resolution) => {
                    print_json(&resolution)?;
                    Ok(true)
                }
                None => {
                    eprintln!("no route for {} {}", method, path);
                    Ok(false)
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
