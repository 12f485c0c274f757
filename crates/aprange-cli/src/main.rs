mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!(
        "🚀 aprange CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let app_config = config::build_config(cli.config.as_deref(), &cli.set_values)?;
    debug!("Resolved configuration: {:?}", &app_config);

    let command_result = match cli.command {
        Commands::Info(args) => {
            info!("Dispatching to 'info' command.");
            commands::info::run(args, &app_config)
        }
        Commands::Lookup(args) => {
            info!("Dispatching to 'lookup' command.");
            commands::lookup::run(args, &app_config)
        }
        Commands::Export(args) => {
            info!("Dispatching to 'export' command.");
            commands::export::run(args)
        }
        Commands::Convert(args) => {
            info!("Dispatching to 'convert' command.");
            commands::convert::run(args)
        }
        Commands::Quant(args) => {
            info!("Dispatching to 'quant' command.");
            commands::quant::run(args, &app_config, !cli.quiet)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
