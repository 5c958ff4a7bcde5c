//! arielfwctl - inspect the arielfw control protocol
//!
//! Lists the reply codes, classifies errno values, and frames, parses and
//! simulates reply lines the way the daemon writes them.

mod cli;
mod commands;

use anyhow::{Context, Result};
use arielfw_common::{logging, ArielFwConfig};
use clap::Parser;
use cli::{Cli, Commands};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ArielFwConfig::default_path);
    let config = ArielFwConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    logging::init(&config.log);
    debug!(command = ?cli.command, "arielfwctl v{}", env!("ARIELFW_VERSION"));

    let output = match &cli.command {
        Commands::Codes => commands::codes(cli.json),
        Commands::Errno { value } => commands::errno(value, cli.json),
        Commands::Frame { code, message } => commands::frame(*code, message, &config, cli.json),
        Commands::Parse { line } => commands::parse(line, cli.json),
        Commands::Simulate { steps, fail_errno } => {
            commands::simulate(*steps, fail_errno.as_deref(), &config, cli.json)
        }
    }?;

    print!("{}", output);
    if cli.json {
        println!();
    }
    Ok(())
}
