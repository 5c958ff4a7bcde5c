//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// arielfw response protocol inspector
#[derive(Parser, Debug)]
#[command(name = "arielfwctl")]
#[command(about = "Inspect and exercise the arielfw control protocol reply codes", long_about = None)]
#[command(version = env!("ARIELFW_VERSION"))]
pub struct Cli {
    /// Config file (defaults to /etc/arielfw/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every response code with its errno mapping
    Codes,

    /// Classify an errno value (number or name, e.g. 13 or EACCES)
    Errno {
        value: String,
    },

    /// Build a reply line from a code and message
    Frame {
        code: u16,

        /// Message words, joined with single spaces
        message: Vec<String>,
    },

    /// Parse a reply line
    Parse {
        line: String,
    },

    /// Print the replies of a simulated long-running firewall command
    Simulate {
        /// Number of continuation replies before the terminal one
        #[arg(long, default_value_t = 1)]
        steps: usize,

        /// End with the failure this errno maps to instead of success
        #[arg(long)]
        fail_errno: Option<String>,
    },
}
