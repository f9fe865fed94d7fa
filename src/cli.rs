//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// LinkPulse - URL shortener with click analytics
#[derive(Parser, Debug)]
#[command(name = "linkpulse")]
#[command(version)]
#[command(about = "URL shortener with cache-aside redirects and click analytics", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Flush all click counters into the database once, then exit
    Reconcile,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,
    },
}
