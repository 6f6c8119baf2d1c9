//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// hitcounter - hit tracking maintenance tool
#[derive(Parser)]
#[command(name = "hitcounter")]
#[command(version)]
#[command(about = "Maintenance commands for the hits table", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Delete hits older than the given number of days
    Cleanup {
        /// Retention in days (must be >= 1)
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
    },

    /// Show hit counters for one entity
    ///
    /// Usage: stats <TYPE> <ID>
    Stats {
        /// Entity type discriminator (hittable_type)
        kind: String,

        /// Entity primary key
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
