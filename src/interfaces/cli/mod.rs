//! CLI interface module
//!
//! Runs the maintenance commands against the configured database.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::errors::HitError;
use crate::hits::HitService;
use crate::storage::StorageFactory;
use commands::{config_generate, run_cleanup, show_stats};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ValidationError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ValidationError(msg) => format!("Validation error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ValidationError(msg) => {
                format!("{} {}", "Validation error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<HitError> for CliError {
    fn from(err: HitError) -> Self {
        match err {
            HitError::Validation(msg) | HitError::DateParse(msg) | HitError::Config(msg) => {
                CliError::ValidationError(msg)
            }
            other if other.is_storage() => CliError::StorageError(other.message().to_string()),
            other => CliError::CommandError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force).await;
    }

    // 先校验参数，避免无意义的数据库连接
    if let Commands::Cleanup { days } = cmd
        && days <= 0
    {
        return Err(CliError::ValidationError(format!(
            "--days must be a positive integer, got {}",
            days
        )));
    }

    let storage = StorageFactory::create().await?;
    let service = HitService::from_global_config(storage)?;

    match cmd {
        Commands::Cleanup { days } => run_cleanup(&service, days).await,
        Commands::Stats { kind, id, json } => show_stats(&service, kind, id, json).await,
        Commands::Config { .. } => unreachable!("handled above"),
    }
}
