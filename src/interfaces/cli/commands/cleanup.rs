//! Cleanup command

use colored::Colorize;

use crate::hits::HitService;
use crate::interfaces::cli::CliError;

pub async fn run_cleanup(service: &HitService, days: i64) -> Result<(), CliError> {
    let sweep = service.retention();
    println!(
        "{} hits older than {} days (batch size {})...",
        "Deleting".yellow(),
        days.to_string().cyan(),
        sweep.batch_size()
    );

    let deleted = sweep.cleanup(days).await?;

    println!(
        "{} Deleted {} hits",
        "✓".bold().green(),
        deleted.to_string().magenta()
    );
    Ok(())
}
