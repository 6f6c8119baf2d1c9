use std::process::ExitCode;

use clap::Parser;

use hitcounter::cli::Cli;
use hitcounter::config::{get_config, init_config, validators::validate_hits_config};
use hitcounter::interfaces::cli::{CliError, run_cli_command};
use hitcounter::system::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(&cli.config);
    let config = get_config();

    // guard 必须存活到 main 返回，保证日志刷盘
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    if let Err(errors) = validate_hits_config(&config.hits) {
        for error in errors {
            eprintln!("{}", CliError::ValidationError(error).format_colored());
        }
        return ExitCode::FAILURE;
    }

    match run_cli_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            ExitCode::FAILURE
        }
    }
}
