use clap::Parser;
use colored::Colorize;
use snipe::SnipeError;
use snipe_cli::cli::Cli;
use snipe_cli::error::CliError;
use snipe_cli::{commands, logging};
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = commands::dispatch(cli).await {
		if matches!(err, CliError::Snipe(SnipeError::Cancelled)) {
			eprintln!("{}", "Cancelled.".yellow().bold());
			std::process::exit(2);
		}
		error!(target = "snipe", error = %err, "command failed");
		std::process::exit(1);
	}
}
