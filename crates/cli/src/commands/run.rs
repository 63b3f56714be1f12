//! The `run` subcommand: watch a lesson page and register the moment it opens.

use colored::Colorize;
use snipe::{CancelToken, PollingConfig, RegistrationController, RegistrationOutcome, SnipeError, SnipeReport};
use tracing::{info, warn};

use crate::auth::{self, Credentials};
use crate::browser::{LessonSession, SessionOptions};
use crate::cli::SessionArgs;
use crate::commands::load_profile;
use crate::error::Result;

pub async fn execute(lesson_id: &str, frequency: f64, max_attempts: u32, args: &SessionArgs) -> Result<()> {
	let profile = load_profile(args.site_profile.as_deref())?;
	let polling = PollingConfig {
		frequency_hz: frequency,
		max_attempts,
	};
	// Validate flags and credentials before a browser gets launched for nothing.
	polling.validate()?;
	let credentials = auth::resolve(args.user.as_deref())?;

	let cancel = CancelToken::new();
	{
		let cancel = cancel.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				warn!(target = "snipe", "interrupt received, finishing up");
				cancel.cancel();
			}
		});
	}

	let url = profile.lesson_url(lesson_id);
	info!(target = "snipe", %url, frequency, max_attempts, "starting watch");

	let session = tokio::select! {
		launched = bootstrap(&url, args, &credentials, &profile) => launched?,
		_ = cancel.cancelled() => return Err(SnipeError::Cancelled.into()),
	};

	let controller = RegistrationController::new(&session, &profile, polling, cancel)?;
	let report = controller.run().await?;
	session.close().await?;

	print_verdict(&report);
	if !report.outcome.is_success() {
		std::process::exit(2);
	}
	Ok(())
}

async fn bootstrap(url: &str, args: &SessionArgs, credentials: &Credentials, profile: &snipe::SiteProfile) -> snipe::Result<LessonSession> {
	let options = SessionOptions {
		headful: args.headful,
		no_sandbox: args.no_sandbox,
	};
	let session = LessonSession::launch(url, options).await?;
	auth::login(&session, args.identity, credentials, profile).await?;
	Ok(session)
}

fn print_verdict(report: &SnipeReport) {
	let headline = match report.outcome {
		RegistrationOutcome::Registered => report.outcome.summary().green().bold(),
		RegistrationOutcome::Cancelled => report.outcome.summary().yellow().bold(),
		_ => report.outcome.summary().red().bold(),
	};
	println!("{headline}");
	let state = report.final_state.map(|state| state.to_string()).unwrap_or_else(|| "-".into());
	println!("last state {state}, attempts {}, reloads {}", report.attempts_made, report.reloads);
}
