//! The `status` subcommand: one classification pass, printed, nothing clicked.

use colored::Colorize;
use snipe::classify;

use crate::auth;
use crate::browser::{LessonSession, SessionOptions};
use crate::cli::SessionArgs;
use crate::commands::load_profile;
use crate::error::Result;

pub async fn execute(lesson_id: &str, args: &SessionArgs) -> Result<()> {
	let profile = load_profile(args.site_profile.as_deref())?;
	let credentials = auth::resolve(args.user.as_deref())?;

	let url = profile.lesson_url(lesson_id);
	let options = SessionOptions {
		headful: args.headful,
		no_sandbox: args.no_sandbox,
	};
	let session = LessonSession::launch(&url, options).await?;
	auth::login(&session, args.identity, &credentials, &profile).await?;

	let state = classify(&session, &profile).await?;
	session.close().await?;

	println!("{}: {}", state.to_string().bold(), state.describe());
	Ok(())
}
