//! Subcommand implementations.

mod profile;
mod run;
mod status;

use std::path::Path;

use snipe::SiteProfile;
use url::Url;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Run {
			lesson_id,
			frequency,
			max_attempts,
			session,
		} => run::execute(&lesson_id, frequency, max_attempts, &session).await,
		Commands::Status { lesson_id, session } => status::execute(&lesson_id, &session).await,
		Commands::Profile { site_profile } => profile::execute(site_profile.as_deref()),
	}
}

/// Load the effective site profile: the built-in one, or a JSON file overriding it.
pub fn load_profile(path: Option<&Path>) -> Result<SiteProfile> {
	let profile = match path {
		Some(path) => SiteProfile::from_file(path)?,
		None => SiteProfile::default(),
	};
	Url::parse(&profile.lesson_base_url)
		.map_err(|err| CliError::Config(format!("lesson base URL {:?} does not parse: {err}", profile.lesson_base_url)))?;
	Ok(profile)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn default_profile_loads_without_a_file() {
		let profile = load_profile(None).expect("built-in profile should validate");
		assert!(profile.lesson_base_url.starts_with("https://"));
	}

	#[test]
	fn override_file_replaces_the_base_url() {
		let mut file = tempfile::NamedTempFile::new().expect("temp file should open");
		write!(file, r#"{{"lesson_base_url": "https://portal.test/lessons"}}"#).expect("profile should write");
		let profile = load_profile(Some(file.path())).expect("override should load");
		assert_eq!(profile.lesson_base_url, "https://portal.test/lessons");
	}

	#[test]
	fn bad_base_url_is_a_config_error() {
		let mut file = tempfile::NamedTempFile::new().expect("temp file should open");
		write!(file, r#"{{"lesson_base_url": "not a url"}}"#).expect("profile should write");
		let err = load_profile(Some(file.path())).expect_err("junk URL should fail");
		assert!(err.to_string().contains("lesson base URL"));
	}
}
