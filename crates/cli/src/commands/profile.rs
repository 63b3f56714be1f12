//! The `profile` subcommand: print the effective site profile as JSON.
//!
//! Handy as a starting point for a `--site-profile` override file.

use std::path::Path;

use crate::commands::load_profile;
use crate::error::{CliError, Result};

pub fn execute(path: Option<&Path>) -> Result<()> {
	let profile = load_profile(path)?;
	let rendered = serde_json::to_string_pretty(&profile).map_err(|err| CliError::Config(format!("profile does not serialize: {err}")))?;
	println!("{rendered}");
	Ok(())
}
