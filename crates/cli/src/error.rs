//! Error type for the command-line layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Failures raised before or around a registration run.
#[derive(Debug, Error)]
pub enum CliError {
	/// A flag, file, or profile value is unusable.
	#[error("{0}")]
	Config(String),

	/// Credentials could not be resolved from flags and environment.
	#[error("credentials: {0}")]
	Credentials(String),

	/// Anything the sniping core reported.
	#[error(transparent)]
	Snipe(#[from] snipe::SnipeError),
}

impl CliError {
	pub fn config(detail: impl Into<String>) -> Self {
		Self::Config(detail.into())
	}
}
