use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "snipe")]
#[command(about = "Enrollment sniper - registers for a lesson slot the moment it opens")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Watch a lesson and register the moment its window opens
	Run {
		/// Lesson identifier from the lesson page URL
		lesson_id: String,

		/// Reload checks per second while the window is closed (values above 0.5 risk reading mid-render pages)
		#[arg(long, default_value = "0.5")]
		frequency: f64,

		/// Registration clicks permitted once the window opens
		#[arg(long, default_value = "50")]
		max_attempts: u32,

		#[command(flatten)]
		session: SessionArgs,
	},

	/// Log in, classify the lesson page once, and print its state
	Status {
		/// Lesson identifier from the lesson page URL
		lesson_id: String,

		#[command(flatten)]
		session: SessionArgs,
	},

	/// Print the effective site profile as JSON
	Profile {
		/// Site profile file overriding the built-in defaults
		#[arg(long, value_name = "FILE")]
		site_profile: Option<PathBuf>,
	},
}

/// Session flags shared by every command that opens a browser.
#[derive(Args, Debug)]
pub struct SessionArgs {
	/// Login flow to authenticate with
	#[arg(long, value_enum, default_value = "direct")]
	pub identity: IdentityFlow,

	/// Account name (falls back to $SNIPE_USER; the password always comes from $SNIPE_PASSWORD)
	#[arg(short, long)]
	pub user: Option<String>,

	/// Site profile file overriding the built-in defaults
	#[arg(long, value_name = "FILE")]
	pub site_profile: Option<PathBuf>,

	/// Show the browser window instead of running headless
	#[arg(long)]
	pub headful: bool,

	/// Pass --no-sandbox to the browser (needed in some containers)
	#[arg(long)]
	pub no_sandbox: bool,
}

/// Which login hand-off the lesson portal should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum IdentityFlow {
	/// Portal-native account login
	#[default]
	Direct,
	/// Federated login through the SWITCHaai institution chooser
	SwitchAai,
}

impl fmt::Display for IdentityFlow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Direct => "direct",
			Self::SwitchAai => "switch-aai",
		};
		f.write_str(label)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_run_defaults() {
		let cli = Cli::try_parse_from(["snipe", "run", "196346"]).unwrap();
		match cli.command {
			Commands::Run {
				lesson_id,
				frequency,
				max_attempts,
				session,
			} => {
				assert_eq!(lesson_id, "196346");
				assert_eq!(frequency, 0.5);
				assert_eq!(max_attempts, 50);
				assert_eq!(session.identity, IdentityFlow::Direct);
				assert!(session.user.is_none());
				assert!(!session.headful);
			}
			_ => panic!("Expected Run command"),
		}
	}

	#[test]
	fn parse_run_with_flags() {
		let cli = Cli::try_parse_from([
			"snipe",
			"run",
			"196346",
			"--frequency",
			"0.2",
			"--max-attempts",
			"10",
			"--identity",
			"switch-aai",
			"-u",
			"martina",
			"--headful",
		])
		.unwrap();
		match cli.command {
			Commands::Run {
				frequency,
				max_attempts,
				session,
				..
			} => {
				assert_eq!(frequency, 0.2);
				assert_eq!(max_attempts, 10);
				assert_eq!(session.identity, IdentityFlow::SwitchAai);
				assert_eq!(session.user.as_deref(), Some("martina"));
				assert!(session.headful);
			}
			_ => panic!("Expected Run command"),
		}
	}

	#[test]
	fn parse_status_command() {
		let cli = Cli::try_parse_from(["snipe", "status", "77", "--site-profile", "/tmp/profile.json"]).unwrap();
		match cli.command {
			Commands::Status { lesson_id, session } => {
				assert_eq!(lesson_id, "77");
				assert_eq!(session.site_profile.as_deref(), Some(std::path::Path::new("/tmp/profile.json")));
			}
			_ => panic!("Expected Status command"),
		}
	}

	#[test]
	fn parse_profile_command() {
		let cli = Cli::try_parse_from(["snipe", "profile"]).unwrap();
		match cli.command {
			Commands::Profile { site_profile } => assert!(site_profile.is_none()),
			_ => panic!("Expected Profile command"),
		}
	}

	#[test]
	fn verbose_is_global_and_counts() {
		let cli = Cli::try_parse_from(["snipe", "run", "1", "-vv"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn password_is_never_a_flag() {
		assert!(Cli::try_parse_from(["snipe", "run", "1", "--password", "hunter2"]).is_err());
	}
}
