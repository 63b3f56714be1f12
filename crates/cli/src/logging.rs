//! Verbosity-driven tracing setup.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the verbosity flag entirely; otherwise `-v`
/// raises the level for this tool while third-party crates stay quiet.
/// Logs go to stderr so stdout carries only the verdict.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbose)));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn directives(verbose: u8) -> &'static str {
	match verbose {
		0 => "warn,snipe=info,snipe_cli=info",
		1 => "info,snipe=debug,snipe_cli=debug",
		_ => "debug,snipe=trace,snipe_cli=trace",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directives_cover_both_crates_at_every_level() {
		for verbose in 0..=3 {
			let d = directives(verbose);
			assert!(d.contains("snipe="), "missing core directive at -v{verbose}: {d}");
			assert!(d.contains("snipe_cli="), "missing cli directive at -v{verbose}: {d}");
		}
	}

	#[test]
	fn directives_escalate_with_verbosity() {
		assert!(directives(0).starts_with("warn"));
		assert!(directives(1).starts_with("info"));
		assert!(directives(2).starts_with("debug"));
	}
}
