//! Error types shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnipeError>;

/// Failures raised while watching or racing for a slot.
///
/// The transient/fatal split drives the retry policy: transient UI
/// failures consume one registration attempt and the run keeps going,
/// anything else tears the run down.
#[derive(Debug, Error)]
pub enum SnipeError {
	/// The page shifted under us mid-interaction (stale node, re-render).
	#[error("transient UI failure: {reason}")]
	TransientUi { reason: String },

	/// The browser, the session, or the page is unusable.
	#[error("automation failure: {detail}")]
	Automation { detail: String },

	/// An external interrupt asked the run to stop.
	#[error("cancelled by external interrupt")]
	Cancelled,
}

impl SnipeError {
	pub fn transient(reason: impl Into<String>) -> Self {
		Self::TransientUi { reason: reason.into() }
	}

	pub fn automation(detail: impl Into<String>) -> Self {
		Self::Automation { detail: detail.into() }
	}

	/// True for failures that consume an attempt instead of ending the run.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::TransientUi { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transient_classification() {
		assert!(SnipeError::transient("button went stale").is_transient());
		assert!(!SnipeError::automation("browser gone").is_transient());
		assert!(!SnipeError::Cancelled.is_transient());
	}

	#[test]
	fn messages_carry_detail() {
		let err = SnipeError::transient("node detached");
		assert_eq!(err.to_string(), "transient UI failure: node detached");
		let err = SnipeError::automation("no page");
		assert_eq!(err.to_string(), "automation failure: no page");
	}
}
