//! Lesson lifecycle states and terminal registration outcomes.

use std::fmt;

/// Discrete enrollment state read off a lesson page.
///
/// Classification is a pure function of what the page shows at one
/// instant; transitions between states only happen on the live site,
/// never inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonState {
	/// Enrollment has not opened yet.
	NotOpen,
	/// Enrollment is open and a slot is (or appears) available.
	OpenAvailable,
	/// Enrollment is open but every slot is taken.
	OpenFullyBooked,
	/// The enrollment window has closed.
	DeadlinePassed,
	/// The page did not match any known shape.
	Unknown,
}

impl LessonState {
	/// Human sentence for status output and transition logs.
	pub fn describe(self) -> &'static str {
		match self {
			Self::NotOpen => "enrollment has not opened yet",
			Self::OpenAvailable => "enrollment is open with a slot available",
			Self::OpenFullyBooked => "enrollment is open but fully booked",
			Self::DeadlinePassed => "the enrollment window has closed",
			Self::Unknown => "the page is in an unrecognized shape",
		}
	}
}

impl fmt::Display for LessonState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::NotOpen => "NOT_OPEN",
			Self::OpenAvailable => "OPEN_AVAILABLE",
			Self::OpenFullyBooked => "OPEN_FULLY_BOOKED",
			Self::DeadlinePassed => "DEADLINE_PASSED",
			Self::Unknown => "UNKNOWN",
		};
		f.write_str(label)
	}
}

/// How a registration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
	/// A registration click went through.
	Registered,
	/// The window closed while the lesson was fully booked.
	FullyBooked,
	/// The window closed before any slot opened.
	DeadlinePassed,
	/// An external interrupt stopped the run.
	Cancelled,
	/// Every permitted registration attempt failed.
	Exhausted,
}

impl RegistrationOutcome {
	pub fn is_success(self) -> bool {
		matches!(self, Self::Registered)
	}

	/// One-sentence verdict for the end of a run.
	pub fn summary(self) -> &'static str {
		match self {
			Self::Registered => "Registration confirmed.",
			Self::FullyBooked => "The lesson stayed fully booked until the window closed.",
			Self::DeadlinePassed => "The enrollment window closed before a slot opened.",
			Self::Cancelled => "Stopped on external interrupt.",
			Self::Exhausted => "Ran out of registration attempts.",
		}
	}
}

impl fmt::Display for RegistrationOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Registered => "registered",
			Self::FullyBooked => "fully-booked",
			Self::DeadlinePassed => "deadline-passed",
			Self::Cancelled => "cancelled",
			Self::Exhausted => "exhausted",
		};
		f.write_str(label)
	}
}

/// Final accounting for a registration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnipeReport {
	pub outcome: RegistrationOutcome,
	/// Last state observed before the run ended, if any classification ran.
	pub final_state: Option<LessonState>,
	/// Registration clicks issued.
	pub attempts_made: u32,
	/// Page reloads issued while waiting for the window.
	pub reloads: u32,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn state_labels_are_stable() {
		assert_eq!(LessonState::NotOpen.to_string(), "NOT_OPEN");
		assert_eq!(LessonState::OpenAvailable.to_string(), "OPEN_AVAILABLE");
		assert_eq!(LessonState::OpenFullyBooked.to_string(), "OPEN_FULLY_BOOKED");
		assert_eq!(LessonState::DeadlinePassed.to_string(), "DEADLINE_PASSED");
		assert_eq!(LessonState::Unknown.to_string(), "UNKNOWN");
	}

	#[test]
	fn only_registered_counts_as_success() {
		assert!(RegistrationOutcome::Registered.is_success());
		for outcome in [
			RegistrationOutcome::FullyBooked,
			RegistrationOutcome::DeadlinePassed,
			RegistrationOutcome::Cancelled,
			RegistrationOutcome::Exhausted,
		] {
			assert!(!outcome.is_success(), "{outcome} must not count as success");
		}
	}
}
