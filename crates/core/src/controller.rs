//! The polling/racing loop that drives a lesson page to a terminal outcome.

use std::time::Duration;

use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::classify::classify;
use crate::config::{PollingConfig, SiteProfile};
use crate::error::Result;
use crate::inspect::PageInspector;
use crate::state::{LessonState, RegistrationOutcome, SnipeReport};

/// Below this period a reload may still be rendering when the next
/// classification runs, which reads as UNKNOWN.
const SAFE_PERIOD: Duration = Duration::from_secs(2);

/// What the loop does next, given the latest classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	/// The run is over with this outcome.
	Stop(RegistrationOutcome),
	/// Sleep one polling period, reload, classify again.
	WaitReload,
	/// Click the registration control.
	Attempt,
	/// Classify again immediately; the page was mid-render.
	Reclassify,
}

/// Pure transition function of the control loop.
///
/// `attempted` is whether any registration click was issued this run.
/// A window that closes after the controller raced and lost means the
/// lesson stayed full to the end; a window that closes untouched never
/// opened in time.
pub fn next_step(state: LessonState, attempted: bool) -> Step {
	match state {
		LessonState::DeadlinePassed if attempted => Step::Stop(RegistrationOutcome::FullyBooked),
		LessonState::DeadlinePassed => Step::Stop(RegistrationOutcome::DeadlinePassed),
		LessonState::NotOpen | LessonState::OpenFullyBooked => Step::WaitReload,
		LessonState::OpenAvailable => Step::Attempt,
		LessonState::Unknown => Step::Reclassify,
	}
}

/// Owns one registration run against one lesson page.
///
/// The page is driven exclusively by this controller for the run's
/// whole lifetime. Cancellation is cooperative: the token is awaited
/// during the polling sleep and checked between page interactions, so
/// a run ends with [`RegistrationOutcome::Cancelled`] at most one
/// polling period after the request.
pub struct RegistrationController<'a, P: PageInspector + ?Sized> {
	page: &'a P,
	profile: &'a SiteProfile,
	polling: PollingConfig,
	cancel: CancelToken,
}

impl<'a, P: PageInspector + ?Sized> RegistrationController<'a, P> {
	pub fn new(page: &'a P, profile: &'a SiteProfile, polling: PollingConfig, cancel: CancelToken) -> Result<Self> {
		polling.validate()?;
		Ok(Self { page, profile, polling, cancel })
	}

	/// Polls, waits, and races until a terminal outcome is reached.
	///
	/// Transient click failures consume the attempt budget and trigger
	/// an immediate reclassification; every other page failure aborts
	/// the run with the session left as-is for diagnosis.
	pub async fn run(&self) -> Result<SnipeReport> {
		let period = self.polling.period();
		if period < SAFE_PERIOD {
			warn!(
				target = "snipe",
				period_ms = period.as_millis() as u64,
				"polling faster than a page reload can settle; expect spurious UNKNOWN reads"
			);
		}

		let mut attempts_made = 0u32;
		let mut attempts_left = self.polling.max_attempts;
		let mut reloads = 0u32;
		let mut last_state: Option<LessonState> = None;

		let outcome = loop {
			if self.cancel.is_cancelled() {
				break RegistrationOutcome::Cancelled;
			}

			let state = classify(self.page, self.profile).await?;
			if last_state != Some(state) {
				info!(target = "snipe", state = %state, "{}", state.describe());
			} else {
				info!(target = "snipe", state = %state, reloads, "polling");
			}
			last_state = Some(state);

			match next_step(state, attempts_made > 0) {
				Step::Stop(outcome) => break outcome,
				Step::Reclassify => continue,
				Step::WaitReload => {
					tokio::select! {
						_ = tokio::time::sleep(period) => {}
						_ = self.cancel.cancelled() => break RegistrationOutcome::Cancelled,
					}
					self.page.reload().await?;
					reloads += 1;
				}
				Step::Attempt => {
					attempts_made += 1;
					match self.page.click(&self.profile.locators.register_action).await {
						Ok(()) => break RegistrationOutcome::Registered,
						Err(err) if err.is_transient() => {
							attempts_left = attempts_left.saturating_sub(1);
							warn!(
								target = "snipe",
								error = %err,
								attempts_left,
								"registration attempt lost to a page re-render"
							);
							if self.cancel.is_cancelled() {
								break RegistrationOutcome::Cancelled;
							}
							if attempts_left == 0 {
								break RegistrationOutcome::Exhausted;
							}
						}
						Err(err) => return Err(err),
					}
				}
			}
		};

		info!(target = "snipe", %outcome, attempts_made, reloads, "{}", outcome.summary());
		Ok(SnipeReport {
			outcome,
			final_state: last_state,
			attempts_made,
			reloads,
		})
	}
}
