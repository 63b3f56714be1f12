//! Scripted in-memory lesson page for exercising the control loop
//! without a browser.
//!
//! A test scripts the page shapes the controller will see, in order,
//! plus how each registration click resolves:
//!
//! ```ignore
//! let page = FakePageBuilder::new(&profile)
//!     .snapshot(PageSnapshot::not_open())
//!     .snapshot(PageSnapshot::open_available())
//!     .click(ClickScript::Succeed)
//!     .build();
//! ```
//!
//! The page advances to the next snapshot at the start of each
//! classification pass and holds the last one forever, so a short
//! script describes an arbitrarily long run.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::SiteProfile;
use crate::error::{Result, SnipeError};
use crate::inspect::PageInspector;

/// One rendered shape of the lesson page.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
	banner: Option<String>,
	control_disabled: bool,
}

impl PageSnapshot {
	/// No banner, registration control inert.
	pub fn not_open() -> Self {
		Self {
			banner: None,
			control_disabled: true,
		}
	}

	/// No banner, registration control live.
	pub fn open_available() -> Self {
		Self {
			banner: None,
			control_disabled: false,
		}
	}

	/// Banner carrying the fully-booked sentence.
	pub fn fully_booked(marker: &str) -> Self {
		Self::with_banner(marker)
	}

	/// Banner carrying the deadline sentence.
	pub fn deadline_passed(marker: &str) -> Self {
		Self::with_banner(marker)
	}

	/// Banner with arbitrary text.
	pub fn garbled(text: &str) -> Self {
		Self::with_banner(text)
	}

	fn with_banner(text: &str) -> Self {
		Self {
			banner: Some(text.to_string()),
			control_disabled: false,
		}
	}
}

/// Scripted resolution for one registration click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickScript {
	Succeed,
	/// The control goes stale under the click.
	Stale,
	/// The page breaks outright.
	Break,
}

/// Builder scripting what the fake page shows and how clicks resolve.
pub struct FakePageBuilder {
	banner_selector: String,
	disabled_selector: String,
	register_selector: String,
	snapshots: VecDeque<PageSnapshot>,
	clicks: VecDeque<ClickScript>,
}

impl FakePageBuilder {
	/// Captures the selectors the page will answer for; every other
	/// selector is treated as a scripting mistake and fails loudly.
	pub fn new(profile: &SiteProfile) -> Self {
		Self {
			banner_selector: profile.locators.enrollment_banner.clone(),
			disabled_selector: profile.locators.disabled_control.clone(),
			register_selector: profile.locators.register_action.clone(),
			snapshots: VecDeque::new(),
			clicks: VecDeque::new(),
		}
	}

	/// Appends one page shape to the script.
	pub fn snapshot(mut self, snapshot: PageSnapshot) -> Self {
		self.snapshots.push_back(snapshot);
		self
	}

	/// Appends a whole sequence of page shapes.
	pub fn snapshots(mut self, snapshots: impl IntoIterator<Item = PageSnapshot>) -> Self {
		self.snapshots.extend(snapshots);
		self
	}

	/// Appends one click resolution. The last one repeats; an empty
	/// click script means every click succeeds.
	pub fn click(mut self, script: ClickScript) -> Self {
		self.clicks.push_back(script);
		self
	}

	pub fn build(self) -> FakeLessonPage {
		FakeLessonPage {
			banner_selector: self.banner_selector,
			disabled_selector: self.disabled_selector,
			register_selector: self.register_selector,
			script: Arc::new(Mutex::new(PageScript {
				snapshots: self.snapshots,
				observed_once: false,
				clicks: self.clicks,
				clicks_made: 0,
				reloads_made: 0,
			})),
		}
	}
}

#[derive(Debug)]
struct PageScript {
	snapshots: VecDeque<PageSnapshot>,
	observed_once: bool,
	clicks: VecDeque<ClickScript>,
	clicks_made: u32,
	reloads_made: u32,
}

impl PageScript {
	/// Steps to the next snapshot, holding the last one forever.
	fn advance(&mut self) {
		if self.observed_once && self.snapshots.len() > 1 {
			self.snapshots.pop_front();
		}
		self.observed_once = true;
	}

	fn current(&self) -> Result<&PageSnapshot> {
		self.snapshots.front().ok_or_else(|| SnipeError::automation("fake page has no snapshot scripted"))
	}
}

/// The scripted page. Clones share one script, so a test can keep a
/// handle for assertions while the controller drives another.
#[derive(Debug, Clone)]
pub struct FakeLessonPage {
	banner_selector: String,
	disabled_selector: String,
	register_selector: String,
	script: Arc<Mutex<PageScript>>,
}

impl FakeLessonPage {
	pub fn clicks_made(&self) -> u32 {
		self.script.lock().clicks_made
	}

	pub fn reloads_made(&self) -> u32 {
		self.script.lock().reloads_made
	}
}

#[async_trait]
impl PageInspector for FakeLessonPage {
	async fn exists(&self, selector: &str) -> Result<bool> {
		let script = self.script.lock();
		let snapshot = script.current()?;
		if selector == self.disabled_selector {
			Ok(snapshot.control_disabled)
		} else if selector == self.banner_selector {
			Ok(snapshot.banner.is_some())
		} else {
			Err(SnipeError::automation(format!("fake page asked about unscripted selector {selector}")))
		}
	}

	// The banner read opens every classification pass, so it is the
	// point where the script advances.
	async fn text(&self, selector: &str) -> Result<Option<String>> {
		if selector != self.banner_selector {
			return Err(SnipeError::automation(format!("fake page asked for text of unscripted selector {selector}")));
		}
		let mut script = self.script.lock();
		script.advance();
		Ok(script.current()?.banner.clone())
	}

	async fn click(&self, selector: &str) -> Result<()> {
		if selector != self.register_selector {
			return Err(SnipeError::automation(format!("fake page asked to click unscripted selector {selector}")));
		}
		let mut script = self.script.lock();
		script.clicks_made += 1;
		let resolution = if script.clicks.len() > 1 {
			script.clicks.pop_front().unwrap_or(ClickScript::Succeed)
		} else {
			script.clicks.front().copied().unwrap_or(ClickScript::Succeed)
		};
		match resolution {
			ClickScript::Succeed => Ok(()),
			ClickScript::Stale => Err(SnipeError::transient("registration control went stale under the click")),
			ClickScript::Break => Err(SnipeError::automation("page broke under the click")),
		}
	}

	async fn reload(&self) -> Result<()> {
		self.script.lock().reloads_made += 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile() -> SiteProfile {
		SiteProfile::default()
	}

	#[tokio::test]
	async fn snapshots_advance_per_classification_pass() {
		let profile = profile();
		let banner = &profile.locators.enrollment_banner;
		let disabled = &profile.locators.disabled_control;
		let page = FakePageBuilder::new(&profile)
			.snapshot(PageSnapshot::not_open())
			.snapshot(PageSnapshot::open_available())
			.build();

		// First pass sees the first snapshot from both queries.
		assert_eq!(page.text(banner).await.unwrap(), None);
		assert!(page.exists(disabled).await.unwrap());

		// Second pass advances; the last snapshot then repeats.
		assert_eq!(page.text(banner).await.unwrap(), None);
		assert!(!page.exists(disabled).await.unwrap());
		assert_eq!(page.text(banner).await.unwrap(), None);
		assert!(!page.exists(disabled).await.unwrap());
	}

	#[tokio::test]
	async fn last_click_script_repeats() {
		let profile = profile();
		let register = &profile.locators.register_action;
		let page = FakePageBuilder::new(&profile)
			.snapshot(PageSnapshot::open_available())
			.click(ClickScript::Stale)
			.build();

		for _ in 0..3 {
			let err = page.click(register).await.unwrap_err();
			assert!(err.is_transient());
		}
		assert_eq!(page.clicks_made(), 3);
	}

	#[tokio::test]
	async fn unscripted_clicks_succeed() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile).snapshot(PageSnapshot::open_available()).build();
		page.click(&profile.locators.register_action).await.unwrap();
	}

	#[tokio::test]
	async fn unscripted_selector_fails_loudly() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile).snapshot(PageSnapshot::not_open()).build();
		assert!(page.exists("#nope").await.is_err());
		assert!(page.text("#nope").await.is_err());
		assert!(page.click("#nope").await.is_err());
	}

	#[tokio::test]
	async fn empty_script_is_a_loud_failure() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile).build();
		assert!(page.text(&profile.locators.enrollment_banner).await.is_err());
	}
}
