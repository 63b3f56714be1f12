//! Maps one look at the lesson page to a [`LessonState`].

use tracing::debug;

use crate::config::SiteProfile;
use crate::error::Result;
use crate::inspect::PageInspector;
use crate::state::LessonState;

/// Classifies the page as it stands right now.
///
/// The banner outranks everything: once the window has closed the site
/// shows an alert whose exact sentence says why, and the registration
/// control below it no longer means anything. Only a banner-free page
/// falls through to the open/not-open check on the disabled marker.
pub async fn classify<P: PageInspector + ?Sized>(page: &P, profile: &SiteProfile) -> Result<LessonState> {
	if let Some(banner) = page.text(&profile.locators.enrollment_banner).await? {
		let banner = banner.trim();
		if banner == profile.markers.deadline_passed {
			return Ok(LessonState::DeadlinePassed);
		}
		if banner == profile.markers.fully_booked {
			return Ok(LessonState::OpenFullyBooked);
		}
		debug!(target = "snipe", banner, "banner text matches no known marker");
		return Ok(LessonState::Unknown);
	}

	if page.exists(&profile.locators.disabled_control).await? {
		Ok(LessonState::NotOpen)
	} else {
		Ok(LessonState::OpenAvailable)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fake_page::{FakePageBuilder, PageSnapshot};

	fn profile() -> SiteProfile {
		SiteProfile::default()
	}

	#[tokio::test]
	async fn banner_with_deadline_marker_wins() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile)
			.snapshot(PageSnapshot::deadline_passed(&profile.markers.deadline_passed))
			.build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::DeadlinePassed);
	}

	#[tokio::test]
	async fn banner_with_fully_booked_marker() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile)
			.snapshot(PageSnapshot::fully_booked(&profile.markers.fully_booked))
			.build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::OpenFullyBooked);
	}

	#[tokio::test]
	async fn padded_banner_text_still_matches() {
		let profile = profile();
		let padded = format!("\n  {}  \n", profile.markers.deadline_passed);
		let page = FakePageBuilder::new(&profile).snapshot(PageSnapshot::garbled(&padded)).build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::DeadlinePassed);
	}

	#[tokio::test]
	async fn unrecognized_banner_is_unknown() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile)
			.snapshot(PageSnapshot::garbled("Wartung: der Schalter ist offline."))
			.build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::Unknown);
	}

	#[tokio::test]
	async fn no_banner_and_disabled_control_is_not_open() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile).snapshot(PageSnapshot::not_open()).build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::NotOpen);
	}

	#[tokio::test]
	async fn no_banner_and_live_control_is_open() {
		let profile = profile();
		let page = FakePageBuilder::new(&profile).snapshot(PageSnapshot::open_available()).build();
		assert_eq!(classify(&page, &profile).await.unwrap(), LessonState::OpenAvailable);
	}
}
