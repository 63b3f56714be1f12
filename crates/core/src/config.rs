//! Polling knobs and the per-site page profile.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnipeError};

/// How often to re-check a closed window and how hard to race an open one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingConfig {
	/// Reload checks per second while the window is closed.
	pub frequency_hz: f64,
	/// Registration clicks permitted once the window opens.
	pub max_attempts: u32,
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			frequency_hz: 0.5,
			max_attempts: 50,
		}
	}
}

impl PollingConfig {
	/// Sleep between reload checks. Meaningful only for a config that
	/// passes [`validate`](Self::validate).
	pub fn period(&self) -> Duration {
		Duration::from_secs_f64(1.0 / self.frequency_hz)
	}

	pub fn validate(&self) -> Result<()> {
		if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
			return Err(SnipeError::automation(format!(
				"polling frequency must be a positive number of hertz, got {}",
				self.frequency_hz
			)));
		}
		if Duration::try_from_secs_f64(1.0 / self.frequency_hz).is_err() {
			return Err(SnipeError::automation(format!(
				"polling frequency {} Hz gives a period too long to time",
				self.frequency_hz
			)));
		}
		if self.max_attempts == 0 {
			return Err(SnipeError::automation("at least one registration attempt is required"));
		}
		Ok(())
	}
}

/// Everything site-specific: where lessons live, what the enrollment
/// banner says, and which elements the flows touch.
///
/// Defaults target the ASVZ lesson portal. A JSON file with any subset
/// of fields overrides them, so pointing the tool at a staging copy or
/// a redesigned page is a config change, not a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
	/// Base URL joined with the lesson id to form the lesson page URL.
	pub lesson_base_url: String,
	pub markers: BannerMarkers,
	pub locators: PageLocators,
}

/// Exact banner sentences that identify a closed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerMarkers {
	pub deadline_passed: String,
	pub fully_booked: String,
}

/// CSS selectors for every element the tool reads or drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLocators {
	/// Alert banner inside the enrollment widget, present only once the window closed.
	pub enrollment_banner: String,
	/// Marker present while the registration control is inert.
	pub disabled_control: String,
	/// The registration button itself.
	pub register_action: String,
	/// Button on the lesson page that starts the login hand-off.
	pub login_entry: String,
	/// Widget whose presence confirms the lesson page is back after login.
	pub enrollment_widget: String,
	pub direct_user_field: String,
	pub direct_password_field: String,
	pub direct_submit: String,
	/// Provider button on the identity-provider chooser.
	pub aai_provider: String,
	/// Dropdown that opens the institution list.
	pub aai_picker: String,
	/// Institution entry inside the opened list.
	pub aai_institution: String,
	pub aai_user_field: String,
	pub aai_password_field: String,
	pub aai_submit: String,
}

impl Default for SiteProfile {
	fn default() -> Self {
		Self {
			lesson_base_url: "https://schalter.asvz.ch/tn/lessons".into(),
			markers: BannerMarkers::default(),
			locators: PageLocators::default(),
		}
	}
}

impl Default for BannerMarkers {
	fn default() -> Self {
		Self {
			deadline_passed: "Die Anmeldefrist ist vorbei.".into(),
			fully_booked: "Die Lektion ist ausgebucht, du kannst dich daher nicht mehr dafür einschreiben.".into(),
		}
	}
}

impl Default for PageLocators {
	fn default() -> Self {
		Self {
			enrollment_banner: "app-lessons-enrollment-button > alert > div".into(),
			disabled_control: ".disabled".into(),
			register_action: "#btnRegister".into(),
			login_entry: "app-lessons-enrollment-button > button".into(),
			enrollment_widget: "app-lessons-enrollment-button".into(),
			direct_user_field: "#AsvzId".into(),
			direct_password_field: "#Password".into(),
			direct_submit: "button[type=\"submit\"]".into(),
			aai_provider: "[name=\"provider\"]".into(),
			aai_picker: "#userIdPSelection_iddicon".into(),
			aai_institution: "div[title=\"Universities: ETH Zurich\"]".into(),
			aai_user_field: "#username".into(),
			aai_password_field: "#password".into(),
			aai_submit: "button[type=\"submit\"]".into(),
		}
	}
}

impl SiteProfile {
	/// Loads a profile from a JSON file, filling missing fields with defaults.
	pub fn from_file(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|e| SnipeError::automation(format!("cannot read site profile {}: {e}", path.display())))?;
		serde_json::from_str(&raw).map_err(|e| SnipeError::automation(format!("malformed site profile {}: {e}", path.display())))
	}

	/// URL of the page for one lesson.
	pub fn lesson_url(&self, lesson_id: &str) -> String {
		format!("{}/{}", self.lesson_base_url.trim_end_matches('/'), lesson_id)
	}
}
