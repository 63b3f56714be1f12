//! Enrollment-slot sniping for capacity-limited, time-gated lessons.
//!
//! The crate watches one lesson page, classifies what it shows into a
//! [`LessonState`], waits out a closed window at a bounded polling
//! frequency, and races for the slot with a bounded attempt budget the
//! moment it opens. Everything browser-shaped sits behind the
//! [`PageInspector`] trait, so the whole control loop runs against the
//! scripted [`fake_page`] in tests.

pub mod cancel;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod fake_page;
pub mod inspect;
pub mod state;

pub use cancel::CancelToken;
pub use classify::classify;
pub use config::{BannerMarkers, PageLocators, PollingConfig, SiteProfile};
pub use controller::{RegistrationController, Step, next_step};
pub use error::{Result, SnipeError};
pub use inspect::PageInspector;
pub use state::{LessonState, RegistrationOutcome, SnipeReport};
