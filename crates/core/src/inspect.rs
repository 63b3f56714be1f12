//! The seam between the state machine and a real (or fake) page.

use async_trait::async_trait;

use crate::error::Result;

/// Read and drive one lesson page.
///
/// Absence is an answer here, not an error: `exists` returns `false`
/// and `text` returns `None` when the selector matches nothing, so the
/// classifier can treat a missing banner as meaningful. Errors are
/// reserved for a page that cannot be inspected at all, plus the
/// transient/fatal split on `click`.
#[async_trait]
pub trait PageInspector: Send + Sync {
	/// Whether at least one element matches the selector right now.
	async fn exists(&self, selector: &str) -> Result<bool>;

	/// Text content of the first match, `None` when nothing matches.
	async fn text(&self, selector: &str) -> Result<Option<String>>;

	/// Clicks the first match. Fails transient when the element is gone
	/// or goes stale mid-click, fatal when the page itself is unusable.
	async fn click(&self, selector: &str) -> Result<()>;

	/// Reloads the page in place.
	async fn reload(&self) -> Result<()>;
}
