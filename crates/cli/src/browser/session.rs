//! Chromium-backed lesson page session.
//!
//! Wraps a chromiumoxide browser plus the single page a run lives on, and adapts
//! that page to the [`PageInspector`] queries the polling controller issues.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use snipe::{PageInspector, SnipeError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Pause between DOM lookups while waiting for an element to appear.
const POLL_STEP: Duration = Duration::from_millis(250);

/// Error fragments that mean the element (or its execution context) no longer
/// exists, as opposed to the CDP connection itself being broken.
const GONE_MARKERS: [&str; 5] = [
	"not found",
	"could not find node",
	"node with given id",
	"execution context was destroyed",
	"cannot find context",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
	/// Show the browser window instead of running headless.
	pub headful: bool,
	/// Disable the Chromium sandbox. Needed inside most containers.
	pub no_sandbox: bool,
}

/// A live browser session pointed at one lesson page.
pub struct LessonSession {
	browser: Browser,
	page: Page,
	handler: JoinHandle<()>,
}

impl LessonSession {
	/// Launch a browser and navigate its page to `url`.
	pub async fn launch(url: &str, options: SessionOptions) -> snipe::Result<Self> {
		let mut builder = BrowserConfig::builder();
		if options.headful {
			builder = builder.with_head();
		}
		if options.no_sandbox {
			builder = builder.no_sandbox();
		}
		let config = builder.build().map_err(SnipeError::automation)?;

		let (browser, mut handler) = Browser::launch(config)
			.await
			.map_err(|err| SnipeError::automation(format!("failed to launch chromium: {err}")))?;

		// The handler stream has to be pumped for the CDP connection to make progress.
		let handler = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if event.is_err() {
					break;
				}
			}
		});

		let page = browser
			.new_page(url)
			.await
			.map_err(|err| SnipeError::automation(format!("failed to open {url}: {err}")))?;
		page.wait_for_navigation()
			.await
			.map_err(|err| SnipeError::automation(format!("initial load of {url} failed: {err}")))?;
		info!(target = "snipe", %url, headful = options.headful, "chromium session ready");

		Ok(Self { browser, page, handler })
	}

	/// Block until `selector` matches at least one element, or `timeout` runs out.
	pub async fn wait_for(&self, selector: &str, timeout: Duration) -> snipe::Result<()> {
		let started = tokio::time::Instant::now();
		let deadline = started + timeout;
		loop {
			match self.page.find_elements(selector).await {
				Ok(elements) if !elements.is_empty() => {
					debug!(target = "snipe", selector, elapsed_ms = started.elapsed().as_millis() as u64, "element appeared");
					return Ok(());
				}
				Ok(_) => {}
				Err(err) if element_gone(&err.to_string()) => {}
				Err(err) => return Err(SnipeError::automation(format!("lookup of {selector} failed: {err}"))),
			}
			if tokio::time::Instant::now() >= deadline {
				return Err(SnipeError::automation(format!("{selector} did not appear within {timeout:?}")));
			}
			tokio::time::sleep(POLL_STEP).await;
		}
	}

	/// Focus `selector` and type `text` into it.
	pub async fn type_into(&self, selector: &str, text: &str) -> snipe::Result<()> {
		let element = self.find(selector).await?;
		element
			.click()
			.await
			.map_err(|err| SnipeError::automation(format!("focus of {selector} failed: {err}")))?;
		element
			.type_str(text)
			.await
			.map_err(|err| SnipeError::automation(format!("typing into {selector} failed: {err}")))?;
		Ok(())
	}

	/// Click `selector` and wait for the navigation it triggers to settle.
	pub async fn click_and_wait(&self, selector: &str) -> snipe::Result<()> {
		self.click(selector).await?;
		self.page
			.wait_for_navigation()
			.await
			.map_err(|err| SnipeError::automation(format!("navigation after {selector} failed: {err}")))?;
		Ok(())
	}

	/// Shut the browser down and wait for the child process to exit.
	pub async fn close(mut self) -> snipe::Result<()> {
		self.browser
			.close()
			.await
			.map_err(|err| SnipeError::automation(format!("browser shutdown failed: {err}")))?;
		let _ = self.browser.wait().await;
		self.handler.abort();
		Ok(())
	}

	async fn find(&self, selector: &str) -> snipe::Result<Element> {
		self.page
			.find_element(selector)
			.await
			.map_err(|err| SnipeError::automation(format!("lookup of {selector} failed: {err}")))
	}
}

#[async_trait]
impl PageInspector for LessonSession {
	async fn exists(&self, selector: &str) -> snipe::Result<bool> {
		match self.page.find_elements(selector).await {
			Ok(elements) => Ok(!elements.is_empty()),
			Err(err) if element_gone(&err.to_string()) => Ok(false),
			Err(err) => Err(SnipeError::automation(format!("lookup of {selector} failed: {err}"))),
		}
	}

	async fn text(&self, selector: &str) -> snipe::Result<Option<String>> {
		let element = match self.page.find_elements(selector).await {
			Ok(mut elements) if !elements.is_empty() => elements.remove(0),
			Ok(_) => return Ok(None),
			Err(err) if element_gone(&err.to_string()) => return Ok(None),
			Err(err) => return Err(SnipeError::automation(format!("lookup of {selector} failed: {err}"))),
		};
		match element.inner_text().await {
			Ok(text) => Ok(text),
			// A re-render between lookup and read reads as an empty page, not a failure.
			Err(err) if element_gone(&err.to_string()) => Ok(None),
			Err(err) => Err(SnipeError::automation(format!("reading text of {selector} failed: {err}"))),
		}
	}

	async fn click(&self, selector: &str) -> snipe::Result<()> {
		let element = match self.page.find_element(selector).await {
			Ok(element) => element,
			Err(err) if element_gone(&err.to_string()) => {
				return Err(SnipeError::transient(format!("{selector} vanished before the click")));
			}
			Err(err) => return Err(SnipeError::automation(format!("lookup of {selector} failed: {err}"))),
		};
		if let Err(err) = element.click().await {
			if element_gone(&err.to_string()) {
				return Err(SnipeError::transient(format!("{selector} went stale under the click")));
			}
			return Err(SnipeError::automation(format!("click on {selector} failed: {err}")));
		}
		Ok(())
	}

	async fn reload(&self) -> snipe::Result<()> {
		self.page
			.reload()
			.await
			.map_err(|err| SnipeError::automation(format!("page reload failed: {err}")))?;
		Ok(())
	}
}

fn element_gone(message: &str) -> bool {
	let message = message.to_lowercase();
	GONE_MARKERS.iter().any(|marker| message.contains(marker))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recognizes_vanished_element_errors() {
		assert!(element_gone("Could not find node with given id"));
		assert!(element_gone("Node with given id does not belong to the document"));
		assert!(element_gone("Execution context was destroyed, most likely because of a navigation"));
		assert!(element_gone("Cannot find context with specified id"));
		assert!(element_gone("Element not found for selector #btnRegister"));
	}

	#[test]
	fn connection_errors_stay_fatal() {
		assert!(!element_gone("websocket connection closed"));
		assert!(!element_gone("serde_json error"));
		assert!(!element_gone(""));
	}
}
