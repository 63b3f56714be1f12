//! Cooperative cancellation shared between the controller and its caller.

use std::sync::Arc;

use tokio::sync::watch;

/// Clonable flag that flips once and stays flipped.
///
/// The caller keeps one clone and hands another to the controller;
/// every clone observes the same `cancel`.
#[derive(Debug, Clone)]
pub struct CancelToken {
	tx: Arc<watch::Sender<bool>>,
	rx: watch::Receiver<bool>,
}

impl CancelToken {
	pub fn new() -> Self {
		let (tx, rx) = watch::channel(false);
		Self { tx: Arc::new(tx), rx }
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		let _ = self.tx.send(true);
	}

	/// Non-blocking check for use inside tight loops.
	pub fn is_cancelled(&self) -> bool {
		*self.rx.borrow()
	}

	/// Resolves once cancellation is requested.
	pub async fn cancelled(&self) {
		let mut rx = self.rx.clone();
		while !*rx.borrow_and_update() {
			if rx.changed().await.is_err() {
				// Channel closed without a cancel: one can never arrive.
				std::future::pending::<()>().await;
			}
		}
	}
}

impl Default for CancelToken {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[tokio::test]
	async fn starts_uncancelled() {
		let token = CancelToken::new();
		assert!(!token.is_cancelled());
	}

	#[tokio::test]
	async fn cancel_is_visible_to_every_clone() {
		let token = CancelToken::new();
		let clone = token.clone();
		token.cancel();
		assert!(clone.is_cancelled());
		token.cancel();
		assert!(token.is_cancelled());
	}

	#[tokio::test]
	async fn cancelled_resolves_after_cancel() {
		let token = CancelToken::new();
		let waiter = token.clone();
		let handle = tokio::spawn(async move { waiter.cancelled().await });
		token.cancel();
		tokio::time::timeout(Duration::from_secs(1), handle)
			.await
			.expect("cancelled() must resolve promptly")
			.unwrap();
	}

	#[tokio::test]
	async fn cancelled_resolves_immediately_when_already_cancelled() {
		let token = CancelToken::new();
		token.cancel();
		tokio::time::timeout(Duration::from_secs(1), token.cancelled())
			.await
			.expect("an already-cancelled token must not block");
	}
}
