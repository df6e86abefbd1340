use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-shot cancellation signal shared between a controller and a scan
/// worker.
///
/// Cloning yields another handle to the same signal. Signalling is idempotent
/// and one-way; a fired token never resets. The worker only ever reads the
/// token, so any number of controllers may hold clones.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
	cancelled: Arc<AtomicBool>,
}

impl CancelToken {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Request cancellation. Safe to call repeatedly, from any thread.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	/// Whether cancellation has been requested.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}
}
