//! Session lifecycle notifications for the application shell.
//!
//! The client never decides what the UI does when a session ends; it only reports the
//! transition through a [`SessionObserver`] so the shell can redirect to login.

// self
use crate::_prelude::*;

/// Session transitions reported to the observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
	/// Login or register stored a fresh credential pair.
	Established,
	/// A refresh replaced the stored pair.
	Refreshed {
		/// Whether the backend issued a new refresh token.
		rotated: bool,
	},
	/// The refresh endpoint rejected the session and the store was cleared.
	Expired {
		/// Backend or client supplied reason.
		reason: String,
	},
	/// The caller logged out and the store was cleared.
	LoggedOut,
}

/// Receives [`SessionEvent`]s.
///
/// Implementations are invoked synchronously after the store has been updated and must not
/// block.
pub trait SessionObserver: Send + Sync {
	/// Handles one session transition.
	fn on_event(&self, event: &SessionEvent);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;
impl SessionObserver for NoopObserver {
	fn on_event(&self, _: &SessionEvent) {}
}

impl<F> SessionObserver for F
where
	F: Fn(&SessionEvent) + Send + Sync,
{
	fn on_event(&self, event: &SessionEvent) {
		self(event)
	}
}

/// Shared observer handle.
pub type SharedObserver = Arc<dyn SessionObserver>;

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[test]
	fn closures_act_as_observers() {
		let seen = Arc::new(AtomicUsize::new(0));
		let counter = seen.clone();
		let observer: SharedObserver = Arc::new(move |event: &SessionEvent| {
			if matches!(event, SessionEvent::Expired { .. }) {
				counter.fetch_add(1, Ordering::SeqCst);
			}
		});

		observer.on_event(&SessionEvent::LoggedOut);
		observer.on_event(&SessionEvent::Expired { reason: "refresh rejected".into() });

		assert_eq!(seen.load(Ordering::SeqCst), 1);
	}
}
