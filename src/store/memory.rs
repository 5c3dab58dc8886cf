//! Thread-safe in-memory [`CredentialStore`] for tests, demos, and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::CredentialPair,
	store::{CompareAndSwapOutcome, CredentialStore, StoreFuture},
};

/// Keeps the credential pair in-process; clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<CredentialPair>>>);
impl MemoryStore {
	/// Creates a store that already holds `pair`.
	pub fn with_pair(pair: CredentialPair) -> Self {
		Self(Arc::new(RwLock::new(Some(pair))))
	}
}
impl CredentialStore for MemoryStore {
	fn read(&self) -> Option<CredentialPair> {
		self.0.read().clone()
	}

	fn write(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			*self.0.write() = Some(pair);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.0.write().take();

			Ok(())
		})
	}

	fn compare_and_swap<'a>(
		&'a self,
		expected: &'a CredentialPair,
		replacement: Option<CredentialPair>,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		Box::pin(async move {
			let mut guard = self.0.write();
			let outcome = CompareAndSwapOutcome::of(guard.as_ref(), expected);

			if outcome == CompareAndSwapOutcome::Updated {
				*guard = replacement;
			}

			Ok(outcome)
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::SessionState;

	#[test]
	fn write_replaces_and_clear_removes_the_pair() {
		let store = MemoryStore::default();
		let shared = store.clone();
		let rt = Runtime::new().expect("Failed to build Tokio runtime for memory store test.");

		assert_eq!(store.state(), SessionState::Anonymous);

		rt.block_on(store.write(CredentialPair::new("access-1", "refresh-1")))
			.expect("Memory store write should succeed.");
		rt.block_on(store.write(CredentialPair::new("access-2", "refresh-2")))
			.expect("Memory store write should succeed.");

		assert_eq!(shared.read(), Some(CredentialPair::new("access-2", "refresh-2")));

		rt.block_on(shared.clear()).expect("Memory store clear should succeed.");

		assert_eq!(store.read(), None);
		assert_eq!(store.state(), SessionState::Anonymous);
	}

	#[test]
	fn compare_and_swap_only_replaces_the_expected_pair() {
		let store = MemoryStore::with_pair(CredentialPair::new("access-1", "refresh-1"));
		let rt = Runtime::new().expect("Failed to build Tokio runtime for memory store test.");
		let stale = CredentialPair::new("access-0", "refresh-0");
		let outcome = rt
			.block_on(store.compare_and_swap(&stale, Some(CredentialPair::new("x", "y"))))
			.expect("Compare-and-swap should not fail in memory.");

		assert_eq!(outcome, CompareAndSwapOutcome::Mismatch);
		assert_eq!(store.read(), Some(CredentialPair::new("access-1", "refresh-1")));

		let current = CredentialPair::new("access-1", "refresh-1");
		let outcome = rt
			.block_on(store.compare_and_swap(&current, None))
			.expect("Compare-and-swap should not fail in memory.");

		assert_eq!(outcome, CompareAndSwapOutcome::Updated);
		assert_eq!(store.read(), None);

		let outcome = rt
			.block_on(store.compare_and_swap(&current, Some(current.clone())))
			.expect("Compare-and-swap should not fail in memory.");

		assert_eq!(outcome, CompareAndSwapOutcome::Missing);
		assert_eq!(store.read(), None);
	}
}
