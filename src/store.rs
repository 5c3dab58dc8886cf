//! Credential storage contract and built-in store implementations.
//!
//! The store is the single source of truth for the current [`CredentialPair`]. Reads are
//! synchronous and served from memory; writes replace or remove the whole pair under one lock,
//! so no reader can observe an old access token next to a new refresh token.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionState},
};

/// Future returned by fallible store mutations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for the session's credential pair.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the current pair. Never fails and has no side effects.
	fn read(&self) -> Option<CredentialPair>;

	/// Replaces both tokens at once. Last writer wins.
	fn write(&self, pair: CredentialPair) -> StoreFuture<'_, ()>;

	/// Removes both tokens; subsequent reads return `None`.
	fn clear(&self) -> StoreFuture<'_, ()>;

	/// Atomically replaces (or clears, when `replacement` is `None`) the stored pair only if it
	/// still equals `expected`.
	fn compare_and_swap<'a>(
		&'a self,
		expected: &'a CredentialPair,
		replacement: Option<CredentialPair>,
	) -> StoreFuture<'a, CompareAndSwapOutcome>;

	/// Derives the session state from the stored pair.
	fn state(&self) -> SessionState {
		SessionState::of(self.read().as_ref())
	}
}
impl<T> CredentialStore for Arc<T>
where
	T: ?Sized + CredentialStore,
{
	fn read(&self) -> Option<CredentialPair> {
		(**self).read()
	}

	fn write(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		(**self).write(pair)
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		(**self).clear()
	}

	fn compare_and_swap<'a>(
		&'a self,
		expected: &'a CredentialPair,
		replacement: Option<CredentialPair>,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		(**self).compare_and_swap(expected, replacement)
	}
}

/// Result of a [`CredentialStore::compare_and_swap`] attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The stored pair matched and was replaced.
	Updated,
	/// A different pair is stored; nothing changed.
	Mismatch,
	/// No pair is stored; nothing changed.
	Missing,
}
impl CompareAndSwapOutcome {
	/// Compares the slot against `expected` without touching it.
	pub fn of(current: Option<&CredentialPair>, expected: &CredentialPair) -> Self {
		match current {
			Some(pair) if pair == expected => Self::Updated,
			Some(_) => Self::Mismatch,
			None => Self::Missing,
		}
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Persisted data could not be encoded or decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk full"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn shared_stores_forward_to_the_inner_store() {
		let store: Arc<dyn CredentialStore> =
			Arc::new(MemoryStore::with_pair(CredentialPair::new("a", "r")));

		assert_eq!(store.state(), SessionState::Authenticated);
		assert_eq!(store.read(), Some(CredentialPair::new("a", "r")));
	}
}
