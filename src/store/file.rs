//! File-backed [`CredentialStore`] that survives process restarts.
//!
//! The pair is persisted as a JSON object with two fixed keys, `mbg_access_token` and
//! `mbg_refresh_token`, mirroring the keys the web dashboard keeps in local storage.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	obs,
	store::{CompareAndSwapOutcome, CredentialStore, StoreError, StoreFuture},
};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "mbg_access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "mbg_refresh_token";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedTokens {
	#[serde(rename = "mbg_access_token", default, skip_serializing_if = "Option::is_none")]
	access: Option<TokenSecret>,
	#[serde(rename = "mbg_refresh_token", default, skip_serializing_if = "Option::is_none")]
	refresh: Option<TokenSecret>,
}
impl From<Option<&CredentialPair>> for PersistedTokens {
	fn from(pair: Option<&CredentialPair>) -> Self {
		match pair {
			Some(pair) => Self {
				access: Some(pair.access_token.clone()),
				refresh: Some(pair.refresh_token.clone()),
			},
			None => Self::default(),
		}
	}
}

/// Persists the credential pair to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Option<CredentialPair>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	///
	/// A file holding only one of the two tokens is treated as an empty session.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Option<CredentialPair>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(None);
		}

		let persisted: PersistedTokens =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;
		let partial = persisted.access.is_some() != persisted.refresh.is_some();
		let pair = CredentialPair::from_parts(persisted.access, persisted.refresh);

		if partial {
			obs::warn_event!(
				path = %path.display(),
				"Credential file holds a single token; starting without a session."
			);
		}

		Ok(pair)
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, pair: Option<&CredentialPair>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = serde_json::to_vec_pretty(&PersistedTokens::from(pair)).map_err(|e| {
			StoreError::Serialization { message: format!("Failed to serialize credentials: {e}") }
		})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn read(&self) -> Option<CredentialPair> {
		self.inner.read().clone()
	}

	fn write(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			self.persist(Some(&pair))?;
			*guard = Some(pair);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			// Memory is cleared even if the file cannot be rewritten.
			guard.take();

			self.persist(None)
		})
	}

	fn compare_and_swap<'a>(
		&'a self,
		expected: &'a CredentialPair,
		replacement: Option<CredentialPair>,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let outcome = CompareAndSwapOutcome::of(guard.as_ref(), expected);

			if outcome == CompareAndSwapOutcome::Updated {
				let persisted = self.persist(replacement.as_ref());

				// A clear applies in memory even if the file cannot be rewritten.
				if persisted.is_ok() || replacement.is_none() {
					*guard = replacement;
				}

				persisted?;
			}

			Ok(outcome)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::auth::SessionState;

	fn temp_path(tag: &str) -> PathBuf {
		let unique = format!(
			"mbg_api_client_file_store_{tag}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn write_and_reopen_round_trip() {
		let path = temp_path("reopen");
		let store = FileStore::open(&path).expect("Failed to open file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.write(CredentialPair::new("access-1", "refresh-1")))
			.expect("Failed to write credentials to file store.");
		drop(store);

		let raw = fs::read_to_string(&path).expect("Credential file should exist after a write.");

		assert!(raw.contains(ACCESS_TOKEN_KEY));
		assert!(raw.contains(REFRESH_TOKEN_KEY));

		let reopened = FileStore::open(&path).expect("Failed to reopen file store.");

		assert_eq!(reopened.read(), Some(CredentialPair::new("access-1", "refresh-1")));

		rt.block_on(reopened.clear()).expect("Failed to clear file store.");

		assert_eq!(FileStore::open(&path).expect("Failed to reopen file store.").read(), None);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary credential file {}: {e}", path.display())
		});
	}

	#[test]
	fn compare_and_swap_persists_only_matching_replacements() {
		let path = temp_path("swap");
		let store = FileStore::open(&path).expect("Failed to open file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let first = CredentialPair::new("access-1", "refresh-1");

		rt.block_on(store.write(first.clone()))
			.expect("Failed to write credentials to file store.");

		let outcome = rt
			.block_on(store.compare_and_swap(
				&CredentialPair::new("access-0", "refresh-0"),
				Some(CredentialPair::new("access-x", "refresh-x")),
			))
			.expect("Mismatched swap should not fail.");

		assert_eq!(outcome, CompareAndSwapOutcome::Mismatch);

		let outcome = rt
			.block_on(store.compare_and_swap(&first, Some(CredentialPair::new("access-2", "r-2"))))
			.expect("Matching swap should persist.");

		assert_eq!(outcome, CompareAndSwapOutcome::Updated);
		assert_eq!(
			FileStore::open(&path).expect("Failed to reopen file store.").read(),
			Some(CredentialPair::new("access-2", "r-2"))
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary credential file {}: {e}", path.display())
		});
	}

	#[test]
	fn single_token_file_loads_as_anonymous() {
		let path = temp_path("partial");

		fs::write(&path, br#"{"mbg_access_token":"orphan"}"#)
			.expect("Failed to seed partial credential file.");

		let store = FileStore::open(&path).expect("Partial file should still open.");

		assert_eq!(store.state(), SessionState::Anonymous);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary credential file {}: {e}", path.display())
		});
	}

	#[test]
	fn empty_or_missing_files_are_empty_stores() {
		let missing = temp_path("missing");

		assert_eq!(FileStore::open(&missing).expect("Missing file should open.").read(), None);

		let empty = temp_path("empty");

		fs::write(&empty, b"\n").expect("Failed to seed empty credential file.");

		assert_eq!(FileStore::open(&empty).expect("Empty file should open.").read(), None);

		fs::remove_file(&empty).unwrap_or_else(|e| {
			panic!("Failed to remove temporary credential file {}: {e}", empty.display())
		});
	}

	#[test]
	fn corrupt_files_report_serialization_errors() {
		let path = temp_path("corrupt");

		fs::write(&path, b"{not json").expect("Failed to seed corrupt credential file.");

		assert!(matches!(FileStore::open(&path), Err(StoreError::Serialization { .. })));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary credential file {}: {e}", path.display())
		});
	}
}
