//! Typed resource facades.
//!
//! [`ApiClient`] exposes one method per backend operation. Facades only build
//! [`RequestDescriptor`]s and unwrap typed payloads; credentials, refresh, and retry live in
//! the [`Pipeline`], and every error is returned to the caller unchanged.

pub mod announcements;
pub mod auth;
pub mod meal_plans;
pub mod meals;
pub mod orders;
pub mod schools;
pub mod students;
pub mod suppliers;
pub mod users;

pub use announcements::*;
pub use auth::*;
pub use meal_plans::*;
pub use meals::*;
pub use orders::*;
pub use schools::*;
pub use students::*;
pub use suppliers::*;
pub use users::*;

// self
use crate::{
	_prelude::*,
	auth::{ResourceId, SessionState},
	classify::{DefaultClassifier, ResponseClassifier},
	config::ClientConfig,
	http::HttpTransport,
	pipeline::{Pipeline, RequestDescriptor},
	refresh::{RefreshCoordinator, RefreshMetrics},
	session::SharedObserver,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestTransport, session::NoopObserver};

/// [`ApiClient`] specialized to the reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Optional `limit`/`offset` window for list endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageRequest {
	/// Maximum number of records to return.
	pub limit: Option<u32>,
	/// Number of records to skip.
	pub offset: Option<u32>,
}
impl PageRequest {
	/// Builds a window from both values.
	pub fn new(limit: u32, offset: u32) -> Self {
		Self { limit: Some(limit), offset: Some(offset) }
	}

	/// First page of `limit` records.
	pub fn first(limit: u32) -> Self {
		Self { limit: Some(limit), offset: None }
	}

	/// Adds the set parameters to `descriptor`.
	pub fn apply(self, mut descriptor: RequestDescriptor) -> RequestDescriptor {
		if let Some(limit) = self.limit {
			descriptor = descriptor.query("limit", limit);
		}
		if let Some(offset) = self.offset {
			descriptor = descriptor.query("offset", offset);
		}

		descriptor
	}
}

/// Authenticated client for the MBG backend.
pub struct ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	pipeline: Pipeline<C>,
	observer: SharedObserver,
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client on a default reqwest transport without a session observer.
	pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
		let transport = Arc::new(ReqwestTransport::default());

		Self::with_parts(config, store, transport, Arc::new(NoopObserver))
	}

	/// Creates a client from [`ClientConfig::from_env`].
	pub fn from_env(store: Arc<dyn CredentialStore>) -> Result<Self, ConfigError> {
		Ok(Self::new(ClientConfig::from_env()?, store))
	}
}
impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client from explicit collaborators with the default classifier.
	pub fn with_parts(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		transport: Arc<C>,
		observer: SharedObserver,
	) -> Self {
		Self::with_classifier(config, store, transport, observer, Arc::new(DefaultClassifier))
	}

	/// Creates a client with a custom [`ResponseClassifier`].
	pub fn with_classifier(
		config: ClientConfig,
		store: Arc<dyn CredentialStore>,
		transport: Arc<C>,
		observer: SharedObserver,
		classifier: Arc<dyn ResponseClassifier>,
	) -> Self {
		let config = Arc::new(config);
		let coordinator = Arc::new(RefreshCoordinator::new(
			config.clone(),
			store.clone(),
			transport.clone(),
			observer.clone(),
		));
		let pipeline = Pipeline::new(config, store, transport, classifier, coordinator);

		Self { pipeline, observer }
	}

	/// Request pipeline used by every facade.
	pub fn pipeline(&self) -> &Pipeline<C> {
		&self.pipeline
	}

	/// Credential store backing the session.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		self.pipeline.store()
	}

	/// Refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		self.pipeline.coordinator().metrics()
	}

	/// Current session state derived from the store.
	pub fn session_state(&self) -> SessionState {
		self.store().state()
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("pipeline", &self.pipeline)
			.field("session", &self.session_state())
			.finish()
	}
}

fn item_path(collection: &str, id: &ResourceId) -> String {
	format!("{collection}/{id}")
}

fn scoped_path(collection: &str, scope: &str, id: &ResourceId) -> String {
	format!("{collection}/{scope}/{id}")
}
