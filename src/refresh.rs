//! Single-flight session refresh.
//!
//! [`RefreshCoordinator::valid_credentials`] is the only way the client obtains a new access
//! token. At most one refresh call is outstanding at any instant: the first caller that finds
//! no ticket creates one, every later caller awaits the same ticket, and the ticket is removed
//! only after the store has been updated. Callers whose stale token was already replaced reuse
//! the stored pair without any network call.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use async_lock::OnceCell;
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	config::ClientConfig,
	envelope::{self, ErrorDetails},
	http::{HttpRequest, HttpTransport, Method},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::{SessionEvent, SharedObserver},
	store::{CompareAndSwapOutcome, CredentialStore, StoreError},
};

/// Path of the backend refresh endpoint.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

const SESSION_ENDED: &str = "session ended during refresh";

/// Payload returned by the refresh endpoint inside the `data` envelope field.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshGrant {
	/// Newly issued access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, when the backend issues one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Token type, normally `Bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
}

/// Shareable refresh failure handed to every waiter of a ticket.
#[derive(Clone, Debug)]
enum RefreshFailure {
	/// The refresh did not produce a new pair; the session is gone.
	Rejected(String),
	/// The new pair could not be persisted.
	Storage(StoreError),
}
impl From<RefreshFailure> for Error {
	fn from(failure: RefreshFailure) -> Self {
		match failure {
			RefreshFailure::Rejected(reason) => Error::Unauthenticated { reason },
			RefreshFailure::Storage(e) => Error::Storage(e),
		}
	}
}

/// Handle of the one in-flight refresh.
#[derive(Debug)]
struct RefreshTicket {
	id: u64,
	current: CredentialPair,
	settled: OnceCell<Result<CredentialPair, RefreshFailure>>,
}

/// Owns the refresh ticket slot and performs refresh calls.
pub struct RefreshCoordinator<C>
where
	C: ?Sized + HttpTransport,
{
	config: Arc<ClientConfig>,
	store: Arc<dyn CredentialStore>,
	transport: Arc<C>,
	observer: SharedObserver,
	metrics: Arc<RefreshMetrics>,
	slot: Mutex<Option<Arc<RefreshTicket>>>,
	next_ticket: AtomicU64,
}
impl<C> RefreshCoordinator<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a coordinator sharing the client's store, transport, and observer.
	pub fn new(
		config: Arc<ClientConfig>,
		store: Arc<dyn CredentialStore>,
		transport: Arc<C>,
		observer: SharedObserver,
	) -> Self {
		Self {
			config,
			store,
			transport,
			observer,
			metrics: Default::default(),
			slot: Mutex::new(None),
			next_ticket: AtomicU64::new(1),
		}
	}

	/// Refresh counters.
	pub fn metrics(&self) -> &Arc<RefreshMetrics> {
		&self.metrics
	}

	/// Returns `true` while a refresh ticket is outstanding.
	pub fn is_refreshing(&self) -> bool {
		self.slot.lock().is_some()
	}

	/// Returns a credential pair whose access token differs from `stale_access`.
	///
	/// Joins the in-flight refresh when one exists. Otherwise, when the stored access token
	/// already differs from `stale_access`, returns the stored pair without a network call.
	/// Passing `None` forces a refresh of the stored pair.
	pub async fn valid_credentials(
		&self,
		stale_access: Option<&TokenSecret>,
	) -> Result<CredentialPair> {
		let url = self.config.endpoint(REFRESH_PATH)?;
		let ticket = {
			let mut slot = self.slot.lock();
			let stored = self.store.read();

			// A ticket for a pair that is no longer stored was abandoned or overtaken by a
			// logout or login.
			if slot.as_ref().is_some_and(|ticket| stored.as_ref() != Some(&ticket.current)) {
				*slot = None;
			}

			match slot.as_ref() {
				Some(ticket) => {
					self.metrics.record_joined();

					ticket.clone()
				},
				None => {
					let current = stored
						.ok_or_else(|| Error::unauthenticated("no stored session to refresh"))?;

					if stale_access.is_some_and(|stale| stale != &current.access_token) {
						self.metrics.record_joined();

						return Ok(current);
					}

					let ticket = Arc::new(RefreshTicket {
						id: self.next_ticket.fetch_add(1, Ordering::Relaxed),
						current,
						settled: OnceCell::new(),
					});

					*slot = Some(ticket.clone());

					ticket
				},
			}
		};
		let settled = ticket.settled.get_or_init(|| self.run(&ticket, url)).await;

		settled.clone().map_err(Error::from)
	}

	async fn run(
		&self,
		ticket: &RefreshTicket,
		url: Url,
	) -> Result<CredentialPair, RefreshFailure> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_session");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		obs::debug_event!(ticket = ticket.id, "Starting session refresh.");
		self.metrics.record_attempt();

		let settled = span
			.instrument(async {
				let result = self.exchange(&ticket.current, url).await;

				self.settle_store(&ticket.current, result).await
			})
			.await;

		{
			let mut slot = self.slot.lock();

			if slot.as_ref().is_some_and(|current| current.id == ticket.id) {
				*slot = None;
			}
		}

		match &settled {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);
				obs::debug_event!(ticket = ticket.id, "Session refresh settled.");
			},
			#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
			Err(failure) => {
				self.metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
				obs::warn_event!(ticket = ticket.id, ?failure, "Session refresh failed.");
			},
		}

		settled
	}

	async fn exchange(
		&self,
		current: &CredentialPair,
		url: Url,
	) -> Result<(CredentialPair, bool), RefreshFailure> {
		let body = serde_json::json!({ "refresh_token": current.refresh_token.expose() });
		let mut headers = vec![
			("Accept".to_owned(), "application/json".to_owned()),
			("Content-Type".to_owned(), "application/json".to_owned()),
		];

		headers.extend(self.config.context_headers());

		let request = HttpRequest {
			method: Method::Post,
			url,
			headers,
			body: Some(body.to_string().into_bytes()),
			timeout: self.config.timeout(),
		};
		let response = self
			.transport
			.send(request)
			.await
			.map_err(|e| RefreshFailure::Rejected(format!("refresh call failed: {e}")))?;

		if !response.is_success() {
			let details = ErrorDetails::from_body(&response.body);

			return Err(RefreshFailure::Rejected(
				details.message_or(|| format!("refresh rejected with HTTP {}", response.status)),
			));
		}

		let grant = envelope::decode_data::<RefreshGrant>(&response.body)
			.map_err(|e| RefreshFailure::Rejected(format!("refresh response is malformed: {e}")))?;
		let rotated =
			grant.refresh_token.as_ref().is_some_and(|refresh| refresh != &current.refresh_token);

		Ok((current.rotate(grant.access_token, grant.refresh_token), rotated))
	}

	/// Applies the refresh result only if the store still holds the pair that was refreshed.
	async fn settle_store(
		&self,
		current: &CredentialPair,
		result: Result<(CredentialPair, bool), RefreshFailure>,
	) -> Result<CredentialPair, RefreshFailure> {
		match result {
			Ok((pair, rotated)) => {
				let outcome = self
					.store
					.compare_and_swap(current, Some(pair.clone()))
					.await
					.map_err(RefreshFailure::Storage)?;

				match outcome {
					CompareAndSwapOutcome::Updated => {
						self.observer.on_event(&SessionEvent::Refreshed { rotated });

						Ok(pair)
					},
					// A login replaced the session while the refresh was in flight.
					CompareAndSwapOutcome::Mismatch => self
						.store
						.read()
						.ok_or_else(|| RefreshFailure::Rejected(SESSION_ENDED.into())),
					CompareAndSwapOutcome::Missing =>
						Err(RefreshFailure::Rejected(SESSION_ENDED.into())),
				}
			},
			Err(RefreshFailure::Rejected(reason)) => {
				match self.store.compare_and_swap(current, None).await {
					Ok(CompareAndSwapOutcome::Updated) => {
						self.observer.on_event(&SessionEvent::Expired { reason: reason.clone() });
					},
					Ok(_) => {},
					#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
					Err(e) => {
						obs::warn_event!(error = %e, "Failed to persist the cleared session.");

						self.observer.on_event(&SessionEvent::Expired { reason: reason.clone() });
					},
				}

				Err(RefreshFailure::Rejected(reason))
			},
			Err(other) => Err(other),
		}
	}
}
impl<C> Debug for RefreshCoordinator<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshCoordinator")
			.field("refreshing", &self.is_refreshing())
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
