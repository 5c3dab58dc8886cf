//! Response classification for the request pipeline.
//!
//! [`classify`] is a pure, total function: every transport result maps onto exactly one
//! [`Outcome`] and nothing falls through. Rules apply in priority order:
//!
//! 1. Transport failure or timeout: `Fatal(Network)`.
//! 2. 401 with a refresh token available: `Retryable(SessionExpired)`.
//! 3. 401 without a refresh token: `Fatal(Unauthenticated)`.
//! 4. 403: `Fatal(Forbidden)`.
//! 5. 400 or 422: `Fatal(Validation)`.
//! 6. 5xx: `Fatal(Server)`.
//! 7. 2xx: `Success`.
//! 8. Any other status: `Fatal(UnexpectedStatus)`.

// self
use crate::{_prelude::*, envelope::ErrorDetails, error::TransportError, http::RawResponse};

/// Classified result of one dispatched request.
#[derive(Debug)]
pub enum Outcome {
	/// 2xx response; the body is handed to the caller.
	Success(RawResponse),
	/// The call may succeed after the session is refreshed.
	Retryable(RetryReason),
	/// Terminal failure.
	Fatal(Error),
}
impl Outcome {
	/// Returns a stable label for logs and metrics.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Success(_) => "success",
			Self::Retryable(_) => "retryable",
			Self::Fatal(e) => e.kind().as_str(),
		}
	}
}

/// Why an [`Outcome::Retryable`] may be retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryReason {
	/// The access token was rejected while a refresh token is stored.
	SessionExpired,
}

/// Hook that maps transport results into [`Outcome`]s.
///
/// The pipeline only depends on this trait, so deployments with a non-standard backend can
/// swap the rules without touching dispatch or refresh logic.
pub trait ResponseClassifier: Send + Sync {
	/// Classifies one transport result. Must be pure and total.
	fn classify(
		&self,
		result: Result<RawResponse, TransportError>,
		has_refresh_token: bool,
	) -> Outcome;
}

/// Classifier implementing the backend's status taxonomy.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;
impl ResponseClassifier for DefaultClassifier {
	fn classify(
		&self,
		result: Result<RawResponse, TransportError>,
		has_refresh_token: bool,
	) -> Outcome {
		classify(result, has_refresh_token)
	}
}

/// Maps a transport result onto an [`Outcome`].
pub fn classify(result: Result<RawResponse, TransportError>, has_refresh_token: bool) -> Outcome {
	let response = match result {
		Ok(response) => response,
		Err(e) => return Outcome::Fatal(Error::Network(e)),
	};
	let status = response.status;

	match status {
		401 if has_refresh_token => Outcome::Retryable(RetryReason::SessionExpired),
		200..=299 => Outcome::Success(response),
		_ => Outcome::Fatal(failure(status, &response.body)),
	}
}

fn failure(status: u16, body: &[u8]) -> Error {
	let details = ErrorDetails::from_body(body);
	let message = details.message_or(|| format!("HTTP {status}"));
	let ErrorDetails { code, details, trace_id, .. } = details;

	match status {
		401 => Error::Unauthenticated { reason: message },
		403 => Error::Forbidden { message, trace_id },
		400 | 422 => Error::Validation { message, code, details, trace_id },
		500..=599 => Error::Server { status, message, trace_id },
		_ => Error::UnexpectedStatus { status, message, trace_id },
	}
}
