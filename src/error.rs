//! Client-level error types shared across the pipeline, the refresh coordinator, stores, and
//! resource facades.

// self
use crate::{_prelude::*, auth::IdentifierError, envelope::DecodeError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;
type SharedError = Arc<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every variant maps onto one [`ErrorKind`] so UI code can pick a single presentation
/// (toast, redirect to login, inline field error) without matching on transport details.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout). Never retried automatically.
	#[error(transparent)]
	Network(#[from] TransportError),
	/// A successful response did not match the expected payload shape.
	#[error(transparent)]
	MalformedResponse(#[from] DecodeError),

	/// No valid session exists; the caller should send the user back to login.
	#[error("Session is not authenticated: {reason}.")]
	Unauthenticated {
		/// Client- or backend-supplied reason string.
		reason: String,
	},
	/// Authenticated, but the backend refused the operation.
	#[error("Access is forbidden: {message}.")]
	Forbidden {
		/// Backend-supplied message.
		message: String,
		/// Backend trace identifier, when supplied.
		trace_id: Option<String>,
	},
	/// The request was rejected as invalid input (HTTP 400/422).
	#[error("Request failed validation: {message}.")]
	Validation {
		/// Backend-supplied message.
		message: String,
		/// Backend error code such as `BAD_REQUEST`.
		code: Option<String>,
		/// Field-level detail, passed through verbatim.
		details: Option<serde_json::Value>,
		/// Backend trace identifier, when supplied.
		trace_id: Option<String>,
	},
	/// The backend failed (HTTP 5xx).
	#[error("Server failed with HTTP {status}: {message}.")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Backend-supplied message.
		message: String,
		/// Backend trace identifier, when supplied.
		trace_id: Option<String>,
	},
	/// Any status the taxonomy does not name (1xx, 3xx, 404, 409, 429, ...).
	#[error("Backend returned unexpected HTTP {status}: {message}.")]
	UnexpectedStatus {
		/// HTTP status code.
		status: u16,
		/// Backend-supplied message.
		message: String,
		/// Backend trace identifier, when supplied.
		trace_id: Option<String>,
	},
}
impl Error {
	/// Returns the coarse category callers use to choose a presentation.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Storage(_) => ErrorKind::Storage,
			Self::Config(_) => ErrorKind::Config,
			Self::Network(_) => ErrorKind::Network,
			Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
			Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
			Self::Forbidden { .. } => ErrorKind::Forbidden,
			Self::Validation { .. } => ErrorKind::Validation,
			Self::Server { .. } => ErrorKind::Server,
			Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
		}
	}

	/// Returns the backend trace identifier for support requests, if one was supplied.
	pub fn trace_id(&self) -> Option<&str> {
		match self {
			Self::Forbidden { trace_id, .. }
			| Self::Validation { trace_id, .. }
			| Self::Server { trace_id, .. }
			| Self::UnexpectedStatus { trace_id, .. } => trace_id.as_deref(),
			_ => None,
		}
	}

	/// Returns the HTTP status code carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Forbidden { .. } => Some(403),
			Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
			_ => None,
		}
	}

	pub(crate) fn unauthenticated(reason: impl Into<String>) -> Self {
		Self::Unauthenticated { reason: reason.into() }
	}
}

/// Coarse error categories surfaced to UI code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Transport or timeout failure; the user may retry.
	Network,
	/// No valid session; redirect to login.
	Unauthenticated,
	/// Authenticated but not permitted.
	Forbidden,
	/// Caller-fixable input problem.
	Validation,
	/// Backend failure.
	Server,
	/// Status outside the named taxonomy.
	UnexpectedStatus,
	/// Response body did not match the expected shape.
	MalformedResponse,
	/// Credential persistence failed.
	Storage,
	/// Local configuration or request construction problem.
	Config,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Network => "network",
			Self::Unauthenticated => "unauthenticated",
			Self::Forbidden => "forbidden",
			Self::Validation => "validation",
			Self::Server => "server",
			Self::UnexpectedStatus => "unexpected_status",
			Self::MalformedResponse => "malformed_response",
			Self::Storage => "storage",
			Self::Config => "config",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and request-construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL or request path cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL text that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than `http` or `https`.
	#[error("Base URL scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Base URL carries a query string or fragment.
	#[error("Base URL must not carry a query string or fragment.")]
	BaseUrlHasQuery,
	/// Request timeout is zero or negative.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// A header value contains characters HTTP does not allow.
	#[error("Value for header `{header}` is not a valid HTTP header value.")]
	InvalidHeaderValue {
		/// Header name.
		header: String,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{var}` holds an invalid value.")]
	InvalidEnv {
		/// Variable name.
		var: &'static str,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] IdentifierError),
	/// A request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
///
/// Sources are shared so a single refresh failure can be handed to every waiting caller.
#[derive(Clone, Debug, ThisError)]
pub enum TransportError {
	/// The request exceeded its timeout.
	#[error("Request timed out while calling the API.")]
	Timeout,
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: SharedError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Arc::new(src) }
	}

	/// Returns `true` if the failure was a timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout)
	}
}
impl From<std::io::Error> for TransportError {
	fn from(e: std::io::Error) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_cover_backend_variants() {
		let forbidden = Error::Forbidden { message: "nope".into(), trace_id: Some("t-1".into()) };
		let server =
			Error::Server { status: 502, message: "bad gateway".into(), trace_id: None };

		assert_eq!(forbidden.kind(), ErrorKind::Forbidden);
		assert_eq!(forbidden.trace_id(), Some("t-1"));
		assert_eq!(forbidden.status(), Some(403));
		assert_eq!(server.kind(), ErrorKind::Server);
		assert_eq!(server.status(), Some(502));
		assert_eq!(Error::unauthenticated("expired").kind(), ErrorKind::Unauthenticated);
		assert_eq!(Error::from(TransportError::Timeout).kind(), ErrorKind::Network);
	}

	#[test]
	fn transport_error_keeps_source_when_cloned() {
		let err = TransportError::from(std::io::Error::other("connection reset"));
		let cloned = err.clone();
		let source = StdError::source(&cloned)
			.expect("Cloned transport error should still expose its source.");

		assert_eq!(source.to_string(), "connection reset");
		assert!(!cloned.is_timeout());
	}
}
