//! Typed response envelope shared by every backend endpoint.
//!
//! The backend wraps payloads as `{ success, data, error, meta }`. Success bodies are decoded
//! strictly with JSON-path aware errors; error bodies are parsed best-effort so classification
//! never fails on an unexpected shape.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::_prelude::*;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Generic backend envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
	/// Whether the backend considers the call successful.
	#[serde(default = "default_success")]
	pub success: bool,
	/// Payload, absent on errors and on empty results.
	pub data: Option<T>,
	/// Error descriptor, present when `success` is `false`.
	#[serde(default)]
	pub error: Option<ErrorField>,
	/// Request metadata.
	#[serde(default)]
	pub meta: Option<ResponseMeta>,
}

/// Error descriptor in either the structured or the bare-string form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
	/// `{ code, message, details }`.
	Detailed {
		/// Machine-readable code such as `BAD_REQUEST`.
		#[serde(default)]
		code: Option<String>,
		/// Human-readable message.
		#[serde(default)]
		message: Option<String>,
		/// Field-level detail, passed through verbatim.
		#[serde(default)]
		details: Option<serde_json::Value>,
	},
	/// Bare message string.
	Message(String),
}

/// Metadata attached to responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMeta {
	/// Backend trace identifier.
	pub trace_id: Option<String>,
	/// Page size applied by the backend.
	pub limit: Option<u64>,
	/// Page offset applied by the backend.
	pub offset: Option<u64>,
	/// Total number of matching records.
	pub total: Option<u64>,
	/// Unix timestamp of the response.
	pub timestamp: Option<i64>,
	/// Request path echoed by the backend.
	pub path: Option<String>,
	/// Request method echoed by the backend.
	pub method: Option<String>,
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
	/// Records on this page.
	pub items: Vec<T>,
	/// Paging metadata, defaulted when the backend omits it.
	pub meta: ResponseMeta,
}
impl<T> Page<T> {
	/// Returns `true` when the page holds no records.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
impl<T> IntoIterator for Page<T> {
	type IntoIter = std::vec::IntoIter<T>;
	type Item = T;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

/// Success body did not match the expected shape.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// JSON did not match the target type.
	#[error("Response body does not match the expected shape at `{path}`.")]
	Json {
		/// JSON path of the first mismatch.
		path: String,
		/// Underlying parse failure.
		#[source]
		source: serde_json::Error,
	},
	/// The envelope reported `success: false` on a 2xx status.
	#[error("Response envelope reported failure: {message}.")]
	Unsuccessful {
		/// Backend-supplied message.
		message: String,
	},
	/// The envelope carried no `data` where a payload was required.
	#[error("Response envelope is missing `data`.")]
	MissingData,
	/// A field the client requires was absent from the payload.
	#[error("Response payload is missing `{field}`.")]
	MissingField {
		/// Name of the absent field.
		field: &'static str,
	},
}

/// Best-effort error information extracted from a failure body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorDetails {
	/// Backend message or a preview of the raw body.
	pub message: Option<String>,
	/// Machine-readable code.
	pub code: Option<String>,
	/// Field-level detail.
	pub details: Option<serde_json::Value>,
	/// Backend trace identifier.
	pub trace_id: Option<String>,
}
impl ErrorDetails {
	/// Extracts error details from `body`, never failing.
	pub fn from_body(body: &[u8]) -> Self {
		match serde_json::from_slice::<Envelope<IgnoredAny>>(body) {
			Ok(envelope) => {
				let trace_id = envelope.meta.and_then(|meta| meta.trace_id);

				match envelope.error {
					Some(ErrorField::Detailed { code, message, details }) =>
						Self { message, code, details: details.filter(|d| !is_blank(d)), trace_id },
					Some(ErrorField::Message(message)) =>
						Self { message: Some(message), trace_id, ..Default::default() },
					None => Self { trace_id, ..Default::default() },
				}
			},
			Err(_) => Self { message: preview(body), ..Default::default() },
		}
	}

	/// Returns the message, falling back to `fallback` when none was supplied.
	pub fn message_or(&self, fallback: impl FnOnce() -> String) -> String {
		self.message.clone().filter(|m| !m.trim().is_empty()).unwrap_or_else(fallback)
	}
}

/// Decodes the full envelope with JSON-path aware errors.
pub fn decode_envelope<T>(body: &[u8]) -> Result<Envelope<T>, DecodeError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| DecodeError::Json { path: e.path().to_string(), source: e.into_inner() })
}

/// Decodes a required `data` payload.
pub fn decode_data<T>(body: &[u8]) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	let envelope = decode_envelope::<T>(body)?;

	ensure_success(&envelope)?;

	envelope.data.ok_or(DecodeError::MissingData)
}

/// Decodes a list payload; a missing `data` yields an empty page.
pub fn decode_page<T>(body: &[u8]) -> Result<Page<T>, DecodeError>
where
	T: DeserializeOwned,
{
	let envelope = decode_envelope::<Vec<T>>(body)?;

	ensure_success(&envelope)?;

	Ok(Page { items: envelope.data.unwrap_or_default(), meta: envelope.meta.unwrap_or_default() })
}

fn ensure_success<T>(envelope: &Envelope<T>) -> Result<(), DecodeError> {
	if envelope.success {
		return Ok(());
	}

	let message = match &envelope.error {
		Some(ErrorField::Detailed { message: Some(message), .. })
		| Some(ErrorField::Message(message)) => message.clone(),
		_ => "no message".into(),
	};

	Err(DecodeError::Unsuccessful { message })
}

fn default_success() -> bool {
	true
}

fn is_blank(value: &serde_json::Value) -> bool {
	match value {
		serde_json::Value::Null => true,
		serde_json::Value::String(s) => s.is_empty(),
		_ => false,
	}
}

fn preview(body: &[u8]) -> Option<String> {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.chars().take(BODY_PREVIEW_LIMIT).collect())
}
