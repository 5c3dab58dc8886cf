//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
use serde_json::Value;
// self
use mbg_api_client::{
	auth::{CredentialPair, UserRole},
	config::ClientConfig,
	error::TransportError,
	http::{HttpRequest, HttpTransport, RawResponse, TransportFuture},
	resources::ApiClient,
	session::{SessionEvent, SessionObserver},
	store::{CredentialStore, MemoryStore},
};
#[cfg(feature = "reqwest")] use mbg_api_client::http::ReqwestTransport;

/// Observer that records every session event in order.
#[derive(Debug, Default)]
pub struct EventLog(Mutex<Vec<SessionEvent>>);
impl EventLog {
	pub fn events(&self) -> Vec<SessionEvent> {
		self.0.lock().clone()
	}
}
impl SessionObserver for EventLog {
	fn on_event(&self, event: &SessionEvent) {
		self.0.lock().push(event.clone());
	}
}

type Responder =
	Box<dyn Fn(&HttpRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static>;

/// Scripted transport that records requests and answers after an optional delay.
pub struct FakeTransport {
	responder: Responder,
	delay: std::time::Duration,
	path_delays: Vec<(String, std::time::Duration)>,
	log: Mutex<Vec<HttpRequest>>,
}
impl FakeTransport {
	pub fn new<F>(responder: F) -> Self
	where
		F: Fn(&HttpRequest) -> Result<RawResponse, TransportError> + Send + Sync + 'static,
	{
		Self {
			responder: Box::new(responder),
			delay: Default::default(),
			path_delays: Vec::new(),
			log: Default::default(),
		}
	}

	/// Holds every response back for `millis`, so concurrent callers overlap.
	pub fn with_delay(mut self, millis: u64) -> Self {
		self.delay = std::time::Duration::from_millis(millis);

		self
	}

	/// Overrides the delay for requests sent to `path`.
	pub fn with_path_delay(mut self, path: &str, millis: u64) -> Self {
		self.path_delays.push((path.to_owned(), std::time::Duration::from_millis(millis)));

		self
	}

	/// Number of requests sent to `path`.
	pub fn calls(&self, path: &str) -> usize {
		self.log.lock().iter().filter(|request| request.url.path() == path).count()
	}

	pub fn requests(&self) -> Vec<HttpRequest> {
		self.log.lock().clone()
	}
}
impl HttpTransport for FakeTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			self.log.lock().push(request.clone());

			let delay = self
				.path_delays
				.iter()
				.find(|(path, _)| path == request.url.path())
				.map_or(self.delay, |(_, delay)| *delay);

			if !delay.is_zero() {
				tokio::time::sleep(delay).await;
			}

			(self.responder)(&request)
		})
	}
}

/// Wraps `data` in a successful backend envelope.
pub fn ok_envelope(data: Value) -> String {
	serde_json::json!({ "success": true, "data": data }).to_string()
}

/// Builds a failure envelope the way the backend's exception handler does.
pub fn error_envelope(code: &str, message: &str, trace_id: &str) -> String {
	serde_json::json!({
		"success": false,
		"error": { "code": code, "message": message },
		"meta": { "trace_id": trace_id },
	})
	.to_string()
}

pub fn refresh_grant(access: &str, refresh: Option<&str>) -> String {
	let mut data = serde_json::json!({ "access_token": access, "expires_in": 900 });

	if let Some(refresh) = refresh {
		data["refresh_token"] = Value::from(refresh);
	}

	ok_envelope(data)
}

pub fn school_json(id: &str, name: &str) -> Value {
	serde_json::json!({
		"id": id,
		"name": name,
		"address": "Jl. Merdeka 1",
		"phone": "+62-21-555-0100",
		"email": "office@school.test",
		"principal": "Ibu Ratna",
		"students_count": 320,
		"created_at": "2024-07-01T08:00:00Z",
		"updated_at": "2024-07-01T08:00:00Z",
	})
}

pub fn student_json(id: &str, school_id: &str) -> Value {
	serde_json::json!({
		"id": id,
		"first_name": "Budi",
		"last_name": "Santoso",
		"school_id": school_id,
		"is_active": true,
		"created_at": "2024-07-01T08:00:00Z",
		"updated_at": "2024-07-01T08:00:00Z",
	})
}

pub fn order_json(id: &str, status: &str) -> Value {
	serde_json::json!({
		"id": id,
		"supplier_id": "sup-1",
		"school_id": "sch-1",
		"quantity": 120,
		"total_price": 1_800_000.0,
		"status": status,
		"delivery_date": "2024-08-01",
		"created_at": "2024-07-01T08:00:00Z",
		"updated_at": "2024-07-01T08:00:00Z",
	})
}

pub fn test_config(base_url: &str) -> ClientConfig {
	ClientConfig::builder()
		.base_url(base_url)
		.user_role(UserRole::Admin)
		.build()
		.expect("Test client configuration should be valid.")
}

pub fn seeded_store(access: &str, refresh: &str) -> Arc<MemoryStore> {
	Arc::new(MemoryStore::with_pair(CredentialPair::new(access, refresh)))
}

/// Client over a [`FakeTransport`] plus the handles tests assert on.
pub fn fake_client(
	store: Arc<MemoryStore>,
	transport: FakeTransport,
) -> (ApiClient<FakeTransport>, Arc<FakeTransport>, Arc<EventLog>) {
	let transport = Arc::new(transport);
	let events = Arc::new(EventLog::default());
	let store: Arc<dyn CredentialStore> = store;
	let client = ApiClient::with_parts(
		test_config("http://api.test"),
		store,
		transport.clone(),
		events.clone(),
	);

	(client, transport, events)
}

/// Client over the real reqwest transport, pointed at `base_url`.
#[cfg(feature = "reqwest")]
pub fn reqwest_client(
	base_url: &str,
	store: Arc<dyn CredentialStore>,
) -> (ApiClient<ReqwestTransport>, Arc<EventLog>) {
	let events = Arc::new(EventLog::default());
	let client = ApiClient::with_parts(
		test_config(base_url),
		store,
		Arc::new(ReqwestTransport::default()),
		events.clone(),
	);

	(client, events)
}
