//! Request pipeline: attach credentials, dispatch, classify, refresh-and-retry once.
//!
//! Every resource call goes through [`Pipeline::execute`]. A [`RequestDescriptor`] is
//! immutable once handed over, so the retry after a refresh re-sends exactly the same method,
//! path, query, body, and options with only the bearer token replaced.

// self
use crate::{
	_prelude::*,
	auth::CredentialPair,
	classify::{Outcome, ResponseClassifier, RetryReason},
	config::ClientConfig,
	envelope::{self, Page},
	error::{ConfigError, TransportError},
	http::{self, HttpRequest, HttpTransport, Method, RawResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
	refresh::RefreshCoordinator,
	store::CredentialStore,
};

/// Caller-supplied per-request options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Overrides the configured timeout for this request.
	pub timeout: Option<Duration>,
	/// Extra headers appended after the standard ones.
	pub headers: Vec<(String, String)>,
	/// Sends the request without credentials; a 401 is then terminal.
	pub anonymous: bool,
}
impl RequestOptions {
	/// Sets the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Marks the request as credential-free (login, register).
	pub fn anonymous(mut self) -> Self {
		self.anonymous = true;

		self
	}
}

/// Immutable description of one API call.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	body: Option<Vec<u8>>,
	options: RequestOptions,
	operation: &'static str,
}
impl RequestDescriptor {
	/// Creates a descriptor for `method` and an API path such as `/api/v1/schools`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			body: None,
			options: RequestOptions::default(),
			operation: "request",
		}
	}

	/// `GET` descriptor.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST` descriptor.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT` descriptor.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `PATCH` descriptor.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// `DELETE` descriptor.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Serializes `body` as the JSON request body.
	pub fn json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		let bytes =
			serde_json::to_vec(body).map_err(|source| ConfigError::RequestBody { source })?;

		self.body = Some(bytes);

		Ok(self)
	}

	/// Replaces the per-request options.
	pub fn options(mut self, options: RequestOptions) -> Self {
		self.options = options;

		self
	}

	/// Names the operation for spans and logs.
	pub fn operation(mut self, operation: &'static str) -> Self {
		self.operation = operation;

		self
	}

	/// Request method.
	pub fn method(&self) -> Method {
		self.method
	}

	/// API path relative to the base URL.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query parameters in insertion order.
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	/// Serialized body, if any.
	pub fn body(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	/// Per-request options.
	pub fn request_options(&self) -> &RequestOptions {
		&self.options
	}

	/// Operation label.
	pub fn operation_name(&self) -> &'static str {
		self.operation
	}
}
impl Debug for RequestDescriptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestDescriptor")
			.field("operation", &self.operation)
			.field("method", &self.method)
			.field("path", &self.path)
			.field("query", &self.query)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("options", &self.options)
			.finish()
	}
}

/// Dispatches descriptors with credentials and one refresh-and-retry.
pub struct Pipeline<C>
where
	C: ?Sized + HttpTransport,
{
	config: Arc<ClientConfig>,
	store: Arc<dyn CredentialStore>,
	transport: Arc<C>,
	classifier: Arc<dyn ResponseClassifier>,
	coordinator: Arc<RefreshCoordinator<C>>,
}
impl<C> Pipeline<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a pipeline from explicit collaborators.
	pub fn new(
		config: Arc<ClientConfig>,
		store: Arc<dyn CredentialStore>,
		transport: Arc<C>,
		classifier: Arc<dyn ResponseClassifier>,
		coordinator: Arc<RefreshCoordinator<C>>,
	) -> Self {
		Self { config, store, transport, classifier, coordinator }
	}

	/// Client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Credential store shared with the coordinator.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Refresh coordinator.
	pub fn coordinator(&self) -> &Arc<RefreshCoordinator<C>> {
		&self.coordinator
	}

	/// Executes `descriptor` and returns the raw 2xx response.
	pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<RawResponse> {
		const KIND: CallKind = CallKind::Api;

		let span = CallSpan::new(KIND, descriptor.operation);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.execute_once_with_retry(descriptor)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Executes `descriptor` and decodes the envelope's required `data` field.
	pub async fn execute_data<T>(&self, descriptor: &RequestDescriptor) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(descriptor).await?;

		Ok(envelope::decode_data(&response.body)?)
	}

	/// Executes `descriptor` and decodes a list page.
	pub async fn execute_page<T>(&self, descriptor: &RequestDescriptor) -> Result<Page<T>>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(descriptor).await?;

		Ok(envelope::decode_page(&response.body)?)
	}

	/// Executes `descriptor` and ignores the body.
	pub async fn execute_empty(&self, descriptor: &RequestDescriptor) -> Result<()> {
		self.execute(descriptor).await.map(|_| ())
	}

	async fn execute_once_with_retry(&self, descriptor: &RequestDescriptor) -> Result<RawResponse> {
		let pair = if descriptor.options.anonymous { None } else { self.store.read() };
		let first = self.dispatch(descriptor, pair.as_ref()).await?;

		match self.classifier.classify(first, pair.is_some()) {
			Outcome::Success(response) => Ok(response),
			Outcome::Fatal(e) => Err(e),
			Outcome::Retryable(RetryReason::SessionExpired) => {
				let stale = pair.as_ref().map(|pair| &pair.access_token);
				let fresh = self.coordinator.valid_credentials(stale).await?;

				obs::record_call_outcome(CallKind::Api, CallOutcome::Retry);
				obs::debug_event!(
					operation = descriptor.operation,
					"Retrying request with refreshed credentials."
				);

				let second = self.dispatch(descriptor, Some(&fresh)).await?;

				match self.classifier.classify(second, true) {
					Outcome::Success(response) => Ok(response),
					Outcome::Fatal(e) => Err(e),
					Outcome::Retryable(_) =>
						Err(Error::unauthenticated("session rejected after refresh")),
				}
			},
		}
	}

	async fn dispatch(
		&self,
		descriptor: &RequestDescriptor,
		pair: Option<&CredentialPair>,
	) -> Result<Result<RawResponse, TransportError>, ConfigError> {
		let request = self.build_request(descriptor, pair)?;

		Ok(self.transport.send(request).await)
	}

	fn build_request(
		&self,
		descriptor: &RequestDescriptor,
		pair: Option<&CredentialPair>,
	) -> Result<HttpRequest, ConfigError> {
		let mut url = self.config.endpoint(&descriptor.path)?;

		if !descriptor.query.is_empty() {
			url.query_pairs_mut().extend_pairs(descriptor.query.iter());
		}

		let timeout = descriptor.options.timeout.unwrap_or_else(|| self.config.timeout());

		if !timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];

		if let Some(pair) = pair {
			headers.push(("Authorization".to_owned(), pair.access_token.bearer()));
		}
		if descriptor.body.is_some() {
			headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
		}

		headers.extend(self.config.context_headers());

		for (name, value) in &descriptor.options.headers {
			if !http::is_valid_header_value(value) {
				return Err(ConfigError::InvalidHeaderValue { header: name.clone() });
			}

			headers.push((name.clone(), value.clone()));
		}

		Ok(HttpRequest {
			method: descriptor.method,
			url,
			headers,
			body: descriptor.body.clone(),
			timeout,
		})
	}
}
impl<C> Debug for Pipeline<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Pipeline")
			.field("config", &self.config)
			.field("coordinator", &self.coordinator)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{classify::DefaultClassifier, session::NoopObserver, store::MemoryStore};

	struct Unreachable;
	impl HttpTransport for Unreachable {
		fn send(&self, _: HttpRequest) -> http::TransportFuture<'_> {
			Box::pin(async { Err(TransportError::Timeout) })
		}
	}

	fn pipeline(store: MemoryStore) -> Pipeline<Unreachable> {
		let config = Arc::new(
			ClientConfig::builder()
				.base_url("http://api.test/")
				.user_role(crate::auth::UserRole::Admin)
				.build()
				.expect("Test configuration should be valid."),
		);
		let store: Arc<dyn CredentialStore> = Arc::new(store);
		let transport = Arc::new(Unreachable);
		let coordinator = Arc::new(RefreshCoordinator::new(
			config.clone(),
			store.clone(),
			transport.clone(),
			Arc::new(NoopObserver),
		));

		Pipeline::new(config, store, transport, Arc::new(DefaultClassifier), coordinator)
	}

	#[test]
	fn build_request_attaches_credentials_and_context() {
		let pipeline = pipeline(MemoryStore::default());
		let pair = CredentialPair::new("access-1", "refresh-1");
		let descriptor = RequestDescriptor::post("/api/v1/orders")
			.query("limit", 5)
			.json(&serde_json::json!({ "quantity": 3 }))
			.expect("Order body should serialize.")
			.options(RequestOptions::default().header("X-Request-ID", "req-9"));
		let request = pipeline
			.build_request(&descriptor, Some(&pair))
			.expect("Descriptor should build into a request.");

		assert_eq!(request.url.as_str(), "http://api.test/api/v1/orders?limit=5");
		assert_eq!(request.header("authorization"), Some("Bearer access-1"));
		assert_eq!(request.header("content-type"), Some("application/json"));
		assert_eq!(request.header("x-user-role"), Some("admin"));
		assert_eq!(request.header("x-request-id"), Some("req-9"));
		assert_eq!(request.timeout, crate::config::DEFAULT_TIMEOUT);
	}

	#[test]
	fn build_request_rejects_bad_options() {
		let pipeline = pipeline(MemoryStore::default());
		let bad_header = RequestDescriptor::get("/api/v1/schools")
			.options(RequestOptions::default().header("X-Trace", "a\nb"));
		let bad_timeout = RequestDescriptor::get("/api/v1/schools")
			.options(RequestOptions::default().timeout(Duration::ZERO));

		assert!(matches!(
			pipeline.build_request(&bad_header, None),
			Err(ConfigError::InvalidHeaderValue { .. })
		));
		assert!(matches!(
			pipeline.build_request(&bad_timeout, None),
			Err(ConfigError::NonPositiveTimeout)
		));
	}

	#[test]
	fn get_requests_carry_no_body_headers() {
		let pipeline = pipeline(MemoryStore::default());
		let request = pipeline
			.build_request(&RequestDescriptor::get("/api/v1/schools"), None)
			.expect("Anonymous GET should build.");

		assert!(request.header("authorization").is_none());
		assert!(request.header("content-type").is_none());
		assert!(request.body.is_none());
	}

	#[tokio::test]
	async fn timeouts_are_network_errors_without_refresh() {
		let pipeline = pipeline(MemoryStore::with_pair(CredentialPair::new("a", "r")));
		let err = pipeline
			.execute(&RequestDescriptor::get("/api/v1/schools"))
			.await
			.expect_err("Timed-out request should fail.");

		assert_eq!(err.kind(), crate::error::ErrorKind::Network);
		assert_eq!(pipeline.coordinator().metrics().attempts(), 0);
	}
}
