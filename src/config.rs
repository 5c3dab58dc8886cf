//! Client configuration: base URL, default timeout, and static context headers.

// self
use crate::{
	_prelude::*,
	auth::{UserId, UserRole},
	error::ConfigError,
	http,
};

/// Base URL used when no environment override is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default bound applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

/// Primary base URL variable.
pub const ENV_API_URL: &str = "MBG_API_URL";
/// Fallback base URL variable shared with the web dashboard.
pub const ENV_PUBLIC_API_URL: &str = "NEXT_PUBLIC_API_URL";
/// Request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "MBG_API_TIMEOUT_SECS";
/// Static `X-User-Role` value.
pub const ENV_USER_ROLE: &str = "MBG_USER_ROLE";
/// Static `X-User-ID` value.
pub const ENV_USER_ID: &str = "MBG_USER_ID";

/// Header carrying the static role context.
pub const HEADER_USER_ROLE: &str = "X-User-Role";
/// Header carrying the static user context.
pub const HEADER_USER_ID: &str = "X-User-ID";

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	base_url: Url,
	timeout: Duration,
	user_role: Option<UserRole>,
	user_id: Option<UserId>,
}
impl ClientConfig {
	/// Returns a builder seeded with the defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Loads configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads configuration through an arbitrary variable lookup.
	///
	/// Empty values are treated as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let mut builder = Self::builder();

		if let Some(url) = get(ENV_API_URL).or_else(|| get(ENV_PUBLIC_API_URL)) {
			builder = builder.base_url(url);
		}
		if let Some(raw) = get(ENV_TIMEOUT_SECS) {
			let secs = raw
				.parse::<i64>()
				.map_err(|_| ConfigError::InvalidEnv { var: ENV_TIMEOUT_SECS })?;

			builder = builder.timeout(Duration::seconds(secs));
		}
		if let Some(raw) = get(ENV_USER_ROLE) {
			let role = raw
				.parse::<UserRole>()
				.map_err(|_| ConfigError::InvalidEnv { var: ENV_USER_ROLE })?;

			builder = builder.user_role(role);
		}
		if let Some(raw) = get(ENV_USER_ID) {
			builder = builder.user_id(UserId::new(raw)?);
		}

		builder.build()
	}

	/// Base URL every request path is appended to.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Default request timeout.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Static role context, if configured.
	pub fn user_role(&self) -> Option<UserRole> {
		self.user_role
	}

	/// Static user context, if configured.
	pub fn user_id(&self) -> Option<&UserId> {
		self.user_id.as_ref()
	}

	/// Resolves an absolute URL for an API path such as `/api/v1/schools`.
	///
	/// Any path prefix on the base URL is preserved.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};

		Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl { url: joined, source })
	}

	/// Returns the static context headers sent on every request.
	pub fn context_headers(&self) -> Vec<(String, String)> {
		let mut headers = Vec::with_capacity(2);

		if let Some(role) = self.user_role {
			headers.push((HEADER_USER_ROLE.to_owned(), role.as_str().to_owned()));
		}
		if let Some(id) = &self.user_id {
			headers.push((HEADER_USER_ID.to_owned(), id.to_string()));
		}

		headers
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
	base_url: Option<String>,
	timeout: Option<Duration>,
	user_role: Option<UserRole>,
	user_id: Option<UserId>,
}
impl ClientConfigBuilder {
	/// Sets the base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Overrides the default request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets the static `X-User-Role` context.
	pub fn user_role(mut self, role: UserRole) -> Self {
		self.user_role = Some(role);

		self
	}

	/// Sets the static `X-User-ID` context.
	pub fn user_id(mut self, id: UserId) -> Self {
		self.user_id = Some(id);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
		let base_url = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidUrl { url: raw.to_owned(), source })?;
		let config = ClientConfig {
			base_url,
			timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
			user_role: self.user_role,
			user_id: self.user_id,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		if self.base_url.query().is_some() || self.base_url.fragment().is_some() {
			return Err(ConfigError::BaseUrlHasQuery);
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}
		if let Some(id) = &self.user_id
			&& !http::is_valid_header_value(id)
		{
			return Err(ConfigError::InvalidHeaderValue { header: HEADER_USER_ID.to_owned() });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	#[test]
	fn defaults_apply_without_environment() {
		let config =
			ClientConfig::from_lookup(lookup(&[])).expect("Empty environment should load.");

		assert_eq!(config.base_url().as_str(), "http://localhost:8080/");
		assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
		assert!(config.context_headers().is_empty());
	}

	#[test]
	fn primary_url_wins_over_public_fallback() {
		let config = ClientConfig::from_lookup(lookup(&[
			(ENV_API_URL, "https://api.mbg.example"),
			(ENV_PUBLIC_API_URL, "http://ignored.example"),
			(ENV_TIMEOUT_SECS, "12"),
			(ENV_USER_ROLE, "admin"),
			(ENV_USER_ID, "1"),
		]))
		.expect("Complete environment should load.");

		assert_eq!(config.base_url().host_str(), Some("api.mbg.example"));
		assert_eq!(config.timeout(), Duration::seconds(12));
		assert_eq!(
			config.context_headers(),
			vec![
				(HEADER_USER_ROLE.to_owned(), "admin".to_owned()),
				(HEADER_USER_ID.to_owned(), "1".to_owned()),
			]
		);

		let fallback =
			ClientConfig::from_lookup(lookup(&[(ENV_PUBLIC_API_URL, "http://dash.example:9000")]))
				.expect("Fallback variable should load.");

		assert_eq!(fallback.base_url().port(), Some(9000));
	}

	#[test]
	fn invalid_values_are_rejected() {
		assert!(matches!(
			ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])),
			Err(ConfigError::InvalidEnv { var: ENV_TIMEOUT_SECS })
		));
		assert!(matches!(
			ClientConfig::from_lookup(lookup(&[(ENV_USER_ROLE, "janitor")])),
			Err(ConfigError::InvalidEnv { var: ENV_USER_ROLE })
		));
		assert!(matches!(
			ClientConfig::builder().timeout(Duration::ZERO).build(),
			Err(ConfigError::NonPositiveTimeout)
		));
		assert!(matches!(
			ClientConfig::builder().base_url("ftp://files.example").build(),
			Err(ConfigError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			ClientConfig::builder().base_url("http://api.example/?debug=1").build(),
			Err(ConfigError::BaseUrlHasQuery)
		));
		assert!(matches!(
			ClientConfig::builder().base_url("not a url").build(),
			Err(ConfigError::InvalidUrl { .. })
		));
	}

	#[test]
	fn endpoint_preserves_base_path() {
		let config = ClientConfig::builder()
			.base_url("https://gateway.example/mbg/")
			.build()
			.expect("Base URL with a path prefix should be accepted.");

		assert_eq!(
			config.endpoint("/api/v1/schools").expect("Endpoint should resolve.").as_str(),
			"https://gateway.example/mbg/api/v1/schools"
		);
		assert_eq!(
			config.endpoint("api/v1/orders").expect("Relative path should resolve.").as_str(),
			"https://gateway.example/mbg/api/v1/orders"
		);
	}
}
