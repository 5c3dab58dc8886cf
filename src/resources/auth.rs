//! Login, registration, logout, and profile management.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionState, TokenSecret, UserRole},
	envelope::DecodeError,
	http::HttpTransport,
	obs::{self, CallKind, CallOutcome, CallSpan},
	pipeline::{RequestDescriptor, RequestOptions},
	resources::{ApiClient, User},
	session::SessionEvent,
};

const LOGIN_PATH: &str = "/api/v1/auth/login";
const REGISTER_PATH: &str = "/api/v1/auth/register";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";
const PROFILE_PATH: &str = "/api/v1/auth/profile";
const CHANGE_PASSWORD_PATH: &str = "/api/v1/auth/change-password";

/// Email/password credentials.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
}
impl LoginRequest {
	/// Creates a login request.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: TokenSecret::new(password) }
	}
}

/// New account registration.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
	/// Contact phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Requested role.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<UserRole>,
}

/// Payload returned by login and register.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthSession {
	/// Issued access token.
	pub access_token: TokenSecret,
	/// Issued refresh token.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Authenticated user.
	#[serde(default)]
	pub user: Option<User>,
	/// Access token lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
}

/// Partial profile update; unset fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileUpdate {
	/// Given name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Contact phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Postal address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// New password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<TokenSecret>,
}

/// Password change request.
#[derive(Clone, Debug, Serialize)]
pub struct ChangePasswordRequest {
	/// Current password.
	pub old_password: TokenSecret,
	/// Replacement password.
	pub new_password: TokenSecret,
	/// Replacement password, repeated.
	pub confirm_password: TokenSecret,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Logs in and stores the issued credential pair.
	pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
		let descriptor = RequestDescriptor::post(LOGIN_PATH)
			.json(request)?
			.options(RequestOptions::default().anonymous())
			.operation("login");

		self.establish(descriptor).await
	}

	/// Registers an account and stores the issued credential pair.
	pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession> {
		let descriptor = RequestDescriptor::post(REGISTER_PATH)
			.json(request)?
			.options(RequestOptions::default().anonymous())
			.operation("register");

		self.establish(descriptor).await
	}

	/// Logs out. The local session is cleared even when the backend call fails.
	pub async fn logout(&self) -> Result<()> {
		const KIND: CallKind = CallKind::Session;

		let span = CallSpan::new(KIND, "logout");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let call = self
					.pipeline()
					.execute_empty(&RequestDescriptor::post(LOGOUT_PATH).operation("logout"))
					.await;
				let cleared = self.store().clear().await;

				self.observer.on_event(&SessionEvent::LoggedOut);

				call?;
				cleared?;

				Ok(())
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Stores a pair obtained elsewhere (for example, a persisted session).
	pub async fn restore_session(&self, pair: CredentialPair) -> Result<SessionState> {
		self.store().write(pair).await?;
		self.observer.on_event(&SessionEvent::Established);

		Ok(self.session_state())
	}

	/// Fetches the authenticated user's profile.
	pub async fn profile(&self) -> Result<User> {
		let descriptor = RequestDescriptor::get(PROFILE_PATH).operation("profile");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Updates the authenticated user's profile.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
		let descriptor =
			RequestDescriptor::put(PROFILE_PATH).json(update)?.operation("update_profile");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Changes the authenticated user's password.
	pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<()> {
		let descriptor = RequestDescriptor::post(CHANGE_PASSWORD_PATH)
			.json(request)?
			.operation("change_password");

		self.pipeline().execute_empty(&descriptor).await
	}

	async fn establish(&self, descriptor: RequestDescriptor) -> Result<AuthSession> {
		const KIND: CallKind = CallKind::Session;

		let span = CallSpan::new(KIND, descriptor.operation_name());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let session = self.pipeline().execute_data::<AuthSession>(&descriptor).await?;
				let pair = CredentialPair::from_parts(
					Some(session.access_token.clone()),
					session.refresh_token.clone(),
				)
				.ok_or(DecodeError::MissingField { field: "refresh_token" })?;

				self.store().write(pair).await?;
				self.observer.on_event(&SessionEvent::Established);

				Ok(session)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
