//! Credential pair and session state models.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access/refresh token pair issued by login, register, or refresh.
///
/// Both tokens are always present, so a value of this type can never describe a partial
/// session. `Debug` output is redacted through [`TokenSecret`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived token attached to every authenticated request.
	pub access_token: TokenSecret,
	/// Longer-lived token exchanged for a new access token.
	pub refresh_token: TokenSecret,
}
impl CredentialPair {
	/// Creates a pair from both secrets.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}

	/// Builds a pair only when both halves are present.
	pub fn from_parts(
		access_token: Option<TokenSecret>,
		refresh_token: Option<TokenSecret>,
	) -> Option<Self> {
		match (access_token, refresh_token) {
			(Some(access_token), Some(refresh_token)) => Some(Self { access_token, refresh_token }),
			_ => None,
		}
	}

	/// Produces the successor pair after a refresh.
	///
	/// The previous refresh token is kept when the backend did not rotate it.
	pub fn rotate(&self, access_token: TokenSecret, refresh_token: Option<TokenSecret>) -> Self {
		Self {
			access_token,
			refresh_token: refresh_token.unwrap_or_else(|| self.refresh_token.clone()),
		}
	}
}

/// Session state derived from the credential store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
	/// A credential pair is stored.
	Authenticated,
	/// No credential pair is stored.
	Anonymous,
}
impl SessionState {
	/// Derives the state from an optional pair.
	pub fn of(pair: Option<&CredentialPair>) -> Self {
		if pair.is_some() { Self::Authenticated } else { Self::Anonymous }
	}

	/// Returns `true` when a pair is stored.
	pub fn is_authenticated(self) -> bool {
		matches!(self, Self::Authenticated)
	}
}

/// Platform roles understood by the backend's `X-User-Role` context header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
	/// School administrator.
	Admin,
	/// Parent of one or more students.
	Parent,
	/// Meal supplier.
	Supplier,
	/// Platform-wide administrator.
	SuperAdmin,
}
impl UserRole {
	/// Returns the wire label for the role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Admin => "admin",
			Self::Parent => "parent",
			Self::Supplier => "supplier",
			Self::SuperAdmin => "super_admin",
		}
	}
}
impl Display for UserRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for UserRole {
	type Err = UnknownRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"admin" => Ok(Self::Admin),
			"parent" => Ok(Self::Parent),
			"supplier" => Ok(Self::Supplier),
			"super_admin" => Ok(Self::SuperAdmin),
			other => Err(UnknownRole(other.to_owned())),
		}
	}
}

/// Error returned when a role label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Role `{0}` is not recognized.")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn from_parts_rejects_partial_sessions() {
		assert!(CredentialPair::from_parts(Some(TokenSecret::new("a")), None).is_none());
		assert!(CredentialPair::from_parts(None, Some(TokenSecret::new("r"))).is_none());
		assert_eq!(
			CredentialPair::from_parts(Some(TokenSecret::new("a")), Some(TokenSecret::new("r"))),
			Some(CredentialPair::new("a", "r"))
		);
	}

	#[test]
	fn rotate_keeps_refresh_token_without_rotation() {
		let pair = CredentialPair::new("old-access", "old-refresh");
		let kept = pair.rotate(TokenSecret::new("new-access"), None);
		let rotated =
			pair.rotate(TokenSecret::new("new-access"), Some(TokenSecret::new("new-refresh")));

		assert_eq!(kept, CredentialPair::new("new-access", "old-refresh"));
		assert_eq!(rotated, CredentialPair::new("new-access", "new-refresh"));
	}

	#[test]
	fn debug_output_hides_both_tokens() {
		let rendered = format!("{:?}", CredentialPair::new("access-secret", "refresh-secret"));

		assert!(!rendered.contains("access-secret"));
		assert!(!rendered.contains("refresh-secret"));
	}

	#[test]
	fn roles_round_trip_through_labels() {
		for role in [UserRole::Admin, UserRole::Parent, UserRole::Supplier, UserRole::SuperAdmin] {
			assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
		}

		assert!("janitor".parse::<UserRole>().is_err());
		assert_eq!(SessionState::of(None), SessionState::Anonymous);
	}
}
