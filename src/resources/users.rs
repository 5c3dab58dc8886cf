//! User accounts.

// self
use crate::{
	_prelude::*,
	auth::{ResourceId, UserRole},
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, ProfileUpdate, item_path},
};

const USERS_PATH: &str = "/api/v1/users";

/// Platform user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Identifier.
	pub id: ResourceId,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Account email.
	pub email: String,
	/// Contact phone.
	#[serde(default)]
	pub phone: Option<String>,
	/// Assigned role.
	pub role: UserRole,
	/// Postal address.
	#[serde(default)]
	pub address: Option<String>,
	/// School the user belongs to.
	#[serde(default)]
	pub school_id: Option<ResourceId>,
	/// Whether the account is enabled.
	pub is_active: bool,
	/// Most recent login.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_login_at: Option<OffsetDateTime>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl User {
	/// Display name built from the given and family names.
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the current user.
	pub async fn me(&self) -> Result<User> {
		let descriptor = RequestDescriptor::get(format!("{USERS_PATH}/me")).operation("me");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Updates the current user.
	pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User> {
		let descriptor =
			RequestDescriptor::put(format!("{USERS_PATH}/me")).json(update)?.operation("update_me");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a user by identifier.
	pub async fn user(&self, id: &ResourceId) -> Result<User> {
		let descriptor = RequestDescriptor::get(item_path(USERS_PATH, id)).operation("user");

		self.pipeline().execute_data(&descriptor).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_decodes_backend_timestamps() {
		let user: User = serde_json::from_str(
			r#"{
				"id": "u-1",
				"first_name": "Siti",
				"last_name": "Rahma",
				"email": "siti@example.com",
				"role": "parent",
				"is_active": true,
				"last_login_at": null,
				"created_at": "2024-07-01T08:00:00Z",
				"updated_at": "2024-07-02T09:30:00.123456+07:00"
			}"#,
		)
		.expect("Backend user payload should decode.");

		assert_eq!(user.role, UserRole::Parent);
		assert_eq!(user.full_name(), "Siti Rahma");
		assert!(user.last_login_at.is_none());
		assert!(user.updated_at > user.created_at);
	}
}
