//! Schools.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, PageRequest, item_path},
};

const SCHOOLS_PATH: &str = "/api/v1/schools";

/// School record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct School {
	/// Identifier.
	pub id: ResourceId,
	/// School name.
	pub name: String,
	/// Postal address.
	pub address: String,
	/// Contact phone.
	pub phone: String,
	/// Contact email.
	pub email: String,
	/// Principal's name.
	pub principal: String,
	/// Enrolled students.
	#[serde(default)]
	pub students_count: u64,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New school.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateSchool {
	/// School name.
	pub name: String,
	/// Postal address.
	pub address: String,
	/// Contact phone.
	pub phone: String,
	/// Contact email.
	pub email: String,
	/// Principal's name.
	pub principal: String,
}

/// Partial school update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSchool {
	/// School name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Postal address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Contact phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Contact email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Principal's name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub principal: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a school.
	pub async fn create_school(&self, school: &CreateSchool) -> Result<School> {
		let descriptor =
			RequestDescriptor::post(SCHOOLS_PATH).json(school)?.operation("create_school");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a school.
	pub async fn school(&self, id: &ResourceId) -> Result<School> {
		let descriptor = RequestDescriptor::get(item_path(SCHOOLS_PATH, id)).operation("school");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists schools.
	pub async fn list_schools(&self, page: PageRequest) -> Result<Page<School>> {
		let descriptor = page.apply(RequestDescriptor::get(SCHOOLS_PATH)).operation("list_schools");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates a school.
	pub async fn update_school(&self, id: &ResourceId, update: &UpdateSchool) -> Result<School> {
		let descriptor = RequestDescriptor::put(item_path(SCHOOLS_PATH, id))
			.json(update)?
			.operation("update_school");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes a school.
	pub async fn delete_school(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(SCHOOLS_PATH, id)).operation("delete_school");

		self.pipeline().execute_empty(&descriptor).await
	}
}
