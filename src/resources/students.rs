//! Students.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, PageRequest, School, item_path, scoped_path},
};

const STUDENTS_PATH: &str = "/api/v1/students";

/// Student record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
	/// Identifier.
	pub id: ResourceId,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Contact email.
	#[serde(default)]
	pub email: Option<String>,
	/// Contact phone.
	#[serde(default)]
	pub phone: Option<String>,
	/// Enrolling school.
	pub school_id: ResourceId,
	/// Parent account.
	#[serde(default)]
	pub parent_id: Option<ResourceId>,
	/// Birth date as sent by the backend (`YYYY-MM-DD`).
	#[serde(default)]
	pub date_of_birth: Option<String>,
	/// Grade label.
	#[serde(default)]
	pub grade: Option<String>,
	/// Whether the student is enrolled.
	pub is_active: bool,
	/// Embedded school, when the backend expands it.
	#[serde(default)]
	pub school: Option<School>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateStudent {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Contact email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Contact phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Enrolling school.
	pub school_id: ResourceId,
	/// Parent account.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<ResourceId>,
	/// Birth date (`YYYY-MM-DD`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_of_birth: Option<String>,
	/// Grade label.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grade: Option<String>,
}

/// Partial student update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateStudent {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grade: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date_of_birth: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a student.
	pub async fn create_student(&self, student: &CreateStudent) -> Result<Student> {
		let descriptor =
			RequestDescriptor::post(STUDENTS_PATH).json(student)?.operation("create_student");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a student.
	pub async fn student(&self, id: &ResourceId) -> Result<Student> {
		let descriptor = RequestDescriptor::get(item_path(STUDENTS_PATH, id)).operation("student");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists every student visible to the caller.
	pub async fn list_students(&self, page: PageRequest) -> Result<Page<Student>> {
		let descriptor =
			page.apply(RequestDescriptor::get(STUDENTS_PATH)).operation("list_students");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the students enrolled at a school.
	pub async fn students_by_school(
		&self,
		school_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Student>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(STUDENTS_PATH, "school", school_id)))
			.operation("students_by_school");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the children of a parent account.
	pub async fn students_by_parent(
		&self,
		parent_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Student>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(STUDENTS_PATH, "parent", parent_id)))
			.operation("students_by_parent");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates a student.
	pub async fn update_student(&self, id: &ResourceId, update: &UpdateStudent) -> Result<Student> {
		let descriptor = RequestDescriptor::put(item_path(STUDENTS_PATH, id))
			.json(update)?
			.operation("update_student");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes a student.
	pub async fn delete_student(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(STUDENTS_PATH, id)).operation("delete_student");

		self.pipeline().execute_empty(&descriptor).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn update_omits_unset_fields() {
		let update = UpdateStudent { grade: Some("4B".into()), ..Default::default() };

		assert_eq!(
			serde_json::to_value(&update).expect("Student update should serialize."),
			serde_json::json!({ "grade": "4B" })
		);
	}
}
