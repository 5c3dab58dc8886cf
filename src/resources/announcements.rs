//! School announcements.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, PageRequest, School, item_path, scoped_path},
};

const ANNOUNCEMENTS_PATH: &str = "/api/v1/announcements";

/// Announcement published to a school.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
	/// Identifier.
	pub id: ResourceId,
	/// Headline.
	pub title: String,
	/// Body text.
	pub content: String,
	/// Target school.
	pub school_id: ResourceId,
	/// Author account.
	#[serde(default)]
	pub author_id: Option<ResourceId>,
	/// Whether the announcement is visible.
	pub is_active: bool,
	/// Publication instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub published_at: Option<OffsetDateTime>,
	/// Embedded school, when expanded.
	#[serde(default)]
	pub school: Option<School>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New announcement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateAnnouncement {
	/// Headline.
	pub title: String,
	/// Body text.
	pub content: String,
	/// Target school.
	pub school_id: ResourceId,
	/// Visibility; the backend defaults to visible.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	/// Scheduled publication instant.
	#[serde(
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub published_at: Option<OffsetDateTime>,
}

/// Partial announcement update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateAnnouncement {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
	#[serde(
		skip_serializing_if = "Option::is_none",
		with = "time::serde::rfc3339::option"
	)]
	pub published_at: Option<OffsetDateTime>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Publishes an announcement.
	pub async fn create_announcement(
		&self,
		announcement: &CreateAnnouncement,
	) -> Result<Announcement> {
		let descriptor = RequestDescriptor::post(ANNOUNCEMENTS_PATH)
			.json(announcement)?
			.operation("create_announcement");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches an announcement.
	pub async fn announcement(&self, id: &ResourceId) -> Result<Announcement> {
		let descriptor =
			RequestDescriptor::get(item_path(ANNOUNCEMENTS_PATH, id)).operation("announcement");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists announcements.
	pub async fn list_announcements(&self, page: PageRequest) -> Result<Page<Announcement>> {
		let descriptor =
			page.apply(RequestDescriptor::get(ANNOUNCEMENTS_PATH)).operation("list_announcements");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the announcements of one school.
	pub async fn announcements_by_school(
		&self,
		school_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Announcement>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(ANNOUNCEMENTS_PATH, "school", school_id)))
			.operation("announcements_by_school");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates an announcement.
	pub async fn update_announcement(
		&self,
		id: &ResourceId,
		update: &UpdateAnnouncement,
	) -> Result<Announcement> {
		let descriptor = RequestDescriptor::put(item_path(ANNOUNCEMENTS_PATH, id))
			.json(update)?
			.operation("update_announcement");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes an announcement.
	pub async fn delete_announcement(&self, id: &ResourceId) -> Result<()> {
		let descriptor = RequestDescriptor::delete(item_path(ANNOUNCEMENTS_PATH, id))
			.operation("delete_announcement");

		self.pipeline().execute_empty(&descriptor).await
	}
}
