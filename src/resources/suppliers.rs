//! Meal suppliers.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, PageRequest, item_path},
};

const SUPPLIERS_PATH: &str = "/api/v1/suppliers";

/// Supplier record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
	/// Identifier.
	pub id: ResourceId,
	/// Business name.
	pub name: String,
	/// Contact email.
	pub email: String,
	/// Contact phone.
	pub phone: String,
	/// Business address.
	pub address: String,
	/// Free-form description.
	#[serde(default)]
	pub description: Option<String>,
	/// Average review rating.
	#[serde(default)]
	pub rating: f64,
	/// Whether the platform verified the supplier.
	#[serde(default)]
	pub is_verified: bool,
	/// Linked user account.
	#[serde(default)]
	pub user_id: Option<ResourceId>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New supplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct CreateSupplier {
	pub name: String,
	pub email: String,
	pub phone: String,
	pub address: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Partial supplier update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateSupplier {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Registers a supplier.
	pub async fn create_supplier(&self, supplier: &CreateSupplier) -> Result<Supplier> {
		let descriptor =
			RequestDescriptor::post(SUPPLIERS_PATH).json(supplier)?.operation("create_supplier");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a supplier.
	pub async fn supplier(&self, id: &ResourceId) -> Result<Supplier> {
		let descriptor =
			RequestDescriptor::get(item_path(SUPPLIERS_PATH, id)).operation("supplier");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists suppliers.
	pub async fn list_suppliers(&self, page: PageRequest) -> Result<Page<Supplier>> {
		let descriptor =
			page.apply(RequestDescriptor::get(SUPPLIERS_PATH)).operation("list_suppliers");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates a supplier.
	pub async fn update_supplier(
		&self,
		id: &ResourceId,
		update: &UpdateSupplier,
	) -> Result<Supplier> {
		let descriptor = RequestDescriptor::put(item_path(SUPPLIERS_PATH, id))
			.json(update)?
			.operation("update_supplier");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes a supplier.
	pub async fn delete_supplier(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(SUPPLIERS_PATH, id)).operation("delete_supplier");

		self.pipeline().execute_empty(&descriptor).await
	}
}
