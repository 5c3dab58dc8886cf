//! Supplier orders.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, Meal, PageRequest, Supplier, item_path, scoped_path},
};

const ORDERS_PATH: &str = "/api/v1/orders";

/// Order lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
	/// Placed, awaiting supplier confirmation.
	Pending,
	/// Accepted by the supplier.
	Confirmed,
	/// Delivered to the school.
	Delivered,
	/// Cancelled before delivery.
	Cancelled,
}
impl OrderStatus {
	/// Returns the wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Confirmed => "confirmed",
			Self::Delivered => "delivered",
			Self::Cancelled => "cancelled",
		}
	}

	/// Whether no further transitions are expected.
	pub fn is_final(self) -> bool {
		matches!(self, Self::Delivered | Self::Cancelled)
	}
}
impl Display for OrderStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Order record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Identifier.
	pub id: ResourceId,
	/// Student the order is for.
	#[serde(default)]
	pub student_id: Option<ResourceId>,
	/// Ordered meal.
	#[serde(default)]
	pub meal_id: Option<ResourceId>,
	/// Fulfilling supplier.
	pub supplier_id: ResourceId,
	/// Receiving school.
	#[serde(default)]
	pub school_id: Option<ResourceId>,
	/// Number of portions.
	pub quantity: i64,
	/// Total price.
	pub total_price: f64,
	/// Lifecycle state.
	pub status: OrderStatus,
	/// Requested delivery date (`YYYY-MM-DD`).
	#[serde(default)]
	pub delivery_date: Option<String>,
	/// Free-form notes.
	#[serde(default)]
	pub notes: Option<String>,
	/// Embedded meal, when expanded.
	#[serde(default)]
	pub meal: Option<Meal>,
	/// Embedded supplier, when expanded.
	#[serde(default)]
	pub supplier: Option<Supplier>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct CreateOrder {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub student_id: Option<ResourceId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meal_id: Option<ResourceId>,
	pub supplier_id: ResourceId,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub school_id: Option<ResourceId>,
	pub quantity: i64,
	pub total_price: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// Partial order update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateOrder {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub quantity: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total_price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivery_date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

/// Status transition request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateOrderStatus {
	/// Target state.
	pub status: OrderStatus,
	/// Reason shown to the other party, typically for cancellations.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}
impl UpdateOrderStatus {
	/// Transition without a reason.
	pub fn to(status: OrderStatus) -> Self {
		Self { status, reason: None }
	}

	/// Attaches a reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Places an order.
	pub async fn create_order(&self, order: &CreateOrder) -> Result<Order> {
		let descriptor =
			RequestDescriptor::post(ORDERS_PATH).json(order)?.operation("create_order");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches an order.
	pub async fn order(&self, id: &ResourceId) -> Result<Order> {
		let descriptor = RequestDescriptor::get(item_path(ORDERS_PATH, id)).operation("order");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists orders.
	pub async fn list_orders(&self, page: PageRequest) -> Result<Page<Order>> {
		let descriptor = page.apply(RequestDescriptor::get(ORDERS_PATH)).operation("list_orders");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the orders assigned to a supplier.
	pub async fn orders_by_supplier(
		&self,
		supplier_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Order>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(ORDERS_PATH, "supplier", supplier_id)))
			.operation("orders_by_supplier");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the orders placed for a school.
	pub async fn orders_by_school(
		&self,
		school_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Order>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(ORDERS_PATH, "school", school_id)))
			.operation("orders_by_school");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates an order.
	pub async fn update_order(&self, id: &ResourceId, update: &UpdateOrder) -> Result<Order> {
		let descriptor = RequestDescriptor::put(item_path(ORDERS_PATH, id))
			.json(update)?
			.operation("update_order");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Moves an order to another lifecycle state.
	pub async fn update_order_status(
		&self,
		id: &ResourceId,
		update: &UpdateOrderStatus,
	) -> Result<Order> {
		let descriptor = RequestDescriptor::patch(format!("{}/status", item_path(ORDERS_PATH, id)))
			.json(update)?
			.operation("update_order_status");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes an order.
	pub async fn delete_order(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(ORDERS_PATH, id)).operation("delete_order");

		self.pipeline().execute_empty(&descriptor).await
	}
}
