//! Meal plans assigning meals to students over a date range.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, Meal, PageRequest, item_path, scoped_path},
};

const MEAL_PLANS_PATH: &str = "/api/v1/meal-plans";

/// Meal plan record. Dates are calendar dates (`YYYY-MM-DD`) kept as sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MealPlan {
	pub id: ResourceId,
	pub student_id: ResourceId,
	pub meal_id: ResourceId,
	pub start_date: String,
	pub end_date: String,
	#[serde(default)]
	pub meal: Option<Meal>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

/// New meal plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct CreateMealPlan {
	pub student_id: ResourceId,
	pub meal_id: ResourceId,
	pub start_date: String,
	pub end_date: String,
}

/// Partial meal plan update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateMealPlan {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meal_id: Option<ResourceId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_date: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub end_date: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a meal plan.
	pub async fn create_meal_plan(&self, plan: &CreateMealPlan) -> Result<MealPlan> {
		let descriptor =
			RequestDescriptor::post(MEAL_PLANS_PATH).json(plan)?.operation("create_meal_plan");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a meal plan.
	pub async fn meal_plan(&self, id: &ResourceId) -> Result<MealPlan> {
		let descriptor =
			RequestDescriptor::get(item_path(MEAL_PLANS_PATH, id)).operation("meal_plan");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists meal plans.
	pub async fn list_meal_plans(&self, page: PageRequest) -> Result<Page<MealPlan>> {
		let descriptor =
			page.apply(RequestDescriptor::get(MEAL_PLANS_PATH)).operation("list_meal_plans");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the meal plans of one student.
	pub async fn meal_plans_by_student(
		&self,
		student_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<MealPlan>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(MEAL_PLANS_PATH, "student", student_id)))
			.operation("meal_plans_by_student");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates a meal plan.
	pub async fn update_meal_plan(
		&self,
		id: &ResourceId,
		update: &UpdateMealPlan,
	) -> Result<MealPlan> {
		let descriptor = RequestDescriptor::put(item_path(MEAL_PLANS_PATH, id))
			.json(update)?
			.operation("update_meal_plan");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes a meal plan.
	pub async fn delete_meal_plan(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(MEAL_PLANS_PATH, id)).operation("delete_meal_plan");

		self.pipeline().execute_empty(&descriptor).await
	}
}
