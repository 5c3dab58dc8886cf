//! Meals and their nutrition facts.

// self
use crate::{
	_prelude::*,
	auth::ResourceId,
	envelope::Page,
	http::HttpTransport,
	pipeline::RequestDescriptor,
	resources::{ApiClient, PageRequest, School, item_path, scoped_path},
};

const MEALS_PATH: &str = "/api/v1/meals";

/// Meal offered by a school.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meal {
	/// Identifier.
	pub id: ResourceId,
	/// Meal name.
	pub name: String,
	/// Free-form description.
	#[serde(default)]
	pub description: String,
	/// Energy in kcal.
	pub calories: f64,
	/// Protein in grams.
	pub protein: f64,
	/// Carbohydrates in grams.
	pub carbs: f64,
	/// Fat in grams.
	pub fat: f64,
	/// Allergen notes.
	#[serde(default)]
	pub allergens: Option<String>,
	/// Owning school.
	pub school_id: ResourceId,
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

/// New meal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateMeal {
	/// Meal name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Energy in kcal.
	pub calories: f64,
	/// Protein in grams.
	pub protein: f64,
	/// Carbohydrates in grams.
	pub carbs: f64,
	/// Fat in grams.
	pub fat: f64,
	/// Allergen notes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub allergens: Option<String>,
	/// Owning school.
	pub school_id: ResourceId,
}

/// Partial meal update.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[allow(missing_docs)]
pub struct UpdateMeal {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub calories: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub protein: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub carbs: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fat: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub allergens: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a meal.
	pub async fn create_meal(&self, meal: &CreateMeal) -> Result<Meal> {
		let descriptor = RequestDescriptor::post(MEALS_PATH).json(meal)?.operation("create_meal");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Fetches a meal.
	pub async fn meal(&self, id: &ResourceId) -> Result<Meal> {
		let descriptor = RequestDescriptor::get(item_path(MEALS_PATH, id)).operation("meal");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Lists meals.
	pub async fn list_meals(&self, page: PageRequest) -> Result<Page<Meal>> {
		let descriptor = page.apply(RequestDescriptor::get(MEALS_PATH)).operation("list_meals");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Lists the meals offered by a school.
	pub async fn meals_by_school(
		&self,
		school_id: &ResourceId,
		page: PageRequest,
	) -> Result<Page<Meal>> {
		let descriptor = page
			.apply(RequestDescriptor::get(scoped_path(MEALS_PATH, "school", school_id)))
			.operation("meals_by_school");

		self.pipeline().execute_page(&descriptor).await
	}

	/// Updates a meal.
	pub async fn update_meal(&self, id: &ResourceId, update: &UpdateMeal) -> Result<Meal> {
		let descriptor = RequestDescriptor::put(item_path(MEALS_PATH, id))
			.json(update)?
			.operation("update_meal");

		self.pipeline().execute_data(&descriptor).await
	}

	/// Deletes a meal.
	pub async fn delete_meal(&self, id: &ResourceId) -> Result<()> {
		let descriptor =
			RequestDescriptor::delete(item_path(MEALS_PATH, id)).operation("delete_meal");

		self.pipeline().execute_empty(&descriptor).await
	}
}
