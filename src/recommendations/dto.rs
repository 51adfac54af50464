use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dishes::dto::DishDto;

/// Body of `POST /recommendations/generate`. Every list and limit is merged
/// with, or added to, what the user profile already says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_cuisines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_flavors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fat: Option<f64>,
    /// Breakfast, lunch, dinner or snack. Carried for logging only.
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub dish: DishDto,
    pub score: f64,
    pub reason: String,
    pub cuisine_match: Option<f64>,
    pub flavor_match: Option<f64>,
    #[serde(default)]
    pub ingredient_match: Option<f64>,
    pub health_match: Option<f64>,
    #[serde(default)]
    pub nutrition_match: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub recommended_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_clicked: bool,
    #[serde(default)]
    pub is_ordered: bool,
    #[serde(default)]
    pub user_rating: Option<i32>,
    #[serde(default)]
    pub user_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimpleParams {
    #[serde(default = "default_count")]
    pub count: usize,
}
pub fn default_count() -> usize { 10 }

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackParams {
    #[serde(default)]
    pub clicked: bool,
    #[serde(default)]
    pub ordered: bool,
    pub rating: Option<i32>,
    pub feedback: Option<String>,
}
