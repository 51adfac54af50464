use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dishes::repo::Dish;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cuisine: Option<String>,
    pub flavor: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrate: Option<f64>,
    #[serde(default)]
    pub fiber: Option<f64>,
    #[serde(default)]
    pub sodium: Option<f64>,
    #[serde(default)]
    pub cholesterol: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub health_benefits: Vec<String>,
    #[serde(default)]
    pub health_warnings: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<Dish> for DishDto {
    fn from(d: Dish) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            price: d.price,
            cuisine: d.cuisine,
            flavor: d.flavor,
            calories: d.calories,
            protein: d.protein,
            fat: d.fat,
            carbohydrate: d.carbohydrate,
            fiber: d.fiber,
            sodium: d.sodium,
            cholesterol: d.cholesterol,
            ingredients: d.ingredients,
            allergens: d.allergens,
            dietary_tags: d.dietary_tags,
            health_benefits: d.health_benefits,
            health_warnings: d.health_warnings,
            rating: d.rating,
            review_count: d.review_count,
            created_at: Some(d.created_at),
        }
    }
}

/// Body of `POST /dishes` and `PUT /dishes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cuisine: Option<String>,
    pub flavor: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_benefits: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloriesRange {
    pub min_calories: f64,
    pub max_calories: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinProtein {
    #[serde(default = "default_min_protein")]
    pub min_protein: f64,
}
fn default_min_protein() -> f64 { 15.0 }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxFat {
    #[serde(default = "default_max_fat")]
    pub max_fat: f64,
}
fn default_max_fat() -> f64 { 10.0 }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinRating {
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
}
fn default_min_rating() -> f64 { 4.0 }
