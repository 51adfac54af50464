use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::health::Gender;
use crate::users::repo::User;

/// A user as it travels over the wire and sits in the client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub preferred_cuisines: Vec<String>,
    #[serde(default)]
    pub preferred_flavors: Vec<String>,
    #[serde(default)]
    pub preferred_ingredients: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        let gender = u.gender();
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            age: u.age,
            gender,
            weight: u.weight,
            height: u.height,
            preferred_cuisines: u.preferred_cuisines,
            preferred_flavors: u.preferred_flavors,
            preferred_ingredients: u.preferred_ingredients,
            allergies: u.allergies,
            dietary_restrictions: u.dietary_restrictions,
            diseases: u.diseases,
            created_at: Some(u.created_at),
        }
    }
}

/// Body of `POST /users` and `PUT /users/{id}`. On update only the
/// fields that are present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub preferred_cuisines: Option<Vec<String>>,
    pub preferred_flavors: Option<Vec<String>>,
    pub preferred_ingredients: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub diseases: Option<Vec<String>>,
}
