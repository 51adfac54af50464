use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::health::{self, Gender};
use crate::users::dto::UserPayload;

const USER_COLUMNS: &str = r#"
    id, username, email, age, gender, weight, height,
    preferred_cuisines, preferred_flavors, preferred_ingredients,
    allergies, dietary_restrictions, diseases, created_at
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub preferred_cuisines: Vec<String>,
    pub preferred_flavors: Vec<String>,
    pub preferred_ingredients: Vec<String>,
    pub allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub diseases: Vec<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(Gender::parse)
    }

    pub fn bmi(&self) -> Option<f64> {
        health::bmi(self.weight?, self.height?)
    }

    pub fn bmr(&self) -> Option<f64> {
        health::bmr(self.weight?, self.height?, self.age?, self.gender()?)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn exists_by_username(db: &PgPool, username: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    pub async fn exists_by_email(db: &PgPool, email: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    /// Inserts a user; `username` and `email` must already be validated.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        p: &UserPayload,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (
                username, email, age, gender, weight, height,
                preferred_cuisines, preferred_flavors, preferred_ingredients,
                allergies, dietary_restrictions, diseases
            )
            VALUES ($1, $2, $3, $4, $5, $6,
                    COALESCE($7, '{{}}'), COALESCE($8, '{{}}'), COALESCE($9, '{{}}'),
                    COALESCE($10, '{{}}'), COALESCE($11, '{{}}'), COALESCE($12, '{{}}'))
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(p.age)
        .bind(p.gender.map(|g| g.as_str()))
        .bind(p.weight)
        .bind(p.height)
        .bind(&p.preferred_cuisines)
        .bind(&p.preferred_flavors)
        .bind(&p.preferred_ingredients)
        .bind(&p.allergies)
        .bind(&p.dietary_restrictions)
        .bind(&p.diseases)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Applies every field present in `p`; absent fields keep their value.
    pub async fn update(db: &PgPool, id: Uuid, p: &UserPayload) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                username              = COALESCE($2, username),
                email                 = COALESCE($3, email),
                age                   = COALESCE($4, age),
                gender                = COALESCE($5, gender),
                weight                = COALESCE($6, weight),
                height                = COALESCE($7, height),
                preferred_cuisines    = COALESCE($8, preferred_cuisines),
                preferred_flavors     = COALESCE($9, preferred_flavors),
                preferred_ingredients = COALESCE($10, preferred_ingredients),
                allergies             = COALESCE($11, allergies),
                dietary_restrictions  = COALESCE($12, dietary_restrictions),
                diseases              = COALESCE($13, diseases)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(p.username.as_deref().map(str::trim))
        .bind(p.email.as_deref().map(str::trim))
        .bind(p.age)
        .bind(p.gender.map(|g| g.as_str()))
        .bind(p.weight)
        .bind(p.height)
        .bind(&p.preferred_cuisines)
        .bind(&p.preferred_flavors)
        .bind(&p.preferred_ingredients)
        .bind(&p.allergies)
        .bind(&p.dietary_restrictions)
        .bind(&p.diseases)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        age: Some(30),
        gender: Some("F".into()),
        weight: Some(70.0),
        height: Some(175.0),
        preferred_cuisines: vec![],
        preferred_flavors: vec![],
        preferred_ingredients: vec![],
        allergies: vec![],
        dietary_restrictions: vec![],
        diseases: vec![],
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}
