use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dishes::dto::DishPayload;

pub(crate) const DISH_COLUMNS: &str = r#"
    id, name, description, price, cuisine, flavor,
    calories, protein, fat, carbohydrate, fiber, sodium, cholesterol,
    ingredients, allergens, dietary_tags, health_benefits, health_warnings,
    rating, review_count, created_at
"#;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dish {
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
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
    pub cholesterol: Option<f64>,
    pub ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub dietary_tags: Vec<String>,
    pub health_benefits: Vec<String>,
    pub health_warnings: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub created_at: OffsetDateTime,
}

/// Server-side catalog queries.
#[derive(Debug, Clone)]
pub enum DishQuery {
    All,
    Cuisine(String),
    Flavor(String),
    CaloriesBetween(f64, f64),
    HighProtein(f64),
    LowFat(f64),
    TopRated(f64),
    DietaryTag(String),
    WithoutAllergen(String),
    ForDisease(String),
}

impl DishQuery {
    fn sql(&self) -> String {
        let filter = match self {
            DishQuery::All => "TRUE ORDER BY created_at ASC",
            DishQuery::Cuisine(_) => "cuisine = $1 ORDER BY created_at ASC",
            DishQuery::Flavor(_) => "flavor = $1 ORDER BY created_at ASC",
            DishQuery::CaloriesBetween(..) => {
                "calories BETWEEN $1 AND $2 ORDER BY calories ASC"
            }
            DishQuery::HighProtein(_) => "protein > $1 ORDER BY protein DESC",
            DishQuery::LowFat(_) => "fat < $1 ORDER BY fat ASC",
            DishQuery::TopRated(_) => {
                "rating >= $1 ORDER BY rating DESC, review_count DESC NULLS LAST"
            }
            DishQuery::DietaryTag(_) => "$1 = ANY(dietary_tags) ORDER BY created_at ASC",
            DishQuery::WithoutAllergen(_) => {
                "NOT ($1 = ANY(allergens)) ORDER BY created_at ASC"
            }
            DishQuery::ForDisease(_) => "$1 = ANY(health_benefits) ORDER BY created_at ASC",
        };
        format!("SELECT {DISH_COLUMNS} FROM dishes WHERE {filter}")
    }
}

impl Dish {
    pub async fn query(db: &PgPool, q: &DishQuery) -> anyhow::Result<Vec<Dish>> {
        let sql = q.sql();
        let query = sqlx::query_as::<_, Dish>(&sql);
        let query = match q {
            DishQuery::All => query,
            DishQuery::Cuisine(s)
            | DishQuery::Flavor(s)
            | DishQuery::DietaryTag(s)
            | DishQuery::WithoutAllergen(s)
            | DishQuery::ForDisease(s) => query.bind(s.clone()),
            DishQuery::CaloriesBetween(min, max) => query.bind(*min).bind(*max),
            DishQuery::HighProtein(v) | DishQuery::LowFat(v) | DishQuery::TopRated(v) => {
                query.bind(*v)
            }
        };
        Ok(query.fetch_all(db).await?)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Dish>> {
        Self::query(db, &DishQuery::All).await
    }

    /// The first `limit` dishes in catalog order.
    pub async fn list_first(db: &PgPool, limit: i64) -> anyhow::Result<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes ORDER BY created_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(dishes)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    /// Loads the given ids, keeping the order of `ids` and skipping unknown ones.
    pub async fn find_many(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<Vec<Dish>> {
        let found = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(db)
        .await?;
        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|d| d.id == *id).cloned())
            .collect())
    }

    pub async fn create(db: &PgPool, name: &str, p: &DishPayload) -> anyhow::Result<Dish> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            r#"
            INSERT INTO dishes (
                name, description, price, cuisine, flavor,
                calories, protein, fat, carbohydrate, fiber, sodium, cholesterol,
                ingredients, allergens, dietary_tags, health_benefits, health_warnings,
                rating, review_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    COALESCE($13, '{{}}'), COALESCE($14, '{{}}'), COALESCE($15, '{{}}'),
                    COALESCE($16, '{{}}'), COALESCE($17, '{{}}'),
                    $18, $19)
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(non_blank(&p.description))
        .bind(p.price)
        .bind(non_blank(&p.cuisine))
        .bind(non_blank(&p.flavor))
        .bind(p.calories)
        .bind(p.protein)
        .bind(p.fat)
        .bind(p.carbohydrate)
        .bind(p.fiber)
        .bind(p.sodium)
        .bind(p.cholesterol)
        .bind(&p.ingredients)
        .bind(&p.allergens)
        .bind(&p.dietary_tags)
        .bind(&p.health_benefits)
        .bind(&p.health_warnings)
        .bind(p.rating)
        .bind(p.review_count)
        .fetch_one(db)
        .await?;
        Ok(dish)
    }

    /// Applies every field present in `p`; absent fields keep their value.
    pub async fn update(db: &PgPool, id: Uuid, p: &DishPayload) -> anyhow::Result<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            r#"
            UPDATE dishes SET
                name            = COALESCE($2, name),
                description     = COALESCE($3, description),
                price           = COALESCE($4, price),
                cuisine         = COALESCE($5, cuisine),
                flavor          = COALESCE($6, flavor),
                calories        = COALESCE($7, calories),
                protein         = COALESCE($8, protein),
                fat             = COALESCE($9, fat),
                carbohydrate    = COALESCE($10, carbohydrate),
                fiber           = COALESCE($11, fiber),
                sodium          = COALESCE($12, sodium),
                cholesterol     = COALESCE($13, cholesterol),
                ingredients     = COALESCE($14, ingredients),
                allergens       = COALESCE($15, allergens),
                dietary_tags    = COALESCE($16, dietary_tags),
                health_benefits = COALESCE($17, health_benefits),
                health_warnings = COALESCE($18, health_warnings),
                rating          = COALESCE($19, rating),
                review_count    = COALESCE($20, review_count)
            WHERE id = $1
            RETURNING {DISH_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(non_blank(&p.name))
        .bind(&p.description)
        .bind(p.price)
        .bind(&p.cuisine)
        .bind(&p.flavor)
        .bind(p.calories)
        .bind(p.protein)
        .bind(p.fat)
        .bind(p.carbohydrate)
        .bind(p.fiber)
        .bind(p.sodium)
        .bind(p.cholesterol)
        .bind(&p.ingredients)
        .bind(&p.allergens)
        .bind(&p.dietary_tags)
        .bind(&p.health_benefits)
        .bind(&p.health_warnings)
        .bind(p.rating)
        .bind(p.review_count)
        .fetch_optional(db)
        .await?;
        Ok(dish)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
pub(crate) fn sample_dish(name: &str, cuisine: &str, flavor: &str) -> Dish {
    Dish {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        price: Some(38.0),
        cuisine: Some(cuisine.into()),
        flavor: Some(flavor.into()),
        calories: Some(300.0),
        protein: Some(20.0),
        fat: Some(10.0),
        carbohydrate: Some(30.0),
        fiber: None,
        sodium: None,
        cholesterol: None,
        ingredients: vec![],
        allergens: vec![],
        dietary_tags: vec![],
        health_benefits: vec![],
        health_warnings: vec![],
        rating: None,
        review_count: None,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}
