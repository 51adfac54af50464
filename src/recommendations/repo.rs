use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dishes::{dto::DishDto, repo::Dish};
use crate::recommendations::{dto::RecommendationDto, services::Scored};

#[derive(Debug, Clone, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub dish_id: Uuid,
    pub score: f64,
    pub reason: String,
    pub cuisine_match: Option<f64>,
    pub flavor_match: Option<f64>,
    pub ingredient_match: Option<f64>,
    pub health_match: Option<f64>,
    pub nutrition_match: Option<f64>,
    pub is_clicked: bool,
    pub is_ordered: bool,
    pub user_rating: Option<i32>,
    pub user_feedback: Option<String>,
    pub recommended_at: OffsetDateTime,
}

impl RecommendationRow {
    pub fn into_dto(self, dish: Dish) -> RecommendationDto {
        RecommendationDto {
            id: Some(self.id),
            dish: DishDto::from(dish),
            score: self.score,
            reason: self.reason,
            cuisine_match: self.cuisine_match,
            flavor_match: self.flavor_match,
            ingredient_match: self.ingredient_match,
            health_match: self.health_match,
            nutrition_match: self.nutrition_match,
            recommended_at: Some(self.recommended_at),
            is_clicked: self.is_clicked,
            is_ordered: self.is_ordered,
            user_rating: self.user_rating,
            user_feedback: self.user_feedback,
        }
    }
}

/// Persists a ranked list in one transaction and returns it in rank order.
pub async fn save_all(
    db: &PgPool,
    user_id: Uuid,
    ranked: Vec<Scored>,
) -> anyhow::Result<Vec<RecommendationDto>> {
    let mut tx = db.begin().await.context("begin recommendations tx")?;
    let mut saved = Vec::with_capacity(ranked.len());

    for s in ranked {
        let row = sqlx::query_as::<_, RecommendationRow>(
            r#"
            INSERT INTO recommendations (
                user_id, dish_id, score, reason,
                cuisine_match, flavor_match, ingredient_match, health_match, nutrition_match
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, dish_id, score, reason,
                      cuisine_match, flavor_match, ingredient_match, health_match, nutrition_match,
                      is_clicked, is_ordered, user_rating, user_feedback, recommended_at
            "#,
        )
        .bind(user_id)
        .bind(s.dish.id)
        .bind(s.score)
        .bind(&s.reason)
        .bind(s.cuisine_match)
        .bind(s.flavor_match)
        .bind(s.ingredient_match)
        .bind(s.health_match)
        .bind(s.nutrition_match)
        .fetch_one(&mut *tx)
        .await
        .context("insert recommendation")?;
        saved.push(row.into_dto(s.dish));
    }

    tx.commit().await.context("commit recommendations tx")?;
    Ok(saved)
}

/// A user's recommendations, newest first, with their dishes attached.
pub async fn history(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<RecommendationDto>> {
    let rows = sqlx::query_as::<_, RecommendationRow>(
        r#"
        SELECT id, dish_id, score, reason,
               cuisine_match, flavor_match, ingredient_match, health_match, nutrition_match,
               is_clicked, is_ordered, user_rating, user_feedback, recommended_at
          FROM recommendations
         WHERE user_id = $1
         ORDER BY recommended_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list recommendations by user")?;

    let mut dish_ids: Vec<Uuid> = rows.iter().map(|r| r.dish_id).collect();
    dish_ids.sort_unstable();
    dish_ids.dedup();
    let dishes = Dish::find_many(db, &dish_ids).await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let dish = dishes.iter().find(|d| d.id == r.dish_id)?.clone();
            Some(r.into_dto(dish))
        })
        .collect())
}

/// Records what the user did with a recommendation. Returns false when the
/// recommendation does not exist.
pub async fn update_feedback(
    db: &PgPool,
    id: Uuid,
    clicked: bool,
    ordered: bool,
    rating: Option<i32>,
    feedback: Option<&str>,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE recommendations
           SET is_clicked = $2, is_ordered = $3, user_rating = $4, user_feedback = $5
         WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(clicked)
    .bind(ordered)
    .bind(rating)
    .bind(feedback)
    .execute(db)
    .await
    .context("update recommendation feedback")?;
    Ok(res.rows_affected() > 0)
}
