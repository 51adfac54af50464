use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::services::Analysis;

const REPORT_COLUMNS: &str = r#"
    id, user_id, report_date, generated_at,
    total_calories, total_protein, total_fat, total_carbohydrate,
    total_fiber, total_sodium, total_cholesterol,
    recommended_calories, recommended_protein, recommended_fat, recommended_carbohydrate,
    protein_percentage, fat_percentage, carbohydrate_percentage,
    health_status, health_score, recommendations, warnings, included_dishes
"#;

#[derive(Debug, Clone, FromRow)]
pub struct NutritionReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_date: Date,
    pub generated_at: OffsetDateTime,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_fat: f64,
    pub total_carbohydrate: f64,
    pub total_fiber: f64,
    pub total_sodium: f64,
    pub total_cholesterol: f64,
    pub recommended_calories: f64,
    pub recommended_protein: f64,
    pub recommended_fat: f64,
    pub recommended_carbohydrate: f64,
    pub protein_percentage: f64,
    pub fat_percentage: f64,
    pub carbohydrate_percentage: f64,
    pub health_status: String,
    pub health_score: i32,
    pub recommendations: String,
    pub warnings: String,
    pub included_dishes: Vec<String>,
}

impl NutritionReport {
    /// Writes the day's report, replacing any earlier one for the same day.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        report_date: Date,
        a: &Analysis,
    ) -> anyhow::Result<NutritionReport> {
        let report = sqlx::query_as::<_, NutritionReport>(&format!(
            r#"
            INSERT INTO nutrition_reports (
                user_id, report_date,
                total_calories, total_protein, total_fat, total_carbohydrate,
                total_fiber, total_sodium, total_cholesterol,
                recommended_calories, recommended_protein, recommended_fat, recommended_carbohydrate,
                protein_percentage, fat_percentage, carbohydrate_percentage,
                health_status, health_score, recommendations, warnings, included_dishes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            ON CONFLICT (user_id, report_date) DO UPDATE SET
                generated_at = now(),
                total_calories = EXCLUDED.total_calories,
                total_protein = EXCLUDED.total_protein,
                total_fat = EXCLUDED.total_fat,
                total_carbohydrate = EXCLUDED.total_carbohydrate,
                total_fiber = EXCLUDED.total_fiber,
                total_sodium = EXCLUDED.total_sodium,
                total_cholesterol = EXCLUDED.total_cholesterol,
                recommended_calories = EXCLUDED.recommended_calories,
                recommended_protein = EXCLUDED.recommended_protein,
                recommended_fat = EXCLUDED.recommended_fat,
                recommended_carbohydrate = EXCLUDED.recommended_carbohydrate,
                protein_percentage = EXCLUDED.protein_percentage,
                fat_percentage = EXCLUDED.fat_percentage,
                carbohydrate_percentage = EXCLUDED.carbohydrate_percentage,
                health_status = EXCLUDED.health_status,
                health_score = EXCLUDED.health_score,
                recommendations = EXCLUDED.recommendations,
                warnings = EXCLUDED.warnings,
                included_dishes = EXCLUDED.included_dishes
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(report_date)
        .bind(a.totals.calories)
        .bind(a.totals.protein)
        .bind(a.totals.fat)
        .bind(a.totals.carbohydrate)
        .bind(a.totals.fiber)
        .bind(a.totals.sodium)
        .bind(a.totals.cholesterol)
        .bind(a.targets.calories)
        .bind(a.targets.protein)
        .bind(a.targets.fat)
        .bind(a.targets.carbohydrate)
        .bind(a.split.protein)
        .bind(a.split.fat)
        .bind(a.split.carbohydrate)
        .bind(a.health_status)
        .bind(a.health_score)
        .bind(&a.recommendations)
        .bind(&a.warnings)
        .bind(&a.included_dishes)
        .fetch_one(db)
        .await
        .context("upsert nutrition report")?;
        Ok(report)
    }

    pub async fn history(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<NutritionReport>> {
        let reports = sqlx::query_as::<_, NutritionReport>(&format!(
            "SELECT {REPORT_COLUMNS} FROM nutrition_reports WHERE user_id = $1 ORDER BY report_date DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list nutrition reports")?;
        Ok(reports)
    }

    /// Mean health score over every stored report, `None` if there are none.
    pub async fn average_score(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(health_score)::float8 FROM nutrition_reports WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("average health score")?;
        Ok(avg)
    }
}
