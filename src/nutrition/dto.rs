use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::repo::NutritionReport;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionReportDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(with = "iso_date")]
    pub report_date: Date,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub generated_at: Option<OffsetDateTime>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_fat: f64,
    pub total_carbohydrate: f64,
    #[serde(default)]
    pub total_fiber: f64,
    #[serde(default)]
    pub total_sodium: f64,
    #[serde(default)]
    pub total_cholesterol: f64,
    pub recommended_calories: f64,
    pub recommended_protein: f64,
    pub recommended_fat: f64,
    pub recommended_carbohydrate: f64,
    #[serde(default)]
    pub protein_percentage: f64,
    #[serde(default)]
    pub fat_percentage: f64,
    #[serde(default)]
    pub carbohydrate_percentage: f64,
    pub health_score: i32,
    pub health_status: String,
    #[serde(default)]
    pub recommendations: String,
    #[serde(default)]
    pub warnings: String,
    #[serde(default)]
    pub included_dishes: Vec<String>,
}

impl From<NutritionReport> for NutritionReportDto {
    fn from(r: NutritionReport) -> Self {
        Self {
            id: Some(r.id),
            user_id: Some(r.user_id),
            report_date: r.report_date,
            generated_at: Some(r.generated_at),
            total_calories: r.total_calories,
            total_protein: r.total_protein,
            total_fat: r.total_fat,
            total_carbohydrate: r.total_carbohydrate,
            total_fiber: r.total_fiber,
            total_sodium: r.total_sodium,
            total_cholesterol: r.total_cholesterol,
            recommended_calories: r.recommended_calories,
            recommended_protein: r.recommended_protein,
            recommended_fat: r.recommended_fat,
            recommended_carbohydrate: r.recommended_carbohydrate,
            protein_percentage: r.protein_percentage,
            fat_percentage: r.fat_percentage,
            carbohydrate_percentage: r.carbohydrate_percentage,
            health_score: r.health_score,
            health_status: r.health_status,
            recommendations: r.recommendations,
            warnings: r.warnings,
            included_dishes: r.included_dishes,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    pub report_date: Option<String>,
}

impl ReportParams {
    /// `None` means today; an unparsable date is an error.
    pub fn date(&self) -> Result<Option<Date>, time::error::Parse> {
        self.report_date
            .as_deref()
            .map(|raw| Date::parse(raw.trim(), DATE_FORMAT))
            .transpose()
    }
}
