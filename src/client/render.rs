//! HTML fragments for the page. Every string that came from a user or the
//! backend goes through `html_escape` before it is interpolated.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::dishes::dto::DishDto;
use crate::health::PLACEHOLDER;
use crate::nutrition::dto::NutritionReportDto;
use crate::recommendations::dto::RecommendationDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Poor,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::Poor
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "#28a745",
            ScoreBand::Good => "#ffc107",
            ScoreBand::Poor => "#dc3545",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "score-excellent",
            ScoreBand::Good => "score-good",
            ScoreBand::Poor => "score-poor",
        }
    }
}

fn amount(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn percent(v: Option<f64>) -> String {
    match v {
        Some(v) if v > 0.0 => format!("{:.0}%", v * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

fn dish_tag(value: &str) -> String {
    format!(r#"<span class="dish-tag">{}</span>"#, text(value))
}

fn nutrition_info(d: &DishDto) -> String {
    format!(
        r#"<div class="nutrition-info"><div class="nutrition-item"><small>Calories</small><span>{} kcal</span></div><div class="nutrition-item"><small>Protein</small><span>{} g</span></div><div class="nutrition-item"><small>Fat</small><span>{} g</span></div><div class="nutrition-item"><small>Carbs</small><span>{} g</span></div></div>"#,
        amount(d.calories),
        amount(d.protein),
        amount(d.fat),
        amount(d.carbohydrate)
    )
}

pub fn dish_card(d: &DishDto) -> String {
    let mut tags = String::new();
    if let Some(c) = d.cuisine.as_deref().filter(|c| !c.is_empty()) {
        tags.push_str(&dish_tag(c));
    }
    if let Some(f) = d.flavor.as_deref().filter(|f| !f.is_empty()) {
        tags.push_str(&dish_tag(f));
    }
    if let Some(p) = d.price {
        tags.push_str(&dish_tag(&format!("¥{p}")));
    }
    let description = d
        .description
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("A tasty dish");

    format!(
        r#"<div class="dish-card fade-in"><div class="dish-card-header"><h3>{}</h3><p>{}</p></div><div class="dish-card-body"><div class="dish-tags">{}</div>{}</div></div>"#,
        text(&d.name),
        text(description),
        tags,
        nutrition_info(d)
    )
}

pub fn dishes_grid<'a>(dishes: impl IntoIterator<Item = &'a DishDto>) -> String {
    dishes.into_iter().map(dish_card).collect()
}

pub fn recommendation_card(r: &RecommendationDto) -> String {
    let band = ScoreBand::of(r.score);
    let tags: String = [r.dish.cuisine.as_deref(), r.dish.flavor.as_deref()]
        .into_iter()
        .map(|v| dish_tag(v.unwrap_or_default()))
        .collect();

    format!(
        r#"<div class="recommendation-card fade-in"><div class="recommendation-score" style="background: {}">{:.0} pts</div><h3>{}</h3><div class="dish-tags">{}</div><div class="recommendation-reason">{}</div><div class="match-details"><div class="match-item"><small>Cuisine match</small><span>{}</span></div><div class="match-item"><small>Flavor match</small><span>{}</span></div><div class="match-item"><small>Health match</small><span>{}</span></div></div>{}</div>"#,
        band.color(),
        r.score,
        text(&r.dish.name),
        tags,
        text(&r.reason),
        percent(r.cuisine_match),
        percent(r.flavor_match),
        percent(r.health_match),
        nutrition_info(&r.dish)
    )
}

pub fn recommendations_grid(recs: &[RecommendationDto]) -> String {
    recs.iter().map(recommendation_card).collect()
}

fn summary_card(title: &str, total: f64, target: f64, decimals: usize, unit: &str) -> String {
    format!(
        r#"<div class="nutrition-card"><h4>{title}</h4><div class="nutrition-value">{total:.decimals$}</div><small>Target: {target:.decimals$} {unit}</small></div>"#
    )
}

pub fn nutrition_report(r: &NutritionReportDto) -> String {
    let band = ScoreBand::of(f64::from(r.health_score));
    let status = if r.health_status.is_empty() {
        "Not assessed"
    } else {
        r.health_status.as_str()
    };

    let mut out = String::from(r#"<div class="nutrition-summary">"#);
    out.push_str(&summary_card("Calories", r.total_calories, r.recommended_calories, 0, "kcal"));
    out.push_str(&summary_card("Protein", r.total_protein, r.recommended_protein, 1, "g"));
    out.push_str(&summary_card("Fat", r.total_fat, r.recommended_fat, 1, "g"));
    out.push_str(&summary_card(
        "Carbohydrate",
        r.total_carbohydrate,
        r.recommended_carbohydrate,
        1,
        "g",
    ));
    out.push_str("</div>");

    out.push_str(&format!(
        r#"<div class="health-assessment"><div class="health-score"><div class="health-score-circle {}">{}</div><h3>Health status: {}</h3></div>"#,
        band.css_class(),
        r.health_score,
        text(status)
    ));
    if !r.recommendations.is_empty() {
        out.push_str(&format!(
            r#"<div class="recommendations-section"><h4>Advice</h4><p>{}</p></div>"#,
            text(&r.recommendations)
        ));
    }
    if !r.warnings.is_empty() {
        out.push_str(&format!(
            r#"<div class="warnings-section"><h4>Warnings</h4><p>{}</p></div>"#,
            text(&r.warnings)
        ));
    }
    if !r.included_dishes.is_empty() {
        let list: String = r.included_dishes.iter().map(|d| dish_tag(d)).collect();
        out.push_str(&format!(
            r#"<div class="included-dishes"><h4>Included dishes</h4><div class="dish-list">{list}</div></div>"#
        ));
    }
    out.push_str("</div>");
    out
}

pub const EMPTY_HISTORY: &str = r#"<p class="empty-state">No history yet</p>"#;

pub fn nutrition_history(reports: &[NutritionReportDto]) -> String {
    if reports.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    let items: String = reports
        .iter()
        .map(|r| {
            format!(
                r#"<div class="history-item"><div class="history-header"><h4>{}</h4><span class="health-badge" style="background: {}">{} pts</span></div><div class="history-totals"><div><small>Calories</small><div>{:.0} kcal</div></div><div><small>Protein</small><div>{:.1} g</div></div><div><small>Fat</small><div>{:.1} g</div></div><div><small>Carbs</small><div>{:.1} g</div></div></div></div>"#,
                r.report_date,
                ScoreBand::of(f64::from(r.health_score)).color(),
                r.health_score,
                r.total_calories,
                r.total_protein,
                r.total_fat,
                r.total_carbohydrate
            )
        })
        .collect();
    format!("<h3>Nutrition history</h3>{items}")
}

/// One tag per entry, each with a remove control addressed by index.
pub fn tags(container_id: &str, items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                r#"<span class="tag">{}<span class="remove-tag" data-container="{}" data-index="{i}">&times;</span></span>"#,
                text(item),
                attr(container_id)
            )
        })
        .collect()
}

pub fn filter_options(values: &[String]) -> String {
    let mut out = String::from(r#"<option value="">All</option>"#);
    for v in values {
        out.push_str(&format!(r#"<option value="{}">{}</option>"#, attr(v), text(v)));
    }
    out
}
