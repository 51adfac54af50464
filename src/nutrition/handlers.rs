use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::{bad_request, internal, not_found, ApiError},
    dishes::repo::Dish,
    nutrition::{
        dto::{NutritionReportDto, ReportParams},
        repo::NutritionReport,
        services,
    },
    state::AppState,
    users::repo::User,
};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/report/:user_id", post(generate_report))
        .route("/nutrition/quick-report/:user_id", post(quick_report))
        .route("/nutrition/history/:user_id", get(history))
        .route("/nutrition/health-score/:user_id", get(health_score))
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))
}

async fn report_for(
    state: &AppState,
    user: &User,
    dishes: &[Dish],
    date: Date,
) -> Result<NutritionReportDto, ApiError> {
    let analysis = services::analyze(user, dishes);
    let report = NutritionReport::upsert(&state.db, user.id, date, &analysis)
        .await
        .map_err(internal)?;
    info!(
        user_id = %user.id,
        %date,
        dishes = dishes.len(),
        score = report.health_score,
        "nutrition report generated"
    );
    Ok(report.into())
}

#[instrument(skip(state, dish_ids))]
pub async fn generate_report(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<ReportParams>,
    Json(dish_ids): Json<Vec<Uuid>>,
) -> Result<Json<NutritionReportDto>, ApiError> {
    let date = params
        .date()
        .map_err(|e| {
            warn!(error = %e, "bad report date");
            bad_request("reportDate must be YYYY-MM-DD")
        })?
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let user = load_user(&state, user_id).await?;
    let dishes = Dish::find_many(&state.db, &dish_ids)
        .await
        .map_err(internal)?;
    if dishes.len() != dish_ids.len() {
        warn!(requested = dish_ids.len(), found = dishes.len(), "unknown dish in report");
        return Err(not_found("Dish"));
    }

    report_for(&state, &user, &dishes, date).await.map(Json)
}

#[instrument(skip(state))]
pub async fn quick_report(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<NutritionReportDto>, ApiError> {
    let user = load_user(&state, user_id).await?;
    let dishes = Dish::list_first(&state.db, state.config.quick_report_dishes)
        .await
        .map_err(internal)?;
    let today = OffsetDateTime::now_utc().date();
    report_for(&state, &user, &dishes, today).await.map(Json)
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<NutritionReportDto>>, ApiError> {
    load_user(&state, user_id).await?;
    let reports = NutritionReport::history(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn health_score(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<f64>, ApiError> {
    load_user(&state, user_id).await?;
    let avg = NutritionReport::average_score(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(avg.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn malformed_report_date_is_rejected() {
        let app = nutrition_routes().with_state(AppState::fake());
        let req = Request::builder()
            .method("POST")
            .uri(format!(
                "/nutrition/report/{}?reportDate=yesterday",
                Uuid::new_v4()
            ))
            .header("content-type", "application/json")
            .body(Body::from("[]"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_uuid_user_is_rejected() {
        let app = nutrition_routes().with_state(AppState::fake());
        let req = Request::builder()
            .uri("/nutrition/history/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    mod with_db {
        use crate::app::{build_app, send};
        use crate::dishes::{dto::DishPayload, repo::Dish};
        use crate::state::AppState;
        use crate::users::{dto::UserPayload, repo::User};
        use axum::http::StatusCode;
        use serde_json::{json, Value};
        use sqlx::PgPool;
        use uuid::Uuid;

        async fn seed_user(pool: &PgPool) -> Uuid {
            User::create(pool, "hana", "hana@example.com", &UserPayload::default())
                .await
                .unwrap()
                .id
        }

        async fn seed_dish(pool: &PgPool, name: &str, calories: f64) -> Uuid {
            let payload = DishPayload {
                calories: Some(calories),
                protein: Some(20.0),
                carbohydrate: Some(40.0),
                ..Default::default()
            };
            Dish::create(pool, name, &payload).await.unwrap().id
        }

        fn names(report: &Value) -> Vec<&str> {
            report["includedDishes"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect()
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn unknown_dish_in_report_is_not_found(pool: PgPool) {
            let user = seed_user(&pool).await;
            let known = seed_dish(&pool, "Mapo Tofu", 350.0).await;
            let app = build_app(AppState::with_pool(pool));

            let (status, _) = send(
                app,
                "POST",
                &format!("/api/nutrition/report/{user}"),
                Some(json!([known, Uuid::new_v4()])),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn regenerating_a_day_overwrites_its_report(pool: PgPool) {
            let user = seed_user(&pool).await;
            let tofu = seed_dish(&pool, "Mapo Tofu", 350.0).await;
            let rice = seed_dish(&pool, "Fried Rice", 520.0).await;
            let app = build_app(AppState::with_pool(pool));
            let uri = format!("/api/nutrition/report/{user}?reportDate=2025-03-01");

            let (status, first) = send(app.clone(), "POST", &uri, Some(json!([tofu]))).await;
            assert_eq!(status, StatusCode::OK);
            let (status, second) = send(app.clone(), "POST", &uri, Some(json!([rice]))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(first["id"], second["id"]);
            assert_eq!(names(&second), vec!["Fried Rice"]);

            let (_, history) =
                send(app, "GET", &format!("/api/nutrition/history/{user}"), None).await;
            let history = history.as_array().unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0]["reportDate"], json!("2025-03-01"));
            assert_eq!(history[0]["totalCalories"], json!(520.0));
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn history_lists_newest_report_first(pool: PgPool) {
            let user = seed_user(&pool).await;
            let tofu = seed_dish(&pool, "Mapo Tofu", 350.0).await;
            let app = build_app(AppState::with_pool(pool));

            for date in ["2025-03-01", "2025-03-03", "2025-03-02"] {
                let (status, _) = send(
                    app.clone(),
                    "POST",
                    &format!("/api/nutrition/report/{user}?reportDate={date}"),
                    Some(json!([tofu])),
                )
                .await;
                assert_eq!(status, StatusCode::OK);
            }

            let (_, history) =
                send(app, "GET", &format!("/api/nutrition/history/{user}"), None).await;
            let dates: Vec<_> = history
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["reportDate"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(dates, ["2025-03-03", "2025-03-02", "2025-03-01"]);
        }

        #[sqlx::test(migrations = "./migrations")]
        async fn quick_report_uses_first_catalog_dishes(pool: PgPool) {
            let user = seed_user(&pool).await;
            for (name, kcal) in [
                ("Mapo Tofu", 350.0),
                ("Fried Rice", 520.0),
                ("Har Gow", 200.0),
                ("Peking Duck", 800.0),
            ] {
                seed_dish(&pool, name, kcal).await;
            }
            let app = build_app(AppState::with_pool(pool));

            let (status, report) = send(
                app.clone(),
                "POST",
                &format!("/api/nutrition/quick-report/{user}"),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(names(&report), vec!["Mapo Tofu", "Fried Rice", "Har Gow"]);
            assert_eq!(report["totalCalories"], json!(1070.0));

            let (status, _) = send(
                app,
                "POST",
                &format!("/api/nutrition/quick-report/{}", Uuid::new_v4()),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }
}
