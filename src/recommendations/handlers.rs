use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{bad_request, internal, not_found, ApiError},
    dishes::repo::Dish,
    recommendations::{
        dto::{FeedbackParams, RecommendationDto, RecommendationRequest, SimpleParams},
        repo, services,
    },
    state::AppState,
    users::repo::User,
};

pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations/generate", post(generate))
        .route("/recommendations/simple/:user_id", get(simple))
        .route("/recommendations/history/:user_id", get(history))
        .route("/recommendations/:id/feedback", put(feedback))
}

async fn recommend(
    state: &AppState,
    req: RecommendationRequest,
) -> Result<Vec<RecommendationDto>, ApiError> {
    if req.count == Some(0) {
        return Err(bad_request("count must be positive"));
    }
    let user = User::find_by_id(&state.db, req.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    let dishes = Dish::list_all(&state.db).await.map_err(internal)?;
    let candidates = dishes.len();

    let ranked = services::rank(&user, dishes, &req);
    info!(
        user_id = %user.id,
        meal_type = req.meal_type.as_deref().unwrap_or("any"),
        candidates,
        returned = ranked.len(),
        "recommendations generated"
    );

    repo::save_all(&state.db, user.id, ranked)
        .await
        .map_err(internal)
}

#[instrument(skip(state, req), fields(user_id = %req.user_id))]
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<Vec<RecommendationDto>>, ApiError> {
    recommend(&state, req).await.map(Json)
}

#[instrument(skip(state))]
pub async fn simple(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(p): Query<SimpleParams>,
) -> Result<Json<Vec<RecommendationDto>>, ApiError> {
    let req = RecommendationRequest {
        user_id,
        count: Some(p.count),
        ..Default::default()
    };
    recommend(&state, req).await.map(Json)
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<RecommendationDto>>, ApiError> {
    User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    repo::history(&state.db, user_id)
        .await
        .map(Json)
        .map_err(internal)
}

#[instrument(skip(state, p))]
pub async fn feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(p): Query<FeedbackParams>,
) -> Result<Json<String>, ApiError> {
    if let Some(r) = p.rating {
        if !(1..=5).contains(&r) {
            return Err(bad_request("rating must be between 1 and 5"));
        }
    }
    let updated = repo::update_feedback(
        &state.db,
        id,
        p.clicked,
        p.ordered,
        p.rating,
        p.feedback.as_deref(),
    )
    .await
    .map_err(internal)?;
    if !updated {
        return Err(not_found("Recommendation"));
    }
    info!(recommendation_id = %id, clicked = p.clicked, ordered = p.ordered, "feedback recorded");
    Ok(Json("Feedback updated".to_string()))
}
