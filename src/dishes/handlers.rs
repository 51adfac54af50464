use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::{bad_request, internal, not_found, ApiError},
    dishes::{
        dto::{CaloriesRange, DishDto, DishPayload, MaxFat, MinProtein, MinRating},
        repo::{Dish, DishQuery},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dishes))
        .route("/dishes/:id", get(get_dish))
        .route("/dishes/cuisine/:cuisine", get(by_cuisine))
        .route("/dishes/flavor/:flavor", get(by_flavor))
        .route("/dishes/calories", get(by_calories))
        .route("/dishes/high-protein", get(high_protein))
        .route("/dishes/low-fat", get(low_fat))
        .route("/dishes/top-rated", get(top_rated))
        .route("/dishes/dietary-tag/:tag", get(by_dietary_tag))
        .route("/dishes/without-allergen/:allergen", get(without_allergen))
        .route("/dishes/for-disease/:disease", get(for_disease))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", axum::routing::post(create_dish))
        .route(
            "/dishes/:id",
            axum::routing::put(update_dish).delete(delete_dish),
        )
}

async fn run(state: &AppState, q: DishQuery) -> Result<Json<Vec<DishDto>>, ApiError> {
    let dishes = Dish::query(&state.db, &q).await.map_err(internal)?;
    Ok(Json(dishes.into_iter().map(DishDto::from).collect()))
}

#[instrument(skip(state))]
pub async fn list_dishes(State(state): State<AppState>) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::All).await
}

#[instrument(skip(state))]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DishDto>, ApiError> {
    let dish = Dish::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Dish"))?;
    Ok(Json(dish.into()))
}

#[instrument(skip(state))]
pub async fn by_cuisine(
    State(state): State<AppState>,
    Path(cuisine): Path<String>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::Cuisine(cuisine)).await
}

#[instrument(skip(state))]
pub async fn by_flavor(
    State(state): State<AppState>,
    Path(flavor): Path<String>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::Flavor(flavor)).await
}

#[instrument(skip(state))]
pub async fn by_calories(
    State(state): State<AppState>,
    Query(range): Query<CaloriesRange>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    if range.min_calories > range.max_calories {
        return Err(bad_request("minCalories must not exceed maxCalories"));
    }
    run(
        &state,
        DishQuery::CaloriesBetween(range.min_calories, range.max_calories),
    )
    .await
}

#[instrument(skip(state))]
pub async fn high_protein(
    State(state): State<AppState>,
    Query(q): Query<MinProtein>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::HighProtein(q.min_protein)).await
}

#[instrument(skip(state))]
pub async fn low_fat(
    State(state): State<AppState>,
    Query(q): Query<MaxFat>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::LowFat(q.max_fat)).await
}

#[instrument(skip(state))]
pub async fn top_rated(
    State(state): State<AppState>,
    Query(q): Query<MinRating>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::TopRated(q.min_rating)).await
}

#[instrument(skip(state))]
pub async fn by_dietary_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::DietaryTag(tag)).await
}

#[instrument(skip(state))]
pub async fn without_allergen(
    State(state): State<AppState>,
    Path(allergen): Path<String>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::WithoutAllergen(allergen)).await
}

#[instrument(skip(state))]
pub async fn for_disease(
    State(state): State<AppState>,
    Path(disease): Path<String>,
) -> Result<Json<Vec<DishDto>>, ApiError> {
    run(&state, DishQuery::ForDisease(disease)).await
}

#[instrument(skip(state, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    Json(payload): Json<DishPayload>,
) -> Result<Json<DishDto>, ApiError> {
    let name = payload.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        warn!("dish without a name");
        return Err(bad_request("Dish name is required"));
    }

    let dish = Dish::create(&state.db, name, &payload)
        .await
        .map_err(internal)?;

    info!(dish_id = %dish.id, name = %dish.name, "dish created");
    Ok(Json(dish.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DishPayload>,
) -> Result<Json<DishDto>, ApiError> {
    let dish = Dish::update(&state.db, id, &payload)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Dish"))?;
    info!(dish_id = %dish.id, "dish updated");
    Ok(Json(dish.into()))
}

#[instrument(skip(state))]
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if Dish::delete(&state.db, id).await.map_err(internal)? {
        info!(dish_id = %id, "dish deleted");
        Ok(StatusCode::OK)
    } else {
        Err(not_found("Dish"))
    }
}
