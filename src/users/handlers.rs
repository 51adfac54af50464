use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::{bad_request, internal, is_unique_violation, not_found, ApiError},
    state::AppState,
    users::{
        dto::{UserDto, UserPayload},
        repo::User,
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/username/:username", get(get_user_by_username))
        .route("/users/:id/bmi", get(get_user_bmi))
        .route("/users/:id/bmr", get(get_user_bmr))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserDto>, ApiError> {
    let username = payload.username.as_deref().unwrap_or_default().trim();
    let email = payload.email.as_deref().unwrap_or_default().trim();

    if username.is_empty() {
        warn!("missing username");
        return Err(bad_request("Username is required"));
    }
    if !is_valid_email(email) {
        warn!(%email, "invalid email");
        return Err(bad_request("Invalid email"));
    }

    if User::exists_by_username(&state.db, username)
        .await
        .map_err(internal)?
    {
        warn!(%username, "username already taken");
        return Err((StatusCode::CONFLICT, "Username already taken".into()));
    }
    if User::exists_by_email(&state.db, email)
        .await
        .map_err(internal)?
    {
        warn!(%email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already registered".into()));
    }

    let user = match User::create(&state.db, username, email, &payload).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err((StatusCode::CONFLICT, "User already exists".into()));
        }
        Err(e) => return Err(internal(e)),
    };

    info!(user_id = %user.id, username = %user.username, "user created");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = User::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user = User::find_by_username(&state.db, &username)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserDto>, ApiError> {
    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email.trim()) {
            warn!(%email, "invalid email");
            return Err(bad_request("Invalid email"));
        }
    }
    if payload
        .username
        .as_deref()
        .is_some_and(|u| u.trim().is_empty())
    {
        return Err(bad_request("Username must not be blank"));
    }

    let user = match User::update(&state.db, id, &payload).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(not_found("User")),
        Err(e) if is_unique_violation(&e) => {
            warn!(user_id = %id, "update collides with existing username or email");
            return Err((StatusCode::CONFLICT, "Username or email already in use".into()));
        }
        Err(e) => return Err(internal(e)),
    };

    info!(user_id = %user.id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if User::delete(&state.db, id).await.map_err(internal)? {
        info!(user_id = %id, "user deleted");
        Ok(StatusCode::OK)
    } else {
        Err(not_found("User"))
    }
}

#[instrument(skip(state))]
pub async fn get_user_bmi(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<f64>>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    Ok(Json(user.bmi()))
}

#[instrument(skip(state))]
pub async fn get_user_bmr(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<f64>>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("User"))?;
    Ok(Json(user.bmr()))
}
