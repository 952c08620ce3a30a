use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use picstash_db::{NewUser, User};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub authenticated: bool,
}

pub async fn register(
    State(store): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest("username must be 3-32 characters".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".into()));
    }

    // Check if username is taken. Two concurrent registrations can both pass.
    match store.get_user(&req.username).await {
        Ok(_) => return Err(ApiError::Conflict(format!("username {} is taken", req.username))),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let user = store.save_user(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(store): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(store.get_user(&username).await?))
}

pub async fn authenticate(
    State(store): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if store.authenticate(&req.username, &req.password).await? {
        Ok(Json(AuthResponse { authenticated: true }))
    } else {
        Err(ApiError::Unauthorized)
    }
}
