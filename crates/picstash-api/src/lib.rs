pub mod error;
pub mod pictures;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use picstash_db::Store;

/// A store connected once at startup and shared by every request.
pub type AppState = Arc<Store>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pictures", get(pictures::list_pictures).post(pictures::create_picture))
        .route("/pictures/{public_id}", get(pictures::get_picture))
        .route("/pictures/{public_id}/like", post(pictures::like_picture))
        .route("/pictures/tag/{tag}", get(pictures::pictures_by_tag))
        .route("/pictures/user/{user_id}", get(pictures::pictures_by_user))
        .route("/users", post(users::register))
        .route("/users/{username}", get(users::get_user))
        .route("/auth", post(users::authenticate))
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "route not found" })))
}
