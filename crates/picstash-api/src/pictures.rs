use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use picstash_db::{Image, NewImage};

use crate::AppState;
use crate::error::ApiError;

pub async fn list_pictures(State(store): State<AppState>) -> Result<Json<Vec<Image>>, ApiError> {
    Ok(Json(store.get_images().await?))
}

pub async fn create_picture(
    State(store): State<AppState>,
    Json(req): Json<NewImage>,
) -> Result<impl IntoResponse, ApiError> {
    if req.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url is required".into()));
    }

    let image = store.save_image(req).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get_picture(
    State(store): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<Image>, ApiError> {
    Ok(Json(store.get_image(&public_id).await?))
}

pub async fn like_picture(
    State(store): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<Image>, ApiError> {
    Ok(Json(store.like_image(&public_id).await?))
}

pub async fn pictures_by_user(
    State(store): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Image>>, ApiError> {
    Ok(Json(store.get_image_by_user(&user_id).await?))
}

pub async fn pictures_by_tag(
    State(store): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<Image>>, ApiError> {
    Ok(Json(store.get_image_by_tag(&tag).await?))
}
