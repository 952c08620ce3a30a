use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use picstash_db::StoreError;

#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    BadRequest(String),
    Conflict(String),
    Unauthorized,
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store(StoreError::NotFound { resource, key }) => {
                (StatusCode::NOT_FOUND, format!("{resource} not found: {key}"))
            }
            Self::Store(e) => {
                // Detail goes to the log, not the client.
                error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid credentials".to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_404() {
        let err = ApiError::from(StoreError::not_found("image", "abc"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_connected_is_500() {
        let err = ApiError::from(StoreError::NotConnected);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn likes_overflow_is_500() {
        let err = ApiError::from(StoreError::LikesOverflow { key: "abc".into() });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn persistence_is_500() {
        let err = ApiError::from(StoreError::Persistence(sqlx_protocol_error()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors() {
        assert_eq!(
            ApiError::BadRequest("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("taken".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    fn sqlx_protocol_error() -> picstash_db::sqlx::Error {
        picstash_db::sqlx::Error::Protocol("unexpected message".into())
    }
}
