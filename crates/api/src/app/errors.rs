use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use userdir_auth::{PolicyError, TokenError};
use userdir_core::DirectoryError;

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    match err {
        DirectoryError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DirectoryError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DirectoryError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DirectoryError::NotFound => json_error(StatusCode::NOT_FOUND, "user not found"),
        DirectoryError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, err.to_string())
        }
    }
}

pub fn policy_error_to_response(err: PolicyError) -> axum::response::Response {
    match err {
        PolicyError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, err.to_string()),
        PolicyError::Forbidden => json_error(StatusCode::FORBIDDEN, err.to_string()),
    }
}

pub fn token_error_to_response(err: TokenError) -> axum::response::Response {
    match err {
        TokenError::Invalid => json_error(StatusCode::UNAUTHORIZED, "invalid or expired token"),
        TokenError::Expired => json_error(StatusCode::UNAUTHORIZED, "token has expired"),
        TokenError::Encode(msg) => {
            tracing::error!(error = %msg, "token encoding failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "token issuance failed")
        }
    }
}

pub fn unauthenticated(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, message)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
