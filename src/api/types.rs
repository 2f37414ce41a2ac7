use crate::config::AuthConfig;
use crate::events::SessionEvents;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use manga_reader_common::models::User;
use manga_reader_common::validation::ValidationError;
use manga_reader_storage::{Storage, StoreError};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub events: SessionEvents,
    pub auth: Arc<AuthConfig>,
}

/// The signed-in user, placed in request extensions by the session gate.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// JSON request body whose rejections answer in the `AppError` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor with the same error shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

// Standardized Error Response
#[derive(Debug)]
pub enum AppError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
}

impl AppError {
    /// Logs a failed store call and maps it onto a response. Internal
    /// details stay in the log.
    pub fn store(action: &str, err: StoreError) -> Self {
        tracing::error!("Failed to {}: {:?}", action, err);
        match err {
            StoreError::NotFound(what) => AppError::NotFound(not_found_message(what)),
            StoreError::Constraint(msg) => AppError::BadRequest(msg),
            StoreError::EmailTaken => {
                AppError::Conflict("An account with this email already exists".to_string())
            }
            StoreError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            StoreError::PasswordHash(_) | StoreError::Database(_) | StoreError::Io(_) => {
                AppError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

pub fn not_found_message(what: &str) -> String {
    let mut chars = what.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}
