//! Session gates for the protected parts of the router.
//!
//! `require_session` resolves the bearer token and stores a [`CurrentUser`]
//! in the request extensions. `require_admin` runs after it and only lets
//! administrators through.

use crate::api::types::{AppError, AppState, CurrentUser};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))?;

    let user = match state.storage.user_for_session(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(AppError::Unauthorized(
                "Session expired or invalid".to_string(),
            ))
        }
        Err(e) => return Err(AppError::store("resolve session", e)),
    };

    request
        .extensions_mut()
        .insert(CurrentUser { user, token });
    Ok(next.run(request).await)
}

pub async fn require_admin(
    Extension(current): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !current.user.is_admin {
        tracing::warn!("User {} denied admin access", current.user.id);
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(next.run(request).await)
}
