use crate::api::types::{AppError, AppJson, AppState, CurrentUser};
use crate::events::SessionEvent;
use axum::{extract::State, http::StatusCode, Extension, Json};
use manga_reader_common::models::User;
use manga_reader_common::validation::validate_credentials;
use manga_reader_storage::StoreError;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

async fn open_session(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<SessionResponse, AppError> {
    let (user, session) = state
        .storage
        .sign_in(email, password, state.auth.session_ttl_secs)
        .await
        .map_err(|e| match e {
            StoreError::InvalidCredentials => {
                tracing::info!("Rejected sign in for {}", email);
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            other => AppError::store("sign in", other),
        })?;

    state.events.publish(SessionEvent::SignedIn {
        user_id: user.id.clone(),
        email: user.email.clone(),
    });

    Ok(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    })
}

pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let email = validate_credentials(&payload.email, &payload.password)?;
    let is_admin = state.auth.is_admin_email(&email);

    let user = state
        .storage
        .sign_up(&email, &payload.password, is_admin)
        .await
        .map_err(|e| AppError::store("sign up", e))?;

    state.events.publish(SessionEvent::SignedUp {
        user_id: user.id,
        email: user.email,
    });

    let session = open_session(&state, &email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let session = open_session(&state, &payload.email, &payload.password).await?;
    Ok(Json(session))
}

pub async fn sign_out(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, AppError> {
    state
        .storage
        .sign_out(&current.token)
        .await
        .map_err(|e| AppError::store("sign out", e))?;

    state.events.publish(SessionEvent::SignedOut {
        user_id: current.user.id,
    });
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.user)
}
