use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::ApiJson;
use crate::app::AppState;
use crate::auth::{issue_token, verify_password, AuthError};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
}

/// POST /api/login - Exchange credentials for a bearer token
///
/// Unknown usernames and wrong passwords get the same 401 response, and a
/// password hash is verified in both cases.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = state.store.find_user_by_username(&username).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password_correct = verify_password(password, stored_hash).await?;

    let user = match user {
        Some(user) if password_correct => user,
        _ => {
            tracing::warn!("Failed login attempt for '{}'", username);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = issue_token(&user, &state.security)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(ApiResponse::success(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
