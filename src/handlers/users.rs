use std::collections::HashMap;

use axum::extract::State;
use serde::Deserialize;

use crate::api::format::user_views;
use crate::api::{ApiJson, UserView};
use crate::app::AppState;
use crate::auth::hash_password;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::user::{MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH};
use crate::models::NewUser;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Registration fields that passed validation
#[derive(Debug)]
pub struct Registration {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<Registration, ApiError> {
        let username = self
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ApiError::validation_error("username is required"))?;
        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(ApiError::validation_error(format!(
                "username must be at least {} characters long",
                MIN_USERNAME_LENGTH
            )));
        }

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::validation_error("password is required"))?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::validation_error(format!(
                "password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(Registration {
            username,
            name: self.name,
            password,
        })
    }
}

/// POST /api/users - Register a new account
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<UserView> {
    let registration = payload.validate()?;
    let password_hash = hash_password(registration.password).await?;

    let user = state
        .store
        .insert_user(NewUser {
            username: registration.username,
            name: registration.name,
            password_hash,
        })
        .await?;

    tracing::info!("Registered user '{}' ({})", user.username, user.id);

    Ok(ApiResponse::created(UserView::new(&user, &HashMap::new())))
}

/// GET /api/users - All users with their blogs populated
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserView>> {
    let users = state.store.list_users().await?;
    let blogs = state.store.list_blogs().await?;

    Ok(ApiResponse::success(user_views(&users, &blogs)))
}
