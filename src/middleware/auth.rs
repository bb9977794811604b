use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::{verify_token, AuthError};
use crate::error::ApiError;
use crate::models::User;

/// Raw bearer token taken from the `Authorization` header
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Request-scoped identity resolved by [`user_extractor`]
#[derive(Clone, Debug)]
pub enum Identity {
    Anonymous,
    Authenticated(User),
    Rejected(AuthError),
}

/// Stores the bearer token, if any, in request extensions. Never rejects.
pub async fn token_extractor(mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_bearer_token(request.headers()) {
        request.extensions_mut().insert(BearerToken(token));
    }
    next.run(request).await
}

/// Resolves the stored token to a user. Token problems leave the request
/// unauthenticated; only store failures end it here.
pub async fn user_extractor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request.extensions().get::<BearerToken>().cloned();

    let identity = match token {
        None => Identity::Anonymous,
        Some(BearerToken(token)) => match verify_token(&token, &state.security.jwt_secret) {
            Err(err) => {
                tracing::debug!("Rejected bearer token: {}", err);
                Identity::Rejected(err)
            }
            Ok(claims) => match state.store.find_user(claims.id).await {
                Ok(Some(user)) => Identity::Authenticated(user),
                Ok(None) => {
                    tracing::warn!("Token refers to missing user '{}' ({})", claims.username, claims.id);
                    Identity::Rejected(AuthError::UnknownUser)
                }
                Err(err) => return ApiError::from(err).into_response(),
            },
        },
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

/// The authenticated caller; rejects with 401 when identity is unset
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::Authenticated(user)) => Ok(AuthUser(user.clone())),
            Some(Identity::Rejected(err)) => Err(err.clone().into()),
            Some(Identity::Anonymous) | None => Err(AuthError::MissingToken.into()),
        }
    }
}
