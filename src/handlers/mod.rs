// Request handlers, one module per resource.
//
// Blog reads and the user/login/stats endpoints are public. Blog mutations
// take an `AuthUser`, which the auth middleware chain resolves from the
// bearer token.

pub mod blogs;
pub mod health;
pub mod login;
pub mod stats;
pub mod users;

use crate::error::ApiError;

/// Fallback for paths no route matches
pub async fn unknown_endpoint() -> ApiError {
    ApiError::not_found("unknown endpoint")
}
