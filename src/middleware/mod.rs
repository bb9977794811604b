pub mod auth;
pub mod response;

pub use auth::{token_extractor, user_extractor, AuthUser, BearerToken, Identity};
pub use response::{ApiResponse, ApiResult};
