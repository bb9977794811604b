pub mod format;
pub mod json;

pub use format::{BlogView, UserView};
pub use json::ApiJson;
