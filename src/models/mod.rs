pub mod blog;
pub mod user;

pub use blog::{Blog, BlogChanges, NewBlog};
pub use user::{NewUser, User};
