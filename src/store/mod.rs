//! Persistence for users and blogs.
//!
//! Handlers only talk to the [`Store`] trait. [`PgStore`] backs production
//! deployments; [`MemoryStore`] serves tests and database-less development.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Blog, BlogChanges, NewBlog, NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("expected `{field}` to be unique")]
    Duplicate { field: &'static str },

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user; fails with [`StoreError::Duplicate`] on a taken username
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Inserts a blog and records it on its owner's blog list
    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError>;
    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError>;
    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError>;
    /// Returns whether a blog was removed
    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
