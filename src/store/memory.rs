use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{Blog, BlogChanges, NewBlog, NewUser, User};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    blogs: Vec<Blog>,
}

/// Process-local store; collections keep insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn blog_count(&self) -> usize {
        self.inner.read().await.blogs.len()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate { field: "username" });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            blogs: Vec::new(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let mut inner = self.inner.write().await;
        let blog = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: blog.user,
        };

        if let Some(owner) = blog.user {
            if let Some(user) = inner.users.iter_mut().find(|u| u.id == owner) {
                user.blogs.push(blog.id);
            }
        }
        inner.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.inner.read().await.blogs.clone())
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            changes.apply(blog);
            blog.clone()
        }))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.blogs.iter().position(|b| b.id == id) else {
            return Ok(false);
        };

        let removed = inner.blogs.remove(pos);
        if let Some(owner) = removed.user {
            if let Some(user) = inner.users.iter_mut().find(|u| u.id == owner) {
                user.blogs.retain(|b| *b != id);
            }
        }
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
