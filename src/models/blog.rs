use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    /// Owning user, absent for blogs created before ownership was recorded
    #[sqlx(rename = "user_id")]
    pub user: Option<Uuid>,
}

impl Blog {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user == Some(user_id)
    }

    /// Ownerless blogs carry no restriction; owned ones only accept their owner
    pub fn may_be_modified_by(&self, user_id: Uuid) -> bool {
        self.user.is_none() || self.is_owned_by(user_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user: Option<Uuid>,
}

/// Partial update; `None` leaves the stored value untouched.
/// `author: Some(None)` clears the author.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub author: Option<Option<String>>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl BlogChanges {
    pub fn apply(&self, blog: &mut Blog) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(author) = &self.author {
            blog.author = author.clone();
        }
        if let Some(url) = &self.url {
            blog.url = url.clone();
        }
        if let Some(likes) = self.likes {
            blog.likes = likes;
        }
    }
}
