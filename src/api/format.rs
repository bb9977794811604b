//! Public JSON shapes. Stored models never go on the wire directly: owners and
//! owned blogs are populated into summaries and password hashes are dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Blog, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
        }
    }
}

impl BlogView {
    /// `owner` should be the user referenced by `blog.user`, if it still exists
    pub fn new(blog: Blog, owner: Option<&User>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner.map(UserSummary::from),
        }
    }
}

impl UserView {
    pub fn new(user: &User, blogs_by_id: &HashMap<Uuid, &Blog>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            blogs: user
                .blogs
                .iter()
                .filter_map(|id| blogs_by_id.get(id))
                .map(|blog| BlogSummary::from(*blog))
                .collect(),
        }
    }
}

/// Populates every blog's owner from a full user listing
pub fn blog_views(blogs: Vec<Blog>, users: &[User]) -> Vec<BlogView> {
    let users_by_id: HashMap<Uuid, &User> = users.iter().map(|u| (u.id, u)).collect();
    blogs
        .into_iter()
        .map(|blog| {
            let owner = blog.user.and_then(|id| users_by_id.get(&id).copied());
            BlogView::new(blog, owner)
        })
        .collect()
}

/// Populates every user's blogs from a full blog listing
pub fn user_views(users: &[User], blogs: &[Blog]) -> Vec<UserView> {
    let blogs_by_id: HashMap<Uuid, &Blog> = blogs.iter().map(|b| (b.id, b)).collect();
    users.iter().map(|user| UserView::new(user, &blogs_by_id)).collect()
}
