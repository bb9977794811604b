use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Blog;
use crate::stats::{self, AuthorBlogs, AuthorLikes};

#[derive(Debug, Serialize)]
pub struct FavoriteBlog {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub likes: i64,
}

#[derive(Debug, Serialize)]
pub struct BlogStats {
    pub blogs: usize,
    pub total_likes: i64,
    pub favorite: Option<FavoriteBlog>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

impl BlogStats {
    pub fn compute(blogs: &[Blog]) -> Self {
        Self {
            blogs: blogs.len(),
            total_likes: stats::total_likes(blogs),
            favorite: stats::favorite_blog(blogs).map(|b| FavoriteBlog {
                id: b.id,
                title: b.title.clone(),
                author: b.author.clone(),
                likes: b.likes,
            }),
            most_blogs: stats::most_blogs(blogs),
            most_likes: stats::most_likes(blogs),
        }
    }
}

/// GET /api/stats
pub async fn summary(State(state): State<AppState>) -> ApiResult<BlogStats> {
    let blogs = state.store.list_blogs().await?;
    Ok(ApiResponse::success(BlogStats::compute(&blogs)))
}
