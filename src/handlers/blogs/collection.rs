use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::format::blog_views;
use crate::api::{ApiJson, BlogView};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::NewBlog;

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl CreateBlogRequest {
    /// Validates the payload; missing `likes` defaults to 0
    pub fn into_new_blog(self, owner: Uuid) -> Result<NewBlog, ApiError> {
        let (title, url) = match (non_empty(self.title), non_empty(self.url)) {
            (Some(title), Some(url)) => (title, url),
            _ => return Err(ApiError::validation_error("title or url missing")),
        };

        let likes = self.likes.unwrap_or(0);
        if likes < 0 {
            return Err(ApiError::validation_error("likes must not be negative"));
        }

        Ok(NewBlog {
            title,
            author: self.author,
            url,
            likes,
            user: Some(owner),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/blogs - All blogs with their owners populated
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<BlogView>> {
    let blogs = state.store.list_blogs().await?;
    let users = state.store.list_users().await?;

    Ok(ApiResponse::success(blog_views(blogs, &users)))
}

/// POST /api/blogs - Create a blog owned by the caller
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<CreateBlogRequest>,
) -> ApiResult<BlogView> {
    let new_blog = payload.into_new_blog(user.id)?;
    let blog = state.store.insert_blog(new_blog).await?;

    tracing::info!("User '{}' created blog {} ('{}')", user.username, blog.id, blog.title);

    Ok(ApiResponse::created(BlogView::new(blog, Some(&user))))
}
