use axum::extract::{Path, State};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::api::{ApiJson, BlogView};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Blog, BlogChanges};

#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    /// Absent keeps the author, `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub author: Option<Option<String>>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl UpdateBlogRequest {
    pub fn into_changes(self) -> Result<BlogChanges, ApiError> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(ApiError::validation_error("title must not be empty"));
        }
        if matches!(&self.url, Some(u) if u.trim().is_empty()) {
            return Err(ApiError::validation_error("url must not be empty"));
        }
        if matches!(self.likes, Some(l) if l < 0) {
            return Err(ApiError::validation_error("likes must not be negative"));
        }

        Ok(BlogChanges {
            title: self.title,
            author: self.author,
            url: self.url,
            likes: self.likes,
        })
    }
}

// Marks a field that appeared in the body, even as `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Identifiers that are not UUIDs are malformed, not missing
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::MalformedId)
}

async fn find_blog_or_404(state: &AppState, id: Uuid) -> Result<Blog, ApiError> {
    state
        .store
        .find_blog(id)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))
}

async fn with_owner(state: &AppState, blog: Blog) -> Result<BlogView, ApiError> {
    let owner = match blog.user {
        Some(id) => state.store.find_user(id).await?,
        None => None,
    };
    Ok(BlogView::new(blog, owner.as_ref()))
}

/// GET /api/blogs/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<BlogView> {
    let id = parse_id(&id)?;
    let blog = find_blog_or_404(&state, id).await?;

    Ok(ApiResponse::success(with_owner(&state, blog).await?))
}

/// PUT /api/blogs/:id - Partial update, owner only
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBlogRequest>,
) -> ApiResult<BlogView> {
    let id = parse_id(&id)?;
    let blog = find_blog_or_404(&state, id).await?;

    if !blog.may_be_modified_by(user.id) {
        tracing::warn!("User '{}' tried to modify blog {} they do not own", user.username, id);
        return Err(ApiError::unauthorized("only the creator can modify a blog"));
    }

    let changes = payload.into_changes()?;
    let updated = state
        .store
        .update_blog(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("blog not found"))?;

    Ok(ApiResponse::success(with_owner(&state, updated).await?))
}

/// DELETE /api/blogs/:id - Owner only
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let blog = find_blog_or_404(&state, id).await?;

    if !blog.may_be_modified_by(user.id) {
        tracing::warn!("User '{}' tried to delete blog {} they do not own", user.username, id);
        return Err(ApiError::unauthorized("only the creator can delete a blog"));
    }

    if !state.store.delete_blog(id).await? {
        return Err(ApiError::not_found("blog not found"));
    }
    tracing::info!("User '{}' deleted blog {}", user.username, id);

    Ok(ApiResponse::no_content())
}
