use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers;
use crate::middleware::{token_extractor, user_extractor};
use crate::store::Store;

/// Shared by every handler: the store handle and token settings
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, security: SecurityConfig) -> Self {
        Self {
            store,
            security: Arc::new(security),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(blog_routes(state.clone()))
        .merge(user_routes())
        .merge(login_routes())
        .merge(stats_routes())
        .fallback(handlers::unknown_endpoint)
        // Outermost so every route sees the extracted token
        .layer(middleware::from_fn(token_extractor))
        .with_state(state);

    let router = if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn blog_routes(state: AppState) -> Router<AppState> {
    use handlers::blogs;

    Router::new()
        .route("/api/blogs", get(blogs::list).post(blogs::create))
        .route(
            "/api/blogs/:id",
            get(blogs::get).put(blogs::update).delete(blogs::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, user_extractor))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new().route("/api/users", get(users::list).post(users::create))
}

fn login_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new().route("/api/login", post(handlers::login::login))
}

fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(handlers::stats::summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{sign_claims, Claims};
    use crate::models::{Blog, BlogChanges, NewBlog, NewUser, User};
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "app-test-secret";

    /// Every call fails as if the connection pool were exhausted
    struct UnreachableStore;

    fn unreachable() -> StoreError {
        StoreError::Sqlx(sqlx::Error::PoolTimedOut)
    }

    #[async_trait]
    impl Store for UnreachableStore {
        async fn insert_user(&self, _: NewUser) -> Result<User, StoreError> {
            Err(unreachable())
        }
        async fn find_user(&self, _: uuid::Uuid) -> Result<Option<User>, StoreError> {
            Err(unreachable())
        }
        async fn find_user_by_username(&self, _: &str) -> Result<Option<User>, StoreError> {
            Err(unreachable())
        }
        async fn list_users(&self) -> Result<Vec<User>, StoreError> {
            Err(unreachable())
        }
        async fn insert_blog(&self, _: NewBlog) -> Result<Blog, StoreError> {
            Err(unreachable())
        }
        async fn find_blog(&self, _: uuid::Uuid) -> Result<Option<Blog>, StoreError> {
            Err(unreachable())
        }
        async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
            Err(unreachable())
        }
        async fn update_blog(&self, _: uuid::Uuid, _: BlogChanges) -> Result<Option<Blog>, StoreError> {
            Err(unreachable())
        }
        async fn delete_blog(&self, _: uuid::Uuid) -> Result<bool, StoreError> {
            Err(unreachable())
        }
        async fn health_check(&self) -> Result<(), StoreError> {
            Err(unreachable())
        }
    }

    fn app_with_store(store: Arc<dyn Store>) -> Router {
        let mut config = AppConfig::test();
        config.security.jwt_secret = SECRET.to_string();
        let state = AppState::new(store, config.security.clone());
        app(state, &config)
    }

    fn test_app() -> Router {
        app_with_store(Arc::new(MemoryStore::new()))
    }

    fn token_for_someone() -> String {
        let user = User {
            id: uuid::Uuid::new_v4(),
            username: "root".to_string(),
            name: None,
            password_hash: String::new(),
            blogs: Vec::new(),
        };
        sign_claims(&Claims::new(&user, 3600), SECRET).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_path_is_404_json() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "unknown endpoint" }));
    }

    #[tokio::test]
    async fn blog_listing_starts_empty() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/blogs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn create_without_token_is_401() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/blogs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"t","url":"u"}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "token missing" }));
    }

    #[tokio::test]
    async fn garbage_token_is_401_invalid() {
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/blogs/{}", uuid::Uuid::new_v4()))
            .header(header::AUTHORIZATION, "Bearer garbage")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "token invalid" }));
    }

    #[tokio::test]
    async fn malformed_json_body_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["store"], json!("ok"));
    }

    #[tokio::test]
    async fn store_failure_during_user_lookup_is_500() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/blogs")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for_someone()))
            .body(Body::from(r#"{"title":"t","url":"u"}"#))
            .unwrap();

        let response = app_with_store(Arc::new(UnreachableStore)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "something went wrong" }));
    }

    #[tokio::test]
    async fn health_is_503_when_store_unreachable() {
        let response = app_with_store(Arc::new(UnreachableStore))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("degraded"));
        assert_eq!(body["error"], json!("store unavailable"));
    }
}
