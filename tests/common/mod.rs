#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use blog_api::app::{app, AppState};
use blog_api::auth::{sign_claims, Claims};
use blog_api::config::AppConfig;
use blog_api::models::{Blog, NewBlog, User};
use blog_api::store::{MemoryStore, Store};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serves the real router on a free port, backed by a fresh memory store
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let mut config = AppConfig::test();
        config.security.jwt_secret = SECRET.to_string();

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.security.clone());
        let router = app(state, &config);

        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn create_user(&self, username: &str, name: &str, password: &str) -> Result<Response> {
        let res = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "username": username, "name": name, "password": password }))
            .send()
            .await?;
        Ok(res)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        let res = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Ok(res)
    }

    /// Registers a user and returns a fresh token for it
    pub async fn user_with_token(&self, username: &str) -> Result<String> {
        let res = self.create_user(username, "Test User", "sekret").await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "user creation failed: {}", res.status());

        let res = self.login(username, "sekret").await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn user(&self, username: &str) -> Result<User> {
        self.store
            .find_user_by_username(username)
            .await?
            .context("user not in store")
    }

    /// Inserts the standard three blogs straight into the store
    pub async fn seed_blogs(&self, owner: Option<uuid::Uuid>) -> Result<Vec<Blog>> {
        let mut blogs = Vec::new();
        for (title, author, url, likes) in initial_blogs() {
            let blog = self
                .store
                .insert_blog(NewBlog {
                    title: title.to_string(),
                    author: Some(author.to_string()),
                    url: url.to_string(),
                    likes,
                    user: owner,
                })
                .await?;
            blogs.push(blog);
        }
        Ok(blogs)
    }

    pub async fn blogs_in_store(&self) -> Result<Vec<Blog>> {
        Ok(self.store.list_blogs().await?)
    }
}

pub fn initial_blogs() -> [(&'static str, &'static str, &'static str, i64); 3] {
    [
        ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
        (
            "Go To Statement Considered Harmful",
            "Edsger W. Dijkstra",
            "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
            5,
        ),
        (
            "Canonical string reduction",
            "Edsger W. Dijkstra",
            "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
            12,
        ),
    ]
}

/// A correctly signed token whose expiry passed an hour ago
pub fn expired_token(user: &User) -> String {
    let mut claims = Claims::new(user, 3600);
    claims.iat -= 2 * 3600;
    claims.exp -= 2 * 3600;
    sign_claims(&claims, SECRET).expect("signing with a fixed secret")
}
