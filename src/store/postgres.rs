use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Blog, BlogChanges, NewBlog, NewUser, User};

const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            UUID PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        name          TEXT,
        password_hash TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id         UUID PRIMARY KEY,
        title      TEXT NOT NULL,
        author     TEXT,
        url        TEXT NOT NULL,
        likes      BIGINT NOT NULL DEFAULT 0,
        user_id    UUID REFERENCES users (id) ON DELETE SET NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS blogs_user_id_idx ON blogs (user_id)",
];

const USER_COLUMNS: &str = r#"
    u.id, u.username, u.name, u.password_hash,
    ARRAY(SELECT b.id FROM blogs b WHERE b.user_id = u.id ORDER BY b.created_at, b.id) AS blogs
"#;

const BLOG_COLUMNS: &str = "id, title, author, url, likes, user_id";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects using the configured pool settings and ensures the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;

        info!("connecting to {}", redact_url(url));
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        info!("connected to PostgreSQL");

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Maps unique constraint violations on `users.username` to a duplicate error
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Duplicate { field: "username" };
        }
    }
    StoreError::Sqlx(err)
}

/// Strips the password from a connection string so it can be logged
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.into()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, name, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, name, password_hash, ARRAY[]::uuid[] AS blogs",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u ORDER BY u.created_at, u.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let created = sqlx::query_as::<_, Blog>(&format!(
            "INSERT INTO blogs (id, title, author, url, likes, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {BLOG_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.user)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(blog)
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(blogs)
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> Result<Option<Blog>, StoreError> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs SET
                title  = COALESCE($2, title),
                author = CASE WHEN $6 THEN $3 ELSE author END,
                url    = COALESCE($4, url),
                likes  = COALESCE($5, likes)
             WHERE id = $1
             RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(changes.author.clone().flatten())
        .bind(&changes.url)
        .bind(changes.likes)
        .bind(changes.author.is_some())
        .fetch_optional(&self.pool)
        .await?;
        Ok(blog)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
