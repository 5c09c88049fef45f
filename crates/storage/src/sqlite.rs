use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{
    catalog::{Campus, MainCategoryId},
    domain::{Request, RequestId, RequestStatus},
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};

use crate::RequestStore;

/// One row per request; `position` carries the newest-first order.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    database_url: String,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            pool,
            database_url: database_url.to_string(),
        })
    }
}

#[async_trait]
impl RequestStore for SqliteStore {
    async fn load(&self) -> Result<Vec<Request>> {
        let rows = sqlx::query(
            "SELECT id, campus, main_category, sub_category, name, is_anonymous, email,
                    location, description, is_priority, submitted_at, status
             FROM requests
             ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to read requests")?;

        rows.iter().map(request_from_row).collect()
    }

    async fn save(&self, requests: &[Request]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM requests")
            .execute(&mut *tx)
            .await
            .context("failed to clear requests")?;

        for (position, request) in requests.iter().enumerate() {
            sqlx::query(
                "INSERT INTO requests (
                    id, position, campus, main_category, sub_category, name, is_anonymous,
                    email, location, description, is_priority, submitted_at, status
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(request.id.0)
            .bind(position as i64)
            .bind(request.campus.name())
            .bind(request.main_category.id())
            .bind(&request.sub_category)
            .bind(&request.name)
            .bind(request.is_anonymous)
            .bind(request.email.as_deref())
            .bind(request.location.as_deref())
            .bind(&request.description)
            .bind(request.is_priority)
            .bind(&request.submitted_at)
            .bind(request.status.as_str())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to store request {}", request.id))?;
        }

        tx.commit().await.context("failed to commit requests")?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite {}", self.database_url)
    }
}

fn request_from_row(row: &SqliteRow) -> Result<Request> {
    let id = RequestId(row.try_get("id")?);
    let campus: String = row.try_get("campus")?;
    let main_category: String = row.try_get("main_category")?;
    let status: String = row.try_get("status")?;

    Ok(Request {
        id,
        campus: Campus::from_str(&campus).with_context(|| format!("request {id}"))?,
        main_category: MainCategoryId::from_str(&main_category)
            .with_context(|| format!("request {id}"))?,
        sub_category: row.try_get("sub_category")?,
        name: row.try_get("name")?,
        is_anonymous: row.try_get("is_anonymous")?,
        email: row.try_get("email")?,
        location: row.try_get("location")?,
        description: row.try_get("description")?,
        is_priority: row.try_get("is_priority")?,
        submitted_at: row.try_get("submitted_at")?,
        status: RequestStatus::from_str(&status).with_context(|| format!("request {id}"))?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}
