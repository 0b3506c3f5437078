//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_sqlx_error};

/// Row shape shared by every query returning a full link.
#[derive(Debug, sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    code: String,
    owner_id: String,
    destination: String,
    clicks: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(r: ShortLinkRow) -> Self {
        ShortLink::new(
            r.id,
            r.code,
            r.owner_id,
            r.destination,
            r.clicks,
            r.created_at,
            r.updated_at,
        )
    }
}

const LINK_COLUMNS: &str = "id, code, owner_id, destination, clicks, created_at, updated_at";

/// PostgreSQL repository for short link storage.
///
/// The `short_links.code` unique index is the final arbiter when two
/// creators race for the same code.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "INSERT INTO short_links (code, owner_id, destination) \
             VALUES ($1, $2, $3) \
             RETURNING {LINK_COLUMNS}"
        );

        let row: ShortLinkRow = sqlx::query_as(&sql)
            .bind(&new_link.code)
            .bind(&new_link.owner_id)
            .bind(&new_link.destination)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, &new_link.code))?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE code = $1");

        let row: Option<ShortLinkRow> = sqlx::query_as(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, code))?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM short_links WHERE code = $1)")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, code))
    }

    async fn find_by_owner_paginated(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ShortLink>, i64), AppError> {
        let offset = (page - 1).max(0).saturating_mul(page_size);

        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM short_links \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );

        let rows: Vec<ShortLinkRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .bind(page_size)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, ""))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, ""))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
    ) -> Result<ShortLink, AppError> {
        let sql = format!(
            "UPDATE short_links SET destination = $2, updated_at = NOW() \
             WHERE code = $1 \
             RETURNING {LINK_COLUMNS}"
        );

        let row: Option<ShortLinkRow> = sqlx::query_as(&sql)
            .bind(code)
            .bind(destination)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, code))?;

        row.map(Into::into).ok_or(AppError::NotFound)
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE short_links SET clicks = clicks + 1, updated_at = NOW() WHERE code = $1",
        )
        .bind(code)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, code))?;

        Ok(())
    }

    async fn delete(&self, code: &str, owner_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE code = $1 AND owner_id = $2")
            .bind(code)
            .bind(owner_id)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, code))?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
