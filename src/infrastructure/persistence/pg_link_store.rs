//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkChanges, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, slug, target, status, expires_at, visit_count, created_at, updated_at";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    slug: String,
    target: String,
    status: i16,
    expires_at: Option<i64>,
    visit_count: i64,
    created_at: i64,
    updated_at: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            slug: row.slug,
            target: row.target,
            status: row.status,
            expires_at: row.expires_at,
            visit_count: row.visit_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed authoritative store.
///
/// All queries are parameterized; slug uniqueness is enforced by the schema's
/// unique constraint, and a violation maps to [`AppError::Conflict`].
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn create(&self, new_link: NewLink, now: i64) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "INSERT INTO links (slug, target, status, expires_at, visit_count, created_at, updated_at)
             VALUES ($1, $2, $3, $4, 0, $5, $5)
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(&new_link.slug)
        .bind(&new_link.target)
        .bind(new_link.status)
        .bind(new_link.expires_at)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn get(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        slug: &str,
        changes: LinkChanges,
        now: i64,
    ) -> Result<Option<Link>, AppError> {
        // expires_at needs a presence flag: Some(None) clears it, None keeps it.
        let set_expires = changes.expires_at.is_some();
        let expires_at = changes.expires_at.flatten();

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "UPDATE links SET
                target = COALESCE($2, target),
                status = COALESCE($3, status),
                expires_at = CASE WHEN $4 THEN $5 ELSE expires_at END,
                updated_at = $6
             WHERE slug = $1
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(slug)
        .bind(changes.target)
        .bind(changes.status)
        .bind(set_expires)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_expired(&self, now: i64) -> Result<Vec<String>, AppError> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM links WHERE expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(slugs)
    }

    async fn increment_visits(&self, slug: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET visit_count = visit_count + 1 WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
