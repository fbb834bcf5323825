//! Response store: append-only persistence for questionnaire submissions.
//!
//! `AppState` holds an `Arc<dyn MoodStore>`. `PgMoodStore` is the production
//! backend. There is no update or delete operation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::models::mood::{MoodResponseRow, RecordId};
use crate::mood::form::MoodSubmission;

/// Advisory lock key serialising inserts so `submitted_at` never goes backwards.
const INSERT_LOCK_KEY: i64 = 0x6d6f_6f64; // "mood"

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Filters for the read-only admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseQuery {
    /// Case-insensitive substring match on `what_do_you_enjoy`.
    pub search: Option<String>,
    pub submitted_after: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ResponseQuery {
    pub fn page_size(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[async_trait]
pub trait MoodStore: Send + Sync {
    /// Persists a validated submission and returns the stored row.
    async fn save(&self, submission: &MoodSubmission) -> Result<MoodResponseRow, StoreError>;

    /// Lists stored responses, newest first.
    async fn list(&self, query: &ResponseQuery) -> Result<Vec<MoodResponseRow>, StoreError>;

    async fn get(&self, id: RecordId) -> Result<Option<MoodResponseRow>, StoreError>;

    /// Cheap reachability check for the health probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

pub struct PgMoodStore {
    pool: PgPool,
}

impl PgMoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MoodStore for PgMoodStore {
    async fn save(&self, submission: &MoodSubmission) -> Result<MoodResponseRow, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(INSERT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, MoodResponseRow>(
            r#"
            INSERT INTO mood_responses
                (destination, adventurous, energy, what_do_you_enjoy, submitted_at)
            VALUES (
                $1, $2, $3, $4,
                GREATEST(
                    clock_timestamp(),
                    COALESCE((SELECT MAX(submitted_at) FROM mood_responses), '-infinity')
                )
            )
            RETURNING *
            "#,
        )
        .bind(submission.destination.as_deref())
        .bind(submission.adventurous)
        .bind(submission.energy)
        .bind(&submission.what_do_you_enjoy)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Stored mood response {}", row.id);
        Ok(row)
    }

    async fn list(&self, query: &ResponseQuery) -> Result<Vec<MoodResponseRow>, StoreError> {
        let pattern = query.search_term().map(|s| format!("%{}%", escape_like(s)));

        Ok(sqlx::query_as::<_, MoodResponseRow>(
            r#"
            SELECT * FROM mood_responses
            WHERE ($1::TEXT IS NULL OR what_do_you_enjoy ILIKE $1)
              AND ($2::TIMESTAMPTZ IS NULL OR submitted_at >= $2)
            ORDER BY submitted_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(pattern)
        .bind(query.submitted_after)
        .bind(query.page_size())
        .bind(query.page_offset())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, id: RecordId) -> Result<Option<MoodResponseRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, MoodResponseRow>("SELECT * FROM mood_responses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Escapes `%`, `_` and `\` so user search text matches literally under ILIKE.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
pub mod memory {
    //! In-process store used by handler tests.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryMoodStore {
        rows: Mutex<Vec<MoodResponseRow>>,
        unavailable: AtomicBool,
    }

    impl MemoryMoodStore {
        /// A store whose every call fails as if the database were down.
        pub fn unavailable() -> Self {
            let store = Self::default();
            store.unavailable.store(true, Ordering::SeqCst);
            store
        }

        pub fn rows(&self) -> Vec<MoodResponseRow> {
            self.rows.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(StoreError::Database(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl MoodStore for MemoryMoodStore {
        async fn save(&self, submission: &MoodSubmission) -> Result<MoodResponseRow, StoreError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let now = Utc::now();
            let submitted_at = rows
                .last()
                .map(|r| r.submitted_at.max(now))
                .unwrap_or(now);
            let row = MoodResponseRow {
                id: rows.len() as RecordId + 1,
                destination: submission.destination.clone(),
                adventurous: submission.adventurous,
                energy: submission.energy,
                what_do_you_enjoy: submission.what_do_you_enjoy.clone(),
                submitted_at,
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn list(&self, query: &ResponseQuery) -> Result<Vec<MoodResponseRow>, StoreError> {
            self.check()?;
            let needle = query.search_term().map(str::to_lowercase);
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    needle
                        .as_deref()
                        .map_or(true, |n| r.what_do_you_enjoy.to_lowercase().contains(n))
                })
                .filter(|r| query.submitted_after.map_or(true, |t| r.submitted_at >= t))
                .cloned()
                .collect();
            rows.sort_by(|a, b| (b.submitted_at, b.id).cmp(&(a.submitted_at, a.id)));
            Ok(rows
                .into_iter()
                .skip(query.page_offset() as usize)
                .take(query.page_size() as usize)
                .collect())
        }

        async fn get(&self, id: RecordId) -> Result<Option<MoodResponseRow>, StoreError> {
            self.check()?;
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.check()
        }
    }
}
