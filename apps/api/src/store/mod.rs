//! Persistence collaborator.
//!
//! `AppState` carries an `Arc<dyn JournalStore>`: `PgStore` when a database is
//! configured, `MemoryStore` otherwise (local runs and tests).

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::entry::{Entry, Theme};
use crate::models::weekly_summary::WeeklySummary;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Optional narrowing for entry listings.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub is_reflection: Option<bool>,
    pub theme: Option<Theme>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        self.is_reflection.map_or(true, |r| entry.is_reflection == r)
            && self.theme.map_or(true, |t| entry.themes.contains(&t))
    }
}

/// One page of entries, newest first.
#[derive(Debug, Clone)]
pub struct Page {
    pub entries: Vec<Entry>,
    pub has_more: bool,
}

#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn insert_entry(&self, entry: &Entry) -> Result<Uuid, StoreError>;

    /// Entries sorted by `created_at` descending.
    async fn find_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
        skip: u32,
        limit: u32,
    ) -> Result<Page, StoreError>;

    async fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>, StoreError>;

    /// Entry count per theme; an entry counts once for every theme it carries.
    async fn aggregate_by_theme(&self, user_id: &str) -> Result<Vec<(Theme, u32)>, StoreError>;

    /// Entries created within `[start, end]`, oldest first.
    async fn aggregate_window(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError>;

    /// Non-reflection entries created at or before `created_before`,
    /// excluding the given ids.
    async fn reflection_candidates(
        &self,
        user_id: &str,
        exclude: &[Uuid],
        created_before: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError>;

    /// Most recent summary generated at or after `since`.
    async fn find_weekly_summary(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<WeeklySummary>, StoreError>;

    /// Atomically inserts `summary` unless one was generated at or after
    /// `since`. Returns whichever row is now current.
    async fn insert_weekly_summary_if_absent(
        &self,
        summary: &WeeklySummary,
        since: DateTime<Utc>,
    ) -> Result<WeeklySummary, StoreError>;
}

/// Runs a store future under a deadline.
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: Result<(), StoreError> = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
