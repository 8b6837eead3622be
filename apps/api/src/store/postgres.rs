use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::entry::{Entry, EntryRow, Theme};
use crate::models::weekly_summary::{WeeklySummary, WeeklySummaryRow};
use crate::store::{bounded, EntryFilter, JournalStore, Page, StoreError};

const ENTRY_COLUMNS: &str = "id, user_id, text, created_at, sentiment, emotion, confidence, \
    themes, summary, word_count, is_reflection, original_entry_id";

/// Postgres-backed store. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

fn to_entries(rows: Vec<EntryRow>) -> Result<Vec<Entry>, StoreError> {
    rows.into_iter()
        .map(|row| Entry::try_from(row).map_err(StoreError::Corrupt))
        .collect()
}

fn theme_names(themes: &[Theme]) -> Vec<String> {
    themes.iter().map(|t| t.as_str().to_string()).collect()
}

#[async_trait]
impl JournalStore for PgStore {
    async fn insert_entry(&self, entry: &Entry) -> Result<Uuid, StoreError> {
        bounded(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO entries
                    (id, user_id, text, created_at, sentiment, emotion, confidence,
                     themes, summary, word_count, is_reflection, original_entry_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(entry.id)
            .bind(&entry.user_id)
            .bind(&entry.text)
            .bind(entry.created_at)
            .bind(entry.sentiment)
            .bind(entry.emotion.as_str())
            .bind(entry.confidence)
            .bind(theme_names(&entry.themes))
            .bind(&entry.summary)
            .bind(i32::try_from(entry.word_count).unwrap_or(i32::MAX))
            .bind(entry.is_reflection)
            .bind(entry.original_entry_id)
            .execute(&self.pool)
            .await?;
            Ok(entry.id)
        })
        .await
    }

    async fn find_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
        skip: u32,
        limit: u32,
    ) -> Result<Page, StoreError> {
        bounded(self.timeout, async {
            // One extra row tells us whether another page exists.
            let rows = sqlx::query_as::<_, EntryRow>(&format!(
                r#"
                SELECT {ENTRY_COLUMNS}
                FROM entries
                WHERE user_id = $1
                  AND ($2::boolean IS NULL OR is_reflection = $2)
                  AND ($3::text IS NULL OR $3 = ANY(themes))
                ORDER BY created_at DESC, id DESC
                OFFSET $4
                LIMIT $5
                "#
            ))
            .bind(user_id)
            .bind(filter.is_reflection)
            .bind(filter.theme.map(|t| t.as_str()))
            .bind(i64::from(skip))
            .bind(i64::from(limit) + 1)
            .fetch_all(&self.pool)
            .await?;

            let mut entries = to_entries(rows)?;
            let has_more = entries.len() > limit as usize;
            entries.truncate(limit as usize);
            Ok(Page { entries, has_more })
        })
        .await
    }

    async fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>, StoreError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, EntryRow>(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            row.map(|r| Entry::try_from(r).map_err(StoreError::Corrupt))
                .transpose()
        })
        .await
    }

    async fn aggregate_by_theme(&self, user_id: &str) -> Result<Vec<(Theme, u32)>, StoreError> {
        bounded(self.timeout, async {
            let rows: Vec<(String, i64)> = sqlx::query_as(
                r#"
                SELECT theme, COUNT(*) AS count
                FROM entries, unnest(themes) AS theme
                WHERE user_id = $1
                GROUP BY theme
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(|(theme, count)| {
                    let theme = theme.parse::<Theme>().map_err(StoreError::Corrupt)?;
                    let count = u32::try_from(count).map_err(|e| StoreError::Corrupt(e.to_string()))?;
                    Ok((theme, count))
                })
                .collect()
        })
        .await
    }

    async fn aggregate_window(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError> {
        bounded(self.timeout, async {
            let rows = sqlx::query_as::<_, EntryRow>(&format!(
                r#"
                SELECT {ENTRY_COLUMNS}
                FROM entries
                WHERE user_id = $1 AND created_at >= $2 AND created_at <= $3
                ORDER BY created_at ASC, id ASC
                "#
            ))
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
            to_entries(rows)
        })
        .await
    }

    async fn reflection_candidates(
        &self,
        user_id: &str,
        exclude: &[Uuid],
        created_before: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError> {
        bounded(self.timeout, async {
            let rows = sqlx::query_as::<_, EntryRow>(&format!(
                r#"
                SELECT {ENTRY_COLUMNS}
                FROM entries
                WHERE user_id = $1
                  AND is_reflection = FALSE
                  AND created_at <= $2
                  AND NOT (id = ANY($3))
                "#
            ))
            .bind(user_id)
            .bind(created_before)
            .bind(exclude)
            .fetch_all(&self.pool)
            .await?;
            to_entries(rows)
        })
        .await
    }

    async fn find_weekly_summary(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<WeeklySummary>, StoreError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, WeeklySummaryRow>(
                r#"
                SELECT * FROM weekly_summaries
                WHERE user_id = $1 AND generated_at >= $2
                ORDER BY generated_at DESC
                LIMIT 1
                "#,
            )
            .bind(user_id)
            .bind(since)
            .fetch_optional(&self.pool)
            .await?;
            row.map(|r| WeeklySummary::try_from(r).map_err(StoreError::Corrupt))
                .transpose()
        })
        .await
    }

    async fn insert_weekly_summary_if_absent(
        &self,
        summary: &WeeklySummary,
        since: DateTime<Utc>,
    ) -> Result<WeeklySummary, StoreError> {
        bounded(self.timeout, async {
            let mut tx = self.pool.begin().await?;

            // Serializes check-then-insert per user until the transaction ends.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(&summary.user_id)
                .execute(&mut *tx)
                .await?;

            let existing = sqlx::query_as::<_, WeeklySummaryRow>(
                r#"
                SELECT * FROM weekly_summaries
                WHERE user_id = $1 AND generated_at >= $2
                ORDER BY generated_at DESC
                LIMIT 1
                "#,
            )
            .bind(&summary.user_id)
            .bind(since)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = existing {
                tx.commit().await?;
                debug!(
                    "Weekly summary for {} already generated, keeping existing row",
                    summary.user_id
                );
                return WeeklySummary::try_from(row).map_err(StoreError::Corrupt);
            }

            sqlx::query(
                r#"
                INSERT INTO weekly_summaries
                    (id, user_id, week_start, week_end, generated_at,
                     summary, entry_count, avg_sentiment, top_themes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(summary.id)
            .bind(&summary.user_id)
            .bind(summary.week_start)
            .bind(summary.week_end)
            .bind(summary.generated_at)
            .bind(&summary.summary)
            .bind(i32::try_from(summary.entry_count).unwrap_or(i32::MAX))
            .bind(summary.avg_sentiment)
            .bind(theme_names(&summary.top_themes))
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            info!("Stored weekly summary {} for user {}", summary.id, summary.user_id);
            Ok(summary.clone())
        })
        .await
    }
}
