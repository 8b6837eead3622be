use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::entry::{Entry, Theme};
use crate::models::weekly_summary::WeeklySummary;
use crate::store::{EntryFilter, JournalStore, Page, StoreError};

/// Process-local store. Used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<Entry>>,
    summaries: Mutex<Vec<WeeklySummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn latest_since<'a>(
    summaries: &'a [WeeklySummary],
    user_id: &str,
    since: DateTime<Utc>,
) -> Option<&'a WeeklySummary> {
    summaries
        .iter()
        .filter(|s| s.user_id == user_id && s.generated_at >= since)
        .max_by_key(|s| s.generated_at)
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn insert_entry(&self, entry: &Entry) -> Result<Uuid, StoreError> {
        self.entries.write().await.push(entry.clone());
        Ok(entry.id)
    }

    async fn find_entries(
        &self,
        user_id: &str,
        filter: &EntryFilter,
        skip: u32,
        limit: u32,
    ) -> Result<Page, StoreError> {
        let entries = self.entries.read().await;
        let mut matching: Vec<&Entry> = entries
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let skip = skip as usize;
        let limit = limit as usize;
        let has_more = matching.len() > skip.saturating_add(limit);
        let entries = matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();
        Ok(Page { entries, has_more })
    }

    async fn find_entry_by_id(&self, id: Uuid) -> Result<Option<Entry>, StoreError> {
        Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn aggregate_by_theme(&self, user_id: &str) -> Result<Vec<(Theme, u32)>, StoreError> {
        let entries = self.entries.read().await;
        let mut counts: HashMap<Theme, u32> = HashMap::new();
        for entry in entries.iter().filter(|e| e.user_id == user_id) {
            for theme in &entry.themes {
                *counts.entry(*theme).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn aggregate_window(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError> {
        let entries = self.entries.read().await;
        let mut window: Vec<Entry> = entries
            .iter()
            .filter(|e| e.user_id == user_id && e.created_at >= start && e.created_at <= end)
            .cloned()
            .collect();
        window.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(window)
    }

    async fn reflection_candidates(
        &self,
        user_id: &str,
        exclude: &[Uuid],
        created_before: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| {
                e.user_id == user_id
                    && !e.is_reflection
                    && e.created_at <= created_before
                    && !exclude.contains(&e.id)
            })
            .cloned()
            .collect())
    }

    async fn find_weekly_summary(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<WeeklySummary>, StoreError> {
        let summaries = self.summaries.lock().await;
        Ok(latest_since(&summaries, user_id, since).cloned())
    }

    async fn insert_weekly_summary_if_absent(
        &self,
        summary: &WeeklySummary,
        since: DateTime<Utc>,
    ) -> Result<WeeklySummary, StoreError> {
        let mut summaries = self.summaries.lock().await;
        if let Some(existing) = latest_since(&summaries, &summary.user_id, since) {
            return Ok(existing.clone());
        }
        summaries.push(summary.clone());
        Ok(summary.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::entry::Emotion;

    fn entry(user: &str, minutes_ago: i64, themes: Vec<Theme>, reflection: bool) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            text: "text".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            sentiment: 0.0,
            emotion: Emotion::Neutral,
            confidence: 0.0,
            themes,
            summary: None,
            word_count: 1,
            is_reflection: reflection,
            original_entry_id: None,
        }
    }

    #[tokio::test]
    async fn test_find_entries_newest_first_with_has_more() {
        let store = MemoryStore::new();
        for minutes in [30, 10, 20] {
            store.insert_entry(&entry("u", minutes, vec![], false)).await.unwrap();
        }

        let page = store.find_entries("u", &EntryFilter::default(), 0, 2).await.unwrap();
        assert_eq!(page.entries.len(), 2);
        assert!(page.has_more);
        assert!(page.entries[0].created_at > page.entries[1].created_at);

        let last = store.find_entries("u", &EntryFilter::default(), 2, 2).await.unwrap();
        assert_eq!(last.entries.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_find_entries_scoped_to_user_and_filter() {
        let store = MemoryStore::new();
        store.insert_entry(&entry("a", 5, vec![Theme::Work], false)).await.unwrap();
        store.insert_entry(&entry("a", 6, vec![Theme::Love], true)).await.unwrap();
        store.insert_entry(&entry("b", 5, vec![Theme::Work], false)).await.unwrap();

        let filter = EntryFilter {
            theme: Some(Theme::Work),
            ..Default::default()
        };
        let page = store.find_entries("a", &filter, 0, 10).await.unwrap();
        assert_eq!(page.entries.len(), 1);

        let filter = EntryFilter {
            is_reflection: Some(true),
            ..Default::default()
        };
        let page = store.find_entries("a", &filter, 0, 10).await.unwrap();
        assert_eq!(page.entries.len(), 1);
        assert!(page.entries[0].is_reflection);
    }

    #[tokio::test]
    async fn test_aggregate_by_theme_counts_every_theme_of_an_entry() {
        let store = MemoryStore::new();
        store
            .insert_entry(&entry("u", 1, vec![Theme::Work, Theme::Stress], false))
            .await
            .unwrap();
        store.insert_entry(&entry("u", 2, vec![Theme::Work], false)).await.unwrap();

        let counts: HashMap<Theme, u32> =
            store.aggregate_by_theme("u").await.unwrap().into_iter().collect();
        assert_eq!(counts[&Theme::Work], 2);
        assert_eq!(counts[&Theme::Stress], 1);
    }

    #[tokio::test]
    async fn test_insert_weekly_summary_if_absent_keeps_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let first = WeeklySummary {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            week_start: now - Duration::days(7),
            week_end: now,
            generated_at: now,
            summary: "first".to_string(),
            entry_count: 3,
            avg_sentiment: 0.2,
            top_themes: vec![Theme::Work],
        };
        let second = WeeklySummary {
            id: Uuid::new_v4(),
            summary: "second".to_string(),
            ..first.clone()
        };
        let since = now - Duration::hours(24);

        let stored = store.insert_weekly_summary_if_absent(&first, since).await.unwrap();
        assert_eq!(stored.summary, "first");
        let stored = store.insert_weekly_summary_if_absent(&second, since).await.unwrap();
        assert_eq!(stored.id, first.id);
    }
}
