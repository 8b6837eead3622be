//! Weekly digest with a per-user generation window.
//!
//! cached row → return it; too few entries → say so; otherwise ask the
//! generator (bounded by a timeout) and store the result insert-if-absent.
//! Generator trouble never fails the request and never persists anything.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::normalize::escape_markup;
use crate::config::JournalSettings;
use crate::errors::AppError;
use crate::journal::insights::compute_insights;
use crate::llm_client::prompts::WEEKLY_SUMMARY_PROMPT;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::entry::Theme;
use crate::models::weekly_summary::WeeklySummary;
use crate::store::JournalStore;

const SUMMARY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyStatus {
    Generated,
    Cached,
    InsufficientData,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeeklySummaryOutcome {
    Generated(WeeklySummary),
    Cached(WeeklySummary),
    InsufficientData { entry_count: u32, required: u32 },
    Unavailable { reason: String },
}

impl WeeklySummaryOutcome {
    pub fn status(&self) -> WeeklyStatus {
        match self {
            WeeklySummaryOutcome::Generated(_) => WeeklyStatus::Generated,
            WeeklySummaryOutcome::Cached(_) => WeeklyStatus::Cached,
            WeeklySummaryOutcome::InsufficientData { .. } => WeeklyStatus::InsufficientData,
            WeeklySummaryOutcome::Unavailable { .. } => WeeklyStatus::Unavailable,
        }
    }
}

pub async fn weekly_summary(
    store: &dyn JournalStore,
    generator: Option<&dyn TextGenerator>,
    settings: &JournalSettings,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<WeeklySummaryOutcome, AppError> {
    let cache_since = now - settings.weekly_cache_window;
    if let Some(cached) = store.find_weekly_summary(user_id, cache_since).await? {
        info!("Serving cached weekly summary {} for user {}", cached.id, user_id);
        return Ok(WeeklySummaryOutcome::Cached(cached));
    }

    let week_start = now - Duration::days(SUMMARY_WINDOW_DAYS);
    let entries = store.aggregate_window(user_id, week_start, now).await?;
    let report = compute_insights(&entries, settings.theme_top_k);

    if report.entry_count < settings.weekly_min_entries {
        return Ok(WeeklySummaryOutcome::InsufficientData {
            entry_count: report.entry_count,
            required: settings.weekly_min_entries,
        });
    }

    let Some(generator) = generator else {
        return Ok(WeeklySummaryOutcome::Unavailable {
            reason: "no text generator configured".to_string(),
        });
    };

    let prompt = build_prompt(report.entry_count, report.avg_sentiment, &report.top_themes);
    let generated =
        match tokio::time::timeout(settings.generator_timeout, generator.generate(&prompt, &entries))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(settings.generator_timeout)),
        };

    let text = match generated {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("Weekly summary for user {user_id} came back empty");
            return Ok(WeeklySummaryOutcome::Unavailable {
                reason: LlmError::EmptyContent.to_string(),
            });
        }
        Err(e) => {
            warn!("Weekly summary generation failed for user {user_id}: {e}");
            return Ok(WeeklySummaryOutcome::Unavailable {
                reason: e.to_string(),
            });
        }
    };

    let candidate = WeeklySummary {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        week_start,
        week_end: now,
        generated_at: now,
        summary: escape_markup(&text),
        entry_count: report.entry_count,
        avg_sentiment: report.avg_sentiment,
        top_themes: report.top_themes,
    };

    let stored = store
        .insert_weekly_summary_if_absent(&candidate, cache_since)
        .await?;

    if stored.id == candidate.id {
        info!("Generated weekly summary {} for user {}", stored.id, user_id);
        Ok(WeeklySummaryOutcome::Generated(stored))
    } else {
        // Another request for this user finished first.
        Ok(WeeklySummaryOutcome::Cached(stored))
    }
}

fn build_prompt(entry_count: u32, avg_sentiment: f64, top_themes: &[Theme]) -> String {
    let themes = if top_themes.is_empty() {
        "none in particular".to_string()
    } else {
        top_themes
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    WEEKLY_SUMMARY_PROMPT
        .replace("{entry_count}", &entry_count.to_string())
        .replace("{avg_sentiment}", &format!("{avg_sentiment:.2}"))
        .replace("{top_themes}", &themes)
}
