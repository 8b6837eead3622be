//! Entry Builder: validates a submission, runs the analyzers, persists once.
//!
//! Flow: normalize → sentiment → themes → summary → escape → single insert.
//! Analysis runs on the unescaped text; only stored strings are escaped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::normalize::{escape_markup, normalize_text, word_count};
use crate::analysis::sentiment::{score_sentiment, SentimentScore};
use crate::analysis::summarizer::summarize;
use crate::analysis::themes::extract_themes;
use crate::errors::AppError;
use crate::journal::{parse_entry_id, user_id_or_default};
use crate::models::entry::{Entry, Theme};
use crate::store::JournalStore;

/// Body of `POST /api/entries`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntryRequest {
    #[serde(default)]
    pub text: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_reflection: bool,
    pub original_entry_id: Option<String>,
}

/// Everything derived from an entry's text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    pub sentiment: SentimentScore,
    pub themes: Vec<Theme>,
    pub summary: Option<String>,
    pub word_count: u32,
}

pub fn analyze_text(text: &str, theme_top_k: usize) -> TextAnalysis {
    TextAnalysis {
        sentiment: score_sentiment(text),
        themes: extract_themes(text, theme_top_k),
        summary: summarize(text),
        word_count: word_count(text),
    }
}

/// Validates and persists a new entry, returning the stored record.
pub async fn create_entry(
    store: &dyn JournalStore,
    request: NewEntryRequest,
    theme_top_k: usize,
    now: DateTime<Utc>,
) -> Result<Entry, AppError> {
    let user_id = user_id_or_default(request.user_id)?;
    let text = normalize_text(&request.text)?;
    let original_entry_id = request
        .original_entry_id
        .as_deref()
        .map(parse_entry_id)
        .transpose()?;

    match (request.is_reflection, original_entry_id) {
        (true, None) => {
            return Err(AppError::Validation(
                "originalEntryId is required for reflections".to_string(),
            ));
        }
        (false, Some(_)) => {
            return Err(AppError::Validation(
                "originalEntryId is only allowed when isReflection is true".to_string(),
            ));
        }
        (true, Some(original_id)) => {
            let original = store
                .find_entry_by_id(original_id)
                .await?
                .filter(|e| e.user_id == user_id)
                .ok_or_else(|| AppError::NotFound(format!("Entry {original_id} not found")))?;
            if original.is_reflection {
                return Err(AppError::Validation(
                    "Reflections cannot be reflected upon".to_string(),
                ));
            }
        }
        (false, None) => {}
    }

    let analysis = analyze_text(text, theme_top_k);
    let entry = Entry {
        id: Uuid::new_v4(),
        user_id,
        text: escape_markup(text),
        created_at: now,
        sentiment: analysis.sentiment.sentiment,
        emotion: analysis.sentiment.emotion,
        confidence: analysis.sentiment.confidence,
        themes: analysis.themes,
        summary: analysis.summary.as_deref().map(escape_markup),
        word_count: analysis.word_count,
        is_reflection: request.is_reflection,
        original_entry_id,
    };

    store.insert_entry(&entry).await?;

    info!(
        "Created entry {} for user {} (emotion={}, polarity={:?}, themes={:?}, reflection={})",
        entry.id,
        entry.user_id,
        entry.emotion.as_str(),
        entry.emotion.polarity(),
        entry.themes,
        entry.is_reflection
    );

    Ok(entry)
}
