use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::entry::Theme;

/// A generated weekly digest, cached per user for a rolling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub id: Uuid,
    pub user_id: String,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub entry_count: u32,
    pub avg_sentiment: f64,
    pub top_themes: Vec<Theme>,
}

#[derive(Debug, Clone, FromRow)]
pub struct WeeklySummaryRow {
    pub id: Uuid,
    pub user_id: String,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub entry_count: i32,
    pub avg_sentiment: f64,
    pub top_themes: Vec<String>,
}

impl TryFrom<WeeklySummaryRow> for WeeklySummary {
    type Error = String;

    fn try_from(row: WeeklySummaryRow) -> Result<Self, Self::Error> {
        Ok(WeeklySummary {
            id: row.id,
            user_id: row.user_id,
            week_start: row.week_start,
            week_end: row.week_end,
            generated_at: row.generated_at,
            summary: row.summary,
            entry_count: u32::try_from(row.entry_count).map_err(|e| e.to_string())?,
            avg_sentiment: row.avg_sentiment,
            top_themes: row
                .top_themes
                .iter()
                .map(|t| t.parse::<Theme>())
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
