//! Insight Aggregator: read-only statistics over a time window.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::themes::top_themes;
use crate::errors::AppError;
use crate::models::entry::{Entry, Theme};
use crate::store::JournalStore;

/// Mean-sentiment change between window halves below which the trend is stable.
const TREND_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Weekly,
    Monthly,
}

impl Period {
    pub fn duration(self) -> Duration {
        match self {
            Period::Weekly => Duration::days(7),
            Period::Monthly => Duration::days(30),
        }
    }
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            other => Err(AppError::Validation(format!(
                "period must be 'weekly' or 'monthly', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub avg_word_count: f64,
    pub sentiment_trend: SentimentTrend,
    /// UTC hour; `None` when the window is empty.
    pub most_active_hour: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub entry_count: u32,
    /// 0.0 for an empty window; check `entry_count` to tell the cases apart.
    pub avg_sentiment: f64,
    pub theme_counts: BTreeMap<Theme, u32>,
    pub top_themes: Vec<Theme>,
    pub insights: Insights,
}

/// Aggregates `entries` (any order) into a report.
pub fn compute_insights(entries: &[Entry], top_k: usize) -> InsightReport {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.created_at);

    let sentiments: Vec<f64> = ordered.iter().map(|e| e.sentiment).collect();

    let mut counts: HashMap<Theme, u32> = HashMap::new();
    let mut hours = [0u32; 24];
    for entry in &ordered {
        for theme in &entry.themes {
            *counts.entry(*theme).or_default() += 1;
        }
        hours[entry.created_at.hour() as usize] += 1;
    }

    let word_counts: Vec<f64> = ordered.iter().map(|e| f64::from(e.word_count)).collect();

    InsightReport {
        entry_count: ordered.len() as u32,
        avg_sentiment: mean(&sentiments),
        top_themes: top_themes(&counts, top_k),
        theme_counts: counts.into_iter().collect(),
        insights: Insights {
            avg_word_count: mean(&word_counts),
            sentiment_trend: sentiment_trend(&sentiments),
            most_active_hour: most_active_hour(&hours),
        },
    }
}

/// Compares the chronological first half against the second half.
pub fn sentiment_trend(chronological: &[f64]) -> SentimentTrend {
    if chronological.len() < 2 {
        return SentimentTrend::Stable;
    }
    let (first, second) = chronological.split_at(chronological.len() / 2);
    let delta = mean(second) - mean(first);
    if delta > TREND_EPSILON {
        SentimentTrend::Improving
    } else if delta < -TREND_EPSILON {
        SentimentTrend::Declining
    } else {
        SentimentTrend::Stable
    }
}

/// Busiest hour, earliest on ties.
fn most_active_hour(hours: &[u32; 24]) -> Option<u32> {
    let (hour, &count) = hours
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))?;
    (count > 0).then_some(hour as u32)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub async fn load_insights(
    store: &dyn JournalStore,
    user_id: &str,
    period: Period,
    now: DateTime<Utc>,
    top_k: usize,
) -> Result<InsightReport, AppError> {
    let entries = store
        .aggregate_window(user_id, now - period.duration(), now)
        .await?;
    Ok(compute_insights(&entries, top_k))
}
