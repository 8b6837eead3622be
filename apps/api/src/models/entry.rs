use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The fixed theme taxonomy. Declaration order is the tie-break order
/// everywhere themes are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Work,
    Family,
    Health,
    Love,
    Friends,
    Stress,
    Happiness,
    Creativity,
    Learning,
    Travel,
}

impl Theme {
    pub const ALL: [Theme; 10] = [
        Theme::Work,
        Theme::Family,
        Theme::Health,
        Theme::Love,
        Theme::Friends,
        Theme::Stress,
        Theme::Happiness,
        Theme::Creativity,
        Theme::Learning,
        Theme::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Work => "work",
            Theme::Family => "family",
            Theme::Health => "health",
            Theme::Love => "love",
            Theme::Friends => "friends",
            Theme::Stress => "stress",
            Theme::Happiness => "happiness",
            Theme::Creativity => "creativity",
            Theme::Learning => "learning",
            Theme::Travel => "travel",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Coarse three-way split of the sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

/// Emotion label derived from the blended sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl Emotion {
    /// Maps a score in [-1, 1] to a label.
    /// Buckets: >0.1 positive side, <-0.1 negative side, neutral in between.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.5 => Emotion::VeryPositive,
            s if s > 0.1 => Emotion::Positive,
            s if s >= -0.1 => Emotion::Neutral,
            s if s > -0.5 => Emotion::Negative,
            _ => Emotion::VeryNegative,
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Emotion::VeryPositive | Emotion::Positive => Polarity::Positive,
            Emotion::Neutral => Polarity::Neutral,
            Emotion::Negative | Emotion::VeryNegative => Polarity::Negative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::VeryPositive => "very_positive",
            Emotion::Positive => "positive",
            Emotion::Neutral => "neutral",
            Emotion::Negative => "negative",
            Emotion::VeryNegative => "very_negative",
        }
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_positive" => Ok(Emotion::VeryPositive),
            "positive" => Ok(Emotion::Positive),
            "neutral" => Ok(Emotion::Neutral),
            "negative" => Ok(Emotion::Negative),
            "very_negative" => Ok(Emotion::VeryNegative),
            other => Err(format!("unknown emotion '{other}'")),
        }
    }
}

/// A persisted journal entry. Derived fields are written once at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub user_id: String,
    /// HTML-escaped body.
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: f64,
    pub emotion: Emotion,
    pub confidence: f64,
    pub themes: Vec<Theme>,
    pub summary: Option<String>,
    pub word_count: u32,
    pub is_reflection: bool,
    pub original_entry_id: Option<Uuid>,
}

/// Row shape of the `entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: f64,
    pub emotion: String,
    pub confidence: f64,
    pub themes: Vec<String>,
    pub summary: Option<String>,
    pub word_count: i32,
    pub is_reflection: bool,
    pub original_entry_id: Option<Uuid>,
}

impl TryFrom<EntryRow> for Entry {
    type Error = String;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let themes = row
            .themes
            .iter()
            .map(|t| t.parse::<Theme>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Entry {
            id: row.id,
            user_id: row.user_id,
            text: row.text,
            created_at: row.created_at,
            sentiment: row.sentiment,
            emotion: row.emotion.parse()?,
            confidence: row.confidence,
            themes,
            summary: row.summary,
            word_count: u32::try_from(row.word_count).map_err(|e| e.to_string())?,
            is_reflection: row.is_reflection,
            original_entry_id: row.original_entry_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_buckets_match_polarity_thresholds() {
        assert_eq!(Emotion::from_score(0.11).polarity(), Polarity::Positive);
        assert_eq!(Emotion::from_score(0.1).polarity(), Polarity::Neutral);
        assert_eq!(Emotion::from_score(-0.1).polarity(), Polarity::Neutral);
        assert_eq!(Emotion::from_score(-0.11).polarity(), Polarity::Negative);
        assert_eq!(Emotion::from_score(0.9), Emotion::VeryPositive);
        assert_eq!(Emotion::from_score(-0.9), Emotion::VeryNegative);
    }

    #[test]
    fn test_theme_parse_is_case_insensitive() {
        assert_eq!("Family".parse::<Theme>(), Ok(Theme::Family));
        assert!("gardening".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        let json = serde_json::to_string(&Theme::Creativity).unwrap();
        assert_eq!(json, "\"creativity\"");
    }

    #[test]
    fn test_row_with_unknown_theme_is_rejected() {
        let row = EntryRow {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            text: "t".to_string(),
            created_at: Utc::now(),
            sentiment: 0.0,
            emotion: "neutral".to_string(),
            confidence: 0.0,
            themes: vec!["gardening".to_string()],
            summary: None,
            word_count: 1,
            is_reflection: false,
            original_entry_id: None,
        };
        assert!(Entry::try_from(row).is_err());
    }
}
