use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analysis::themes::DEFAULT_TOP_K;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means entries live in process memory only.
    pub database_url: Option<String>,
    /// Unset disables weekly summary generation.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    pub journal: JournalSettings,
}

/// Tunables for the analysis and aggregation pipeline.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    /// Cap on themes per entry and on reported top themes.
    pub theme_top_k: usize,
    /// Entries younger than this are not offered for reflection.
    pub reflection_min_age: chrono::Duration,
    /// At most one weekly summary is generated per user per window.
    pub weekly_cache_window: chrono::Duration,
    pub weekly_min_entries: u32,
    pub store_timeout: std::time::Duration,
    pub generator_timeout: std::time::Duration,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            theme_top_k: DEFAULT_TOP_K,
            reflection_min_age: chrono::Duration::hours(1),
            weekly_cache_window: chrono::Duration::hours(24),
            weekly_min_entries: 3,
            store_timeout: std::time::Duration::from_secs(5),
            generator_timeout: std::time::Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = JournalSettings::default();
        let journal = JournalSettings {
            theme_top_k: env_or("THEME_TOP_K", defaults.theme_top_k)?,
            reflection_min_age: chrono::Duration::minutes(env_or(
                "REFLECTION_MIN_AGE_MINUTES",
                defaults.reflection_min_age.num_minutes(),
            )?),
            weekly_cache_window: chrono::Duration::hours(env_or(
                "WEEKLY_SUMMARY_CACHE_HOURS",
                defaults.weekly_cache_window.num_hours(),
            )?),
            weekly_min_entries: env_or("WEEKLY_SUMMARY_MIN_ENTRIES", defaults.weekly_min_entries)?,
            store_timeout: std::time::Duration::from_secs(env_or(
                "STORE_TIMEOUT_SECS",
                defaults.store_timeout.as_secs(),
            )?),
            generator_timeout: std::time::Duration::from_secs(env_or(
                "GENERATOR_TIMEOUT_SECS",
                defaults.generator_timeout.as_secs(),
            )?),
        };
        if journal.theme_top_k == 0 {
            anyhow::bail!("THEME_TOP_K must be at least 1");
        }

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            journal,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
