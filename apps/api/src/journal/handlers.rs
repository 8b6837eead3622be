use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::journal::builder::{create_entry, NewEntryRequest};
use crate::journal::garden::{load_garden, Plant, StageCounts};
use crate::journal::insights::{load_insights, InsightReport, Period};
use crate::journal::reflection::{select_reflection, ReflectionOutcome};
use crate::journal::weekly::{weekly_summary, WeeklyStatus, WeeklySummaryOutcome};
use crate::journal::{parse_entry_id, user_id_or_default};
use crate::models::entry::{Entry, Theme};
use crate::models::weekly_summary::WeeklySummary;
use crate::state::AppState;
use crate::store::EntryFilter;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

// ── Entries ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EntryResponse {
    pub success: bool,
    pub entry: Entry,
}

/// POST /api/entries
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(req): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let entry = create_entry(
        state.store.as_ref(),
        req,
        state.settings.theme_top_k,
        Utc::now(),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            success: true,
            entry,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesQuery {
    pub user_id: Option<String>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub theme: Option<String>,
    pub reflections: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListResponse {
    pub success: bool,
    pub entries: Vec<Entry>,
    pub has_more: bool,
}

/// GET /api/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesQuery>,
) -> Result<Json<EntryListResponse>, AppError> {
    let user_id = user_id_or_default(params.user_id)?;
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let theme = params
        .theme
        .as_deref()
        .map(str::parse::<Theme>)
        .transpose()
        .map_err(AppError::Validation)?;
    let filter = EntryFilter {
        is_reflection: params.reflections,
        theme,
    };

    let page = state
        .store
        .find_entries(&user_id, &filter, params.skip.unwrap_or(0), limit)
        .await?;
    Ok(Json(EntryListResponse {
        success: true,
        entries: page.entries,
        has_more: page.has_more,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetailResponse {
    pub success: bool,
    pub entry: Entry,
    pub original_entry: Option<Entry>,
    pub original_missing: bool,
}

/// GET /api/entries/:id
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryDetailResponse>, AppError> {
    let id = parse_entry_id(&id)?;
    let entry = state
        .store
        .find_entry_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))?;

    let original_entry = match entry.original_entry_id {
        Some(original_id) => state
            .store
            .find_entry_by_id(original_id)
            .await?
            .filter(|original| original.user_id == entry.user_id),
        None => None,
    };
    let original_missing = entry.original_entry_id.is_some() && original_entry.is_none();

    Ok(Json(EntryDetailResponse {
        success: true,
        entry,
        original_entry,
        original_missing,
    }))
}

// ── Garden & insights ────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenResponse {
    pub success: bool,
    pub garden: Vec<Plant>,
    pub total_plants: u32,
    pub blooming_plants: u32,
    pub stage_counts: StageCounts,
}

/// GET /api/garden
pub async fn handle_garden(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<GardenResponse>, AppError> {
    let user_id = user_id_or_default(params.user_id)?;
    let garden = load_garden(state.store.as_ref(), &user_id).await?;
    Ok(Json(GardenResponse {
        success: true,
        garden: garden.plants,
        total_plants: garden.total_plants,
        blooming_plants: garden.blooming_plants,
        stage_counts: garden.stage_counts,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsQuery {
    pub user_id: Option<String>,
    pub period: Option<String>,
}

#[derive(Serialize)]
pub struct InsightsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: InsightReport,
}

/// GET /api/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>, AppError> {
    let user_id = user_id_or_default(params.user_id)?;
    let period = match params.period.as_deref() {
        Some(raw) => raw.parse::<Period>()?,
        None => Period::default(),
    };
    let report = load_insights(
        state.store.as_ref(),
        &user_id,
        period,
        Utc::now(),
        state.settings.theme_top_k,
    )
    .await?;
    Ok(Json(InsightsResponse {
        success: true,
        report,
    }))
}

// ── Reflection ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReflectRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Serialize)]
pub struct ReflectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/reflect
pub async fn handle_reflect(
    State(state): State<AppState>,
    Json(req): Json<ReflectRequest>,
) -> Result<Json<ReflectResponse>, AppError> {
    let user_id = user_id_or_default(req.user_id)?;
    let exclude = req
        .exclude
        .iter()
        .map(|raw| parse_entry_id(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = select_reflection(
        state.store.as_ref(),
        &user_id,
        &exclude,
        state.settings.reflection_min_age,
        Utc::now(),
    )
    .await?;

    let response = match outcome {
        ReflectionOutcome::Selected { entry, prompt } => ReflectResponse {
            success: true,
            entry: Some(entry),
            prompt: Some(prompt),
            message: None,
        },
        ReflectionOutcome::NoCandidates => ReflectResponse {
            success: false,
            entry: None,
            prompt: None,
            message: Some("No entries available to reflect on yet".to_string()),
        },
    };
    Ok(Json(response))
}

// ── Weekly summary ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryView {
    pub summary: String,
    pub entry_count: u32,
    pub avg_sentiment: f64,
    pub top_themes: Vec<Theme>,
    pub week_start: DateTime<Utc>,
    pub week_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

impl From<WeeklySummary> for WeeklySummaryView {
    fn from(s: WeeklySummary) -> Self {
        Self {
            summary: s.summary,
            entry_count: s.entry_count,
            avg_sentiment: s.avg_sentiment,
            top_themes: s.top_themes,
            week_start: s.week_start,
            week_end: s.week_end,
            generated_at: s.generated_at,
        }
    }
}

#[derive(Serialize)]
pub struct WeeklySummaryResponse {
    pub success: bool,
    pub status: WeeklyStatus,
    pub summary: Option<WeeklySummaryView>,
    pub message: Option<String>,
}

/// POST /api/weekly-summary
pub async fn handle_weekly_summary(
    State(state): State<AppState>,
    Json(req): Json<UserIdQuery>,
) -> Result<Json<WeeklySummaryResponse>, AppError> {
    let user_id = user_id_or_default(req.user_id)?;
    let outcome = weekly_summary(
        state.store.as_ref(),
        state.generator.as_deref(),
        &state.settings,
        &user_id,
        Utc::now(),
    )
    .await?;
    let status = outcome.status();

    let (summary, message) = match outcome {
        WeeklySummaryOutcome::Generated(s) | WeeklySummaryOutcome::Cached(s) => {
            (Some(WeeklySummaryView::from(s)), None)
        }
        WeeklySummaryOutcome::InsufficientData {
            entry_count,
            required,
        } => (
            None,
            Some(format!(
                "Write at least {required} entries this week for a summary ({entry_count} so far)"
            )),
        ),
        WeeklySummaryOutcome::Unavailable { reason } => {
            info!("Weekly summary unavailable for {user_id}: {reason}");
            (
                None,
                Some("Weekly summary is temporarily unavailable, try again later".to_string()),
            )
        }
    };

    Ok(Json(WeeklySummaryResponse {
        success: summary.is_some(),
        status,
        summary,
        message,
    }))
}
