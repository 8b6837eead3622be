//! Reflection Selector: resurfaces an older entry with a prompt.
//!
//! Client-side flow: NoEntry → EntrySelected → ReflectionComposed → Persisted.
//! "Pick a different entry" calls back in with the shown id added to `exclude`;
//! persisting goes through `builder::create_entry` with `isReflection = true`.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::entry::Entry;
use crate::store::JournalStore;

pub const REFLECTION_PROMPTS: &[&str] = &[
    "How do you feel about this moment now?",
    "What would you tell yourself back then?",
    "What has changed since you wrote this?",
    "What did this experience teach you?",
    "Is there anything here you are still carrying with you?",
    "What are you grateful for when you read this again?",
    "Which part of this surprises you today?",
    "If this happened again tomorrow, what would you do differently?",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ReflectionOutcome {
    Selected { entry: Entry, prompt: &'static str },
    NoCandidates,
}

/// Picks one eligible entry uniformly at random.
///
/// Eligible: owned by `user_id`, not itself a reflection, not in `exclude`,
/// and at least `min_age` old at `now`.
pub async fn select_reflection(
    store: &dyn JournalStore,
    user_id: &str,
    exclude: &[Uuid],
    min_age: Duration,
    now: DateTime<Utc>,
) -> Result<ReflectionOutcome, AppError> {
    let candidates = store
        .reflection_candidates(user_id, exclude, now - min_age)
        .await?;
    debug!(
        "{} reflection candidates for user {} ({} excluded)",
        candidates.len(),
        user_id,
        exclude.len()
    );
    Ok(pick(candidates, &mut rand::thread_rng()))
}

/// Uniform choice of entry and prompt.
pub fn pick<R: Rng + ?Sized>(candidates: Vec<Entry>, rng: &mut R) -> ReflectionOutcome {
    let Some(entry) = candidates.choose(rng).cloned() else {
        return ReflectionOutcome::NoCandidates;
    };
    let prompt = REFLECTION_PROMPTS
        .choose(rng)
        .copied()
        .unwrap_or(REFLECTION_PROMPTS[0]);
    ReflectionOutcome::Selected { entry, prompt }
}
