//! Garden Aggregator: one plant per theme, grown by entry count.
//!
//! Stage thresholds (entries carrying the theme):
//! seedling 1, sprouting 2–4, growing 5–9, blooming 10+.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::entry::Theme;
use crate::store::JournalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Seedling,
    Sprouting,
    Growing,
    Blooming,
}

impl Stage {
    pub fn for_count(count: u32) -> Stage {
        match count {
            0..=1 => Stage::Seedling,
            2..=4 => Stage::Sprouting,
            5..=9 => Stage::Growing,
            _ => Stage::Blooming,
        }
    }

    /// Minimum entry count to reach this stage.
    pub fn threshold(self) -> u32 {
        match self {
            Stage::Seedling => 1,
            Stage::Sprouting => 2,
            Stage::Growing => 5,
            Stage::Blooming => 10,
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Seedling => Some(Stage::Sprouting),
            Stage::Sprouting => Some(Stage::Growing),
            Stage::Growing => Some(Stage::Blooming),
            Stage::Blooming => None,
        }
    }
}

/// Entries still needed to reach the next stage; 0 once blooming.
pub fn next_stage_needs(count: u32) -> u32 {
    Stage::for_count(count)
        .next()
        .map_or(0, |next| next.threshold().saturating_sub(count))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub theme: Theme,
    pub stage: Stage,
    pub count: u32,
    pub next_stage_needs: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageCounts {
    pub seedling: u32,
    pub sprouting: u32,
    pub growing: u32,
    pub blooming: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Garden {
    pub plants: Vec<Plant>,
    pub total_plants: u32,
    pub blooming_plants: u32,
    pub stage_counts: StageCounts,
}

/// Builds the garden from per-theme counts. Zero counts grow nothing.
pub fn build_garden(theme_counts: &[(Theme, u32)]) -> Garden {
    let mut plants: Vec<Plant> = theme_counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|&(theme, count)| Plant {
            theme,
            stage: Stage::for_count(count),
            count,
            next_stage_needs: next_stage_needs(count),
        })
        .collect();
    plants.sort_by(|a, b| b.count.cmp(&a.count).then(a.theme.cmp(&b.theme)));

    let mut stage_counts = StageCounts::default();
    for plant in &plants {
        match plant.stage {
            Stage::Seedling => stage_counts.seedling += 1,
            Stage::Sprouting => stage_counts.sprouting += 1,
            Stage::Growing => stage_counts.growing += 1,
            Stage::Blooming => stage_counts.blooming += 1,
        }
    }

    Garden {
        total_plants: plants.len() as u32,
        blooming_plants: stage_counts.blooming,
        plants,
        stage_counts,
    }
}

pub async fn load_garden(store: &dyn JournalStore, user_id: &str) -> Result<Garden, AppError> {
    let counts = store.aggregate_by_theme(user_id).await?;
    Ok(build_garden(&counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::journal::builder::{create_entry, NewEntryRequest};
    use crate::store::MemoryStore;

    #[test]
    fn test_stage_boundaries() {
        assert_eq!(Stage::for_count(1), Stage::Seedling);
        assert_eq!(Stage::for_count(2), Stage::Sprouting);
        assert_eq!(Stage::for_count(4), Stage::Sprouting);
        assert_eq!(Stage::for_count(5), Stage::Growing);
        assert_eq!(Stage::for_count(9), Stage::Growing);
        assert_eq!(Stage::for_count(10), Stage::Blooming);
        assert_eq!(Stage::for_count(250), Stage::Blooming);
    }

    #[test]
    fn test_stage_is_monotonic_in_count() {
        let mut previous = Stage::for_count(1);
        for count in 2..100 {
            let stage = Stage::for_count(count);
            assert!(stage >= previous, "stage regressed at count {count}");
            previous = stage;
        }
    }

    #[test]
    fn test_next_stage_needs() {
        for count in 1..60 {
            let stage = Stage::for_count(count);
            let needs = next_stage_needs(count);
            match stage.next() {
                Some(next) => {
                    assert!(needs > 0);
                    assert_eq!(needs, next.threshold() - count);
                }
                None => assert_eq!(needs, 0),
            }
        }
        assert_eq!(next_stage_needs(1), 1);
        assert_eq!(next_stage_needs(3), 2);
        assert_eq!(next_stage_needs(6), 4);
        assert_eq!(next_stage_needs(11), 0);
    }

    #[test]
    fn test_four_themes_at_increasing_counts() {
        let garden = build_garden(&[
            (Theme::Work, 1),
            (Theme::Family, 3),
            (Theme::Health, 6),
            (Theme::Travel, 11),
        ]);

        let stage_of = |theme: Theme| {
            garden
                .plants
                .iter()
                .find(|p| p.theme == theme)
                .map(|p| p.stage)
        };
        assert_eq!(stage_of(Theme::Work), Some(Stage::Seedling));
        assert_eq!(stage_of(Theme::Family), Some(Stage::Sprouting));
        assert_eq!(stage_of(Theme::Health), Some(Stage::Growing));
        assert_eq!(stage_of(Theme::Travel), Some(Stage::Blooming));
        assert_eq!(garden.total_plants, 4);
        assert_eq!(garden.blooming_plants, 1);
        assert_eq!(
            garden.stage_counts,
            StageCounts {
                seedling: 1,
                sprouting: 1,
                growing: 1,
                blooming: 1
            }
        );
    }

    #[test]
    fn test_plants_sorted_by_count_then_taxonomy() {
        let garden = build_garden(&[(Theme::Travel, 2), (Theme::Work, 2), (Theme::Love, 7)]);
        let order: Vec<Theme> = garden.plants.iter().map(|p| p.theme).collect();
        assert_eq!(order, vec![Theme::Love, Theme::Work, Theme::Travel]);
    }

    #[test]
    fn test_empty_garden() {
        let garden = build_garden(&[]);
        assert!(garden.plants.is_empty());
        assert_eq!(garden.total_plants, 0);
        assert_eq!(garden.blooming_plants, 0);
    }

    #[tokio::test]
    async fn test_load_garden_counts_multi_theme_entries_in_each_group() {
        let store = MemoryStore::new();
        for text in [
            "Stressful day at work",
            "Another deadline at work",
            "Dinner with mom",
        ] {
            create_entry(
                &store,
                NewEntryRequest {
                    text: text.to_string(),
                    user_id: Some("gardener".to_string()),
                    ..Default::default()
                },
                3,
                Utc::now(),
            )
            .await
            .unwrap();
        }

        let garden = load_garden(&store, "gardener").await.unwrap();
        let work = garden.plants.iter().find(|p| p.theme == Theme::Work).unwrap();
        assert_eq!(work.count, 2);
        assert_eq!(work.stage, Stage::Sprouting);
        assert_eq!(work.next_stage_needs, 3);
        assert!(garden.plants.iter().any(|p| p.theme == Theme::Stress));
        assert!(garden.plants.iter().any(|p| p.theme == Theme::Family));
        assert_eq!(garden.total_plants, 3);
    }
}
