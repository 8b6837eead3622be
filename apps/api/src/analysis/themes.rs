//! Keyword-based theme tagging over the fixed ten-theme taxonomy.

use std::collections::HashMap;

use crate::analysis::tokenize;
use crate::models::entry::Theme;

/// Default cap on themes attached to one entry or reported as "top".
pub const DEFAULT_TOP_K: usize = 3;

/// Trigger keywords per theme. Entries with a space are matched as phrases.
pub fn keywords(theme: Theme) -> &'static [&'static str] {
    match theme {
        Theme::Work => &[
            "work", "working", "worked", "job", "office", "boss", "meeting", "meetings",
            "project", "deadline", "deadlines", "career", "colleague", "colleagues",
            "coworker", "coworkers", "client", "clients", "promotion", "manager",
        ],
        Theme::Family => &[
            "family", "mom", "mother", "dad", "father", "parents", "sister", "brother",
            "son", "daughter", "kids", "children", "grandma", "grandpa", "grandmother",
            "grandfather", "cousin", "aunt", "uncle", "family dinner",
        ],
        Theme::Health => &[
            "health", "healthy", "exercise", "workout", "gym", "run", "running", "sleep",
            "slept", "doctor", "sick", "illness", "diet", "yoga", "meditation", "hospital",
            "medicine", "mental health",
        ],
        Theme::Love => &[
            "love", "loved", "romance", "romantic", "partner", "boyfriend", "girlfriend",
            "husband", "wife", "dating", "relationship", "crush", "kiss", "valentine",
            "date night",
        ],
        Theme::Friends => &[
            "friend", "friends", "friendship", "buddy", "buddies", "bestie", "party",
            "hang out", "hung out", "best friend",
        ],
        Theme::Stress => &[
            "stress", "stressed", "stressful", "anxious", "anxiety", "pressure",
            "overwhelmed", "worried", "worry", "panic", "tense", "burnout", "burned out",
        ],
        Theme::Happiness => &[
            "happy", "happiness", "joy", "joyful", "glad", "smile", "smiled", "laugh",
            "laughed", "grateful", "gratitude", "cheerful", "excited", "delighted",
        ],
        Theme::Creativity => &[
            "creative", "creativity", "art", "paint", "painting", "draw", "drawing",
            "writing", "music", "song", "poem", "poetry", "design", "craft",
            "photography", "idea", "ideas",
        ],
        Theme::Learning => &[
            "learn", "learning", "learned", "study", "studying", "studied", "class",
            "course", "book", "books", "reading", "school", "lesson", "skill", "practice",
            "university", "lecture",
        ],
        Theme::Travel => &[
            "travel", "traveling", "travelled", "traveled", "trip", "vacation", "flight",
            "airport", "journey", "explore", "exploring", "abroad", "beach", "hotel",
            "visit", "visited", "road trip",
        ],
    }
}

/// Keyword hit counts per theme. Repeated keywords count every time.
pub fn theme_scores(text: &str) -> HashMap<Theme, u32> {
    let tokens = tokenize(text);
    let mut scores = HashMap::new();

    for theme in Theme::ALL {
        let hits: usize = keywords(theme)
            .iter()
            .map(|kw| count_occurrences(&tokens, kw))
            .sum();
        if hits > 0 {
            scores.insert(theme, u32::try_from(hits).unwrap_or(u32::MAX));
        }
    }
    scores
}

/// The `top_k` best-scoring themes of `text`.
pub fn extract_themes(text: &str, top_k: usize) -> Vec<Theme> {
    top_themes(&theme_scores(text), top_k)
}

/// Ranks themes by count descending, ties by taxonomy order, dropping zero counts.
pub fn top_themes(counts: &HashMap<Theme, u32>, top_k: usize) -> Vec<Theme> {
    let mut ranked: Vec<(Theme, u32)> = counts
        .iter()
        .filter(|(_, &count)| count > 0)
        .map(|(&theme, &count)| (theme, count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(top_k).map(|(theme, _)| theme).collect()
}

fn count_occurrences(tokens: &[String], keyword: &str) -> usize {
    let parts: Vec<&str> = keyword.split(' ').collect();
    if parts.len() == 1 {
        return tokens.iter().filter(|t| t.as_str() == keyword).count();
    }
    tokens
        .windows(parts.len())
        .filter(|window| window.iter().zip(&parts).all(|(t, p)| t == p))
        .count()
}
