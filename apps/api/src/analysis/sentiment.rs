//! Sentiment scoring: two independent lexicon estimators blended with equal weight.
//!
//! - valence: summed word valences with negation, boosters and `!` emphasis,
//!   squashed into [-1, 1]
//! - polarity: mean word polarity with intensifiers and negation
//!
//! Confidence reflects how closely the two estimators agree.

use serde::{Deserialize, Serialize};

use crate::analysis::lexicon::{is_negation, BOOSTERS, INTENSIFIERS, POLARITY, VALENCE};
use crate::analysis::tokenize;
use crate::models::entry::Emotion;

/// Normalization constant for the valence sum.
const VALENCE_ALPHA: f64 = 15.0;
/// Scalar applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;
/// Scalar applied to a negated polarity.
const POLARITY_NEGATION: f64 = -0.5;
/// How many preceding tokens a negator reaches.
const NEGATION_WINDOW: usize = 3;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: f64,
    pub emotion: Emotion,
    pub confidence: f64,
}

impl SentimentScore {
    fn neutral() -> Self {
        Self {
            sentiment: 0.0,
            emotion: Emotion::Neutral,
            confidence: 0.0,
        }
    }
}

/// One estimator's result. `hits` counts lexicon words it found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub score: f64,
    pub hits: usize,
}

/// Scores text. Never fails: text without any lexicon evidence is neutral
/// with zero confidence.
pub fn score_sentiment(text: &str) -> SentimentScore {
    let tokens = tokenize(text);
    let exclamations = text.matches('!').count();

    let valence = valence_estimate(&tokens, exclamations);
    let polarity = polarity_estimate(&tokens);

    if valence.hits == 0 && polarity.hits == 0 {
        return SentimentScore::neutral();
    }

    let sentiment = ((valence.score + polarity.score) / 2.0).clamp(-1.0, 1.0);
    let confidence = (1.0 - (valence.score - polarity.score).abs() / 2.0).clamp(0.0, 1.0);

    SentimentScore {
        sentiment,
        emotion: Emotion::from_score(sentiment),
        confidence,
    }
}

pub fn valence_estimate(tokens: &[String], exclamations: usize) -> Estimate {
    let mut sum = 0.0;
    let mut hits = 0;

    for (i, token) in tokens.iter().enumerate() {
        let Some(&base) = VALENCE.get(token.as_str()) else {
            continue;
        };
        hits += 1;

        let mut valence = base;
        if let Some(&boost) = i.checked_sub(1).and_then(|p| BOOSTERS.get(tokens[p].as_str())) {
            valence += boost * valence.signum();
        }
        if is_negated(tokens, i) {
            valence *= NEGATION_SCALAR;
        }
        sum += valence;
    }

    if hits == 0 {
        return Estimate { score: 0.0, hits };
    }

    if sum != 0.0 {
        let emphasis = exclamations.min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_BOOST;
        sum += emphasis * sum.signum();
    }

    let score = (sum / (sum * sum + VALENCE_ALPHA).sqrt()).clamp(-1.0, 1.0);
    Estimate { score, hits }
}

pub fn polarity_estimate(tokens: &[String]) -> Estimate {
    let mut total = 0.0;
    let mut hits = 0;

    for (i, token) in tokens.iter().enumerate() {
        let Some(&base) = POLARITY.get(token.as_str()) else {
            continue;
        };
        hits += 1;

        let mut polarity = base;
        if let Some(&factor) = i
            .checked_sub(1)
            .and_then(|p| INTENSIFIERS.get(tokens[p].as_str()))
        {
            polarity *= factor;
        }
        if is_negated(tokens, i) {
            polarity *= POLARITY_NEGATION;
        }
        total += polarity.clamp(-1.0, 1.0);
    }

    if hits == 0 {
        return Estimate { score: 0.0, hits };
    }
    Estimate {
        score: (total / hits as f64).clamp(-1.0, 1.0),
        hits,
    }
}

fn is_negated(tokens: &[String], index: usize) -> bool {
    let start = index.saturating_sub(NEGATION_WINDOW);
    tokens[start..index].iter().any(|t| is_negation(t))
}
