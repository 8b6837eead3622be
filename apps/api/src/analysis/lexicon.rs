//! Word lists backing the two sentiment estimators.
//!
//! The valence table scores words on a -4..=4 scale. The polarity table
//! scores a separate vocabulary on -1..=1. The two tables are maintained
//! independently so the estimators can disagree.

use std::collections::HashMap;

use once_cell::sync::Lazy;

const VALENCE_WORDS: &[(&str, f64)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("lovely", 2.8),
    ("adore", 2.9),
    ("happy", 2.7),
    ("happiness", 2.6),
    ("happier", 2.4),
    ("joy", 2.8),
    ("joyful", 2.9),
    ("glad", 2.0),
    ("grateful", 2.5),
    ("thankful", 2.3),
    ("blessed", 2.6),
    ("excited", 2.2),
    ("exciting", 2.2),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("wonderful", 2.7),
    ("great", 3.1),
    ("good", 1.9),
    ("nice", 1.8),
    ("fun", 2.3),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("calm", 1.3),
    ("peaceful", 2.2),
    ("relaxed", 2.2),
    ("proud", 2.1),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("success", 2.7),
    ("successful", 2.8),
    ("accomplished", 1.8),
    ("smile", 1.5),
    ("laugh", 2.6),
    ("laughed", 2.0),
    ("fantastic", 2.6),
    ("perfect", 2.7),
    ("inspired", 2.2),
    ("confident", 2.2),
    ("safe", 1.9),
    ("kind", 2.4),
    ("win", 2.8),
    ("won", 2.7),
    // negative
    ("sad", -2.1),
    ("sadness", -1.9),
    ("unhappy", -1.8),
    ("angry", -2.3),
    ("anger", -2.7),
    ("mad", -2.2),
    ("hate", -2.7),
    ("hated", -3.2),
    ("awful", -2.0),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("stressed", -1.4),
    ("stress", -1.8),
    ("stressful", -2.3),
    ("anxious", -1.0),
    ("anxiety", -0.7),
    ("worried", -1.2),
    ("worry", -1.9),
    ("afraid", -2.2),
    ("scared", -2.2),
    ("fear", -2.2),
    ("tired", -1.9),
    ("exhausted", -1.5),
    ("lonely", -2.0),
    ("alone", -1.0),
    ("hurt", -2.4),
    ("pain", -2.3),
    ("painful", -2.4),
    ("cry", -2.1),
    ("cried", -1.6),
    ("crying", -2.1),
    ("upset", -1.6),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("annoyed", -1.6),
    ("overwhelmed", -1.5),
    ("disappointed", -1.9),
    ("failed", -2.3),
    ("failure", -2.3),
    ("miserable", -2.2),
    ("depressed", -2.3),
    ("sick", -1.7),
    ("lost", -1.3),
    ("problem", -1.7),
    ("difficult", -1.5),
    ("hard", -0.4),
];

const POLARITY_WORDS: &[(&str, f64)] = &[
    // positive
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("joyful", 0.8),
    ("grateful", 0.6),
    ("thankful", 0.5),
    ("excited", 0.375),
    ("exciting", 0.3),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("great", 0.8),
    ("good", 0.7),
    ("nice", 0.6),
    ("fun", 0.3),
    ("calm", 0.3),
    ("peaceful", 0.25),
    ("relaxed", 0.4),
    ("proud", 0.8),
    ("hopeful", 0.5),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("successful", 0.75),
    ("fantastic", 0.4),
    ("perfect", 1.0),
    ("inspired", 0.6),
    ("confident", 0.5),
    ("kind", 0.6),
    ("fine", 0.4),
    ("pleasant", 0.73),
    ("delightful", 1.0),
    ("productive", 0.5),
    ("healthy", 0.5),
    ("positive", 0.23),
    ("fresh", 0.3),
    ("warm", 0.6),
    // negative
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("angry", -0.5),
    ("mad", -0.625),
    ("awful", -1.0),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("stressed", -0.7),
    ("stressful", -0.6),
    ("anxious", -0.25),
    ("worried", -0.4),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("tired", -0.4),
    ("exhausted", -0.4),
    ("lonely", -0.5),
    ("alone", -0.2),
    ("painful", -0.7),
    ("upset", -0.3),
    ("frustrated", -0.7),
    ("annoyed", -0.4),
    ("overwhelmed", -0.5),
    ("disappointed", -0.75),
    ("miserable", -1.0),
    ("depressed", -0.8),
    ("sick", -0.7),
    ("lost", -0.3),
    ("difficult", -0.5),
    ("hard", -0.3),
    ("boring", -1.0),
    ("ugly", -0.7),
    ("negative", -0.3),
    ("wrong", -0.5),
];

/// Words that intensify (positive increment) or soften (negative increment)
/// the valence of the word that follows.
const BOOSTER_WORDS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("totally", 0.293),
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("super", 0.293),
    ("deeply", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("barely", -0.293),
    ("kinda", -0.293),
    ("little", -0.293),
];

/// Multipliers applied by the polarity estimator to the following word.
const INTENSIFIER_WORDS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("super", 1.3),
    ("quite", 1.1),
    ("slightly", 0.7),
    ("somewhat", 0.8),
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "cannot",
    "dont", "didnt", "isnt", "wasnt", "wont", "cant", "hardly",
];

pub static VALENCE: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| VALENCE_WORDS.iter().copied().collect());

pub static POLARITY: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| POLARITY_WORDS.iter().copied().collect());

pub static BOOSTERS: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| BOOSTER_WORDS.iter().copied().collect());

pub static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| INTENSIFIER_WORDS.iter().copied().collect());

/// True for negators, including any "n't" contraction.
pub fn is_negation(token: &str) -> bool {
    token.ends_with("n't") || NEGATION_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valence_scores_stay_in_scale() {
        assert!(VALENCE.values().all(|v| (-4.0..=4.0).contains(v)));
    }

    #[test]
    fn test_polarity_scores_stay_in_scale() {
        assert!(POLARITY.values().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_negation_detects_contractions() {
        assert!(is_negation("don't"));
        assert!(is_negation("wasn't"));
        assert!(is_negation("never"));
        assert!(!is_negation("know"));
    }
}
