//! Entry analysis pipeline: normalization, sentiment, themes, summary.
//! Pure functions only; nothing here touches the store or the network.

pub mod lexicon;
pub mod normalize;
pub mod sentiment;
pub mod summarizer;
pub mod themes;

/// Lowercased word tokens. Apostrophes stay inside words so "don't" is one token.
/// Typographic apostrophes are folded to `'` first.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(|c: char| c == '\u{2019}' || c == '\u{2018}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}
