/// Texts shorter than this (in characters) get no summary.
pub const SUMMARY_MIN_CHARS: usize = 150;
/// Character budget for a summary.
pub const SUMMARY_MAX_CHARS: usize = 200;
/// Leading sentences considered for a summary.
const MAX_SENTENCES: usize = 2;
const ELLIPSIS: &str = "...";

/// Extractive summary: the leading sentence(s) that fit the budget.
///
/// Returns `None` for short texts; callers display the text itself.
pub fn summarize(text: &str) -> Option<String> {
    let text = text.trim();
    if text.chars().count() < SUMMARY_MIN_CHARS {
        return None;
    }

    let mut summary = String::new();
    for sentence in split_sentences(text).into_iter().take(MAX_SENTENCES) {
        let candidate_len = if summary.is_empty() {
            sentence.chars().count()
        } else {
            summary.chars().count() + 1 + sentence.chars().count()
        };
        if candidate_len > SUMMARY_MAX_CHARS {
            break;
        }
        if !summary.is_empty() {
            summary.push(' ');
        }
        summary.push_str(sentence);
    }

    if summary.is_empty() {
        summary = truncate_at_word(text, SUMMARY_MAX_CHARS - ELLIPSIS.len());
        summary.push_str(ELLIPSIS);
    }
    Some(summary)
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_i, next)) = chars.peek() {
            if next.is_whitespace() {
                let sentence = text[start..next_i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = next_i;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Longest prefix of at most `max_chars` characters ending on a word boundary.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let prefix = &text[..cut];
    let boundary_follows = text[cut..].starts_with(char::is_whitespace);
    let trimmed = if boundary_follows {
        prefix
    } else {
        match prefix.rfind(char::is_whitespace) {
            Some(space) => &prefix[..space],
            None => prefix,
        }
    };
    trimmed.trim_end().to_string()
}
