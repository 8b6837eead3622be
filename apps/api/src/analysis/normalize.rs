use crate::errors::AppError;

/// Maximum entry length, counted in characters after trimming.
pub const MAX_ENTRY_CHARS: usize = 10_000;

/// Trims the raw text and checks the length bounds.
/// Returns the plain text the analyzers work on.
pub fn normalize_text(raw: &str) -> Result<&str, AppError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    let chars = text.chars().count();
    if chars > MAX_ENTRY_CHARS {
        return Err(AppError::Validation(format!(
            "Text is too long ({chars} characters, maximum is {MAX_ENTRY_CHARS})"
        )));
    }
    Ok(text)
}

/// Escapes markup-significant characters for storage.
///
/// Stored text is safe to drop into HTML as-is. Any other presentation
/// format has to decode and re-encode for itself.
pub fn escape_markup(text: &str) -> String {
    html_escape::encode_safe(text).into_owned()
}

/// Whitespace-separated token count of the unescaped text.
pub fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}
