//! Journal pipeline: entry building, garden, insights, reflection, weekly digest.
//! Handlers map the HTTP contract onto these; the rest is store-agnostic.

pub mod builder;
pub mod garden;
pub mod handlers;
pub mod insights;
pub mod reflection;
pub mod weekly;

use uuid::Uuid;

use crate::errors::AppError;

/// Owner used when a request does not name one.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Resolves the request's user id, falling back to `DEFAULT_USER_ID` when absent.
pub fn user_id_or_default(user_id: Option<String>) -> Result<String, AppError> {
    match user_id {
        None => Ok(DEFAULT_USER_ID.to_string()),
        Some(id) if id.trim().is_empty() => {
            Err(AppError::Validation("userId cannot be blank".to_string()))
        }
        Some(id) => Ok(id.trim().to_string()),
    }
}

/// Parses an entry id supplied by a client.
pub fn parse_entry_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid entry id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_falls_back_to_default() {
        assert_eq!(user_id_or_default(None).unwrap(), DEFAULT_USER_ID);
    }

    #[test]
    fn test_blank_user_is_rejected() {
        assert!(matches!(
            user_id_or_default(Some("  ".into())),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_entry_id_is_validation_error() {
        assert!(matches!(parse_entry_id("abc"), Err(AppError::Validation(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_entry_id(&id.to_string()).unwrap(), id);
    }
}
