// ABOUTME: Input validation shared by the storage packages
// ABOUTME: Label and username normalization plus display truncation

use thiserror::Error;

use crate::color::ColorParseError;

/// Maximum number of characters in a tag or document label
pub const MAX_LABEL_LENGTH: usize = 128;

/// Maximum number of characters in a username
pub const MAX_USERNAME_LENGTH: usize = 150;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Label is required")]
    EmptyLabel,
    #[error("Label must be at most {max} characters (got {actual})")]
    LabelTooLong { max: usize, actual: usize },
    #[error("Username is required")]
    EmptyUsername,
    #[error("Username must be at most {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },
    #[error("Username '{0}' may only contain letters, digits and @.+-_")]
    InvalidUsername(String),
    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorParseError),
}

/// Trim a label and check it fits the storage column
pub fn validate_label(label: &str) -> Result<String, ValidationError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyLabel);
    }

    let actual = trimmed.chars().count();
    if actual > MAX_LABEL_LENGTH {
        return Err(ValidationError::LabelTooLong {
            max: MAX_LABEL_LENGTH,
            actual,
        });
    }

    Ok(trimmed.to_string())
}

pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }

    let actual = trimmed.chars().count();
    if actual > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong {
            max: MAX_USERNAME_LENGTH,
            actual,
        });
    }

    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::InvalidUsername(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Truncate to `max_chars` characters, appending an ellipsis when shortened
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label_trims() {
        assert_eq!(validate_label("  Invoices ").unwrap(), "Invoices");
    }

    #[test]
    fn test_validate_label_rejects_empty() {
        assert_eq!(validate_label("   "), Err(ValidationError::EmptyLabel));
    }

    #[test]
    fn test_validate_label_length_limit() {
        let exact = "a".repeat(MAX_LABEL_LENGTH);
        assert!(validate_label(&exact).is_ok());

        let too_long = "é".repeat(MAX_LABEL_LENGTH + 1);
        assert_eq!(
            validate_label(&too_long),
            Err(ValidationError::LabelTooLong {
                max: MAX_LABEL_LENGTH,
                actual: MAX_LABEL_LENGTH + 1
            })
        );
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" alice ").unwrap(), "alice");
        assert!(validate_username("first.last+ops@example.com").is_ok());
        assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
        assert!(matches!(
            validate_username("drop table"),
            Err(ValidationError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer label", 8), "a longe…");
    }
}
