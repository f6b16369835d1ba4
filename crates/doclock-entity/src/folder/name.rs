//! Folder name validation.

use doclock_core::{AppError, AppResult};

/// Maximum folder name length in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 30;

/// Validate a folder name: non-empty, at most [`MAX_FOLDER_NAME_LEN`]
/// characters, restricted to letters, digits, space, hyphen, underscore.
pub fn validate_folder_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if name.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name cannot exceed {MAX_FOLDER_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
    {
        return Err(AppError::validation(
            "Folder name may only contain letters, digits, spaces, hyphens, and underscores",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_folder_name("Travel").is_ok());
        assert!(validate_folder_name("Tax 2025").is_ok());
        assert!(validate_folder_name("my-docs_1").is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(validate_folder_name("").is_err());
        assert!(validate_folder_name("   ").is_err());
    }

    #[test]
    fn test_length_boundary() {
        let at_limit = "a".repeat(MAX_FOLDER_NAME_LEN);
        assert!(validate_folder_name(&at_limit).is_ok());
        let over = "a".repeat(MAX_FOLDER_NAME_LEN + 1);
        assert!(validate_folder_name(&over).is_err());
    }

    #[test]
    fn test_charset() {
        assert!(validate_folder_name("bad/name").is_err());
        assert!(validate_folder_name("dot.name").is_err());
        assert!(validate_folder_name("émoji").is_err());
    }
}
