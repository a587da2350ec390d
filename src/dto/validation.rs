//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a player identifier is non-empty and free of whitespace.
pub fn validate_player_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("player_id_empty");
        err.message = Some("player id must not be empty".into());
        return Err(err);
    }

    if id.chars().any(char::is_whitespace) {
        let mut err = ValidationError::new("player_id_whitespace");
        err.message = Some("player id must not contain whitespace".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_id_valid() {
        assert!(validate_player_id("user-123").is_ok());
        assert!(validate_player_id("a").is_ok());
    }

    #[test]
    fn test_validate_player_id_invalid() {
        assert!(validate_player_id("").is_err());
        assert!(validate_player_id("   ").is_err());
        assert!(validate_player_id("user 123").is_err());
    }
}
