//! Validation helpers for DTOs.

use validator::ValidationError;

/// Room codes are short human-entered identifiers: 4 to 8 ASCII
/// alphanumeric characters, case-insensitive (upper-cased server-side).
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    let code = code.trim();
    if code.len() < 4 || code.len() > 8 {
        let mut err = ValidationError::new("room_code_length");
        err.message =
            Some(format!("Room code must be 4-8 characters (got {})", code.len()).into());
        return Err(err);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("room_code_format");
        err.message = Some("Room code must contain only letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Nicknames must be 1 to 24 visible characters once trimmed.
pub fn validate_nickname(nickname: &str) -> Result<(), ValidationError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        let mut err = ValidationError::new("nickname_empty");
        err.message = Some("Nickname must not be empty".into());
        return Err(err);
    }

    if nickname.chars().count() > 24 {
        let mut err = ValidationError::new("nickname_length");
        err.message = Some("Nickname must be at most 24 characters".into());
        return Err(err);
    }

    if nickname.chars().any(char::is_control) {
        let mut err = ValidationError::new("nickname_format");
        err.message = Some("Nickname must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_code_valid() {
        assert!(validate_room_code("ABC123").is_ok());
        assert!(validate_room_code("abcd").is_ok());
        assert!(validate_room_code("12345678").is_ok());
    }

    #[test]
    fn test_validate_room_code_invalid_length() {
        assert!(validate_room_code("ABC").is_err()); // too short
        assert!(validate_room_code("ABC123456").is_err()); // too long
        assert!(validate_room_code("").is_err()); // empty
    }

    #[test]
    fn test_validate_room_code_invalid_format() {
        assert!(validate_room_code("ABC 12").is_err()); // space
        assert!(validate_room_code("ABC-12").is_err()); // punctuation
        assert!(validate_room_code("ÀBC123").is_err()); // non-ascii
    }

    #[test]
    fn test_validate_nickname() {
        assert!(validate_nickname("Alice").is_ok());
        assert!(validate_nickname("  padded  ").is_ok());
        assert!(validate_nickname("").is_err());
        assert!(validate_nickname("   ").is_err());
        assert!(validate_nickname(&"x".repeat(25)).is_err());
        assert!(validate_nickname("new\nline").is_err());
    }
}
