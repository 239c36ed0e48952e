use crate::utils::{Result, SbieError};
use regex::Regex;

/// Longest sandbox name the engine accepts.
pub const MAX_BOX_NAME_LEN: usize = 32;

/// Checks a sandbox name given on the command line.
///
/// The engine only accepts ASCII letters, digits and underscores, up to
/// [`MAX_BOX_NAME_LEN`] characters. The library API itself does not enforce
/// this; callers that build names programmatically own their validity.
pub fn validate_box_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SbieError::validation("Sandbox name cannot be empty"));
    }

    if name.len() > MAX_BOX_NAME_LEN {
        return Err(SbieError::validation(format!(
            "Sandbox name '{}' is longer than {} characters",
            name, MAX_BOX_NAME_LEN
        )));
    }

    let valid_regex = Regex::new(r"^[A-Za-z0-9_]+$")
        .map_err(|e| SbieError::validation(format!("Invalid regex: {}", e)))?;

    if !valid_regex.is_match(name) {
        return Err(SbieError::validation(format!(
            "Sandbox name '{}' may only contain letters, digits and underscores",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_box_names() {
        let longest = "x".repeat(MAX_BOX_NAME_LEN);
        for name in ["DefaultBox", "foo", "box_2", "A", longest.as_str()] {
            assert!(validate_box_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_box_names() {
        assert!(validate_box_name("").is_err());
        assert!(validate_box_name("has space").is_err());
        assert!(validate_box_name("dash-name").is_err());
        assert!(validate_box_name("[inject]").is_err());
        assert!(validate_box_name(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_error_message_names_the_box() {
        let err = validate_box_name("bad name").unwrap_err();
        assert!(err.to_string().contains("bad name"));
    }
}
