//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest qualifier string accepted for a single hole.
const MAX_QUALIFIERS: usize = 16;

/// Validates that qualifiers are short and made of printable single characters.
///
/// Whitespace is allowed (it is dropped when the qualifiers are stored).
///
/// # Examples
///
/// ```ignore
/// validate_qualifiers("ow")   // Ok
/// validate_qualifiers("o w")  // Ok - space ignored
/// validate_qualifiers("\u{7}") // Err - control character
/// ```
pub fn validate_qualifiers(qualifiers: &str) -> Result<(), ValidationError> {
    let count = qualifiers.chars().filter(|c| !c.is_whitespace()).count();
    if count > MAX_QUALIFIERS {
        let mut err = ValidationError::new("qualifiers_length");
        err.message = Some(
            format!("At most {MAX_QUALIFIERS} qualifiers are allowed per hole (got {count})")
                .into(),
        );
        return Err(err);
    }

    if qualifiers.chars().any(char::is_control) {
        let mut err = ValidationError::new("qualifiers_format");
        err.message = Some("Qualifiers must be printable characters".into());
        return Err(err);
    }

    Ok(())
}
