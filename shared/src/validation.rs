//! Validation utilities for the Crop Advisory Platform

// ============================================================================
// Reference Database Validations
// ============================================================================

/// Maximum length of a PostgreSQL identifier
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Validate a table or column name that will be interpolated into SQL.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
/// Case is preserved; callers quote the identifier.
pub fn validate_sql_identifier(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Identifier cannot be empty");
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err("Identifier must be at most 63 characters");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err("Identifier cannot start with a digit");
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Identifier must be alphanumeric or underscore only");
    }
    Ok(())
}

// ============================================================================
// Weather Request Validations
// ============================================================================

/// Validate a free-text weather location (city name, postcode, "lat,lon")
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Location must be at most 100 characters");
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err("Location cannot contain control characters");
    }
    Ok(())
}
