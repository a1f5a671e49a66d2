use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is stripped.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Cannot be empty".into());
        return Err(err);
    }
    Ok(())
}
