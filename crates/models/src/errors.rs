use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

/// Digits after the point kept by every money column.
pub const MONEY_SCALE: u32 = 2;

/// Reject blank values and values wider than the column, counted in characters.
pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if value.chars().count() > max_len {
        return Err(ModelError::Validation(format!("{field} longer than {max_len} characters")));
    }
    Ok(())
}

/// Positive and representable in a `Decimal(18, 2)` column without rounding.
pub(crate) fn require_money(field: &str, value: Decimal) -> Result<(), ModelError> {
    if value <= Decimal::ZERO {
        return Err(ModelError::Validation(format!("{field} must be positive")));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ModelError::Validation(format!("{field} allows at most {MONEY_SCALE} decimal places")));
    }
    Ok(())
}
