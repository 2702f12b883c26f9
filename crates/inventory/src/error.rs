//! Error taxonomy for stock operations.

use thiserror::Error;

/// Errors that can occur during stock operations.
///
/// The three variants draw a deliberate line between caller mistakes and bad
/// stored data: [`Validation`](StockError::Validation) rejects input before
/// any state changes, [`Invariant`](StockError::Invariant) reports stored
/// records that break the stock rules, and
/// [`NotFound`](StockError::NotFound) covers missing mutation targets.
/// Invariant violations are never auto-corrected; the record is reported and
/// left as-is for an operator to fix.
#[derive(Debug, Error)]
pub enum StockError {
    /// Caller-supplied values were rejected before any state changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A stored record violates a stock invariant (e.g. reserved exceeds
    /// quantity).
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// The product, variant, size option, or warehouse entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::Validation("reserved 8 exceeds quantity 5".to_owned());
        assert_eq!(
            err.to_string(),
            "validation failed: reserved 8 exceeds quantity 5"
        );

        let err = StockError::NotFound("product 99".to_owned());
        assert_eq!(err.to_string(), "not found: product 99");
    }
}
