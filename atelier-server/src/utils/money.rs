//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per product
const MAX_PRICE: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(DECIMAL_PLACES).to_f64().unwrap_or(0.0)
}

/// Validate a price received at the API boundary
///
/// Prices must be finite, strictly positive and below [`MAX_PRICE`].
pub fn require_positive_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::validation(format!(
            "Price must be a finite number, got {}",
            price
        )));
    }
    if price <= 0.0 {
        return Err(AppError::validation("Price must be positive"));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "Price exceeds maximum allowed ({})",
            MAX_PRICE
        )));
    }
    Ok(())
}

/// Compute a line total (unit price * quantity) with decimal precision
pub fn line_total(price_per_unit: f64, quantity: i64) -> Decimal {
    to_decimal(price_per_unit) * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_precision() {
        // 0.1 + 0.2 style drift must not leak into totals
        let total = line_total(19.99, 3);
        assert_eq!(to_f64(total), 59.97);
    }

    #[test]
    fn test_rounding_to_two_places() {
        let value = to_decimal(10.005) + to_decimal(0.001);
        assert_eq!(to_f64(value), 10.01);
    }

    #[test]
    fn test_positive_price_accepted() {
        assert!(require_positive_price(20.0).is_ok());
        assert!(require_positive_price(0.01).is_ok());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        assert!(require_positive_price(0.0).is_err());
        assert!(require_positive_price(-5.0).is_err());
    }

    #[test]
    fn test_non_finite_price_rejected() {
        assert!(require_positive_price(f64::NAN).is_err());
        assert!(require_positive_price(f64::INFINITY).is_err());
    }
}
