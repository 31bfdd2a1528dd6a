//! Tick conversion for prices.
//!
//! ## Overview
//!
//! The book never compares or keys on a binary float. Every price is a `u64`
//! count of ticks, where one tick is the instrument's minimum increment
//! (`EngineConfig::tick_size`). Two prices that print the same are always the
//! same map key.
//!
//! Conversion between human prices and ticks goes through
//! `rust_decimal::Decimal`, which represents decimal strings exactly.
//!
//! ## Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use tickbook::types::price::{to_ticks, format_ticks};
//!
//! let tick = Decimal::new(1, 2); // 0.01
//! let ticks = to_ticks("101.25", tick).unwrap();
//! assert_eq!(ticks, 10_125);
//! assert_eq!(format_ticks(ticks, tick), "101.25");
//!
//! // Prices off the tick grid are rejected rather than rounded
//! assert!(to_ticks("101.255", tick).is_err());
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::PriceError;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Parse a decimal string and convert it to ticks.
pub fn to_ticks(s: &str, tick_size: Decimal) -> Result<u64, PriceError> {
    let decimal = Decimal::from_str(s.trim()).map_err(|_| PriceError::Unparsable {
        input: s.to_string(),
    })?;
    decimal_to_ticks(decimal, tick_size)
}

/// Convert a `Decimal` price to ticks.
///
/// Fails if the tick size is not positive, the price is negative, the price
/// is not an exact multiple of the tick size, or the tick count exceeds `u64`.
pub fn decimal_to_ticks(price: Decimal, tick_size: Decimal) -> Result<u64, PriceError> {
    validate_tick_size(tick_size)?;

    if price < Decimal::ZERO {
        return Err(PriceError::Negative { price });
    }

    let ticks = price
        .checked_div(tick_size)
        .ok_or(PriceError::Overflow { price })?;

    if !ticks.fract().is_zero() {
        return Err(PriceError::OffTick { price, tick_size });
    }

    ticks.to_u64().ok_or(PriceError::Overflow { price })
}

/// Convert ticks back to a `Decimal` price.
///
/// Returns `None` only if the product does not fit in a `Decimal`.
pub fn from_ticks(ticks: u64, tick_size: Decimal) -> Option<Decimal> {
    Decimal::from(ticks).checked_mul(tick_size)
}

/// Render ticks as a trimmed decimal string, for logs and display.
pub fn format_ticks(ticks: u64, tick_size: Decimal) -> String {
    match from_ticks(ticks, tick_size) {
        Some(price) => price.normalize().to_string(),
        None => format!("{ticks} ticks"),
    }
}

/// A tick size must be strictly positive.
pub fn validate_tick_size(tick_size: Decimal) -> Result<(), PriceError> {
    if tick_size <= Decimal::ZERO {
        return Err(PriceError::InvalidTickSize { tick_size });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents() -> Decimal {
        Decimal::new(1, 2)
    }

    #[test]
    fn test_to_ticks_basic() {
        assert_eq!(to_ticks("1", cents()), Ok(100));
        assert_eq!(to_ticks("1.00", cents()), Ok(100));
        assert_eq!(to_ticks("0.01", cents()), Ok(1));
        assert_eq!(to_ticks("98", Decimal::ONE), Ok(98));
        assert_eq!(to_ticks(" 102 ", Decimal::ONE), Ok(102));
    }

    #[test]
    fn test_equal_prices_share_a_key() {
        // Values that differ as binary floats still map to one tick count
        let a = to_ticks("0.3", cents()).unwrap();
        let b = decimal_to_ticks(Decimal::new(1, 1) + Decimal::new(2, 1), cents()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_ticks_rejects() {
        assert!(matches!(
            to_ticks("abc", cents()),
            Err(PriceError::Unparsable { .. })
        ));
        assert!(matches!(
            to_ticks("-1", cents()),
            Err(PriceError::Negative { .. })
        ));
        assert!(matches!(
            to_ticks("1.005", cents()),
            Err(PriceError::OffTick { .. })
        ));
        assert!(matches!(
            to_ticks("1", Decimal::ZERO),
            Err(PriceError::InvalidTickSize { .. })
        ));
    }

    #[test]
    fn test_to_ticks_overflow() {
        let huge = Decimal::from(u64::MAX) * Decimal::TEN;
        assert!(matches!(
            decimal_to_ticks(huge, Decimal::ONE),
            Err(PriceError::Overflow { .. })
        ));
    }

    #[test]
    fn test_format_ticks() {
        assert_eq!(format_ticks(10_125, cents()), "101.25");
        assert_eq!(format_ticks(10_000, cents()), "100");
        assert_eq!(format_ticks(5, Decimal::new(5, 1)), "2.5");
    }

    #[test]
    fn test_from_ticks() {
        assert_eq!(from_ticks(250, cents()), Some(Decimal::new(250, 2)));
    }
}
