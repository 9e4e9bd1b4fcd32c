//! Exact USD ⇄ smallest-unit conversion.
//!
//! USDC carries 6 decimals, so `1_000_000` smallest units equal one dollar.
//! Both directions use [`rust_decimal::Decimal`] arithmetic; a long run of
//! micropayments must never accumulate float drift against the budget.
//! Amounts with more than 6 decimal places are rejected rather than rounded.

use alloy_primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Smallest units per whole dollar.
pub const UNITS_PER_USD: u64 = 1_000_000;

const USD_SCALE: u32 = 6;

/// Conversion failures between USD and smallest units.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("amount {0} has sub-micro-dollar precision")]
    PrecisionLoss(Decimal),
    #[error("amount {0} is negative")]
    Negative(Decimal),
    #[error("amount of {0} units does not fit the USD range")]
    AmountTooLarge(U256),
}

/// Converts an amount of smallest units to exact USD.
///
/// ```
/// use alloy_primitives::U256;
/// use rust_decimal::Decimal;
/// use x402_payer_proto::money::units_to_usd;
///
/// let usd = units_to_usd(U256::from(1_500_000u64)).unwrap();
/// assert_eq!(usd, Decimal::new(15, 1)); // $1.5
/// ```
pub fn units_to_usd(units: U256) -> Result<Decimal, MoneyError> {
    let raw = i128::try_from(units).map_err(|_| MoneyError::AmountTooLarge(units))?;
    Decimal::try_from_i128_with_scale(raw, USD_SCALE)
        .map_err(|_| MoneyError::AmountTooLarge(units))
        .map(|usd| usd.normalize())
}

/// Converts an exact USD amount to smallest units.
///
/// Fails on negative amounts and on amounts carrying more than 6 decimal
/// places; there is no unit smaller than a millionth of a dollar to round to.
pub fn usd_to_units(usd: Decimal) -> Result<U256, MoneyError> {
    if usd.is_sign_negative() && !usd.is_zero() {
        return Err(MoneyError::Negative(usd));
    }
    let normalized = usd.normalize();
    if normalized.scale() > USD_SCALE {
        return Err(MoneyError::PrecisionLoss(usd));
    }
    let scaled = normalized
        .checked_mul(Decimal::from(UNITS_PER_USD))
        .ok_or(MoneyError::PrecisionLoss(usd))?;
    let units = scaled.to_u128().ok_or(MoneyError::PrecisionLoss(usd))?;
    Ok(U256::from(units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_units_to_usd_exact() {
        assert_eq!(
            units_to_usd(U256::from(100_000u64)).unwrap(),
            Decimal::from_str("0.1").unwrap()
        );
        assert_eq!(units_to_usd(U256::from(1u64)).unwrap(), Decimal::new(1, 6));
        assert_eq!(units_to_usd(U256::ZERO).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_usd_to_units_exact() {
        let usd = Decimal::from_str("12.345678").unwrap();
        assert_eq!(usd_to_units(usd).unwrap(), U256::from(12_345_678u64));
    }

    #[test]
    fn test_roundtrip_usd() {
        for raw in ["0", "0.000001", "0.1", "1", "3.25", "10.999999", "1000000"] {
            let usd = Decimal::from_str(raw).unwrap();
            let back = units_to_usd(usd_to_units(usd).unwrap()).unwrap();
            assert_eq!(back, usd.normalize(), "roundtrip failed for {raw}");
        }
    }

    #[test]
    fn test_roundtrip_units() {
        for units in [0u64, 1, 999_999, 1_000_000, 123_456_789, u64::MAX / 7] {
            let units = U256::from(units);
            let back = usd_to_units(units_to_usd(units).unwrap()).unwrap();
            assert_eq!(back, units);
        }
    }

    #[test]
    fn test_sub_micro_precision_rejected() {
        let usd = Decimal::from_str("0.0000001").unwrap();
        assert!(matches!(
            usd_to_units(usd),
            Err(MoneyError::PrecisionLoss(_))
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_precision() {
        let usd = Decimal::from_str("0.1000000").unwrap();
        assert_eq!(usd_to_units(usd).unwrap(), U256::from(100_000u64));
    }

    #[test]
    fn test_negative_rejected() {
        let usd = Decimal::from_str("-0.5").unwrap();
        assert!(matches!(usd_to_units(usd), Err(MoneyError::Negative(_))));
    }

    #[test]
    fn test_oversized_units_rejected() {
        assert!(matches!(
            units_to_usd(U256::MAX),
            Err(MoneyError::AmountTooLarge(_))
        ));
    }
}
