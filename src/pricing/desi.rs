// src/pricing/desi.rs
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::error::AppError;

/// Turkish-carrier volumetric divisor: desi = (w * l * h) / 3000 cm³.
const DESI_DIVISOR: Decimal = dec!(3000);

#[derive(Debug, Clone, PartialEq)]
pub struct BillableWeight {
    /// (width * length * height) / 3000, exact.
    pub volumetric: Decimal,
    /// max(volumetric, net_weight).
    pub billable: Decimal,
    /// billable rounded up to the next integer tariff tier.
    pub bracket: i32,
}

/// Converts physical dimensions (cm) and net weight (kg) into the billable
/// weight bracket carriers charge by. Dimensions must be positive; net weight
/// may be zero.
pub fn billable_weight(
    width: Decimal,
    length: Decimal,
    height: Decimal,
    net_weight: Decimal,
) -> Result<BillableWeight, AppError> {
    for (name, value) in [("width", width), ("length", length), ("height", height)] {
        if value <= Decimal::ZERO {
            return Err(AppError::validation(format!("{name} must be greater than 0")));
        }
    }
    if net_weight < Decimal::ZERO {
        return Err(AppError::validation("net_weight cannot be negative"));
    }

    let volumetric = width
        .checked_mul(length)
        .and_then(|v| v.checked_mul(height))
        .map(|v| v / DESI_DIVISOR)
        .ok_or_else(|| AppError::validation("dimensions are too large"))?;
    let billable = volumetric.max(net_weight);
    let bracket = billable
        .ceil()
        .to_i32()
        .ok_or_else(|| AppError::validation("billable weight is out of range"))?;

    Ok(BillableWeight { volumetric, billable, bracket })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario_30_20_10_at_2kg() {
        // 30*20*10 / 3000 = 2.0, max(2.0, 2) = 2.0, ceil = 2
        let w = billable_weight(dec!(30), dec!(20), dec!(10), dec!(2)).unwrap();
        assert_eq!(w.volumetric, dec!(2));
        assert_eq!(w.billable, dec!(2));
        assert_eq!(w.bracket, 2);
    }

    #[test]
    fn net_weight_dominates_when_heavier() {
        let w = billable_weight(dec!(10), dec!(10), dec!(10), dec!(5.2)).unwrap();
        assert!(w.volumetric < dec!(0.34));
        assert_eq!(w.billable, dec!(5.2));
        assert_eq!(w.bracket, 6);
    }

    #[test]
    fn fractional_volumetric_rounds_up() {
        let w = billable_weight(dec!(25), dec!(15), dec!(9), Decimal::ZERO).unwrap();
        // 3375 / 3000 = 1.125 -> bracket 2
        assert_eq!(w.billable, dec!(1.125));
        assert_eq!(w.bracket, 2);
    }

    #[test]
    fn exact_integer_billable_keeps_its_tier() {
        let w = billable_weight(dec!(30), dec!(20), dec!(10), Decimal::ZERO).unwrap();
        assert_eq!(w.bracket, 2);
    }

    #[test]
    fn bracket_is_always_positive() {
        let w = billable_weight(dec!(0.5), dec!(0.5), dec!(0.5), Decimal::ZERO).unwrap();
        assert_eq!(w.bracket, 1);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            billable_weight(Decimal::MAX, Decimal::MAX, Decimal::MAX, Decimal::ZERO),
            Err(AppError::ValidationError(_))
        ));
        // 1e14 cubed overflows the 96-bit mantissa
        let big = dec!(100000000000000);
        assert!(matches!(
            billable_weight(big, big, big, Decimal::ZERO),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(matches!(
            billable_weight(Decimal::ZERO, dec!(20), dec!(10), dec!(1)),
            Err(AppError::ValidationError(msg)) if msg.contains("width")
        ));
        assert!(matches!(
            billable_weight(dec!(30), dec!(-1), dec!(10), dec!(1)),
            Err(AppError::ValidationError(msg)) if msg.contains("length")
        ));
    }

    #[test]
    fn rejects_negative_net_weight() {
        assert!(matches!(
            billable_weight(dec!(30), dec!(20), dec!(10), dec!(-0.1)),
            Err(AppError::ValidationError(msg)) if msg.contains("net_weight")
        ));
    }
}
