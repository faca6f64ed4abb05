// src/pricing/solver.rs
//
// Closed-form sale-price solver. The seller wants a pre-VAT price such that
// after commission, withholding tax and margin are each taken as a percentage
// of that price, the fixed costs are exactly recovered:
//
//   price * (100 - W - K - M) / 100 = fixed_cost_total
//
// Each deduction is a simple percentage of the unknown price, so this is
// solved algebraically, not iteratively.
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::AppError;

/// Withholding tax (stopaj) charged by the marketplace, as a percent.
pub const WITHHOLDING_RATE: Decimal = dec!(1.00);

const HUNDRED: Decimal = dec!(100);

#[derive(Debug, Clone)]
pub struct SolverInput {
    pub product_cost: Decimal,
    pub packaging_cost: Decimal,
    pub shipping_cost: Decimal,
    pub service_fee: Decimal,
    /// Commission percent, 0..=100.
    pub commission_rate: Decimal,
    /// Withholding percent, 0..=100.
    pub withholding_rate: Decimal,
    /// Margin percent, >= 0. No upper cap: markups past 100% are legal as
    /// long as the deductions stay below 100% combined.
    pub margin_rate: Decimal,
    /// VAT percent, 0..=100.
    pub vat_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub fixed_cost_total: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub withholding_rate: Decimal,
    pub withholding_amount: Decimal,
    pub margin_rate: Decimal,
    pub margin_amount: Decimal,
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub price_excl_vat: Decimal,
    pub price_incl_vat: Decimal,
}

/// Money rounding used everywhere a value crosses into a 2dp column or a
/// quoted price: midpoint away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn solve(input: &SolverInput) -> Result<PriceBreakdown, AppError> {
    for (name, value) in [
        ("product_cost", input.product_cost),
        ("packaging_cost", input.packaging_cost),
        ("shipping_cost", input.shipping_cost),
        ("service_fee", input.service_fee),
    ] {
        if value < Decimal::ZERO {
            return Err(AppError::validation(format!("{name} cannot be negative")));
        }
    }
    for (name, value) in [
        ("commission_rate", input.commission_rate),
        ("withholding_rate", input.withholding_rate),
        ("vat_rate", input.vat_rate),
    ] {
        if value < Decimal::ZERO || value > HUNDRED {
            return Err(AppError::validation(format!("{name} must be between 0 and 100")));
        }
    }
    if input.margin_rate < Decimal::ZERO {
        return Err(AppError::validation("margin_rate cannot be negative"));
    }

    let fixed_cost_total = input
        .product_cost
        .checked_add(input.packaging_cost)
        .and_then(|v| v.checked_add(input.shipping_cost))
        .and_then(|v| v.checked_add(input.service_fee))
        .ok_or_else(|| AppError::validation("cost inputs are too large"))?;

    let deduction_sum = input.withholding_rate + input.commission_rate + input.margin_rate;
    let remaining_pct = HUNDRED - deduction_sum;
    if remaining_pct <= Decimal::ZERO {
        return Err(AppError::infeasible(format!(
            "commission, withholding and margin sum to {deduction_sum}%; \
             no finite sale price can satisfy deductions of 100% or more"
        )));
    }

    let price_excl_vat = fixed_cost_total
        .checked_mul(HUNDRED)
        .and_then(|v| v.checked_div(remaining_pct))
        .map(round2)
        .ok_or_else(|| AppError::validation("cost inputs are too large"))?;

    // Percentage amounts stay unrounded: price (2dp) * rate (2dp) / 100 is
    // exact in decimal, and their sum must equal price * deduction_sum / 100.
    let pct_of_price = |rate: Decimal| {
        price_excl_vat
            .checked_mul(rate)
            .map(|v| v / HUNDRED)
            .ok_or_else(|| AppError::validation("cost inputs are too large"))
    };
    let withholding_amount = pct_of_price(input.withholding_rate)?;
    let commission_amount = pct_of_price(input.commission_rate)?;
    let margin_amount = pct_of_price(input.margin_rate)?;

    let vat_amount = round2(pct_of_price(input.vat_rate)?);
    let price_incl_vat = price_excl_vat + vat_amount;

    Ok(PriceBreakdown {
        fixed_cost_total,
        commission_rate: input.commission_rate,
        commission_amount,
        withholding_rate: input.withholding_rate,
        withholding_amount,
        margin_rate: input.margin_rate,
        margin_amount,
        vat_rate: input.vat_rate,
        vat_amount,
        price_excl_vat,
        price_incl_vat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> SolverInput {
        SolverInput {
            product_cost: dec!(100),
            packaging_cost: dec!(10),
            shipping_cost: dec!(45.00),
            service_fee: dec!(8.49),
            commission_rate: dec!(15),
            withholding_rate: WITHHOLDING_RATE,
            margin_rate: dec!(20),
            vat_rate: dec!(20),
        }
    }

    #[test]
    fn reproduces_reference_scenario() {
        // fixed = 163.49, remaining = 64%, price = 16349/64 = 255.4531..
        let b = solve(&base_input()).unwrap();
        assert_eq!(b.fixed_cost_total, dec!(163.49));
        assert_eq!(b.price_excl_vat, dec!(255.45));
        assert_eq!(b.vat_amount, dec!(51.09));
        assert_eq!(b.price_incl_vat, dec!(306.54));
    }

    #[test]
    fn vat_round_trip_is_exact() {
        let b = solve(&base_input()).unwrap();
        assert_eq!(b.price_incl_vat - b.price_excl_vat, b.vat_amount);

        let mut input = base_input();
        input.vat_rate = dec!(18);
        input.product_cost = dec!(33.33);
        let b = solve(&input).unwrap();
        assert_eq!(b.price_incl_vat - b.price_excl_vat, b.vat_amount);
    }

    #[test]
    fn percentage_deductions_are_linear() {
        let b = solve(&base_input()).unwrap();
        let rate_sum = b.commission_rate + b.margin_rate + b.withholding_rate;
        assert_eq!(
            b.commission_amount + b.margin_amount + b.withholding_amount,
            b.price_excl_vat * rate_sum / dec!(100)
        );
    }

    #[test]
    fn deductions_at_or_above_hundred_are_infeasible() {
        let mut input = base_input();
        input.margin_rate = dec!(84); // 15 + 1 + 84 = 100
        assert!(matches!(solve(&input), Err(AppError::InfeasiblePricing(_))));

        input.margin_rate = dec!(120);
        assert!(matches!(solve(&input), Err(AppError::InfeasiblePricing(_))));
    }

    #[test]
    fn just_below_hundred_still_solves() {
        let mut input = base_input();
        input.margin_rate = dec!(83.99); // remaining = 0.01%
        let b = solve(&input).unwrap();
        assert!(b.price_excl_vat > Decimal::ZERO);
    }

    #[test]
    fn margin_has_no_validation_cap() {
        // Margin past 100% is not an input error; it falls through to the
        // infeasibility guard instead.
        let mut input = base_input();
        input.margin_rate = dec!(150);
        assert!(matches!(solve(&input), Err(AppError::InfeasiblePricing(_))));
    }

    #[test]
    fn zero_costs_yield_zero_price() {
        let input = SolverInput {
            product_cost: Decimal::ZERO,
            packaging_cost: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            commission_rate: dec!(10),
            withholding_rate: WITHHOLDING_RATE,
            margin_rate: dec!(20),
            vat_rate: dec!(20),
        };
        let b = solve(&input).unwrap();
        assert_eq!(b.price_excl_vat, Decimal::ZERO);
        assert_eq!(b.price_incl_vat, Decimal::ZERO);
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let mut input = base_input();
        input.commission_rate = dec!(101);
        assert!(matches!(
            solve(&input),
            Err(AppError::ValidationError(msg)) if msg.contains("commission_rate")
        ));

        let mut input = base_input();
        input.margin_rate = dec!(-1);
        assert!(matches!(
            solve(&input),
            Err(AppError::ValidationError(msg)) if msg.contains("margin_rate")
        ));
    }

    #[test]
    fn oversized_costs_are_rejected() {
        // Sum overflows
        let mut input = base_input();
        input.product_cost = Decimal::MAX;
        assert!(matches!(solve(&input), Err(AppError::ValidationError(_))));

        // Sum fits but * 100 overflows the 96-bit mantissa
        let mut input = base_input();
        input.product_cost = dec!(1000000000000000000000000000);
        assert!(matches!(solve(&input), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn rejects_negative_costs() {
        let mut input = base_input();
        input.packaging_cost = dec!(-0.01);
        assert!(matches!(
            solve(&input),
            Err(AppError::ValidationError(msg)) if msg.contains("packaging_cost")
        ));
    }
}
