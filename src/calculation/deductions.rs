//! Statutory deduction calculation.
//!
//! This module computes income tax from a progressive bracket table, the
//! credit-point relief against it, the two-tier social insurance and health
//! levies, and the employee pension contribution. Each deduction is rounded
//! to two decimal places on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{DeductionConfig, LevyRates, PensionBaseMode, TaxBrackets};
use crate::models::{AuditStep, DeductionBreakdown, GrossComponents};

/// Income tax before credit points.
///
/// Brackets are walked in ascending order, each taxing the slice of income
/// between the previous cap and its own; the walk stops at the first cap at
/// or above the taxable amount. Never negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::income_tax_before_credit;
/// use payroll_engine::config::TaxBrackets;
/// use rust_decimal::Decimal;
///
/// let brackets = TaxBrackets::default();
/// // 6790 × 10% + (9720 − 6790) × 14%
/// assert_eq!(income_tax_before_credit(Decimal::from(9720), &brackets), Decimal::new(108920, 2));
/// assert_eq!(income_tax_before_credit(Decimal::ZERO, &brackets), Decimal::ZERO);
/// ```
pub fn income_tax_before_credit(taxable: Decimal, brackets: &TaxBrackets) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut previous_cap = Decimal::ZERO;

    for bracket in brackets.brackets() {
        match bracket.cap {
            Some(cap) if taxable > cap => {
                tax += (cap - previous_cap) * bracket.rate;
                previous_cap = cap;
            }
            _ => {
                tax += (taxable - previous_cap) * bracket.rate;
                return tax.max(Decimal::ZERO).round_dp(2);
            }
        }
    }

    // Every bracket was bounded and the income exceeds the last cap.
    tax.max(Decimal::ZERO).round_dp(2)
}

/// Tax after subtracting the credit-point relief, floored at zero.
pub fn apply_credit_points(tax_before: Decimal, credit_points: Decimal, point_value: Decimal) -> Decimal {
    (tax_before - credit_points * point_value)
        .max(Decimal::ZERO)
        .round_dp(2)
}

/// A levy charged at a low rate up to `threshold` and a high rate above it.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::two_tier_levy;
/// use payroll_engine::config::LevyRates;
/// use rust_decimal::Decimal;
///
/// let rates = LevyRates { low: Decimal::new(4, 3), high: Decimal::new(7, 2) };
/// // 7570 × 0.4% + 430 × 7%
/// assert_eq!(two_tier_levy(Decimal::from(8000), Decimal::from(7570), &rates), Decimal::new(6038, 2));
/// ```
pub fn two_tier_levy(gross: Decimal, threshold: Decimal, rates: &LevyRates) -> Decimal {
    let low_portion = gross.min(threshold);
    let high_portion = (gross - threshold).max(Decimal::ZERO);
    (low_portion * rates.low + high_portion * rates.high).round_dp(2)
}

/// The amount the pension contribution is computed on.
pub fn pension_base(wage_components: Decimal, gross_taxable: Decimal, mode: PensionBaseMode) -> Decimal {
    match mode {
        PensionBaseMode::WageOnly => wage_components,
        PensionBaseMode::IncludeAll => gross_taxable,
    }
}

/// Computes every statutory deduction for a gross composition.
pub fn calculate_deductions(gross: &GrossComponents, config: &DeductionConfig) -> DeductionBreakdown {
    let taxable = gross.gross_taxable;
    let income_tax_before_credit = income_tax_before_credit(taxable, &config.tax_brackets);
    let income_tax_after_credit = apply_credit_points(
        income_tax_before_credit,
        config.credit_points,
        config.credit_point_value,
    );

    DeductionBreakdown {
        pension: (gross.pension_base * config.pension_rate).round_dp(2),
        social_insurance: two_tier_levy(taxable, config.levy_threshold, &config.social_insurance),
        health: two_tier_levy(taxable, config.levy_threshold, &config.health),
        income_tax_before_credit,
        credit_relief: income_tax_before_credit - income_tax_after_credit,
        income_tax_after_credit,
    }
}

/// The result of the deduction stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    /// The deductions.
    pub breakdown: DeductionBreakdown,
    /// Gross taxable minus total deductions.
    pub net_pay: Decimal,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Computes deductions and net pay, recording an audit step.
pub fn calculate_net_pay(
    gross: &GrossComponents,
    config: &DeductionConfig,
    step_number: u32,
) -> DeductionResult {
    let breakdown = calculate_deductions(gross, config);
    let net_pay = gross.gross_taxable - breakdown.total();

    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_deductions".to_string(),
        rule_name: "Statutory Deductions".to_string(),
        input: serde_json::json!({
            "gross_taxable": gross.gross_taxable.to_string(),
            "pension_base": gross.pension_base.to_string(),
            "pension_base_mode": config.pension_base_mode,
            "credit_points": config.credit_points.normalize().to_string(),
            "levy_threshold": config.levy_threshold.normalize().to_string(),
        }),
        output: serde_json::json!({
            "pension": breakdown.pension.to_string(),
            "social_insurance": breakdown.social_insurance.to_string(),
            "health": breakdown.health.to_string(),
            "income_tax_before_credit": breakdown.income_tax_before_credit.to_string(),
            "income_tax_after_credit": breakdown.income_tax_after_credit.to_string(),
            "net_pay": net_pay.to_string(),
        }),
        reasoning: format!(
            "Gross {} less pension {}, social insurance {}, health {} and income tax {} leaves {}",
            gross.gross_taxable,
            breakdown.pension,
            breakdown.social_insurance,
            breakdown.health,
            breakdown.income_tax_after_credit,
            net_pay
        ),
    };

    DeductionResult {
        breakdown,
        net_pay,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxBracket;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn gross(amount: &str) -> GrossComponents {
        GrossComponents {
            wage_components: dec(amount) - dec("450"),
            travel: Decimal::ZERO,
            monthly_allowance: dec("450"),
            gross_taxable: dec(amount),
            pension_base: dec(amount) - dec("450"),
        }
    }

    // ==========================================================================
    // Income tax
    // ==========================================================================

    #[test]
    fn test_tax_inside_first_bracket() {
        assert_eq!(income_tax_before_credit(dec("5000"), &TaxBrackets::default()), dec("500"));
    }

    #[test]
    fn test_tax_exactly_at_cap_is_cumulative() {
        let brackets = TaxBrackets::default();
        assert_eq!(income_tax_before_credit(dec("6790"), &brackets), dec("679"));
        // 679 + 410.2 + 1208
        assert_eq!(income_tax_before_credit(dec("15760"), &brackets), dec("2297.20"));
    }

    #[test]
    fn test_tax_in_unbounded_bracket() {
        let brackets = TaxBrackets::default();
        // 679 + 410.2 + 1208 + 1841.4 + 8218 + 4000 × 0.47
        assert_eq!(income_tax_before_credit(dec("49180"), &brackets), dec("14236.60"));
    }

    #[test]
    fn test_negative_taxable_pays_no_tax() {
        assert_eq!(income_tax_before_credit(dec("-100"), &TaxBrackets::default()), Decimal::ZERO);
    }

    #[test]
    fn test_bounded_last_bracket_stops_accumulating() {
        let brackets = TaxBrackets::new(vec![TaxBracket {
            cap: Some(dec("1000")),
            rate: dec("0.1"),
        }])
        .unwrap();
        assert_eq!(income_tax_before_credit(dec("5000"), &brackets), dec("100"));
    }

    #[test]
    fn test_credit_points_floor_at_zero() {
        // 2.25 × 235 = 528.75
        assert_eq!(apply_credit_points(dec("500"), dec("2.25"), dec("235")), Decimal::ZERO);
        assert_eq!(apply_credit_points(dec("1089.20"), dec("2.25"), dec("235")), dec("560.45"));
    }

    // ==========================================================================
    // Levies and pension
    // ==========================================================================

    #[test]
    fn test_levy_below_threshold_uses_low_rate_only() {
        let rates = LevyRates {
            low: dec("0.031"),
            high: dec("0.05"),
        };
        assert_eq!(two_tier_levy(dec("5000"), dec("7570"), &rates), dec("155"));
    }

    #[test]
    fn test_pension_base_modes() {
        assert_eq!(pension_base(dec("9000"), dec("9672"), PensionBaseMode::WageOnly), dec("9000"));
        assert_eq!(pension_base(dec("9000"), dec("9672"), PensionBaseMode::IncludeAll), dec("9672"));
    }

    #[test]
    fn test_full_deduction_breakdown() {
        let config = DeductionConfig::default();
        let result = calculate_net_pay(&gross("10000"), &config, 6);
        let d = &result.breakdown;

        // 9550 × 7%
        assert_eq!(d.pension, dec("668.50"));
        // 7570 × 0.4% + 2430 × 7%
        assert_eq!(d.social_insurance, dec("200.38"));
        // 7570 × 3.1% + 2430 × 5%
        assert_eq!(d.health, dec("356.17"));
        // 679 + 410.2 + 280 × 0.2
        assert_eq!(d.income_tax_before_credit, dec("1145.20"));
        assert_eq!(d.income_tax_after_credit, dec("616.45"));
        assert_eq!(d.credit_relief, dec("528.75"));
        assert_eq!(result.net_pay, dec("10000") - dec("668.50") - dec("200.38") - dec("356.17") - dec("616.45"));
        assert_eq!(result.audit_step.rule_id, "statutory_deductions");
        assert_eq!(result.audit_step.step_number, 6);
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    proptest! {
        #[test]
        fn prop_tax_is_monotone(a in 0u32..80_000, b in 0u32..80_000) {
            let brackets = TaxBrackets::default();
            let (low, high) = (a.min(b), a.max(b));
            prop_assert!(
                income_tax_before_credit(Decimal::from(low), &brackets)
                    <= income_tax_before_credit(Decimal::from(high), &brackets)
            );
        }

        #[test]
        fn prop_tax_is_continuous_at_caps(cap_index in 0usize..5) {
            let brackets = TaxBrackets::default();
            let cap = brackets.brackets()[cap_index].cap.unwrap();
            let epsilon = dec("0.01");
            let below = income_tax_before_credit(cap - epsilon, &brackets);
            let above = income_tax_before_credit(cap + epsilon, &brackets);
            prop_assert!(above - below <= dec("0.01"));
        }
    }
}
