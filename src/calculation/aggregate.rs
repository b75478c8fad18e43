//! Payroll aggregation.
//!
//! This module folds the day table into per-category totals, composes gross
//! pay and produces the export-ready summary tables. Totals are derived from
//! the rows alone, so a day table read back from CSV aggregates to the same
//! figures as the one that was written.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::deductions::{calculate_deductions, pension_base};
use crate::config::PayrollConfig;
use crate::models::{
    DeductionBreakdown, GrossComponents, HoursTotals, NetSummary, PaidDay, PayTotals,
    PayrollSummary, SickDayCounters, SummaryLine,
};

fn sum_rounded<F>(days: &[PaidDay], field: F) -> Decimal
where
    F: Fn(&PaidDay) -> Decimal,
{
    days.iter().map(field).sum::<Decimal>().round_dp(2)
}

/// Sums hours per bucket, rounded to 2 decimal places.
pub fn sum_hours(days: &[PaidDay]) -> HoursTotals {
    HoursTotals {
        total: sum_rounded(days, |d| d.hours_total),
        morning: sum_rounded(days, |d| d.hours_morning),
        evening: sum_rounded(days, |d| d.hours_evening),
        night: sum_rounded(days, |d| d.hours_night),
        weekend: sum_rounded(days, |d| d.hours_weekend),
        holiday: sum_rounded(days, |d| d.hours_holiday),
        overtime_t1: sum_rounded(days, |d| d.hours_ot_t1),
        overtime_t2: sum_rounded(days, |d| d.hours_ot_t2),
    }
}

/// Sums pay per category, each rounded to 2 decimal places.
///
/// `weekly_reconciliation` is the part of `pay_total_day` not visible in the
/// component columns: the top-up folded into rows that chose the weekly model.
pub fn sum_pay(days: &[PaidDay]) -> PayTotals {
    PayTotals {
        base: sum_rounded(days, |d| d.pay_base),
        evening_bonus: sum_rounded(days, |d| d.pay_evening_bonus),
        night_bonus: sum_rounded(days, |d| d.pay_night_bonus),
        weekend_bonus: sum_rounded(days, |d| d.pay_weekend_bonus),
        holiday_bonus: sum_rounded(days, |d| d.pay_holiday_bonus),
        overtime_t1: sum_rounded(days, |d| d.pay_overtime_t1),
        overtime_t2: sum_rounded(days, |d| d.pay_overtime_t2),
        weekly_topup: sum_rounded(days, |d| d.pay_weekly_topup),
        weekly_reconciliation: sum_rounded(days, |d| d.pay_total_day - d.components_total()),
        sick: sum_rounded(days, |d| d.pay_sick),
        travel: sum_rounded(days, |d| d.travel_pay),
    }
}

/// Counts distinct sick dates, and those that carry sick pay.
pub fn count_sick_days(days: &[PaidDay]) -> SickDayCounters {
    let mut sick_pay_by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for day in days.iter().filter(|d| d.segment.is_sick) {
        *sick_pay_by_date.entry(day.date()).or_default() += day.pay_sick;
    }
    let total = sick_pay_by_date.len() as u32;
    let paid = sick_pay_by_date.values().filter(|pay| **pay > Decimal::ZERO).count() as u32;
    SickDayCounters {
        total,
        paid,
        unpaid: total - paid,
    }
}

/// Composes gross pay from the category totals.
///
/// Wage components follow each row's chosen overtime model: they are
/// `Σ(pay_total_day − travel_pay) + Σpay_sick`, expressed here through the
/// rounded category totals so the breakdown lines add up to gross exactly.
pub fn compose_gross(pay: &PayTotals, config: &PayrollConfig) -> GrossComponents {
    let wage_components = pay.base
        + pay.evening_bonus
        + pay.night_bonus
        + pay.weekend_bonus
        + pay.holiday_bonus
        + pay.overtime_t1
        + pay.overtime_t2
        + pay.weekly_topup
        + pay.weekly_reconciliation
        + pay.sick;
    let monthly_allowance = config.wage.monthly_allowance;
    let gross_taxable = wage_components + pay.travel + monthly_allowance;

    GrossComponents {
        wage_components,
        travel: pay.travel,
        monthly_allowance,
        gross_taxable,
        pension_base: pension_base(
            wage_components,
            gross_taxable,
            config.deductions.pension_base_mode,
        ),
    }
}

/// Folds a day table into the complete payroll summary.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::summarize;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// // No rows: gross is just the monthly allowance.
/// let summary = summarize(&[], &PayrollConfig::default());
/// assert_eq!(summary.gross.gross_taxable, Decimal::from(450));
/// assert_eq!(summary.deductions.income_tax_after_credit, Decimal::ZERO);
/// ```
pub fn summarize(days: &[PaidDay], config: &PayrollConfig) -> PayrollSummary {
    let pay = sum_pay(days);
    let gross = compose_gross(&pay, config);
    let deductions = calculate_deductions(&gross, &config.deductions);
    build_summary(sum_hours(days), pay, gross, deductions, count_sick_days(days))
}

/// Assembles a summary from its parts, deriving net pay.
pub fn build_summary(
    hours: HoursTotals,
    pay: PayTotals,
    gross: GrossComponents,
    deductions: DeductionBreakdown,
    sick_days: SickDayCounters,
) -> PayrollSummary {
    let net_pay = gross.gross_taxable - deductions.total();
    PayrollSummary {
        hours,
        pay,
        gross,
        deductions,
        net_pay,
        sick_days,
    }
}

/// Pay component lines, ending with the gross line.
pub fn breakdown_lines(summary: &PayrollSummary) -> Vec<SummaryLine> {
    let pay = &summary.pay;
    vec![
        SummaryLine::new("base", "Base pay", pay.base),
        SummaryLine::new("evening_bonus", "Evening bonus", pay.evening_bonus),
        SummaryLine::new("night_bonus", "Night bonus", pay.night_bonus),
        SummaryLine::new("weekend_bonus", "Weekend bonus", pay.weekend_bonus),
        SummaryLine::new("holiday_bonus", "Holiday bonus", pay.holiday_bonus),
        SummaryLine::new("overtime_t1", "Overtime tier 1", pay.overtime_t1),
        SummaryLine::new("overtime_t2", "Overtime tier 2", pay.overtime_t2),
        SummaryLine::new("weekly_topup", "Weekly overtime top-up", pay.weekly_topup),
        SummaryLine::new(
            "weekly_reconciliation",
            "Weekly overtime (chosen over daily)",
            pay.weekly_reconciliation,
        ),
        SummaryLine::new("sick", "Sick pay", pay.sick),
        SummaryLine::new("travel", "Travel allowance", pay.travel),
        SummaryLine::new(
            "monthly_allowance",
            "Monthly allowance",
            summary.gross.monthly_allowance,
        ),
        SummaryLine::new("gross", "Gross taxable", summary.gross.gross_taxable),
    ]
}

/// Deduction lines.
pub fn deduction_lines(summary: &PayrollSummary) -> Vec<SummaryLine> {
    let d = &summary.deductions;
    vec![
        SummaryLine::new("pension", "Pension (employee)", d.pension),
        SummaryLine::new("social_insurance", "Social insurance", d.social_insurance),
        SummaryLine::new("health", "Health insurance", d.health),
        SummaryLine::new(
            "income_tax_before_credit",
            "Income tax before credit points",
            d.income_tax_before_credit,
        ),
        SummaryLine::new("credit_relief", "Credit point relief", d.credit_relief),
        SummaryLine::new(
            "income_tax_after_credit",
            "Income tax after credit points",
            d.income_tax_after_credit,
        ),
    ]
}

/// Hours-summary lines.
pub fn hours_lines(summary: &PayrollSummary) -> Vec<SummaryLine> {
    let h = &summary.hours;
    vec![
        SummaryLine::new("total", "Total hours", h.total),
        SummaryLine::new("morning", "Morning hours", h.morning),
        SummaryLine::new("evening", "Evening hours", h.evening),
        SummaryLine::new("night", "Night hours", h.night),
        SummaryLine::new("weekend", "Weekend hours", h.weekend),
        SummaryLine::new("holiday", "Holiday hours", h.holiday),
        SummaryLine::new("overtime_t1", "Overtime tier 1 hours", h.overtime_t1),
        SummaryLine::new("overtime_t2", "Overtime tier 2 hours", h.overtime_t2),
    ]
}

/// The machine-readable gross / net / deductions summary.
pub fn net_summary(summary: &PayrollSummary) -> NetSummary {
    NetSummary {
        gross: summary.gross.gross_taxable,
        net: summary.net_pay,
        deductions_total: summary.deductions.total(),
    }
}
