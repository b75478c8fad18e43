//! Payroll summary models.
//!
//! This module contains the aggregated outputs of a payroll run: category
//! totals, deductions, net pay, sick-day counters, the export-ready summary
//! tables and the complete [`PayrollResult`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, PaidDay};

/// Hour totals per bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoursTotals {
    /// Total worked hours.
    pub total: Decimal,
    /// Hours outside the evening and night windows.
    pub morning: Decimal,
    /// Evening hours.
    pub evening: Decimal,
    /// Night hours.
    pub night: Decimal,
    /// Weekend hours.
    pub weekend: Decimal,
    /// Holiday hours.
    pub holiday: Decimal,
    /// Tier-1 daily overtime hours.
    pub overtime_t1: Decimal,
    /// Tier-2 daily overtime hours.
    pub overtime_t2: Decimal,
}

/// Pay totals per category, each rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayTotals {
    /// Base pay.
    pub base: Decimal,
    /// Evening bonus.
    pub evening_bonus: Decimal,
    /// Night bonus.
    pub night_bonus: Decimal,
    /// Weekend bonus.
    pub weekend_bonus: Decimal,
    /// Holiday bonus.
    pub holiday_bonus: Decimal,
    /// Tier-1 daily overtime.
    pub overtime_t1: Decimal,
    /// Tier-2 daily overtime.
    pub overtime_t2: Decimal,
    /// Weekly top-up left in the component columns.
    pub weekly_topup: Decimal,
    /// Weekly top-up folded into rows that chose the weekly model.
    pub weekly_reconciliation: Decimal,
    /// Sick pay.
    pub sick: Decimal,
    /// Travel allowance.
    pub travel: Decimal,
}

/// How the gross taxable amount is composed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrossComponents {
    /// Base, bonuses, overtime and sick pay.
    pub wage_components: Decimal,
    /// Travel allowance.
    pub travel: Decimal,
    /// Fixed monthly allowance.
    pub monthly_allowance: Decimal,
    /// Gross taxable amount.
    pub gross_taxable: Decimal,
    /// The amount the pension contribution is computed on.
    pub pension_base: Decimal,
}

/// Statutory deductions, each rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Employee pension contribution.
    pub pension: Decimal,
    /// Social insurance levy.
    pub social_insurance: Decimal,
    /// Health levy.
    pub health: Decimal,
    /// Income tax from the brackets, before credit points.
    pub income_tax_before_credit: Decimal,
    /// Relief actually granted by credit points.
    pub credit_relief: Decimal,
    /// Income tax payable.
    pub income_tax_after_credit: Decimal,
}

impl DeductionBreakdown {
    /// Sum of the deductions taken from gross pay.
    pub fn total(&self) -> Decimal {
        self.pension + self.social_insurance + self.health + self.income_tax_after_credit
    }
}

/// Sick-day counters, counted per distinct date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SickDayCounters {
    /// Distinct sick dates.
    pub total: u32,
    /// Sick dates with sick pay above zero.
    pub paid: u32,
    /// Sick dates without sick pay.
    pub unpaid: u32,
}

/// The aggregated payroll summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Hour totals.
    pub hours: HoursTotals,
    /// Pay totals per category.
    pub pay: PayTotals,
    /// Gross composition.
    pub gross: GrossComponents,
    /// Deductions.
    pub deductions: DeductionBreakdown,
    /// Net pay.
    pub net_pay: Decimal,
    /// Sick-day counters.
    pub sick_days: SickDayCounters,
}

/// One line of an export-ready summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    /// Stable machine key.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// The amount (money or hours, depending on the table).
    pub amount: Decimal,
}

impl SummaryLine {
    /// Creates a line.
    pub fn new(key: &str, label: &str, amount: Decimal) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            amount,
        }
    }
}

/// The machine-readable key-value summary.
///
/// # Example
///
/// ```
/// use payroll_engine::models::NetSummary;
/// use rust_decimal::Decimal;
///
/// let summary = NetSummary {
///     gross: Decimal::new(1000000, 2),
///     net: Decimal::new(850000, 2),
///     deductions_total: Decimal::new(150000, 2),
/// };
/// let json = serde_json::to_string(&summary).unwrap();
/// assert!(json.contains("\"net\":\"8500.00\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetSummary {
    /// Gross taxable amount.
    pub gross: Decimal,
    /// Net pay.
    pub net: Decimal,
    /// Total deductions.
    pub deductions_total: Decimal,
}

/// The complete result of a payroll run.
///
/// Contains no timestamps or random identifiers: running the same input and
/// configuration twice yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// Day-level detail, one row per retained date or shift.
    pub days: Vec<PaidDay>,
    /// Aggregated totals.
    pub summary: PayrollSummary,
    /// Pay component breakdown, ending with the gross line.
    pub breakdown: Vec<SummaryLine>,
    /// Deduction lines.
    pub deductions: Vec<SummaryLine>,
    /// Hour lines.
    pub hours_summary: Vec<SummaryLine>,
    /// Gross, net and total deductions.
    pub net_summary: NetSummary,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
