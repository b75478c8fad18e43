//! Weekly overtime reconciliation.
//!
//! Daily overtime pays the hours past eight on a single day. The weekly model
//! instead tops up regular hours beyond the weekly threshold at the tier-1
//! rate. This module computes the top-up and reconciles both models per row
//! according to the configured [`OvertimeBasis`].

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{OvertimeBasis, PayrollConfig, WeekStart};
use crate::models::{AuditStep, OvertimeModel, PaidDay};

/// The first day of the week containing `date`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::week_start_date;
/// use payroll_engine::config::WeekStart;
/// use chrono::NaiveDate;
///
/// // Thursday 2026-01-15
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// assert_eq!(week_start_date(date, WeekStart::Sunday), NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
/// assert_eq!(week_start_date(date, WeekStart::Monday), NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
/// ```
pub fn week_start_date(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date - Duration::days(i64::from(offset))
}

/// Weekly totals for one payroll week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    /// First day of the week.
    pub week_start: NaiveDate,
    /// Regular hours worked in the week.
    pub regular_hours: Decimal,
    /// Regular hours past the weekly threshold.
    pub excess_hours: Decimal,
    /// Top-up paid for the excess.
    pub topup_pay: Decimal,
}

/// Weekly top-up per row, plus the per-week figures it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTopups {
    /// Top-up pay per row, aligned with the input rows.
    pub per_row: Vec<Decimal>,
    /// One summary per week that has rows.
    pub weeks: Vec<WeekSummary>,
}

/// Computes the weekly top-up for date-ordered rows.
///
/// Within each week the excess regular hours are consumed greedily in date
/// order: each row absorbs up to its own regular hours until the excess is
/// used up. The consumed hours are paid at `rate × t1_bonus`.
pub fn compute_weekly_topups(days: &[PaidDay], config: &PayrollConfig) -> WeeklyTopups {
    let overtime = &config.overtime;
    let topup_rate = config.wage.hourly_wage * overtime.t1_bonus;

    let mut per_row = vec![Decimal::ZERO; days.len()];
    let mut weeks = Vec::new();

    let mut start = 0;
    while start < days.len() {
        let key = week_start_date(days[start].date(), overtime.week_start);
        let end = start
            + days[start..]
                .iter()
                .take_while(|d| week_start_date(d.date(), overtime.week_start) == key)
                .count();

        let regular_hours: Decimal = days[start..end].iter().map(|d| d.hours_regular).sum();
        let excess_hours = (regular_hours - overtime.weekly_threshold_hours).max(Decimal::ZERO);

        let mut remaining = excess_hours;
        let mut topup_pay = Decimal::ZERO;
        for (slot, day) in per_row[start..end].iter_mut().zip(&days[start..end]) {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = day.hours_regular.min(remaining);
            *slot = take * topup_rate;
            topup_pay += *slot;
            remaining -= take;
        }

        weeks.push(WeekSummary {
            week_start: key,
            regular_hours,
            excess_hours,
            topup_pay,
        });
        start = end;
    }

    WeeklyTopups { per_row, weeks }
}

/// The result of reconciling the daily and weekly overtime models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReconciliation {
    /// Rows with the chosen model applied.
    pub days: Vec<PaidDay>,
    /// Per-week top-up figures.
    pub weeks: Vec<WeekSummary>,
    /// Rows whose total was taken from the weekly model.
    pub weekly_rows: usize,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Applies one overtime policy to a row given its weekly top-up.
///
/// Both models are evaluated independently from the same base, bonuses and
/// travel. Under [`OvertimeBasis::DailyAndWeeklyMax`] the weekly model wins
/// only when strictly higher; its row keeps no daily overtime pay and folds
/// the top-up into `pay_total_day` while the top-up column reads zero.
pub fn apply_overtime_basis(day: &mut PaidDay, topup: Decimal, basis: OvertimeBasis) {
    let shared = day.pay_before_overtime();
    let daily_total = shared + day.pay_overtime_t1 + day.pay_overtime_t2;
    let weekly_total = shared + topup;

    match basis {
        OvertimeBasis::DailyOnly => {
            day.pay_weekly_topup = Decimal::ZERO;
            day.overtime_model = OvertimeModel::Daily;
            day.pay_total_day = daily_total;
        }
        OvertimeBasis::WeeklyOnly => {
            day.pay_overtime_t1 = Decimal::ZERO;
            day.pay_overtime_t2 = Decimal::ZERO;
            day.pay_weekly_topup = topup;
            day.overtime_model = OvertimeModel::Weekly;
            day.pay_total_day = weekly_total;
        }
        OvertimeBasis::DailyAndWeeklyMax => {
            day.pay_weekly_topup = Decimal::ZERO;
            if weekly_total > daily_total {
                day.pay_overtime_t1 = Decimal::ZERO;
                day.pay_overtime_t2 = Decimal::ZERO;
                day.overtime_model = OvertimeModel::Weekly;
                day.pay_total_day = weekly_total;
            } else {
                day.overtime_model = OvertimeModel::Daily;
                day.pay_total_day = daily_total;
            }
        }
    }
}

/// Computes the weekly top-up and reconciles it with daily overtime.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_paid_days, reconcile_weekly, segment_table};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{AttendanceRow, OvertimeModel};
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::default();
/// let rows = (11..=16)
///     .map(|d| AttendanceRow {
///         date: format!("{d:02}/01/2026"),
///         clock_in: "08:00".to_string(),
///         clock_out: "16:00".to_string(),
///         ..Default::default()
///     })
///     .collect();
/// let table = payroll_engine::models::AttendanceTable::new(rows);
/// let segments = segment_table(&table, &config, 1).segments;
/// let days = calculate_paid_days(segments, &config, 2).days;
///
/// // Six eight-hour days: 48 regular hours, 6 past the weekly threshold
/// let result = reconcile_weekly(days, &config, 3);
/// assert_eq!(result.weeks[0].excess_hours, Decimal::from(6));
/// assert_eq!(result.days[0].overtime_model, OvertimeModel::Weekly);
/// ```
pub fn reconcile_weekly(
    mut days: Vec<PaidDay>,
    config: &PayrollConfig,
    step_number: u32,
) -> WeeklyReconciliation {
    let basis = config.overtime.basis;
    let topups = compute_weekly_topups(&days, config);

    for (day, topup) in days.iter_mut().zip(&topups.per_row) {
        apply_overtime_basis(day, *topup, basis);
    }

    let weekly_rows = days
        .iter()
        .filter(|d| d.overtime_model == OvertimeModel::Weekly)
        .count();
    let topup_total: Decimal = topups.weeks.iter().map(|w| w.topup_pay).sum();
    let weeks_over = topups
        .weeks
        .iter()
        .filter(|w| w.excess_hours > Decimal::ZERO)
        .count();

    let audit_step = AuditStep {
        step_number,
        rule_id: "weekly_reconciliation".to_string(),
        rule_name: "Weekly Overtime Reconciliation".to_string(),
        input: serde_json::json!({
            "basis": basis,
            "week_start": config.overtime.week_start,
            "weekly_threshold_hours": config.overtime.weekly_threshold_hours.normalize().to_string(),
        }),
        output: serde_json::json!({
            "weeks": topups.weeks.len(),
            "weeks_over_threshold": weeks_over,
            "topup_total": topup_total.round_dp(2).to_string(),
            "weekly_rows": weekly_rows,
        }),
        reasoning: format!(
            "{} of {} weeks exceeded {} regular hours; {} rows paid on the weekly model",
            weeks_over,
            topups.weeks.len(),
            config.overtime.weekly_threshold_hours.normalize(),
            weekly_rows
        ),
    };

    WeeklyReconciliation {
        days,
        weeks: topups.weeks,
        weekly_rows,
        audit_step,
    }
}
