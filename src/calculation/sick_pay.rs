//! Sick-pay allocation.
//!
//! Sick dates are grouped into runs of consecutive calendar days. Within a
//! run the first day is unpaid, the second and third are paid at half a
//! day, and every later day is paid in full. A "day" is the employee's
//! average worked hours times the hourly wage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::segmenter::is_sick_status;
use crate::config::PayrollConfig;
use crate::models::{AttendanceTable, AuditStep, DayTable, PaidDay};

/// Sick pay granted for one sick date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickAllocation {
    /// The sick date.
    pub date: NaiveDate,
    /// Position of the date within its run, starting at 1.
    pub rank: u32,
    /// Fraction of a day paid.
    pub percentage: Decimal,
    /// The amount paid.
    pub pay: Decimal,
}

/// The result of allocating sick pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickPayResult {
    /// The day table with sick pay applied.
    pub table: DayTable,
    /// One allocation per distinct sick date, in date order.
    pub allocations: Vec<SickAllocation>,
    /// The hours a paid sick day is worth.
    pub average_daily_hours: Decimal,
    /// Whether the configured fallback replaced the worked-day average.
    pub used_fallback_hours: bool,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Distinct sick dates in the attendance table, sorted.
///
/// A row is sick when its status carries the sick keyword but not the
/// no-attendance keyword and its date parses.
pub fn sick_dates(table: &AttendanceTable, config: &PayrollConfig) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = table
        .rows()
        .iter()
        .filter(|row| is_sick_status(row.status_text(), &config.status))
        .filter_map(|row| row.parsed_date())
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Splits sorted, distinct dates into runs of consecutive days.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::sick_runs;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
/// let runs = sick_runs(&[d(5), d(6), d(9), d(10), d(11)]);
/// assert_eq!(runs, vec![vec![d(5), d(6)], vec![d(9), d(10), d(11)]]);
/// ```
pub fn sick_runs(dates: &[NaiveDate]) -> Vec<Vec<NaiveDate>> {
    let mut runs: Vec<Vec<NaiveDate>> = Vec::new();
    for &date in dates {
        let continues = runs
            .last()
            .and_then(|run| run.last())
            .is_some_and(|prev| prev.succ_opt() == Some(date));
        match runs.last_mut() {
            Some(run) if continues => run.push(date),
            _ => runs.push(vec![date]),
        }
    }
    runs
}

/// Fraction of a day paid for the `rank`-th day of a sick run.
pub fn sick_day_percentage(rank: u32) -> Decimal {
    match rank {
        0 | 1 => Decimal::ZERO,
        2 | 3 => Decimal::new(5, 1),
        _ => Decimal::ONE,
    }
}

/// Mean worked hours over `worked_day` rows, or `None` when there are none.
pub fn average_worked_hours(days: &[PaidDay]) -> Option<Decimal> {
    let worked: Vec<Decimal> = days
        .iter()
        .filter(|d| d.segment.worked_day)
        .map(|d| d.hours_total)
        .collect();
    if worked.is_empty() {
        return None;
    }
    let total: Decimal = worked.iter().sum();
    Some(total / Decimal::from(worked.len()))
}

/// Allocates sick pay and applies it to the day table.
///
/// The average is taken over the table before any sick adjustment. Rows that
/// already exist for a sick date lose their work pay and the first of them
/// carries the sick pay; a sick date with no row gets a zero-work row.
pub fn allocate_sick_pay(
    mut table: DayTable,
    attendance: &AttendanceTable,
    config: &PayrollConfig,
    step_number: u32,
) -> SickPayResult {
    let sick_config = &config.sick_pay;
    let average = if sick_config.use_average_hours {
        average_worked_hours(table.days())
    } else {
        None
    };
    let used_fallback_hours = average.is_none();
    let average_daily_hours = average.unwrap_or(sick_config.fallback_daily_hours);
    if used_fallback_hours && sick_config.use_average_hours {
        warn!(
            fallback_hours = %sick_config.fallback_daily_hours,
            "No worked days to average; sick days use the fallback hours"
        );
    }

    let day_value = average_daily_hours * config.wage.hourly_wage;
    let dates = sick_dates(attendance, config);
    let runs = sick_runs(&dates);
    let run_count = runs.len();
    let mut allocations = Vec::with_capacity(dates.len());

    for run in runs {
        for (rank, date) in (1u32..).zip(run) {
            let percentage = sick_day_percentage(rank);
            let pay = percentage * day_value;
            table.apply_sick_pay(date, &config.status.sick, pay);
            allocations.push(SickAllocation {
                date,
                rank,
                percentage,
                pay,
            });
        }
    }

    let sick_total: Decimal = allocations.iter().map(|a| a.pay).sum();
    let paid_days = allocations.iter().filter(|a| a.pay > Decimal::ZERO).count();

    let audit_step = AuditStep {
        step_number,
        rule_id: "sick_pay_allocation".to_string(),
        rule_name: "Sick Pay Allocation".to_string(),
        input: serde_json::json!({
            "sick_dates": dates,
            "use_average_hours": sick_config.use_average_hours,
            "average_daily_hours": average_daily_hours.round_dp(4).normalize().to_string(),
            "hourly_wage": config.wage.hourly_wage.normalize().to_string(),
        }),
        output: serde_json::json!({
            "allocations": allocations.len(),
            "paid_days": paid_days,
            "sick_total": sick_total.round_dp(2).to_string(),
        }),
        reasoning: if allocations.is_empty() {
            "No sick dates reported".to_string()
        } else {
            format!(
                "{} sick dates in {} runs valued at {} hours/day; {} paid",
                allocations.len(),
                run_count,
                average_daily_hours.round_dp(2).normalize(),
                paid_days
            )
        },
    };

    SickPayResult {
        table,
        allocations,
        average_daily_hours,
        used_fallback_hours,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{calculate_paid_days, segment_table};
    use crate::models::AttendanceRow;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn row(d: u32, status: &str, clock_in: &str, clock_out: &str) -> AttendanceRow {
        AttendanceRow {
            date: format!("{d:02}/01/2026"),
            status: status.to_string(),
            clock_in: clock_in.to_string(),
            clock_out: clock_out.to_string(),
            ..Default::default()
        }
    }

    fn run(rows: Vec<AttendanceRow>, config: &PayrollConfig) -> SickPayResult {
        let attendance = AttendanceTable::new(rows);
        let segments = segment_table(&attendance, config, 1).segments;
        let days = calculate_paid_days(segments, config, 2).days;
        allocate_sick_pay(DayTable::new(days), &attendance, config, 3)
    }

    // ==========================================================================
    // Runs and tiers
    // ==========================================================================

    #[test]
    fn test_runs_break_on_gaps() {
        let runs = sick_runs(&[date(1), date(3), date(4)]);
        assert_eq!(runs, vec![vec![date(1)], vec![date(3), date(4)]]);
        assert!(sick_runs(&[]).is_empty());
    }

    #[test]
    fn test_runs_cross_month_boundary() {
        let jan31 = date(31);
        let feb1 = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(sick_runs(&[jan31, feb1]).len(), 1);
    }

    #[test]
    fn test_tier_percentages() {
        let tiers: Vec<Decimal> = (1..=5).map(sick_day_percentage).collect();
        assert_eq!(tiers, vec![dec("0"), dec("0.5"), dec("0.5"), dec("1"), dec("1")]);
    }

    // ==========================================================================
    // Allocation
    // ==========================================================================

    #[test]
    fn test_four_consecutive_sick_days() {
        let config = PayrollConfig::default();
        let result = run(
            vec![
                row(5, "", "08:00", "16:00"),
                row(6, "מחלה", "", ""),
                row(7, "מחלה", "", ""),
                row(8, "מחלה", "", ""),
                row(9, "מחלה", "", ""),
            ],
            &config,
        );

        assert_eq!(result.average_daily_hours, dec("8"));
        let pays: Vec<Decimal> = result.allocations.iter().map(|a| a.pay).collect();
        assert_eq!(pays, vec![dec("0"), dec("260"), dec("260"), dec("520")]);

        let table_pays: Vec<Decimal> = result.table.days()[1..].iter().map(|d| d.pay_sick).collect();
        assert_eq!(table_pays, pays);
        assert_eq!(result.audit_step.output["paid_days"], 3);
    }

    #[test]
    fn test_sick_status_on_worked_row_zeroes_work_pay() {
        // A sick note that also carries clock times: the row is sick, not worked.
        let config = PayrollConfig::default();
        let result = run(
            vec![
                row(5, "", "08:00", "16:00"),
                row(6, "", "08:00", "16:00"),
                row(7, "", "08:00", "16:00"),
                row(7, "מחלה", "08:00", "16:00"),
            ],
            &config,
        );
        let day7: Vec<&PaidDay> = result.table.days().iter().filter(|d| d.date() == date(7)).collect();
        assert_eq!(day7.len(), 2);
        assert!(day7.iter().all(|d| d.segment.is_sick && d.pay_total_day.is_zero()));
        assert!(day7.iter().all(|d| d.travel_pay.is_zero()));
        // Single-day run: unpaid
        assert!(day7.iter().all(|d| d.pay_sick.is_zero()));
    }

    #[test]
    fn test_fallback_hours_when_no_worked_days() {
        let config = PayrollConfig::default();
        let result = run(vec![row(5, "מחלה", "", ""), row(6, "מחלה", "", "")], &config);
        assert!(result.used_fallback_hours);
        assert_eq!(result.average_daily_hours, dec("8"));
        assert_eq!(result.allocations[1].pay, dec("260"));
    }

    #[test]
    fn test_average_disabled_uses_fallback() {
        let mut config = PayrollConfig::default();
        config.sick_pay.use_average_hours = false;
        config.sick_pay.fallback_daily_hours = dec("6");
        let result = run(
            vec![row(4, "", "08:00", "18:00"), row(5, "מחלה", "", ""), row(6, "מחלה", "", "")],
            &config,
        );
        assert_eq!(result.allocations[1].pay, dec("195"));
    }

    #[test]
    fn test_average_over_worked_days() {
        let config = PayrollConfig::default();
        let result = run(
            vec![
                row(3, "", "08:00", "14:00"),
                row(4, "", "08:00", "18:00"),
                row(6, "מחלה", "", ""),
                row(7, "מחלה", "", ""),
            ],
            &config,
        );
        assert_eq!(result.average_daily_hours, dec("8"));
        assert!(!result.used_fallback_hours);
    }

    #[test]
    fn test_no_attendance_sick_note_is_not_sick() {
        let config = PayrollConfig::default();
        let attendance = AttendanceTable::new(vec![row(6, "מחלה אין דיווח נוכחות", "", "")]);
        assert!(sick_dates(&attendance, &config).is_empty());
    }
}
