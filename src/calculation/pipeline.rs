//! The end-to-end payroll pipeline.
//!
//! Stages run in a fixed order, each consuming the previous stage's output
//! and the shared configuration:
//!
//! 1. segment attendance rows into daily time buckets
//! 2. price buckets, bonuses, daily overtime and travel
//! 3. reconcile daily overtime with the weekly top-up
//! 4. allocate sick pay
//! 5. aggregate category totals and compose gross
//! 6. compute statutory deductions and net pay
//!
//! Every stage records one [`AuditStep`](crate::models::AuditStep).

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::aggregate::{
    breakdown_lines, build_summary, compose_gross, count_sick_days, deduction_lines, hours_lines,
    net_summary, sum_hours, sum_pay,
};
use super::bonus::calculate_paid_days;
use super::deductions::calculate_net_pay;
use super::segmenter::segment_table;
use super::sick_pay::allocate_sick_pay;
use super::weekly::reconcile_weekly;
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{
    AttendanceTable, AuditStep, AuditTrace, DayTable, GrossComponents, PayTotals, PayrollResult,
};

/// The version of the engine, recorded on every result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the full payroll pipeline over a validated attendance table.
///
/// The run is pure: the same table and configuration always produce an
/// identical [`PayrollResult`].
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::run_payroll;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{AttendanceRow, AttendanceTable};
/// use rust_decimal::Decimal;
///
/// let table = AttendanceTable::new(vec![AttendanceRow {
///     date: "15/01/2026".to_string(),
///     clock_in: "09:00".to_string(),
///     clock_out: "15:00".to_string(),
///     ..Default::default()
/// }]);
/// let result = run_payroll(&table, &PayrollConfig::default());
///
/// // 6h × 65 + 22 travel + 450 allowance
/// assert_eq!(result.net_summary.gross, Decimal::from(862));
/// assert_eq!(result.audit_trace.steps.len(), 6);
/// ```
pub fn run_payroll(table: &AttendanceTable, config: &PayrollConfig) -> PayrollResult {
    let started = Instant::now();
    let mut trace = AuditTrace::default();

    let segmentation = segment_table(table, config, 1);
    if !segmentation.skipped.is_empty() {
        trace.warn(
            "ROWS_SKIPPED",
            format!(
                "{} attendance rows were skipped (no attendance, unparsable date or missing clock time)",
                segmentation.skipped.len()
            ),
            "low",
        );
    }
    trace.steps.push(segmentation.audit_step);

    let priced = calculate_paid_days(segmentation.segments, config, 2);
    trace.steps.push(priced.audit_step);

    let reconciled = reconcile_weekly(priced.days, config, 3);
    trace.steps.push(reconciled.audit_step);

    let sick = allocate_sick_pay(DayTable::new(reconciled.days), table, config, 4);
    if sick.used_fallback_hours && config.sick_pay.use_average_hours && !sick.allocations.is_empty()
    {
        trace.warn(
            "SICK_HOURS_FALLBACK",
            format!(
                "No worked days to average; sick days valued at {} hours",
                sick.average_daily_hours.normalize()
            ),
            "medium",
        );
    }
    trace.steps.push(sick.audit_step);
    let days = sick.table.into_days();

    let hours = sum_hours(&days);
    let pay = sum_pay(&days);
    let gross = compose_gross(&pay, config);
    let sick_days = count_sick_days(&days);
    trace.steps.push(aggregation_step(5, days.len(), &gross, &pay));
    debug!(
        rows = days.len(),
        wage_components = %gross.wage_components,
        gross = %gross.gross_taxable,
        "Aggregated day table"
    );

    let deductions = calculate_net_pay(&gross, &config.deductions, 6);
    trace.steps.push(deductions.audit_step);

    let summary = build_summary(hours, pay, gross, deductions.breakdown, sick_days);

    info!(
        rows = table.rows().len(),
        days = days.len(),
        gross = %summary.gross.gross_taxable,
        net = %summary.net_pay,
        duration_us = started.elapsed().as_micros(),
        "Payroll run completed"
    );

    PayrollResult {
        engine_version: ENGINE_VERSION.to_string(),
        breakdown: breakdown_lines(&summary),
        deductions: deduction_lines(&summary),
        hours_summary: hours_lines(&summary),
        net_summary: net_summary(&summary),
        days,
        summary,
        audit_trace: trace,
    }
}

/// Validates a header row and string records, then runs the pipeline.
///
/// # Errors
///
/// Returns [`PayrollError::MissingColumn`](crate::error::PayrollError::MissingColumn)
/// if a required column is absent; nothing is processed in that case.
pub fn run_payroll_from_records<H, R, C>(
    headers: &[H],
    records: Vec<R>,
    config: &PayrollConfig,
) -> EngineResult<PayrollResult>
where
    H: AsRef<str>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let table = AttendanceTable::from_records(headers, records)?;
    Ok(run_payroll(&table, config))
}

fn aggregation_step(
    step_number: u32,
    rows: usize,
    gross: &GrossComponents,
    pay: &PayTotals,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "aggregation".to_string(),
        rule_name: "Aggregation and Gross Composition".to_string(),
        input: serde_json::json!({
            "rows": rows,
        }),
        output: serde_json::json!({
            "wage_components": gross.wage_components.to_string(),
            "travel": gross.travel.to_string(),
            "monthly_allowance": gross.monthly_allowance.to_string(),
            "gross_taxable": gross.gross_taxable.to_string(),
            "sick": pay.sick.to_string(),
        }),
        reasoning: format!(
            "Wage components {} plus travel {} plus monthly allowance {} gives gross {}{}",
            gross.wage_components,
            gross.travel,
            gross.monthly_allowance,
            gross.gross_taxable,
            if pay.weekly_reconciliation > Decimal::ZERO {
                format!(
                    " (includes {} weekly overtime chosen over daily)",
                    pay.weekly_reconciliation
                )
            } else {
                String::new()
            }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::models::{AttendanceRow, OvertimeModel};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
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

    #[test]
    fn test_steps_are_numbered_in_stage_order() {
        let table = AttendanceTable::new(vec![row(15, "", "09:00", "17:00")]);
        let result = run_payroll(&table, &PayrollConfig::default());

        let ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "daily_segmentation",
                "bonus_and_daily_overtime",
                "weekly_reconciliation",
                "sick_pay_allocation",
                "aggregation",
                "statutory_deductions",
            ]
        );
        let numbers: Vec<u32> = result.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_skipped_rows_raise_warning() {
        let table = AttendanceTable::new(vec![
            row(15, "", "09:00", "17:00"),
            row(16, "", ".", "."),
        ]);
        let result = run_payroll(&table, &PayrollConfig::default());
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, "ROWS_SKIPPED");
    }

    #[test]
    fn test_sick_only_month_warns_about_fallback() {
        let table = AttendanceTable::new(vec![row(5, "מחלה", "", ""), row(6, "מחלה", "", "")]);
        let result = run_payroll(&table, &PayrollConfig::default());
        assert!(result
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "SICK_HOURS_FALLBACK"));
        assert_eq!(result.summary.pay.sick, dec("260"));
        assert_eq!(result.summary.sick_days.total, 2);
        assert_eq!(result.summary.sick_days.paid, 1);
    }

    #[test]
    fn test_empty_table_yields_allowance_only() {
        let result = run_payroll(&AttendanceTable::default(), &PayrollConfig::default());
        assert!(result.days.is_empty());
        assert_eq!(result.net_summary.gross, dec("450"));
        assert_eq!(result.summary.hours.total, Decimal::ZERO);
    }

    #[test]
    fn test_weekly_model_flows_into_gross() {
        let rows = (11..=16).map(|d| row(d, "", "08:00", "16:00")).collect();
        let result = run_payroll(&AttendanceTable::new(rows), &PayrollConfig::default());

        assert_eq!(result.days[0].overtime_model, OvertimeModel::Weekly);
        // 6 × 520 base + 6 × 22 travel + 97.5 weekly + 450
        assert_eq!(result.summary.pay.weekly_reconciliation, dec("97.5"));
        assert_eq!(result.net_summary.gross, dec("3799.5"));
    }

    #[test]
    fn test_runs_are_idempotent() {
        let table = AttendanceTable::new(vec![
            row(14, "", "22:00", "06:00"),
            row(15, "ערב חג", "08:00", "19:30"),
            row(18, "מחלה", "", ""),
            row(19, "מחלה", "", ""),
        ]);
        let config = PayrollConfig::default();
        assert_eq!(run_payroll(&table, &config), run_payroll(&table, &config));
    }

    #[test]
    fn test_missing_column_processes_nothing() {
        let headers = ["date", "status", "clock_in", "clock_out", "total_attendance"];
        let records = vec![vec!["15/01/2026", "", "09:00", "17:00", ""]];
        match run_payroll_from_records(&headers, records, &PayrollConfig::default()) {
            Err(PayrollError::MissingColumn { column }) => assert_eq!(column, "day_of_week"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }
}
