//! Calculation logic for the payroll engine.
//!
//! This module contains every pipeline stage: daily segmentation into time
//! buckets, bonus and daily-overtime pricing, weekly overtime reconciliation,
//! sick-pay allocation, statutory deductions and aggregation, plus
//! [`run_payroll`] which chains them.

mod aggregate;
mod bonus;
mod daily_overtime;
mod deductions;
mod pipeline;
mod segmenter;
mod sick_pay;
mod time_windows;
mod weekly;

pub use aggregate::{
    breakdown_lines, build_summary, compose_gross, count_sick_days, deduction_lines, hours_lines,
    net_summary, sum_hours, sum_pay, summarize,
};
pub use bonus::{PaidDaysResult, calculate_paid_days, minutes_to_hours, price_segment};
pub use daily_overtime::{DailyOvertimeSplit, split_daily_overtime};
pub use deductions::{
    DeductionResult, apply_credit_points, calculate_deductions, calculate_net_pay,
    income_tax_before_credit, pension_base, two_tier_levy,
};
pub use pipeline::{ENGINE_VERSION, run_payroll, run_payroll_from_records};
pub use segmenter::{
    SegmentationResult, SkipReason, SkippedRow, is_holiday_status, is_sick_status, segment_row,
    segment_table,
};
pub use sick_pay::{
    SickAllocation, SickPayResult, allocate_sick_pay, average_worked_hours, sick_dates,
    sick_day_percentage, sick_runs,
};
pub use time_windows::{
    DailyWindow, EVENING_WINDOW, NIGHT_WINDOW, evening_minutes, night_minutes, overlap_minutes,
    weekend_minutes, window_minutes,
};
pub use weekly::{
    WeekSummary, WeeklyReconciliation, WeeklyTopups, apply_overtime_basis, compute_weekly_topups,
    reconcile_weekly, week_start_date,
};
