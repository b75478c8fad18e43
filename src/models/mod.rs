//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod day;
mod summary;

pub use attendance::{AttendanceColumn, AttendanceRow, AttendanceTable, parse_clock, parse_date};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use day::{DailySegment, DayTable, OvertimeModel, PaidDay};
pub use summary::{
    DeductionBreakdown, GrossComponents, HoursTotals, NetSummary, PayTotals, PayrollResult,
    PayrollSummary, SickDayCounters, SummaryLine,
};
