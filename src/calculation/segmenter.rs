//! Daily segmentation functionality.
//!
//! This module turns raw attendance rows into [`DailySegment`]s: it classifies
//! each row (worked, sick, excluded), resolves the worked interval and measures
//! the minutes that fall into each bonus window.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::time_windows::{evening_minutes, night_minutes, weekend_minutes};
use crate::config::{PayrollConfig, StatusKeywords};
use crate::models::{AttendanceRow, AttendanceTable, AuditStep, DailySegment};

/// Why an attendance row produced no segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The status carries the no-attendance keyword.
    NoAttendance,
    /// The date cell is not `DD/MM/YYYY`.
    UnparsableDate,
    /// A clock cell is empty, a placeholder, or not `HH:MM`.
    MissingClockTime,
}

/// An attendance row that was dropped during segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Position of the row in the attendance table.
    pub row_index: usize,
    /// The raw date cell.
    pub date: String,
    /// Why the row was dropped.
    pub reason: SkipReason,
}

/// The result of segmenting an attendance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Segments sorted by date, split shifts in report order.
    pub segments: Vec<DailySegment>,
    /// Rows that produced no segment.
    pub skipped: Vec<SkippedRow>,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Returns `true` if the status marks a sick day that should be paid as one.
///
/// A status carrying both the sick and the no-attendance keyword is not sick.
pub fn is_sick_status(status: &str, keywords: &StatusKeywords) -> bool {
    status.contains(&keywords.sick) && !status.contains(&keywords.no_attendance)
}

/// Returns `true` if the status carries any holiday hint.
pub fn is_holiday_status(status: &str, keywords: &StatusKeywords) -> bool {
    keywords
        .holiday_hints
        .iter()
        .any(|hint| !hint.is_empty() && status.contains(hint.as_str()))
}

/// Segments a single attendance row.
///
/// When clock-out is not after clock-in the interval is rolled to the next
/// day exactly once, so `22:00 → 06:00` is an eight-hour overnight shift
/// dated on its clock-in day and identical times read as a 24-hour shift.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the row produces no segment.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::segment_row;
/// use payroll_engine::config::StatusKeywords;
/// use payroll_engine::models::AttendanceRow;
///
/// let row = AttendanceRow {
///     date: "15/01/2026".to_string(),
///     clock_in: "22:00".to_string(),
///     clock_out: "06:00".to_string(),
///     ..Default::default()
/// };
/// let segment = segment_row(&row, &StatusKeywords::default()).unwrap();
/// assert_eq!(segment.minutes_total, 480);
/// assert_eq!(segment.minutes_evening, 120);
/// assert_eq!(segment.minutes_night, 360);
/// ```
pub fn segment_row(
    row: &AttendanceRow,
    keywords: &StatusKeywords,
) -> Result<DailySegment, SkipReason> {
    let status = row.status_text();
    if status.contains(&keywords.no_attendance) {
        return Err(SkipReason::NoAttendance);
    }

    let date = row.parsed_date().ok_or(SkipReason::UnparsableDate)?;
    let is_holiday = is_holiday_status(status, keywords);

    if status.contains(&keywords.sick) {
        let mut segment = DailySegment::without_work(date, status, true);
        segment.is_holiday = is_holiday;
        return Ok(segment);
    }

    let (clock_in, clock_out) = match (row.clock_in_time(), row.clock_out_time()) {
        (Some(clock_in), Some(clock_out)) => (clock_in, clock_out),
        _ => return Err(SkipReason::MissingClockTime),
    };

    let start = date.and_time(clock_in);
    let mut end = date.and_time(clock_out);
    if end <= start {
        end += Duration::days(1);
    }
    let minutes_total = (end - start).num_minutes();

    Ok(DailySegment {
        date,
        status: status.to_string(),
        is_sick: false,
        is_holiday,
        worked_day: true,
        start: Some(start),
        end: Some(end),
        minutes_total,
        minutes_evening: evening_minutes(start, end),
        minutes_night: night_minutes(start, end),
        minutes_weekend: weekend_minutes(start, end),
        minutes_holiday: if is_holiday { minutes_total } else { 0 },
    })
}

/// Segments every row of an attendance table.
///
/// Rows that cannot be segmented are skipped and reported, never fatal.
/// Segments come back sorted by date; rows sharing a date keep report order.
pub fn segment_table(
    table: &AttendanceTable,
    config: &PayrollConfig,
    step_number: u32,
) -> SegmentationResult {
    let mut segments = Vec::with_capacity(table.rows().len());
    let mut skipped = Vec::new();

    for (row_index, row) in table.rows().iter().enumerate() {
        match segment_row(row, &config.status) {
            Ok(segment) => segments.push(segment),
            Err(reason) => {
                debug!(row_index, date = %row.date, ?reason, "Skipping attendance row");
                skipped.push(SkippedRow {
                    row_index,
                    date: row.date.clone(),
                    reason,
                });
            }
        }
    }
    segments.sort_by_key(|s: &DailySegment| s.date);

    let worked = segments.iter().filter(|s| s.worked_day).count();
    let sick = segments.iter().filter(|s| s.is_sick).count();
    let first_date: Option<NaiveDate> = segments.first().map(|s| s.date);
    let last_date: Option<NaiveDate> = segments.last().map(|s| s.date);

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_segmentation".to_string(),
        rule_name: "Daily Segmentation".to_string(),
        input: serde_json::json!({
            "rows": table.rows().len(),
        }),
        output: serde_json::json!({
            "segments": segments.len(),
            "worked": worked,
            "sick": sick,
            "skipped": skipped.len(),
            "first_date": first_date,
            "last_date": last_date,
        }),
        reasoning: format!(
            "{} rows produced {} segments ({} worked, {} sick); {} rows skipped",
            table.rows().len(),
            segments.len(),
            worked,
            sick,
            skipped.len()
        ),
    };

    SegmentationResult {
        segments,
        skipped,
        audit_step,
    }
}
