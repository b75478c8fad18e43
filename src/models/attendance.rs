//! Attendance input model.
//!
//! This module defines [`AttendanceRow`], one raw line of an attendance report,
//! and [`AttendanceTable`], the validated table the engine consumes.

use std::io::Read;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, PayrollError};

/// The columns every attendance table must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceColumn {
    /// Reported total attendance (informational).
    TotalAttendance,
    /// Clock-out time.
    ClockOut,
    /// Clock-in time.
    ClockIn,
    /// Free-text status or notes.
    Status,
    /// Day-of-week label.
    DayOfWeek,
    /// Calendar date, `DD/MM/YYYY`.
    Date,
}

impl AttendanceColumn {
    /// All required columns, in the order reports usually list them.
    pub const ALL: [AttendanceColumn; 6] = [
        AttendanceColumn::TotalAttendance,
        AttendanceColumn::ClockOut,
        AttendanceColumn::ClockIn,
        AttendanceColumn::Status,
        AttendanceColumn::DayOfWeek,
        AttendanceColumn::Date,
    ];

    /// The canonical English header.
    pub fn canonical(self) -> &'static str {
        match self {
            AttendanceColumn::TotalAttendance => "total_attendance",
            AttendanceColumn::ClockOut => "clock_out",
            AttendanceColumn::ClockIn => "clock_in",
            AttendanceColumn::Status => "status",
            AttendanceColumn::DayOfWeek => "day_of_week",
            AttendanceColumn::Date => "date",
        }
    }

    /// The header used by Hebrew attendance reports.
    pub fn hebrew(self) -> &'static str {
        match self {
            AttendanceColumn::TotalAttendance => "סה\"כ נוכחות",
            AttendanceColumn::ClockOut => "שעת יציאה",
            AttendanceColumn::ClockIn => "שעת כניסה",
            AttendanceColumn::Status => "סטטוס/הערות",
            AttendanceColumn::DayOfWeek => "יום בשבוע",
            AttendanceColumn::Date => "תאריך",
        }
    }

    fn matches(self, header: &str) -> bool {
        let header = header.trim().trim_start_matches('\u{feff}').trim();
        header.eq_ignore_ascii_case(self.canonical()) || header == self.hebrew()
    }
}

/// One row of an attendance report, exactly as received.
///
/// Cells are kept as text; parsing is lenient and happens on demand so that
/// unparsable values skip the row rather than fail the calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AttendanceRow;
/// use chrono::NaiveDate;
///
/// let row = AttendanceRow {
///     date: "15/01/2026".to_string(),
///     day_of_week: "חמישי".to_string(),
///     status: String::new(),
///     clock_in: "09:00".to_string(),
///     clock_out: "17:00".to_string(),
///     total_attendance: "08:00".to_string(),
/// };
/// assert_eq!(row.parsed_date(), NaiveDate::from_ymd_opt(2026, 1, 15));
/// assert!(row.clock_in_time().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// Calendar date, `DD/MM/YYYY`.
    pub date: String,
    /// Day-of-week label.
    #[serde(default)]
    pub day_of_week: String,
    /// Free-text status or notes.
    #[serde(default)]
    pub status: String,
    /// Clock-in time, `HH:MM`, or empty / `.` / `-` when absent.
    #[serde(default)]
    pub clock_in: String,
    /// Clock-out time, `HH:MM`, or empty / `.` / `-` when absent.
    #[serde(default)]
    pub clock_out: String,
    /// Reported total attendance (informational).
    #[serde(default)]
    pub total_attendance: String,
}

impl AttendanceRow {
    /// Parses the date cell, returning `None` when it is not `DD/MM/YYYY`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Parses the clock-in cell.
    pub fn clock_in_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.clock_in)
    }

    /// Parses the clock-out cell.
    pub fn clock_out_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.clock_out)
    }

    /// The status text with surrounding whitespace removed.
    pub fn status_text(&self) -> &str {
        self.status.trim()
    }
}

/// Parses a `DD/MM/YYYY` date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()
}

/// Parses an `HH:MM` time. Empty cells and the `.` / `-` placeholders are absent.
pub fn parse_clock(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if text.is_empty() || text == "." || text == "-" {
        return None;
    }
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}

/// Cells that mean "same as the row above" in date/day columns.
fn is_blank_cell(text: &str) -> bool {
    matches!(text.trim(), "" | "." | "None" | "nan" | "NaN")
}

/// A validated attendance table.
///
/// Built from a header row plus records; construction fails fast when a
/// required column is missing. Date and day-of-week cells left blank on the
/// second line of a split shift are filled from the row above.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceTable {
    rows: Vec<AttendanceRow>,
}

impl AttendanceTable {
    /// Builds a table from already-typed rows.
    pub fn new(rows: Vec<AttendanceRow>) -> Self {
        Self {
            rows: forward_fill(rows),
        }
    }

    /// Builds a table from a header row and string records.
    ///
    /// Headers may use the canonical English names or the Hebrew report
    /// headers. Extra columns are ignored; short records read as empty cells.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::MissingColumn`] naming the first required
    /// column that is absent.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::AttendanceTable;
    ///
    /// let headers = ["date", "day_of_week", "status", "clock_in", "clock_out", "total_attendance"];
    /// let records = vec![vec!["15/01/2026", "Thu", "", "09:00", "17:00", "08:00"]];
    /// let table = AttendanceTable::from_records(&headers, records).unwrap();
    /// assert_eq!(table.rows().len(), 1);
    ///
    /// let missing = AttendanceTable::from_records(&["date"], Vec::<Vec<String>>::new());
    /// assert!(missing.is_err());
    /// ```
    pub fn from_records<H, R, C>(headers: &[H], records: Vec<R>) -> EngineResult<Self>
    where
        H: AsRef<str>,
        R: AsRef<[C]>,
        C: AsRef<str>,
    {
        let mut positions = [0usize; 6];
        for (slot, column) in positions.iter_mut().zip(AttendanceColumn::ALL) {
            *slot = headers
                .iter()
                .position(|h| column.matches(h.as_ref()))
                .ok_or_else(|| PayrollError::MissingColumn {
                    column: column.canonical().to_string(),
                })?;
        }
        let [total, clock_out, clock_in, status, day, date] = positions;

        let rows = records
            .iter()
            .map(|record| {
                let record = record.as_ref();
                let cell = |idx: usize| {
                    record
                        .get(idx)
                        .map(|c| c.as_ref().trim().to_string())
                        .unwrap_or_default()
                };
                AttendanceRow {
                    date: cell(date),
                    day_of_week: cell(day),
                    status: cell(status),
                    clock_in: cell(clock_in),
                    clock_out: cell(clock_out),
                    total_attendance: cell(total),
                }
            })
            .collect();

        Ok(Self::new(rows))
    }

    /// Reads a table from CSV text with a header line.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Csv`] if the CSV cannot be read, or
    /// [`PayrollError::MissingColumn`] if a required column is absent.
    pub fn from_csv_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Self::from_records(&headers, records)
    }

    /// Returns the rows in report order.
    pub fn rows(&self) -> &[AttendanceRow] {
        &self.rows
    }
}

fn forward_fill(mut rows: Vec<AttendanceRow>) -> Vec<AttendanceRow> {
    let mut last_date: Option<String> = None;
    let mut last_day: Option<String> = None;
    for row in &mut rows {
        if is_blank_cell(&row.date) {
            if let Some(date) = &last_date {
                row.date = date.clone();
            }
        } else {
            last_date = Some(row.date.clone());
        }
        if is_blank_cell(&row.day_of_week) {
            if let Some(day) = &last_day {
                row.day_of_week = day.clone();
            }
        } else {
            last_day = Some(row.day_of_week.clone());
        }
    }
    rows
}
