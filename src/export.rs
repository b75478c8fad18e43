//! Day-table CSV export and import.
//!
//! The CSV carries every column of a [`PaidDay`] with full decimal precision,
//! so a table read back with [`read_day_table_csv`] aggregates to exactly the
//! same totals as the table that was written.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, PayrollError};
use crate::models::{DailySegment, OvertimeModel, PaidDay};

/// One CSV line of the day table.
#[derive(Debug, Serialize, Deserialize)]
struct DayRecord {
    date: NaiveDate,
    status: String,
    is_sick: bool,
    is_holiday: bool,
    worked_day: bool,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    minutes_total: i64,
    minutes_evening: i64,
    minutes_night: i64,
    minutes_weekend: i64,
    minutes_holiday: i64,
    #[serde(with = "rust_decimal::serde::str")]
    hours_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_regular: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_morning: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_evening: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_night: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_weekend: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_holiday: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_ot_t1: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    hours_ot_t2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_evening_bonus: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_night_bonus: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_weekend_bonus: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_holiday_bonus: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_overtime_t1: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_overtime_t2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    travel_pay: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_weekly_topup: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pay_sick: Decimal,
    overtime_model: OvertimeModel,
    #[serde(with = "rust_decimal::serde::str")]
    pay_total_day: Decimal,
}

impl From<&PaidDay> for DayRecord {
    fn from(day: &PaidDay) -> Self {
        let segment = &day.segment;
        Self {
            date: segment.date,
            status: segment.status.clone(),
            is_sick: segment.is_sick,
            is_holiday: segment.is_holiday,
            worked_day: segment.worked_day,
            start: segment.start,
            end: segment.end,
            minutes_total: segment.minutes_total,
            minutes_evening: segment.minutes_evening,
            minutes_night: segment.minutes_night,
            minutes_weekend: segment.minutes_weekend,
            minutes_holiday: segment.minutes_holiday,
            hours_total: day.hours_total,
            hours_regular: day.hours_regular,
            hours_morning: day.hours_morning,
            hours_evening: day.hours_evening,
            hours_night: day.hours_night,
            hours_weekend: day.hours_weekend,
            hours_holiday: day.hours_holiday,
            hours_ot_t1: day.hours_ot_t1,
            hours_ot_t2: day.hours_ot_t2,
            pay_base: day.pay_base,
            pay_evening_bonus: day.pay_evening_bonus,
            pay_night_bonus: day.pay_night_bonus,
            pay_weekend_bonus: day.pay_weekend_bonus,
            pay_holiday_bonus: day.pay_holiday_bonus,
            pay_overtime_t1: day.pay_overtime_t1,
            pay_overtime_t2: day.pay_overtime_t2,
            travel_pay: day.travel_pay,
            pay_weekly_topup: day.pay_weekly_topup,
            pay_sick: day.pay_sick,
            overtime_model: day.overtime_model,
            pay_total_day: day.pay_total_day,
        }
    }
}

impl From<DayRecord> for PaidDay {
    fn from(record: DayRecord) -> Self {
        Self {
            segment: DailySegment {
                date: record.date,
                status: record.status,
                is_sick: record.is_sick,
                is_holiday: record.is_holiday,
                worked_day: record.worked_day,
                start: record.start,
                end: record.end,
                minutes_total: record.minutes_total,
                minutes_evening: record.minutes_evening,
                minutes_night: record.minutes_night,
                minutes_weekend: record.minutes_weekend,
                minutes_holiday: record.minutes_holiday,
            },
            hours_total: record.hours_total,
            hours_regular: record.hours_regular,
            hours_morning: record.hours_morning,
            hours_evening: record.hours_evening,
            hours_night: record.hours_night,
            hours_weekend: record.hours_weekend,
            hours_holiday: record.hours_holiday,
            hours_ot_t1: record.hours_ot_t1,
            hours_ot_t2: record.hours_ot_t2,
            pay_base: record.pay_base,
            pay_evening_bonus: record.pay_evening_bonus,
            pay_night_bonus: record.pay_night_bonus,
            pay_weekend_bonus: record.pay_weekend_bonus,
            pay_holiday_bonus: record.pay_holiday_bonus,
            pay_overtime_t1: record.pay_overtime_t1,
            pay_overtime_t2: record.pay_overtime_t2,
            travel_pay: record.travel_pay,
            pay_weekly_topup: record.pay_weekly_topup,
            pay_sick: record.pay_sick,
            overtime_model: record.overtime_model,
            pay_total_day: record.pay_total_day,
        }
    }
}

/// Writes the day table as CSV text with a header line.
///
/// # Errors
///
/// Returns [`PayrollError::Csv`] if a record cannot be serialized.
///
/// # Example
///
/// ```
/// use payroll_engine::export::write_day_table_csv;
///
/// let csv = write_day_table_csv(&[]).unwrap();
/// assert!(csv.is_empty());
/// ```
pub fn write_day_table_csv(days: &[PaidDay]) -> EngineResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for day in days {
        writer.serialize(DayRecord::from(day))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    String::from_utf8(bytes).map_err(|err| PayrollError::CalculationError {
        message: format!("CSV output is not UTF-8: {err}"),
    })
}

/// Reads a day table previously written by [`write_day_table_csv`].
///
/// # Errors
///
/// Returns [`PayrollError::InvalidRecord`] naming the line of the first
/// record that cannot be parsed.
pub fn read_day_table_csv(text: &str) -> EngineResult<Vec<PaidDay>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let mut days = Vec::new();
    for (index, result) in reader.deserialize::<DayRecord>().enumerate() {
        let record = result.map_err(|err| PayrollError::InvalidRecord {
            line: err
                .position()
                .map_or(index + 2, |pos| pos.line() as usize),
            message: err.to_string(),
        })?;
        days.push(record.into());
    }
    Ok(days)
}
