//! Day-level models.
//!
//! This module defines the per-row records produced by the calculation
//! stages: [`DailySegment`] (time buckets in minutes), [`PaidDay`] (hours and
//! money) and the date-ordered [`DayTable`] that holds them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One attendance row classified and split into time buckets.
///
/// Bucket windows overlap: a minute worked on Friday at 18:00 counts as both
/// evening and weekend, so the bucket minutes may sum to more than `minutes_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySegment {
    /// The date the row belongs to (the clock-in date for overnight shifts).
    pub date: NaiveDate,
    /// The trimmed status text.
    pub status: String,
    /// The status marks a sick day.
    pub is_sick: bool,
    /// The status carries a holiday hint.
    pub is_holiday: bool,
    /// The row represents actual work.
    pub worked_day: bool,
    /// Start of the worked interval.
    pub start: Option<NaiveDateTime>,
    /// End of the worked interval (exclusive).
    pub end: Option<NaiveDateTime>,
    /// Minutes in the worked interval.
    pub minutes_total: i64,
    /// Minutes between 16:00 and 24:00.
    pub minutes_evening: i64,
    /// Minutes between 00:00 and 07:30.
    pub minutes_night: i64,
    /// Minutes between Friday 16:00 and Sunday 07:30.
    pub minutes_weekend: i64,
    /// Minutes of a holiday-flagged row.
    pub minutes_holiday: i64,
}

impl DailySegment {
    /// A row with no worked time.
    pub fn without_work(date: NaiveDate, status: impl Into<String>, is_sick: bool) -> Self {
        Self {
            date,
            status: status.into(),
            is_sick,
            is_holiday: false,
            worked_day: false,
            start: None,
            end: None,
            minutes_total: 0,
            minutes_evening: 0,
            minutes_night: 0,
            minutes_weekend: 0,
            minutes_holiday: 0,
        }
    }
}

/// Which overtime computation produced a row's `pay_total_day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeModel {
    /// Daily tiered overtime.
    #[default]
    Daily,
    /// Weekly threshold top-up.
    Weekly,
}

impl std::fmt::Display for OvertimeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OvertimeModel::Daily => write!(f, "daily"),
            OvertimeModel::Weekly => write!(f, "weekly"),
        }
    }
}

/// A day-level payroll row: hours per bucket and the money they earn.
///
/// Invariant: `hours_ot_t1 + hours_ot_t2 == max(0, hours_total - daily_regular_hours)`
/// and `hours_ot_t1 <= daily_t1_hours`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidDay {
    /// The segment this row was computed from.
    pub segment: DailySegment,
    /// Total worked hours.
    pub hours_total: Decimal,
    /// Worked hours capped at the daily regular threshold.
    pub hours_regular: Decimal,
    /// Hours outside the evening and night windows.
    pub hours_morning: Decimal,
    /// Evening hours.
    pub hours_evening: Decimal,
    /// Night hours.
    pub hours_night: Decimal,
    /// Weekend hours.
    pub hours_weekend: Decimal,
    /// Holiday hours.
    pub hours_holiday: Decimal,
    /// Daily overtime hours at the tier-1 rate.
    pub hours_ot_t1: Decimal,
    /// Daily overtime hours at the tier-2 rate.
    pub hours_ot_t2: Decimal,
    /// Base pay for all worked hours.
    pub pay_base: Decimal,
    /// Evening bonus.
    pub pay_evening_bonus: Decimal,
    /// Night bonus.
    pub pay_night_bonus: Decimal,
    /// Weekend bonus.
    pub pay_weekend_bonus: Decimal,
    /// Holiday bonus.
    pub pay_holiday_bonus: Decimal,
    /// Tier-1 daily overtime bonus.
    pub pay_overtime_t1: Decimal,
    /// Tier-2 daily overtime bonus.
    pub pay_overtime_t2: Decimal,
    /// Travel allowance.
    pub travel_pay: Decimal,
    /// Weekly threshold top-up.
    pub pay_weekly_topup: Decimal,
    /// Sick pay.
    pub pay_sick: Decimal,
    /// The overtime model the total was taken from.
    pub overtime_model: OvertimeModel,
    /// Total work pay for the row, sick pay excluded.
    pub pay_total_day: Decimal,
}

impl PaidDay {
    /// A zero-work row for a sick date missing from the table.
    pub fn sick_only(date: NaiveDate, status: impl Into<String>, pay_sick: Decimal) -> Self {
        Self {
            segment: DailySegment::without_work(date, status, true),
            hours_total: Decimal::ZERO,
            hours_regular: Decimal::ZERO,
            hours_morning: Decimal::ZERO,
            hours_evening: Decimal::ZERO,
            hours_night: Decimal::ZERO,
            hours_weekend: Decimal::ZERO,
            hours_holiday: Decimal::ZERO,
            hours_ot_t1: Decimal::ZERO,
            hours_ot_t2: Decimal::ZERO,
            pay_base: Decimal::ZERO,
            pay_evening_bonus: Decimal::ZERO,
            pay_night_bonus: Decimal::ZERO,
            pay_weekend_bonus: Decimal::ZERO,
            pay_holiday_bonus: Decimal::ZERO,
            pay_overtime_t1: Decimal::ZERO,
            pay_overtime_t2: Decimal::ZERO,
            travel_pay: Decimal::ZERO,
            pay_weekly_topup: Decimal::ZERO,
            pay_sick,
            overtime_model: OvertimeModel::Daily,
            pay_total_day: Decimal::ZERO,
        }
    }

    /// The row's date.
    pub fn date(&self) -> NaiveDate {
        self.segment.date
    }

    /// Sum of all shift bonuses.
    pub fn bonus_pay(&self) -> Decimal {
        self.pay_evening_bonus + self.pay_night_bonus + self.pay_weekend_bonus + self.pay_holiday_bonus
    }

    /// Base, bonuses and travel: the pay both overtime models share.
    pub fn pay_before_overtime(&self) -> Decimal {
        self.pay_base + self.bonus_pay() + self.travel_pay
    }

    /// Sum of the component columns as they currently stand.
    pub fn components_total(&self) -> Decimal {
        self.pay_before_overtime()
            + self.pay_overtime_t1
            + self.pay_overtime_t2
            + self.pay_weekly_topup
    }

    /// Zeroes every work-derived pay column, keeping hours for reference.
    pub fn clear_work_pay(&mut self) {
        self.pay_base = Decimal::ZERO;
        self.pay_evening_bonus = Decimal::ZERO;
        self.pay_night_bonus = Decimal::ZERO;
        self.pay_weekend_bonus = Decimal::ZERO;
        self.pay_holiday_bonus = Decimal::ZERO;
        self.pay_overtime_t1 = Decimal::ZERO;
        self.pay_overtime_t2 = Decimal::ZERO;
        self.travel_pay = Decimal::ZERO;
        self.pay_weekly_topup = Decimal::ZERO;
        self.pay_total_day = Decimal::ZERO;
    }
}

/// Day rows ordered by date.
///
/// Rows sharing a date (split shifts) keep their report order. Sick pay is
/// applied through [`DayTable::apply_sick_pay`], an insert-or-update keyed by date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayTable {
    days: Vec<PaidDay>,
}

impl DayTable {
    /// Builds a table, sorting rows by date (stable).
    pub fn new(mut days: Vec<PaidDay>) -> Self {
        days.sort_by_key(PaidDay::date);
        Self { days }
    }

    /// Returns the rows in date order.
    pub fn days(&self) -> &[PaidDay] {
        &self.days
    }

    /// Consumes the table, returning its rows.
    pub fn into_days(self) -> Vec<PaidDay> {
        self.days
    }

    fn rows_for(&self, date: NaiveDate) -> std::ops::Range<usize> {
        let start = self.days.partition_point(|d| d.date() < date);
        let end = self.days.partition_point(|d| d.date() <= date);
        start..end
    }

    /// Records sick pay for a date.
    ///
    /// Existing rows for the date are marked sick and lose all work pay; the
    /// first of them carries `pay_sick`. A date without rows gets a new
    /// zero-work row inserted in order.
    pub fn apply_sick_pay(&mut self, date: NaiveDate, status: &str, pay_sick: Decimal) {
        let range = self.rows_for(date);
        if range.is_empty() {
            self.days
                .insert(range.start, PaidDay::sick_only(date, status, pay_sick));
            return;
        }
        let first = range.start;
        for day in &mut self.days[range] {
            day.clear_work_pay();
            day.segment.is_sick = true;
            day.pay_sick = Decimal::ZERO;
        }
        self.days[first].pay_sick = pay_sick;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn worked(d: u32, base: &str) -> PaidDay {
        let mut day = PaidDay::sick_only(date(d), "", Decimal::ZERO);
        day.segment.is_sick = false;
        day.segment.worked_day = true;
        day.hours_total = dec("8");
        day.pay_base = dec(base);
        day.travel_pay = dec("22");
        day.pay_total_day = day.components_total();
        day
    }

    #[test]
    fn test_table_sorts_by_date_stably() {
        let table = DayTable::new(vec![worked(5, "1"), worked(3, "2"), worked(5, "3")]);
        let bases: Vec<Decimal> = table.days().iter().map(|d| d.pay_base).collect();
        assert_eq!(bases, vec![dec("2"), dec("1"), dec("3")]);
    }

    #[test]
    fn test_sick_pay_inserts_missing_date_in_order() {
        let mut table = DayTable::new(vec![worked(3, "520"), worked(7, "520")]);
        table.apply_sick_pay(date(5), "מחלה", dec("260"));

        let dates: Vec<NaiveDate> = table.days().iter().map(PaidDay::date).collect();
        assert_eq!(dates, vec![date(3), date(5), date(7)]);
        let sick = &table.days()[1];
        assert!(sick.segment.is_sick);
        assert!(!sick.segment.worked_day);
        assert_eq!(sick.pay_sick, dec("260"));
        assert_eq!(sick.pay_total_day, Decimal::ZERO);
    }

    #[test]
    fn test_sick_pay_overwrites_existing_rows_once() {
        let mut table = DayTable::new(vec![worked(4, "260"), worked(4, "195")]);
        table.apply_sick_pay(date(4), "מחלה", dec("520"));

        assert_eq!(table.days().len(), 2);
        assert_eq!(table.days()[0].pay_sick, dec("520"));
        assert_eq!(table.days()[1].pay_sick, Decimal::ZERO);
        for day in table.days() {
            assert!(day.segment.is_sick);
            assert_eq!(day.pay_base, Decimal::ZERO);
            assert_eq!(day.travel_pay, Decimal::ZERO);
            assert_eq!(day.pay_total_day, Decimal::ZERO);
            assert_eq!(day.hours_total, dec("8"));
        }
    }

    #[test]
    fn test_components_total() {
        let mut day = worked(2, "650");
        day.pay_evening_bonus = dec("26");
        day.pay_overtime_t1 = dec("32.5");
        day.pay_weekly_topup = dec("10");
        assert_eq!(day.pay_before_overtime(), dec("698"));
        assert_eq!(day.components_total(), dec("740.5"));
    }

    #[test]
    fn test_overtime_model_serialization() {
        assert_eq!(
            serde_json::to_string(&OvertimeModel::Weekly).unwrap(),
            "\"weekly\""
        );
        assert_eq!(OvertimeModel::Daily.to_string(), "daily");
    }
}
