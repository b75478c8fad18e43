//! Bonus and daily-overtime pay calculation.
//!
//! This module converts [`DailySegment`]s into [`PaidDay`]s: hours per bucket,
//! base pay, the additive shift bonuses, tiered daily overtime and the daily
//! travel allowance.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::daily_overtime::split_daily_overtime;
use crate::config::PayrollConfig;
use crate::models::{AuditStep, DailySegment, OvertimeModel, PaidDay};

/// The result of pricing every segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidDaysResult {
    /// One priced row per segment, in segment order.
    pub days: Vec<PaidDay>,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// Converts whole minutes to hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Prices a single segment.
///
/// Every bucket bonus is computed on its own hours and added on top of base
/// pay, so a Friday-evening hour earns both the evening and weekend bonus.
/// Travel is left at zero; [`calculate_paid_days`] assigns it once per date.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{price_segment, segment_row};
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::AttendanceRow;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::default();
/// let row = AttendanceRow {
///     date: "15/01/2026".to_string(),
///     clock_in: "09:00".to_string(),
///     clock_out: "15:00".to_string(),
///     ..Default::default()
/// };
/// let day = price_segment(segment_row(&row, &config.status).unwrap(), &config);
/// assert_eq!(day.pay_base, Decimal::from(390));
/// assert_eq!(day.hours_morning, Decimal::from(6));
/// ```
pub fn price_segment(segment: DailySegment, config: &PayrollConfig) -> PaidDay {
    let rate = config.wage.hourly_wage;
    let bonuses = &config.bonuses;
    let overtime = &config.overtime;

    let hours_total = minutes_to_hours(segment.minutes_total);
    let hours_evening = minutes_to_hours(segment.minutes_evening);
    let hours_night = minutes_to_hours(segment.minutes_night);
    let hours_weekend = minutes_to_hours(segment.minutes_weekend);
    let hours_holiday = minutes_to_hours(segment.minutes_holiday);
    let hours_morning = (hours_total - hours_evening - hours_night).max(Decimal::ZERO);

    let split = split_daily_overtime(
        hours_total,
        overtime.daily_regular_hours,
        overtime.daily_t1_hours,
    );

    let mut day = PaidDay {
        segment,
        hours_total,
        hours_regular: split.regular_hours,
        hours_morning,
        hours_evening,
        hours_night,
        hours_weekend,
        hours_holiday,
        hours_ot_t1: split.t1_hours,
        hours_ot_t2: split.t2_hours,
        pay_base: hours_total * rate,
        pay_evening_bonus: hours_evening * rate * bonuses.evening,
        pay_night_bonus: hours_night * rate * bonuses.night,
        pay_weekend_bonus: hours_weekend * rate * bonuses.weekend,
        pay_holiday_bonus: hours_holiday * rate * bonuses.holiday,
        pay_overtime_t1: split.t1_hours * rate * overtime.t1_bonus,
        pay_overtime_t2: split.t2_hours * rate * overtime.t2_bonus,
        travel_pay: Decimal::ZERO,
        pay_weekly_topup: Decimal::ZERO,
        pay_sick: Decimal::ZERO,
        overtime_model: OvertimeModel::Daily,
        pay_total_day: Decimal::ZERO,
    };
    day.pay_total_day = day.components_total();
    day
}

/// Prices every segment and assigns the daily travel allowance.
///
/// Travel is paid exactly once per calendar date, on the first worked,
/// non-sick row of that date; later split-shift rows get none.
pub fn calculate_paid_days(
    segments: Vec<DailySegment>,
    config: &PayrollConfig,
    step_number: u32,
) -> PaidDaysResult {
    let mut travel_dates = HashSet::new();
    let mut days = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut day = price_segment(segment, config);
        if day.segment.worked_day && !day.segment.is_sick && travel_dates.insert(day.date()) {
            day.travel_pay = config.wage.daily_travel;
            day.pay_total_day = day.components_total();
        }
        days.push(day);
    }

    let total_hours: Decimal = days.iter().map(|d| d.hours_total).sum();
    let ot_t1_hours: Decimal = days.iter().map(|d| d.hours_ot_t1).sum();
    let ot_t2_hours: Decimal = days.iter().map(|d| d.hours_ot_t2).sum();
    let total_pay: Decimal = days.iter().map(|d| d.pay_total_day).sum();

    let audit_step = AuditStep {
        step_number,
        rule_id: "bonus_and_daily_overtime".to_string(),
        rule_name: "Bonus and Daily Overtime".to_string(),
        input: serde_json::json!({
            "segments": days.len(),
            "hourly_wage": config.wage.hourly_wage.normalize().to_string(),
            "daily_regular_hours": config.overtime.daily_regular_hours.normalize().to_string(),
            "daily_t1_hours": config.overtime.daily_t1_hours.normalize().to_string(),
        }),
        output: serde_json::json!({
            "hours_total": total_hours.round_dp(2).normalize().to_string(),
            "hours_ot_t1": ot_t1_hours.round_dp(2).normalize().to_string(),
            "hours_ot_t2": ot_t2_hours.round_dp(2).normalize().to_string(),
            "travel_days": travel_dates.len(),
            "pay_total": total_pay.round_dp(2).to_string(),
        }),
        reasoning: format!(
            "{} hours priced at {}/h with daily overtime past {} hours; travel paid on {} dates",
            total_hours.round_dp(2).normalize(),
            config.wage.hourly_wage.normalize(),
            config.overtime.daily_regular_hours.normalize(),
            travel_dates.len()
        ),
    };

    PaidDaysResult { days, audit_step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::segment_row;
    use crate::models::AttendanceRow;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn segment(date: &str, status: &str, clock_in: &str, clock_out: &str) -> DailySegment {
        let row = AttendanceRow {
            date: date.to_string(),
            status: status.to_string(),
            clock_in: clock_in.to_string(),
            clock_out: clock_out.to_string(),
            ..Default::default()
        };
        segment_row(&row, &PayrollConfig::default().status).unwrap()
    }

    // ==========================================================================
    // Single-row pricing
    // ==========================================================================

    #[test]
    fn test_ten_hour_weekday_shift() {
        // Thursday 09:00-19:00 at 65/h
        let config = PayrollConfig::default();
        let result = calculate_paid_days(
            vec![segment("15/01/2026", "", "09:00", "19:00")],
            &config,
            1,
        );
        let day = &result.days[0];

        assert_eq!(day.hours_total, dec("10"));
        assert_eq!(day.hours_ot_t1, dec("2"));
        assert_eq!(day.hours_ot_t2, Decimal::ZERO);
        assert_eq!(day.pay_base, dec("650"));
        assert_eq!(day.pay_overtime_t1 + day.pay_overtime_t2, dec("32.5"));
        assert_eq!(day.travel_pay, dec("22"));
        // 16:00-19:00 is evening
        assert_eq!(day.hours_evening, dec("3"));
        assert_eq!(day.pay_evening_bonus, dec("39"));
        assert_eq!(day.pay_total_day, dec("743.5"));
    }

    #[test]
    fn test_ten_hour_shift_without_bonuses() {
        let mut config = PayrollConfig::default();
        config.bonuses.evening = Decimal::ZERO;
        let result = calculate_paid_days(
            vec![segment("15/01/2026", "", "09:00", "19:00")],
            &config,
            1,
        );
        assert_eq!(result.days[0].pay_total_day, dec("704.5"));
    }

    #[test]
    fn test_bonuses_stack_additively() {
        // Friday 16:00-20:00: evening and weekend on the same four hours
        let config = PayrollConfig::default();
        let day = price_segment(segment("16/01/2026", "חג", "16:00", "20:00"), &config);

        assert_eq!(day.pay_base, dec("260"));
        assert_eq!(day.pay_evening_bonus, dec("52"));
        assert_eq!(day.pay_weekend_bonus, dec("130"));
        assert_eq!(day.pay_holiday_bonus, dec("130"));
        assert_eq!(day.pay_total_day, dec("572"));
    }

    #[test]
    fn test_morning_hours_exclude_evening_and_night() {
        let config = PayrollConfig::default();
        let day = price_segment(segment("15/01/2026", "", "06:00", "18:00"), &config);
        assert_eq!(day.hours_night, dec("1.5"));
        assert_eq!(day.hours_evening, dec("2"));
        assert_eq!(day.hours_morning, dec("8.5"));
    }

    // ==========================================================================
    // Travel allowance
    // ==========================================================================

    #[test]
    fn test_travel_once_per_date_for_split_shift() {
        let config = PayrollConfig::default();
        let result = calculate_paid_days(
            vec![
                segment("15/01/2026", "", "08:00", "12:00"),
                segment("15/01/2026", "", "18:00", "21:00"),
                segment("16/01/2026", "", "08:00", "12:00"),
            ],
            &config,
            2,
        );
        let travel: Vec<Decimal> = result.days.iter().map(|d| d.travel_pay).collect();
        assert_eq!(travel, vec![dec("22"), Decimal::ZERO, dec("22")]);
        assert_eq!(result.audit_step.output["travel_days"], 2);
        assert_eq!(result.audit_step.step_number, 2);
    }

    #[test]
    fn test_sick_row_gets_no_travel() {
        let config = PayrollConfig::default();
        let result = calculate_paid_days(vec![segment("15/01/2026", "מחלה", "", "")], &config, 1);
        assert_eq!(result.days[0].travel_pay, Decimal::ZERO);
        assert_eq!(result.days[0].pay_total_day, Decimal::ZERO);
    }

    #[test]
    fn test_overtime_hours_invariant() {
        let config = PayrollConfig::default();
        let day = price_segment(segment("15/01/2026", "", "07:00", "20:30"), &config);
        assert_eq!(day.hours_total, dec("13.5"));
        assert_eq!(day.hours_ot_t1 + day.hours_ot_t2, dec("5.5"));
        assert!(day.hours_ot_t1 <= config.overtime.daily_t1_hours);
    }
}
