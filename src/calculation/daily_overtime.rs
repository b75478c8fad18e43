//! Daily overtime detection functionality.
//!
//! This module splits a day's worked hours into regular hours and two tiers
//! of daily overtime: the first `t1_cap` hours past the regular threshold are
//! tier 1, everything beyond is tier 2.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Worked hours split into regular time and overtime tiers.
///
/// `t1_hours + t2_hours` always equals `max(0, worked - threshold)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOvertimeSplit {
    /// Hours up to the daily regular threshold.
    pub regular_hours: Decimal,
    /// Overtime hours paid at the tier-1 rate.
    pub t1_hours: Decimal,
    /// Overtime hours paid at the tier-2 rate.
    pub t2_hours: Decimal,
}

impl DailyOvertimeSplit {
    /// Total overtime hours across both tiers.
    pub fn overtime_hours(&self) -> Decimal {
        self.t1_hours + self.t2_hours
    }
}

/// Splits worked hours at the daily threshold and the tier-1 cap.
///
/// # Arguments
///
/// * `worked_hours` - Hours worked on the row
/// * `threshold` - Hours per day before overtime starts (typically 8)
/// * `t1_cap` - Overtime hours paid at the tier-1 rate (typically 2)
///
/// # Examples
///
/// ## Shift at threshold (no overtime)
///
/// ```
/// use payroll_engine::calculation::split_daily_overtime;
/// use rust_decimal::Decimal;
///
/// let split = split_daily_overtime(Decimal::from(8), Decimal::from(8), Decimal::from(2));
/// assert_eq!(split.regular_hours, Decimal::from(8));
/// assert_eq!(split.overtime_hours(), Decimal::ZERO);
/// ```
///
/// ## Long shift spilling into tier 2
///
/// ```
/// use payroll_engine::calculation::split_daily_overtime;
/// use rust_decimal::Decimal;
///
/// let split = split_daily_overtime(Decimal::from(12), Decimal::from(8), Decimal::from(2));
/// assert_eq!(split.t1_hours, Decimal::from(2));
/// assert_eq!(split.t2_hours, Decimal::from(2));
/// ```
pub fn split_daily_overtime(
    worked_hours: Decimal,
    threshold: Decimal,
    t1_cap: Decimal,
) -> DailyOvertimeSplit {
    let regular_hours = worked_hours.min(threshold).max(Decimal::ZERO);
    let overtime = (worked_hours - threshold).max(Decimal::ZERO);
    let t1_hours = overtime.min(t1_cap.max(Decimal::ZERO));
    let t2_hours = overtime - t1_hours;

    DailyOvertimeSplit {
        regular_hours,
        t1_hours,
        t2_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // ==========================================================================
    // Threshold boundaries
    // ==========================================================================

    #[test]
    fn test_under_threshold_has_no_overtime() {
        let split = split_daily_overtime(dec("6.5"), dec("8"), dec("2"));
        assert_eq!(split.regular_hours, dec("6.5"));
        assert_eq!(split.t1_hours, Decimal::ZERO);
        assert_eq!(split.t2_hours, Decimal::ZERO);
    }

    #[test]
    fn test_ten_hours_is_two_hours_tier_one() {
        let split = split_daily_overtime(dec("10"), dec("8"), dec("2"));
        assert_eq!(split.regular_hours, dec("8"));
        assert_eq!(split.t1_hours, dec("2"));
        assert_eq!(split.t2_hours, Decimal::ZERO);
    }

    #[test]
    fn test_partial_tier_two() {
        let split = split_daily_overtime(dec("10.75"), dec("8"), dec("2"));
        assert_eq!(split.t1_hours, dec("2"));
        assert_eq!(split.t2_hours, dec("0.75"));
    }

    #[test]
    fn test_configured_threshold_and_cap() {
        let split = split_daily_overtime(dec("12"), dec("9"), dec("1"));
        assert_eq!(split.regular_hours, dec("9"));
        assert_eq!(split.t1_hours, dec("1"));
        assert_eq!(split.t2_hours, dec("2"));
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    proptest! {
        #[test]
        fn prop_tiers_sum_to_overtime(minutes in 0i64..(24 * 60)) {
            let worked = Decimal::from(minutes) / Decimal::from(60);
            let split = split_daily_overtime(worked, dec("8"), dec("2"));

            prop_assert_eq!(split.overtime_hours(), (worked - dec("8")).max(Decimal::ZERO));
            prop_assert!(split.t1_hours <= dec("2"));
            prop_assert!(split.t2_hours >= Decimal::ZERO);
            prop_assert_eq!(split.regular_hours + split.overtime_hours(), worked);
        }
    }
}
