//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files or API request bodies.
//! Every field has a default, so any subset may be overridden.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Wage and allowance amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WageConfig {
    /// The base hourly wage.
    pub hourly_wage: Decimal,
    /// Flat travel allowance credited once per worked date.
    pub daily_travel: Decimal,
    /// Fixed monthly allowance (meal vouchers), taxable.
    pub monthly_allowance: Decimal,
}

impl Default for WageConfig {
    fn default() -> Self {
        Self {
            hourly_wage: Decimal::new(65, 0),
            daily_travel: Decimal::new(22, 0),
            monthly_allowance: Decimal::new(450, 0),
        }
    }
}

/// Bonus rates for each time bucket, as fractions of the hourly wage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusRates {
    /// Bonus for minutes between 16:00 and 24:00.
    pub evening: Decimal,
    /// Bonus for minutes between 00:00 and 07:30.
    pub night: Decimal,
    /// Bonus for minutes between Friday 16:00 and Sunday 07:30.
    pub weekend: Decimal,
    /// Bonus for every minute of a day flagged as a holiday.
    pub holiday: Decimal,
}

impl Default for BonusRates {
    fn default() -> Self {
        Self {
            evening: Decimal::new(20, 2),
            night: Decimal::new(30, 2),
            weekend: Decimal::new(50, 2),
            holiday: Decimal::new(50, 2),
        }
    }
}

/// Keywords matched (by substring) against the status column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusKeywords {
    /// Marks a sick day.
    pub sick: String,
    /// Marks a day with no attendance report; such rows are dropped.
    pub no_attendance: String,
    /// Any of these marks a holiday or holiday eve.
    pub holiday_hints: Vec<String>,
}

impl Default for StatusKeywords {
    fn default() -> Self {
        Self {
            sick: "מחלה".to_string(),
            no_attendance: "אין דיווח נוכחות".to_string(),
            holiday_hints: vec!["חג".to_string(), "ערב חג".to_string()],
        }
    }
}

/// How the daily hours base for sick pay is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SickPayConfig {
    /// Use the mean hours of worked days in the period.
    pub use_average_hours: bool,
    /// Daily hours used when averaging is off or no day was worked.
    pub fallback_daily_hours: Decimal,
}

impl Default for SickPayConfig {
    fn default() -> Self {
        Self {
            use_average_hours: true,
            fallback_daily_hours: Decimal::new(8, 0),
        }
    }
}

/// Which overtime model feeds the per-day totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeBasis {
    /// Only the daily tiered overtime model.
    DailyOnly,
    /// Only the weekly threshold top-up model.
    WeeklyOnly,
    /// Both models, choosing the higher-paying one per day.
    #[default]
    DailyAndWeeklyMax,
}

/// The first day of a payroll week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday to Sunday.
    Monday,
}

/// Overtime thresholds, tier rates and reconciliation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimeConfig {
    /// Bonus over base for tier-1 overtime hours (0.25 means 125%).
    pub t1_bonus: Decimal,
    /// Bonus over base for tier-2 overtime hours (0.50 means 150%).
    pub t2_bonus: Decimal,
    /// Hours per day before daily overtime starts.
    pub daily_regular_hours: Decimal,
    /// Maximum daily overtime hours paid at the tier-1 rate.
    pub daily_t1_hours: Decimal,
    /// Regular hours per week before the weekly top-up applies.
    pub weekly_threshold_hours: Decimal,
    /// Reconciliation policy between the daily and weekly models.
    pub basis: OvertimeBasis,
    /// First day of the week used to group days.
    pub week_start: WeekStart,
}

impl Default for OvertimeConfig {
    fn default() -> Self {
        Self {
            t1_bonus: Decimal::new(25, 2),
            t2_bonus: Decimal::new(50, 2),
            daily_regular_hours: Decimal::new(8, 0),
            daily_t1_hours: Decimal::new(2, 0),
            weekly_threshold_hours: Decimal::new(42, 0),
            basis: OvertimeBasis::default(),
            week_start: WeekStart::default(),
        }
    }
}

/// What the employee pension contribution is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PensionBaseMode {
    /// Wage components only: base, bonuses, overtime and sick pay.
    #[default]
    WageOnly,
    /// The whole gross taxable amount, including travel and the monthly allowance.
    IncludeAll,
}

/// One progressive income tax bracket.
///
/// A `cap` of `None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the bracket, inclusive.
    pub cap: Option<Decimal>,
    /// Marginal rate inside the bracket.
    pub rate: Decimal,
}

impl TaxBracket {
    fn new(cap: Option<i64>, rate_percent: i64) -> Self {
        Self {
            cap: cap.map(|c| Decimal::new(c, 0)),
            rate: Decimal::new(rate_percent, 2),
        }
    }
}

/// An ordered list of tax brackets, ascending by cap.
///
/// Deserialization is lenient: the brackets may be given as a list or as a
/// JSON string, and any malformed input falls back to the default table
/// instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaxBrackets(Vec<TaxBracket>);

impl TaxBrackets {
    /// Builds a bracket table, validating ordering.
    ///
    /// Returns `None` if the list is empty, caps are not strictly ascending,
    /// an unbounded cap is not last, or any rate is negative.
    pub fn new(brackets: Vec<TaxBracket>) -> Option<Self> {
        if brackets.is_empty() {
            return None;
        }
        let mut previous = Decimal::ZERO;
        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return None;
            }
            match bracket.cap {
                Some(cap) if cap > previous => previous = cap,
                Some(_) => return None,
                None if i + 1 == brackets.len() => {}
                None => return None,
            }
        }
        Some(Self(brackets))
    }

    /// Parses a JSON array of `{"cap": .., "rate": ..}` objects.
    ///
    /// Falls back to [`TaxBrackets::default`] on any error.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::TaxBrackets;
    ///
    /// let parsed = TaxBrackets::from_json_or_default(r#"[{"cap": 1000, "rate": 0.1}, {"cap": null, "rate": 0.2}]"#);
    /// assert_eq!(parsed.brackets().len(), 2);
    ///
    /// let fallback = TaxBrackets::from_json_or_default("not json");
    /// assert_eq!(fallback, TaxBrackets::default());
    /// ```
    pub fn from_json_or_default(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Self::from_value_or_default(value),
            Err(err) => {
                warn!(error = %err, "Tax brackets are not valid JSON, using defaults");
                Self::default()
            }
        }
    }

    fn from_value_or_default(value: serde_json::Value) -> Self {
        if let serde_json::Value::String(text) = value {
            return Self::from_json_or_default(&text);
        }
        match serde_json::from_value::<Vec<TaxBracket>>(value) {
            Ok(list) => Self::new(list).unwrap_or_else(|| {
                warn!("Tax brackets are not in ascending order, using defaults");
                Self::default()
            }),
            Err(err) => {
                warn!(error = %err, "Tax brackets are malformed, using defaults");
                Self::default()
            }
        }
    }

    /// Returns the brackets in ascending cap order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.0
    }
}

impl Default for TaxBrackets {
    fn default() -> Self {
        Self(vec![
            TaxBracket::new(Some(6790), 10),
            TaxBracket::new(Some(9720), 14),
            TaxBracket::new(Some(15760), 20),
            TaxBracket::new(Some(21700), 31),
            TaxBracket::new(Some(45180), 35),
            TaxBracket::new(None, 47),
        ])
    }
}

impl<'de> Deserialize<'de> for TaxBrackets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value_or_default(value))
    }
}

/// Low and high rates of a two-tier levy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevyRates {
    /// Rate applied to the portion of gross up to the threshold.
    pub low: Decimal,
    /// Rate applied to the portion of gross above the threshold.
    pub high: Decimal,
}

/// Statutory deduction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionConfig {
    /// Employee pension contribution rate.
    pub pension_rate: Decimal,
    /// What the pension contribution is computed on.
    pub pension_base_mode: PensionBaseMode,
    /// Number of tax credit points.
    pub credit_points: Decimal,
    /// Monthly value of one credit point.
    pub credit_point_value: Decimal,
    /// Progressive income tax brackets.
    pub tax_brackets: TaxBrackets,
    /// Gross amount splitting the low and high levy tiers.
    pub levy_threshold: Decimal,
    /// Social insurance rates.
    pub social_insurance: LevyRates,
    /// Health levy rates.
    pub health: LevyRates,
}

impl Default for DeductionConfig {
    fn default() -> Self {
        Self {
            pension_rate: Decimal::new(7, 2),
            pension_base_mode: PensionBaseMode::default(),
            credit_points: Decimal::new(225, 2),
            credit_point_value: Decimal::new(235, 0),
            tax_brackets: TaxBrackets::default(),
            levy_threshold: Decimal::new(7570, 0),
            social_insurance: LevyRates {
                low: Decimal::new(4, 3),
                high: Decimal::new(7, 2),
            },
            health: LevyRates {
                low: Decimal::new(31, 3),
                high: Decimal::new(5, 2),
            },
        }
    }
}

/// The complete payroll configuration.
///
/// An immutable value passed into every calculation stage. Missing sections
/// and fields take their defaults.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{OvertimeBasis, PayrollConfig};
/// use rust_decimal::Decimal;
///
/// let config: PayrollConfig = serde_json::from_str(
///     r#"{"wage": {"hourly_wage": "70"}, "overtime": {"basis": "daily_only"}}"#,
/// ).unwrap();
/// assert_eq!(config.wage.hourly_wage, Decimal::new(70, 0));
/// assert_eq!(config.wage.daily_travel, Decimal::new(22, 0));
/// assert_eq!(config.overtime.basis, OvertimeBasis::DailyOnly);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Wage and allowance amounts.
    pub wage: WageConfig,
    /// Bonus rates per time bucket.
    pub bonuses: BonusRates,
    /// Status keywords.
    pub status: StatusKeywords,
    /// Sick pay parameters.
    pub sick_pay: SickPayConfig,
    /// Overtime parameters.
    pub overtime: OvertimeConfig,
    /// Statutory deduction parameters.
    pub deductions: DeductionConfig,
}
