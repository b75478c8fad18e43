//! Request types for the payroll engine API.
//!
//! This module defines the JSON request body shared by the `/calculate` and
//! `/export/csv` endpoints.

use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::AttendanceTable;

/// Request body for the calculation endpoints.
///
/// The attendance table travels as a header row plus string rows, exactly as
/// it appears in an exported report. `config` replaces the server's default
/// configuration for this request; any field it omits takes its default.
///
/// # Example
///
/// ```
/// use payroll_engine::api::CalculationRequest;
///
/// let body = r#"{
///     "columns": ["date", "day_of_week", "status", "clock_in", "clock_out", "total_attendance"],
///     "rows": [["15/01/2026", "Thu", "", "09:00", "17:00", "08:00"]],
///     "config": {"wage": {"hourly_wage": "70"}}
/// }"#;
/// let request: CalculationRequest = serde_json::from_str(body).unwrap();
/// assert_eq!(request.rows.len(), 1);
/// assert!(request.config.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Column headers, English or Hebrew.
    pub columns: Vec<String>,
    /// Attendance rows, cells in column order.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Optional configuration overriding the server default.
    #[serde(default)]
    pub config: Option<PayrollConfig>,
}

impl CalculationRequest {
    /// Validates the columns and builds the attendance table.
    pub fn attendance_table(&self) -> EngineResult<AttendanceTable> {
        AttendanceTable::from_records(&self.columns, self.rows.clone())
    }
}
