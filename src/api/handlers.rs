//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::run_payroll;
use crate::config::PayrollConfig;
use crate::export::write_day_table_csv;
use crate::models::AttendanceTable;

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/export/csv", post(export_csv_handler))
        .with_state(state)
}

/// Handler for POST /calculate endpoint.
///
/// Runs the payroll pipeline and returns the full `PayrollResult`.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let table = match validated_table(&request, correlation_id) {
        Ok(table) => table,
        Err(response) => return response,
    };
    let config = effective_config(&request, &state);

    let start_time = Instant::now();
    let result = run_payroll(&table, config);
    info!(
        correlation_id = %correlation_id,
        rows = table.rows().len(),
        gross_pay = %result.net_summary.gross,
        net_pay = %result.net_summary.net,
        warnings = result.audit_trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(result),
    )
        .into_response()
}

/// Handler for POST /export/csv endpoint.
///
/// Runs the payroll pipeline and returns the day table as CSV.
async fn export_csv_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing CSV export request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };
    let table = match validated_table(&request, correlation_id) {
        Ok(table) => table,
        Err(response) => return response,
    };
    let config = effective_config(&request, &state);

    let result = run_payroll(&table, config);
    match write_day_table_csv(&result.days) {
        Ok(csv) => {
            info!(
                correlation_id = %correlation_id,
                days = result.days.len(),
                bytes = csv.len(),
                "CSV export completed"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                csv,
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "CSV export failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// The request's own configuration when present, else the server default.
fn effective_config<'a>(request: &'a CalculationRequest, state: &'a AppState) -> &'a PayrollConfig {
    request.config.as_ref().unwrap_or_else(|| state.config())
}

fn validated_table(
    request: &CalculationRequest,
    correlation_id: Uuid,
) -> Result<AttendanceTable, Response> {
    request.attendance_table().map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Attendance table rejected"
        );
        ApiErrorResponse::from(err).into_response()
    })
}

fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayrollResult;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use serde_json::json;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::default()
    }

    fn valid_body() -> serde_json::Value {
        json!({
            "columns": ["date", "day_of_week", "status", "clock_in", "clock_out", "total_attendance"],
            "rows": [["15/01/2026", "Thu", "", "09:00", "15:00", "06:00"]]
        })
    }

    async fn post(uri: &str, body: String) -> (StatusCode, Option<String>, Vec<u8>) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let (status, content_type, body) = post("/calculate", valid_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let result: PayrollResult = serde_json::from_slice(&body).unwrap();
        // 6h × 65 + 22 travel + 450 allowance
        assert_eq!(result.net_summary.gross, Decimal::from(862));
        assert_eq!(result.days.len(), 1);
    }

    #[tokio::test]
    async fn test_request_config_overrides_default() {
        let mut body = valid_body();
        body["config"] = json!({"wage": {"hourly_wage": "100", "monthly_allowance": "0"}});
        let (status, _, body) = post("/calculate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let result: PayrollResult = serde_json::from_slice(&body).unwrap();
        // 6h × 100 + 22 travel
        assert_eq!(result.net_summary.gross, Decimal::from(622));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, _, body) = post("/calculate", "{invalid json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_column_returns_400() {
        let body = json!({
            "columns": ["date", "status", "clock_in", "clock_out", "total_attendance"],
            "rows": []
        });
        let (status, _, body) = post("/calculate", body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_COLUMN");
        assert!(error.message.contains("day_of_week"));
    }

    #[tokio::test]
    async fn test_export_csv_returns_day_table() {
        let (status, content_type, body) = post("/export/csv", valid_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/csv; charset=utf-8"));
        let text = String::from_utf8(body).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("date,"));
        assert!(text.lines().nth(1).unwrap().starts_with("2026-01-15,"));
    }
}
