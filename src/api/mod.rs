//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints that run the payroll pipeline
//! over an attendance table and return the result as JSON or as a CSV day
//! table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
