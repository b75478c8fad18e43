//! Attendance-to-Payroll Engine
//!
//! This crate turns daily attendance rows (clock-in/out times and status notes)
//! into a monthly payroll result: bucketed work hours, shift bonuses, daily and
//! weekly overtime, tiered sick pay, statutory deductions and net pay.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
