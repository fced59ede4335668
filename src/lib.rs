//! SaccoFlow Savings-Group Reporting Service Library
//!
//! Read-only reporting backend for a savings-group (SACCO) management
//! platform: dashboard statistics, overdue-loan detection, repayment
//! schedules, group savings performance and activity feeds, all filtered
//! through a per-role visibility scope.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use core::{AppError, CurrencyCode, PartyKind, PartyRef, ReportScope, Result, ScopeSelector};
pub use modules::reports::ReportService;
