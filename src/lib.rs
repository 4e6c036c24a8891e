//! Policy Tracker - insurance policy records with premium-due accrual reporting
//!
//! This library provides:
//! - Policy records with lenient loading from CSV and JSON
//! - Premium accrual calculations (cumulative and per calendar month)
//! - Detailed-view filtering, search and summary cards
//! - An in-memory policy store mirroring the REST interface

pub mod error;
pub mod config;
pub mod policy;
pub mod accrual;
pub mod view;
pub mod store;

// Re-export commonly used types
pub use error::{TrackerError, Result};
pub use config::{TrackerConfig, Clock};
pub use policy::{Policy, PaymentMode, PolicyStatus, PremiumField};
pub use accrual::{total_accrued, month_accrued, is_due_in_month, yearly_schedule, MonthTotal};
pub use view::{PolicyFilter, Summary, DetailedView};
pub use store::{PolicyStore, InMemoryStore};
