//! Premium-due accrual calculator
//!
//! Works out how many premium installments have fallen due for a policy,
//! either cumulatively up to today or within one calendar month, and sums
//! them over a policy set.

mod calendar;
mod calculator;
pub mod rules;
mod schedule;

pub use calendar::{elapsed, months_between, rolled_date, MonthSpan};
pub use calculator::{
    installments_due, installments_in_month, total_accrued, month_accrued, is_due_in_month,
};
pub use rules::{rule_for, AccrualRule, DueContext, QUARTERLY_CAP, HALF_YEARLY_CAP};
pub use schedule::{yearly_schedule, MonthTotal};
