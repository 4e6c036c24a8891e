//! Premium accrual totals over a policy set
//!
//! All functions are pure: "today" is always passed in, and a policy with no
//! issued date, an unrecognized mode or a future issue date contributes
//! nothing rather than raising an error.

use super::calendar::{elapsed, months_between, rolled_date};
use super::rules::{rule_for, DueContext};
use crate::policy::{Policy, PremiumField};
use chrono::{Datelike, NaiveDate};

/// Installments owed by one policy from issue up to `today`
pub fn installments_due(policy: &Policy, today: NaiveDate) -> u32 {
    let Some(issued) = policy.issued_date else {
        return 0;
    };
    if today < issued {
        return 0;
    }
    let Some(mode) = policy.mode else {
        log::trace!("Policy {} has no recognized mode", policy.application_number);
        return 0;
    };
    (rule_for(mode).cumulative)(elapsed(issued, today))
}

/// Cumulative amount owed across `policies` as of `today`
pub fn total_accrued(policies: &[Policy], field: PremiumField, today: NaiveDate) -> i64 {
    policies
        .iter()
        .map(|p| weighted(installments_due(p, today), field.value(p)))
        .fold(0, i64::saturating_add)
}

/// Installments times amount, clamped to the `i64` range
pub(crate) fn weighted(installments: u32, amount: i64) -> i64 {
    i64::from(installments).saturating_mul(amount)
}

/// Installments one policy owes in `month` (1-12) of today's year
pub fn installments_in_month(policy: &Policy, month: u32, today: NaiveDate) -> u32 {
    let Some(issued) = policy.issued_date else {
        return 0;
    };
    let target_year = today.year();

    // Projected due date in the target month; overflowing days roll forward
    let Some(due) = rolled_date(target_year, month, issued.day()) else {
        return 0;
    };
    if today < due {
        return 0;
    }
    if issued.year() > target_year || (issued.year() == target_year && issued.month() > month) {
        return 0;
    }

    let Some(mode) = policy.mode else {
        return 0;
    };
    let ctx = DueContext {
        months_since: months_between(issued.year(), issued.month(), target_year, month),
        target_year,
        target_month: month,
        issued,
        today,
    };
    (rule_for(mode).in_month)(&ctx)
}

/// Amount falling due in `month` (1-12) of today's year
pub fn month_accrued(policies: &[Policy], field: PremiumField, month: u32, today: NaiveDate) -> i64 {
    policies
        .iter()
        .map(|p| weighted(installments_in_month(p, month, today), field.value(p)))
        .fold(0, i64::saturating_add)
}

/// Whether a policy belongs in a view filtered to `month`.
///
/// Uses the plain month offset `month - issued_month` with no year carry,
/// so it can admit policies that [`month_accrued`] values at zero.
pub fn is_due_in_month(policy: &Policy, month: u32, today: NaiveDate) -> bool {
    let Some(issued) = policy.issued_date else {
        return false;
    };
    let months_since = month as i32 - issued.month() as i32;
    let Some(due) = rolled_date(today.year(), month, issued.day()) else {
        return false;
    };
    if months_since < 0 || today < due {
        return false;
    }
    policy.mode.is_some_and(|mode| (rule_for(mode).member)(months_since))
}
