//! Per-mode accrual rules
//!
//! Each payment mode has one row in a static table holding three rules:
//! - cumulative: installments owed from issue up to today, with the
//!   Quarterly and Half-Yearly lifetime caps
//! - in_month: installments falling due in one target month of this year
//! - member: whether a policy belongs in a month-filtered view, from a month
//!   offset that does not carry years
//!
//! The three rules use different month arithmetic and disagree on purpose
//! for Yearly and multi-year policies.

use super::calendar::{rolled_date, MonthSpan};
use crate::policy::PaymentMode;
use chrono::{Datelike, NaiveDate};

/// Inputs for the per-month rule
#[derive(Debug, Clone, Copy)]
pub struct DueContext {
    /// Year-aware months from issue month to target month
    pub months_since: i32,
    pub target_year: i32,
    pub target_month: u32,
    pub issued: NaiveDate,
    pub today: NaiveDate,
}

pub struct AccrualRule {
    pub mode: PaymentMode,
    pub cumulative: fn(MonthSpan) -> u32,
    pub in_month: fn(&DueContext) -> u32,
    pub member: fn(i32) -> bool,
}

/// Maximum cumulative installments for Quarterly policies
pub const QUARTERLY_CAP: u32 = 4;

/// Maximum cumulative installments for Half-Yearly policies
pub const HALF_YEARLY_CAP: u32 = 2;

static RULES: [AccrualRule; 4] = [
    AccrualRule {
        mode: PaymentMode::Monthly,
        cumulative: monthly_cumulative,
        in_month: monthly_in_month,
        member: monthly_member,
    },
    AccrualRule {
        mode: PaymentMode::Quarterly,
        cumulative: quarterly_cumulative,
        in_month: quarterly_in_month,
        member: quarterly_member,
    },
    AccrualRule {
        mode: PaymentMode::HalfYearly,
        cumulative: half_yearly_cumulative,
        in_month: half_yearly_in_month,
        member: half_yearly_member,
    },
    AccrualRule {
        mode: PaymentMode::Yearly,
        cumulative: yearly_cumulative,
        in_month: yearly_in_month,
        member: yearly_member,
    },
];

pub fn rule_for(mode: PaymentMode) -> &'static AccrualRule {
    match mode {
        PaymentMode::Monthly => &RULES[0],
        PaymentMode::Quarterly => &RULES[1],
        PaymentMode::HalfYearly => &RULES[2],
        PaymentMode::Yearly => &RULES[3],
    }
}

fn non_negative(n: i32) -> u32 {
    n.max(0) as u32
}

// Cumulative ------------------------------------------------------------

fn monthly_cumulative(span: MonthSpan) -> u32 {
    non_negative(span.months_with_current())
}

fn quarterly_cumulative(span: MonthSpan) -> u32 {
    (non_negative(span.months_with_current()) / 3 + 1).min(QUARTERLY_CAP)
}

fn half_yearly_cumulative(span: MonthSpan) -> u32 {
    (non_negative(span.months_with_current()) / 6 + 1).min(HALF_YEARLY_CAP)
}

/// Second annual cycle counts as two installments in total, never more
fn yearly_cumulative(span: MonthSpan) -> u32 {
    if span.months >= 12 || (span.months == 11 && span.day_passed) {
        2
    } else {
        1
    }
}

// Target month ----------------------------------------------------------

fn monthly_in_month(ctx: &DueContext) -> u32 {
    u32::from(ctx.months_since < 12)
}

fn quarterly_in_month(ctx: &DueContext) -> u32 {
    u32::from(matches!(ctx.months_since, 0 | 3 | 6 | 9))
}

fn half_yearly_in_month(ctx: &DueContext) -> u32 {
    u32::from(ctx.months_since % 6 == 0 && ctx.months_since < 12)
}

/// Anniversary month only; first-year and second-year installments are
/// gated separately against today.
fn yearly_in_month(ctx: &DueContext) -> u32 {
    let issued_month = ctx.issued.month();
    if ctx.target_month != issued_month {
        return 0;
    }
    let issued_year = ctx.issued.year();
    let day = ctx.issued.day();
    let reached = |year: i32| rolled_date(year, issued_month, day).is_some_and(|d| ctx.today >= d);

    let mut count = 0;
    if ctx.target_year == issued_year && reached(ctx.target_year) {
        count += 1;
    }
    if ctx.target_year == issued_year + 1 && reached(issued_year + 1) {
        count += 1;
    }
    count
}

// Membership ------------------------------------------------------------

fn monthly_member(months_since: i32) -> bool {
    months_since < 12
}

fn quarterly_member(months_since: i32) -> bool {
    months_since % 3 == 0 && months_since < 12
}

fn half_yearly_member(months_since: i32) -> bool {
    months_since % 6 == 0 && months_since < 12
}

fn yearly_member(months_since: i32) -> bool {
    months_since == 0
}
