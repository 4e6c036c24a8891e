//! Month-by-month due schedule for the current year

use super::calculator::{installments_in_month, weighted};
use crate::policy::{Policy, PremiumField};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

/// Amount falling due in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    /// 1-12
    pub month: u32,
    pub amount: i64,
    /// Policies with at least one installment in the month
    pub policies_due: usize,
}

/// Per-month amounts for January to December of today's year.
///
/// Each month is an independent [`month_accrued`](super::month_accrued)
/// pass, so the twelve are computed in parallel.
pub fn yearly_schedule(policies: &[Policy], field: PremiumField, today: NaiveDate) -> Vec<MonthTotal> {
    (1..=12u32)
        .into_par_iter()
        .map(|month| {
            let mut amount: i64 = 0;
            let mut policies_due = 0;
            for policy in policies {
                let installments = installments_in_month(policy, month, today);
                if installments > 0 {
                    amount = weighted(installments, field.value(policy)).saturating_add(amount);
                    policies_due += 1;
                }
            }
            MonthTotal { month, amount, policies_due }
        })
        .collect()
}
