//! Summary cards for the dashboard and the detailed view

use super::filter::{sort_by_issued_desc, PolicyFilter};
use crate::accrual::{month_accrued, total_accrued};
use crate::policy::{Policy, PremiumField};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_policies: usize,
    pub issued_policies: usize,
    pub total_fyfrp: i64,
    pub total_wfyfrp: i64,
}

impl Summary {
    /// Dashboard cards: cumulative totals over the whole book
    pub fn overview(policies: &[Policy], today: NaiveDate) -> Self {
        Self {
            total_policies: policies.len(),
            issued_policies: count_issued(policies),
            total_fyfrp: total_accrued(policies, PremiumField::Fyfrp, today),
            total_wfyfrp: total_accrued(policies, PremiumField::Wfyfrp, today),
        }
    }

    pub fn total(&self, field: PremiumField) -> i64 {
        match field {
            PremiumField::Fyfrp => self.total_fyfrp,
            PremiumField::Wfyfrp => self.total_wfyfrp,
        }
    }
}

fn count_issued(policies: &[Policy]) -> usize {
    policies.iter().filter(|p| p.is_issued()).count()
}

/// Filtered table plus its summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedView {
    pub summary: Summary,
    pub policies: Vec<Policy>,
}

impl DetailedView {
    /// Apply `filter` and total the result.
    ///
    /// Totals depend on the criteria:
    /// - month set: amounts falling due in that month, over the filtered set
    /// - no criteria: cumulative totals over the whole book
    /// - otherwise: cumulative totals over the filtered set
    pub fn build(all: &[Policy], filter: &PolicyFilter, today: NaiveDate) -> Self {
        let mut policies = filter.apply(all, today);

        let totals = |field: PremiumField| match filter.month {
            Some(month) => month_accrued(&policies, field, month, today),
            None if filter.is_empty() => total_accrued(all, field, today),
            None => total_accrued(&policies, field, today),
        };
        let summary = Summary {
            total_policies: policies.len(),
            issued_policies: count_issued(&policies),
            total_fyfrp: totals(PremiumField::Fyfrp),
            total_wfyfrp: totals(PremiumField::Wfyfrp),
        };

        sort_by_issued_desc(&mut policies);
        Self { summary, policies }
    }
}

/// Amount with Indian digit grouping, e.g. `₹12,34,567`
pub fn format_amount(amount: i64, symbol: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, last3) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), last3)
    };
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PaymentMode, PolicyStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn issued(id: &str, advisor: &str, mode: PaymentMode, on: NaiveDate, fyfrp: i64) -> Policy {
        let mut p = Policy::new(id);
        p.advisor_name = advisor.into();
        p.mode = Some(mode);
        p.status = Some(PolicyStatus::Issued);
        p.issued_date = Some(on);
        p.fyfrp = fyfrp;
        p.wfyfrp = fyfrp / 2;
        p
    }

    fn book() -> Vec<Policy> {
        let mut pending = Policy::new("P0");
        pending.status = Some(PolicyStatus::Pending);
        pending.advisor_name = "Singh".into();
        vec![
            issued("A1", "Singh", PaymentMode::Monthly, date(2024, 1, 15), 1200),
            issued("A2", "Iyer", PaymentMode::Yearly, date(2023, 4, 10), 8000),
            pending,
        ]
    }

    #[test]
    fn test_overview() {
        let summary = Summary::overview(&book(), date(2024, 4, 20));
        assert_eq!(summary.total_policies, 3);
        assert_eq!(summary.issued_policies, 2);
        // A1: 4 x 1200, A2: 2 x 8000
        assert_eq!(summary.total_fyfrp, 4800 + 16_000);
        assert_eq!(summary.total_wfyfrp, 2400 + 8000);
        assert_eq!(summary.total(PremiumField::Fyfrp), summary.total_fyfrp);
    }

    #[test]
    fn test_detailed_without_criteria_uses_whole_book() {
        let today = date(2024, 4, 20);
        let view = DetailedView::build(&book(), &PolicyFilter::default(), today);
        assert_eq!(view.summary, Summary::overview(&book(), today));
        // Newest issued first, undated last
        let ids: Vec<&str> = view.policies.iter().map(|p| p.application_number.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "P0"]);
    }

    #[test]
    fn test_detailed_with_advisor_totals_filtered_set() {
        let today = date(2024, 4, 20);
        let filter = PolicyFilter { advisor: Some("Singh".into()), ..Default::default() };
        let view = DetailedView::build(&book(), &filter, today);
        assert_eq!(view.summary.total_policies, 2);
        assert_eq!(view.summary.issued_policies, 1);
        assert_eq!(view.summary.total_fyfrp, 4800);
    }

    #[test]
    fn test_detailed_with_month_uses_month_amounts() {
        let today = date(2024, 4, 20);
        let filter = PolicyFilter { month: Some(4), ..Default::default() };
        let view = DetailedView::build(&book(), &filter, today);
        // A1 monthly offset 3, A2 yearly anniversary in April of its second year
        assert_eq!(view.summary.total_policies, 2);
        assert_eq!(view.summary.total_fyfrp, 1200 + 8000);
        assert_eq!(view.summary.total_wfyfrp, 600 + 4000);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0, "₹"), "₹0");
        assert_eq!(format_amount(999, "₹"), "₹999");
        assert_eq!(format_amount(1000, "₹"), "₹1,000");
        assert_eq!(format_amount(123_456, "₹"), "₹1,23,456");
        assert_eq!(format_amount(1_234_567, "₹"), "₹12,34,567");
        assert_eq!(format_amount(-45_000, "Rs "), "-Rs 45,000");
    }
}
