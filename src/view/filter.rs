//! Detailed-view filtering, search, de-duplication and ordering

use crate::accrual::is_due_in_month;
use crate::error::{Result, TrackerError};
use crate::policy::{PaymentMode, Policy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Criteria for the detailed view; every criterion is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyFilter {
    pub mode: Option<PaymentMode>,
    pub advisor: Option<String>,
    /// Calendar month 1-12 of today's year
    pub month: Option<u32>,
    /// Case-insensitive substring over customer name and identifiers
    pub search: Option<String>,
}

impl PolicyFilter {
    /// Drop blank text criteria and reject out-of-range months
    pub fn normalized(self) -> Result<Self> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(TrackerError::InvalidMonth(month));
            }
        }
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Ok(Self {
            mode: self.mode,
            advisor: non_blank(self.advisor),
            month: self.month,
            search: non_blank(self.search),
        })
    }

    /// No criterion set
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.advisor.as_deref().map_or(true, |a| a.trim().is_empty())
            && self.month.is_none()
            && self.search.as_deref().map_or(true, |s| s.trim().is_empty())
    }

    /// Filter in order mode, advisor, month, search, then keep one record per
    /// application number (the last one seen).
    pub fn apply(&self, policies: &[Policy], today: NaiveDate) -> Vec<Policy> {
        let search = self
            .search
            .as_deref()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.trim().is_empty());
        let advisor = self.advisor.as_deref().filter(|a| !a.trim().is_empty());

        let matched: Vec<Policy> = policies
            .iter()
            .filter(|p| self.mode.map_or(true, |mode| p.mode == Some(mode)))
            .filter(|p| advisor.map_or(true, |a| p.advisor_name == a))
            .filter(|p| self.month.map_or(true, |month| is_due_in_month(p, month, today)))
            .filter(|p| search.as_deref().map_or(true, |needle| matches_search(p, needle)))
            .cloned()
            .collect();

        let result = dedupe_by_application_number(matched);
        log::debug!("Filter matched {} of {} policies", result.len(), policies.len());
        result
    }
}

/// `needle` must already be lowercase
fn matches_search(policy: &Policy, needle: &str) -> bool {
    policy.customer_name.to_lowercase().contains(needle)
        || policy
            .policy_number
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle))
        || policy.application_number.to_lowercase().contains(needle)
}

/// One record per application number. A later duplicate replaces the
/// earlier one in the earlier one's position.
pub fn dedupe_by_application_number(policies: Vec<Policy>) -> Vec<Policy> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(policies.len());
    let mut unique: Vec<Policy> = Vec::with_capacity(policies.len());
    for policy in policies {
        match slots.get(&policy.application_number) {
            Some(&slot) => unique[slot] = policy,
            None => {
                slots.insert(policy.application_number.clone(), unique.len());
                unique.push(policy);
            }
        }
    }
    unique
}

/// Distinct non-empty advisor names in first-seen order
pub fn advisors(policies: &[Policy]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for policy in policies {
        let name = policy.advisor_name.as_str();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Newest issued first; policies without an issued date go last
pub fn sort_by_issued_desc(policies: &mut [Policy]) {
    policies.sort_by_key(|p| (p.issued_date.is_none(), Reverse(p.issued_date)));
}
