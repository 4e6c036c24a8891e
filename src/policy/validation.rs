//! Entry rules for new policies

use super::{Policy, PolicyStatus};
use crate::error::{Result, TrackerError};
use chrono::NaiveDate;

/// Check a new policy against the entry rules and return it normalized.
///
/// Rules are checked in order and the first failure is reported. A policy
/// that is not Issued has its issued date cleared.
pub fn validate_new_policy(policy: &Policy, today: NaiveDate) -> Result<Policy> {
    let issued = policy.status == Some(PolicyStatus::Issued);

    let required: [(&str, bool); 6] = [
        ("applicationNumber", !policy.application_number.trim().is_empty()),
        ("customerName", !policy.customer_name.trim().is_empty()),
        ("advisorName", !policy.advisor_name.trim().is_empty()),
        ("planName", !policy.plan_name.trim().is_empty()),
        ("mode", policy.mode.is_some()),
        ("status", policy.status.is_some()),
    ];
    for (field, present) in required {
        if !present {
            return Err(missing(field));
        }
    }
    if issued && policy.issued_date.is_none() {
        return Err(missing("issuedDate"));
    }

    if let Some(login) = policy.login_date {
        if login > today {
            return Err(TrackerError::Validation("Login date cannot be in the future.".into()));
        }
    }

    if issued {
        if let Some(issued_date) = policy.issued_date {
            if issued_date > today {
                return Err(TrackerError::Validation("Issued date cannot be in the future.".into()));
            }
            if policy.login_date.is_some_and(|login| issued_date < login) {
                return Err(TrackerError::Validation("Issued date cannot be before login date.".into()));
            }
        }
    }

    let mut normalized = policy.clone();
    if !issued {
        normalized.issued_date = None;
    }
    Ok(normalized)
}

fn missing(field: &str) -> TrackerError {
    TrackerError::Validation(format!("Please fill {}", title_case(field)))
}

/// "applicationNumber" -> "Application Number"
fn title_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}
