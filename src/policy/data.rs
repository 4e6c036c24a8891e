//! Policy record and its enumerations

use super::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Premium payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    Monthly,
    Quarterly,
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
    Yearly,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Monthly,
        PaymentMode::Quarterly,
        PaymentMode::HalfYearly,
        PaymentMode::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Monthly => "Monthly",
            PaymentMode::Quarterly => "Quarterly",
            PaymentMode::HalfYearly => "Half-Yearly",
            PaymentMode::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    /// Exact labels as stored by the dashboard ("Half-Yearly", not "half yearly")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| format!("unknown payment mode '{}'", s))
    }
}

/// Application lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    Pending,
    Rejected,
    Issued,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "Pending",
            PolicyStatus::Rejected => "Rejected",
            PolicyStatus::Issued => "Issued",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PolicyStatus::Pending),
            "rejected" => Ok(PolicyStatus::Rejected),
            "issued" => Ok(PolicyStatus::Issued),
            _ => Err(format!("unknown policy status '{}'", s)),
        }
    }
}

/// Monetary field a total is taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumField {
    /// First-year regular premium
    Fyfrp,
    /// Whole first-year regular premium
    Wfyfrp,
}

impl PremiumField {
    pub const ALL: [PremiumField; 2] = [PremiumField::Fyfrp, PremiumField::Wfyfrp];

    pub fn value(&self, policy: &Policy) -> i64 {
        match self {
            PremiumField::Fyfrp => policy.fyfrp,
            PremiumField::Wfyfrp => policy.wfyfrp,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PremiumField::Fyfrp => "FYFRP",
            PremiumField::Wfyfrp => "WFYFRP",
        }
    }
}

/// A single insurance policy record
///
/// Field names follow the store's camelCase JSON. Every field except the
/// application number is read leniently: bad amounts become 0, bad dates and
/// unrecognized modes become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Primary key, unique across the book
    #[serde(deserialize_with = "lenient::identifier")]
    pub application_number: String,

    #[serde(default, deserialize_with = "lenient::optional_identifier")]
    pub policy_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_name: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub advisor_name: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub plan_name: String,

    #[serde(default, deserialize_with = "lenient::mode")]
    pub mode: Option<PaymentMode>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub fyfrp: i64,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub wfyfrp: i64,

    /// Start of premium accrual; absent policies never accrue
    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub issued_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::optional_date")]
    pub login_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient::status")]
    pub status: Option<PolicyStatus>,
}

impl Policy {
    /// Blank policy with only the key set
    pub fn new(application_number: impl Into<String>) -> Self {
        Self {
            application_number: application_number.into(),
            policy_number: None,
            customer_name: String::new(),
            advisor_name: String::new(),
            plan_name: String::new(),
            mode: None,
            fyfrp: 0,
            wfyfrp: 0,
            issued_date: None,
            login_date: None,
            status: None,
        }
    }

    pub fn is_issued(&self) -> bool {
        self.status == Some(PolicyStatus::Issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        assert_eq!("Half-Yearly".parse::<PaymentMode>(), Ok(PaymentMode::HalfYearly));
        assert_eq!(" Monthly ".parse::<PaymentMode>(), Ok(PaymentMode::Monthly));
        assert!("Weekly".parse::<PaymentMode>().is_err());
        assert_eq!(PaymentMode::HalfYearly.to_string(), "Half-Yearly");
    }

    #[test]
    fn test_status_case_insensitive() {
        assert_eq!("issued".parse::<PolicyStatus>(), Ok(PolicyStatus::Issued));
        assert_eq!("PENDING".parse::<PolicyStatus>(), Ok(PolicyStatus::Pending));
        assert!("lapsed".parse::<PolicyStatus>().is_err());
    }

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{
            "applicationNumber": 50021,
            "policyNumber": 99110022,
            "customerName": "Ravi Sharma",
            "advisorName": "A. Kumar",
            "planName": "Term Plus",
            "mode": "Half-Yearly",
            "fyfrp": "12000",
            "wfyfrp": 15000.7,
            "issuedDate": "2024-01-15",
            "loginDate": "2024-01-02",
            "status": "Issued",
            "createdAt": "Mon, 15 Jan 2024 10:12:00 GMT"
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.application_number, "50021");
        assert_eq!(policy.policy_number.as_deref(), Some("99110022"));
        assert_eq!(policy.mode, Some(PaymentMode::HalfYearly));
        assert_eq!(policy.fyfrp, 12000);
        assert_eq!(policy.wfyfrp, 15000);
        assert_eq!(policy.issued_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(policy.is_issued());
    }

    #[test]
    fn test_deserialize_degrades() {
        let json = r#"{
            "applicationNumber": "A-1",
            "customerName": null,
            "mode": "Fortnightly",
            "fyfrp": "n/a",
            "issuedDate": "",
            "status": "unknown"
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.customer_name, "");
        assert_eq!(policy.mode, None);
        assert_eq!(policy.fyfrp, 0);
        assert_eq!(policy.wfyfrp, 0);
        assert_eq!(policy.issued_date, None);
        assert_eq!(policy.status, None);
    }

    #[test]
    fn test_missing_application_number_rejected() {
        let result: Result<Policy, _> = serde_json::from_str(r#"{"customerName": "X"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_camel_case() {
        let mut policy = Policy::new("A-9");
        policy.mode = Some(PaymentMode::HalfYearly);
        policy.issued_date = NaiveDate::from_ymd_opt(2024, 3, 5);
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(value["applicationNumber"], "A-9");
        assert_eq!(value["mode"], "Half-Yearly");
        assert_eq!(value["issuedDate"], "2024-03-05");
        assert!(value["loginDate"].is_null());

        let back: Policy = serde_json::from_value(value).unwrap();
        assert_eq!(back, policy);
    }

    #[test]
    fn test_premium_field_value() {
        let mut policy = Policy::new("A-1");
        policy.fyfrp = 100;
        policy.wfyfrp = 250;
        assert_eq!(PremiumField::Fyfrp.value(&policy), 100);
        assert_eq!(PremiumField::Wfyfrp.value(&policy), 250);
        assert_eq!(PremiumField::Wfyfrp.label(), "WFYFRP");
    }
}
