//! Tracker configuration and the reference-date clock
//!
//! Settings are layered: defaults, then an optional JSON file, then
//! environment variables. Binaries apply their own flags last.

use crate::error::{Result, TrackerError};
use crate::policy::parse_date;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the policy file path
pub const ENV_DATA_PATH: &str = "POLICY_TRACKER_DATA";

/// Environment variable pinning the reference date (YYYY-MM-DD)
pub const ENV_TODAY: &str = "POLICY_TRACKER_TODAY";

/// Source of "today" for every accrual calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local calendar date of the host
    System,
    /// Pinned reference date
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Policy file read and written by the CLI (.json or .csv)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Fixed reference date; `None` uses the system clock
    #[serde(default)]
    pub today: Option<NaiveDate>,

    /// Currency symbol prefixed to formatted totals
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_data_path() -> PathBuf { PathBuf::from("policies.json") }
fn default_currency_symbol() -> String { "₹".to_string() }

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            today: None,
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl TrackerConfig {
    /// Load from an optional JSON file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
            None => Self::default(),
        };
        config.with_overrides(
            std::env::var(ENV_DATA_PATH).ok(),
            std::env::var(ENV_TODAY).ok(),
        )
    }

    /// Apply data path and reference date overrides given as raw strings
    pub fn with_overrides(mut self, data_path: Option<String>, today: Option<String>) -> Result<Self> {
        if let Some(path) = data_path.filter(|p| !p.trim().is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(raw) = today.filter(|t| !t.trim().is_empty()) {
            let date = parse_date(&raw).ok_or(TrackerError::InvalidDate(raw))?;
            self.today = Some(date);
        }
        Ok(self)
    }

    pub fn clock(&self) -> Clock {
        match self.today {
            Some(date) => Clock::Fixed(date),
            None => Clock::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.data_path, PathBuf::from("policies.json"));
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.clock(), Clock::System);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrackerConfig = serde_json::from_str(r#"{"today": "2024-04-20"}"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("policies.json"));
        let today = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        assert_eq!(config.clock(), Clock::Fixed(today));
        assert_eq!(config.clock().today(), today);
    }

    #[test]
    fn test_overrides() {
        let config = TrackerConfig::default()
            .with_overrides(Some("book.csv".into()), Some("2025-01-31".into()))
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("book.csv"));
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2025, 1, 31));

        // Blank overrides are ignored
        let config = TrackerConfig::default()
            .with_overrides(Some("  ".into()), Some(String::new()))
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("policies.json"));
        assert!(config.today.is_none());
    }

    #[test]
    fn test_bad_today_override() {
        let result = TrackerConfig::default().with_overrides(None, Some("someday".into()));
        assert!(matches!(result, Err(TrackerError::InvalidDate(_))));
    }
}
