use super::PolicyStore;
use crate::error::{Result, TrackerError};
use crate::policy::{validate_new_policy, Policy};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Vec-backed store keyed by application number
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    policies: Vec<Policy>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from loaded records. Duplicate application numbers collapse to
    /// the last record seen.
    pub fn from_policies(policies: Vec<Policy>) -> Self {
        let loaded = policies.len();
        let policies = crate::view::dedupe_by_application_number(policies);
        let collapsed = loaded - policies.len();
        if collapsed > 0 {
            log::warn!(
                "Collapsed {} duplicate policy records; only the last record per application number is kept",
                collapsed
            );
        }
        Self { policies }
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn get(&self, application_number: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.application_number == application_number)
    }

    pub fn into_policies(self) -> Vec<Policy> {
        self.policies
    }

    /// Merge `patch` like [`PolicyStore::update`], then re-check the merged
    /// record against the entry rules before storing it. A rejected edit
    /// leaves the store unchanged.
    pub fn edit(&mut self, application_number: &str, patch: Map<String, Value>, today: NaiveDate) -> Result<Policy> {
        let idx = self.position(application_number)?;
        let merged = self.merged(idx, patch)?;
        let checked = validate_new_policy(&merged, today)?;

        log::debug!("Edited policy {}", application_number);
        self.policies[idx] = checked.clone();
        Ok(checked)
    }

    fn position(&self, application_number: &str) -> Result<usize> {
        self.policies
            .iter()
            .position(|p| p.application_number == application_number)
            .ok_or_else(|| TrackerError::NotFound(application_number.to_string()))
    }

    fn merged(&self, idx: usize, patch: Map<String, Value>) -> Result<Policy> {
        let mut merged = match serde_json::to_value(&self.policies[idx])? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if key != "applicationNumber" {
                merged.insert(key, value);
            }
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }
}

impl PolicyStore for InMemoryStore {
    fn list(&self) -> Vec<Policy> {
        self.policies.clone()
    }

    fn create(&mut self, policy: Policy) -> Result<()> {
        if self.get(&policy.application_number).is_some() {
            return Err(TrackerError::Conflict(policy.application_number));
        }
        log::debug!("Created policy {}", policy.application_number);
        self.policies.push(policy);
        Ok(())
    }

    fn update(&mut self, application_number: &str, patch: Map<String, Value>) -> Result<Policy> {
        let idx = self.position(application_number)?;
        let updated = self.merged(idx, patch)?;

        log::debug!("Updated policy {}", application_number);
        self.policies[idx] = updated.clone();
        Ok(updated)
    }

    fn delete(&mut self, application_number: &str) -> Result<Policy> {
        let idx = self.position(application_number)?;
        log::debug!("Deleted policy {}", application_number);
        Ok(self.policies.remove(idx))
    }

    fn delete_all(&mut self) -> usize {
        let count = self.policies.len();
        self.policies.clear();
        log::debug!("Deleted all {} policies", count);
        count
    }
}
