//! Policy store interface
//!
//! Mirrors the REST collection the dashboard talks to: list, create, update
//! by application number, delete, delete all. `InMemoryStore` backs the CLI,
//! which loads a policy file into it and writes the result back.

mod memory;

pub use memory::InMemoryStore;

use crate::error::Result;
use crate::policy::Policy;
use serde_json::{Map, Value};

pub trait PolicyStore {
    /// All policies in insertion order
    fn list(&self) -> Vec<Policy>;

    /// Add a policy; fails with `Conflict` if the application number exists
    fn create(&mut self, policy: Policy) -> Result<()>;

    /// Merge `patch` fields into the stored policy and return the result.
    ///
    /// Fails with `NotFound` for an unknown application number. The
    /// application number itself is never changed by a patch.
    fn update(&mut self, application_number: &str, patch: Map<String, Value>) -> Result<Policy>;

    /// Remove one policy; fails with `NotFound`
    fn delete(&mut self, application_number: &str) -> Result<Policy>;

    /// Remove everything and return how many policies were dropped
    fn delete_all(&mut self) -> usize;
}
