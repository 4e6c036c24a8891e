//! Policy data structures, loading and entry validation

mod data;
mod lenient;
pub mod loader;
pub mod validation;

pub use data::{Policy, PaymentMode, PolicyStatus, PremiumField};
pub use lenient::{parse_amount, parse_date};
pub use loader::{load_policies, load_policies_from_reader, policies_from_values, save_policies, FileFormat};
pub use validation::validate_new_policy;
