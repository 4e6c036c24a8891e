//! Dashboard and detailed-view presentation logic

pub mod filter;
mod summary;

pub use filter::{advisors, dedupe_by_application_number, sort_by_issued_desc, PolicyFilter};
pub use summary::{format_amount, DetailedView, Summary};
