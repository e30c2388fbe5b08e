//! Health-check classification over the reconciled inventory

mod classifier;
mod types;

pub use classifier::{classify, IssueReport};
pub use types::IssueCategory;
