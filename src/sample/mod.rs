//! Filename classification and sample grouping

pub mod aggregate;
pub mod classify;

pub use aggregate::{aggregate, list_file_names, scan_directory};
pub use classify::{classify, is_eligible, matching_slots, Classification};
