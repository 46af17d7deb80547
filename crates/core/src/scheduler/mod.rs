//! Periodic task descriptions and statistics
//!
//! The host runtime drives the tasks; this module only holds the
//! runtime-agnostic bookkeeping.

pub mod types;

pub use types::{TaskMetadata, TaskStats};
