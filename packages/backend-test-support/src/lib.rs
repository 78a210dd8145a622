//! Backend test support utilities
//!
//! Shared helpers for backend tests: unified logging initialization and
//! unique test-data generation.

pub mod logging;
pub mod unique_helpers;
