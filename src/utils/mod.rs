//! Utility functions module
//!
//! Common utilities for path handling and filesystem removal

pub mod fs;
pub mod path;
