//! Tracefile parsing and coverage data types.
//!
//! This module handles:
//! - Parsing LCOV tracefiles into per-file counters
//! - Dropping files that match exclusion patterns
//! - Defining the counter and record types used downstream

pub mod exclusion;
pub mod lcov;
pub mod schema;

// Re-export main types
pub use exclusion::{ExclusionFilter, ExclusionPattern};
pub use lcov::{parse_lcov, ParseStats, ParsedTrace};
pub use schema::{CoverageCounters, FileRecord};
