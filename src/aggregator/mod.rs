//! Aggregation of file records into grouped totals and rankings.
//!
//! This module transforms classified file records into:
//! - Global, per-layer and per-feature totals
//! - Rankings (below threshold, zero coverage, lowest per layer)
//! - The `CoverageAnalysis` consumed by the report and JSON output

pub mod analysis;
pub mod groups;
pub mod rankings;

// Re-export main types and functions
pub use analysis::{
    analyze, CoverageAnalysis, CriticalDomainSummary, CriticalFile, LayerFiles, LayerTarget,
};
pub use groups::{aggregate, AggregateGroup, FeatureGroup, LayerAggregation, LayerBreakdown};
pub use rankings::{
    critical_domain_files, files_below_threshold, incoherent_files, lowest_coverage_in_layer,
    zero_coverage_by_layer, Priority,
};
