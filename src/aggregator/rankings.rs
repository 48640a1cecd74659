//! Rank files by line coverage.
//!
//! Files with no instrumented lines (`lines_found == 0`) have no meaningful
//! coverage and never appear in a ranking. All sorts are ascending by line
//! coverage with the path as tie breaker, so output is deterministic.

use crate::classifier::{is_critical_business_file, Layer};
use crate::parser::FileRecord;
use crate::utils::config::CRITICAL_COVERAGE_CUTOFF;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Urgency of a critical domain file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
}

impl Priority {
    pub fn for_coverage(coverage: f64) -> Self {
        if coverage < CRITICAL_COVERAGE_CUTOFF {
            Priority::Critical
        } else {
            Priority::High
        }
    }
}

fn by_coverage_then_path(a: &&FileRecord, b: &&FileRecord) -> Ordering {
    a.line_coverage()
        .total_cmp(&b.line_coverage())
        .then_with(|| a.path.cmp(&b.path))
}

fn ranked<'a>(records: impl Iterator<Item = &'a FileRecord>) -> Vec<&'a FileRecord> {
    let mut files: Vec<&FileRecord> = records.filter(|r| r.is_rankable()).collect();
    files.sort_by(by_coverage_then_path);
    files
}

/// Files with line coverage strictly below `threshold` percent
pub fn files_below_threshold(records: &[FileRecord], threshold: f64) -> Vec<&FileRecord> {
    ranked(records.iter().filter(|r| r.line_coverage() < threshold))
}

/// Files with found lines but no hit lines, grouped by layer
///
/// Within a layer files are sorted by path.
pub fn zero_coverage_by_layer(records: &[FileRecord]) -> BTreeMap<Layer, Vec<&FileRecord>> {
    let mut groups: BTreeMap<Layer, Vec<&FileRecord>> = BTreeMap::new();

    for record in records
        .iter()
        .filter(|r| r.is_rankable() && r.counters.lines_hit == 0)
    {
        groups.entry(record.layer).or_default().push(record);
    }

    for files in groups.values_mut() {
        files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    groups
}

/// The `limit` lowest-coverage files in a layer
pub fn lowest_coverage_in_layer(
    records: &[FileRecord],
    layer: Layer,
    limit: usize,
) -> Vec<&FileRecord> {
    let mut files = ranked(records.iter().filter(|r| r.layer == layer));
    files.truncate(limit);
    files
}

/// Critical domain files below `target`, lowest first
pub fn critical_domain_files(records: &[FileRecord], target: f64) -> Vec<&FileRecord> {
    ranked(records.iter().filter(|r| {
        r.layer == Layer::Domain && is_critical_business_file(&r.path) && r.line_coverage() < target
    }))
}

/// Files reporting more hits than found items, sorted by path
pub fn incoherent_files(records: &[FileRecord]) -> Vec<&FileRecord> {
    let mut files: Vec<&FileRecord> = records
        .iter()
        .filter(|r| r.counters.is_incoherent())
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
