//! Assemble everything the report needs into one serializable value.

use super::groups::{aggregate, LayerAggregation};
use super::rankings::{
    critical_domain_files, files_below_threshold, incoherent_files, lowest_coverage_in_layer,
    zero_coverage_by_layer, Priority,
};
use crate::classifier::{is_critical_business_file, Layer};
use crate::parser::{FileRecord, ParseStats};
use crate::utils::config::{ReportConfig, PRIORITY_LAYERS, SCHEMA_VERSION};
use chrono::Utc;
use log::{debug, warn};
use serde::Serialize;

/// Files of one layer, in ranking order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerFiles {
    pub layer: Layer,
    pub files: Vec<FileRecord>,
}

/// A critical domain file below the domain target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalFile {
    pub record: FileRecord,
    pub priority: Priority,
}

/// Deep dive into business-logic files of the domain layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalDomainSummary {
    pub total_domain_files: usize,
    pub critical_files: usize,
    pub target: f64,
    pub below_target: Vec<CriticalFile>,
}

/// A layer measured against its target
///
/// Layers without a configured target are held to the global threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerTarget {
    pub layer: Layer,
    pub current: f64,
    pub target: f64,

    /// False when `target` is the global threshold fallback
    pub configured: bool,
}

impl LayerTarget {
    pub fn is_met(&self) -> bool {
        self.current >= self.target
    }

    /// Percentage points missing to reach the target
    pub fn gap(&self) -> f64 {
        (self.target - self.current).max(0.0)
    }
}

/// Full analysis of one tracefile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageAnalysis {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the analysis was generated
    pub generated_at: String,

    /// Where the trace came from (usually the tracefile path)
    pub source: String,

    /// Low-coverage threshold used for rankings
    pub threshold: f64,

    pub totals: LayerAggregation,

    /// Every rankable file below the threshold, lowest first
    pub below_threshold: Vec<FileRecord>,

    /// Zero-coverage files per layer, layers in display order
    pub zero_coverage: Vec<LayerFiles>,

    /// Lowest-coverage files for each priority layer present
    pub lowest_by_layer: Vec<LayerFiles>,

    /// Cap applied to each `lowest_by_layer` list
    pub lowest_limit: usize,

    /// Present only when the trace has domain files
    pub critical_domain: Option<CriticalDomainSummary>,

    /// Every present layer against its target, in display order
    pub targets: Vec<LayerTarget>,

    /// Paths whose hit counters exceed their found counters
    pub incoherent: Vec<String>,

    /// Labels of the exclusion rules in effect
    pub excluded_patterns: Vec<String>,

    pub parse_stats: ParseStats,
}

impl CoverageAnalysis {
    /// Overall line coverage in percent
    pub fn line_coverage(&self) -> f64 {
        self.totals.global.line_coverage()
    }

    pub fn files_analyzed(&self) -> usize {
        self.totals.global.file_count
    }

    pub fn meets_threshold(&self) -> bool {
        self.line_coverage() >= self.threshold
    }

    /// Total number of zero-coverage files across layers
    pub fn zero_coverage_count(&self) -> usize {
        self.zero_coverage.iter().map(|g| g.files.len()).sum()
    }
}

/// Build the full analysis from classified records
///
/// **Public** - main entry point used by the analyze command
///
/// # Arguments
/// * `records` - One record per non-excluded file
/// * `parse_stats` - Statistics from the parse pass
/// * `config` - Threshold, targets and limits
pub fn analyze(
    records: &[FileRecord],
    parse_stats: ParseStats,
    config: &ReportConfig,
) -> CoverageAnalysis {
    let totals = aggregate(records);

    let below_threshold = owned(files_below_threshold(records, config.threshold));

    let zero_coverage = zero_coverage_by_layer(records)
        .into_iter()
        .map(|(layer, files)| LayerFiles {
            layer,
            files: owned(files),
        })
        .collect();

    let lowest_by_layer = PRIORITY_LAYERS
        .iter()
        .filter(|layer| totals.contains(**layer))
        .map(|&layer| LayerFiles {
            layer,
            files: owned(lowest_coverage_in_layer(
                records,
                layer,
                config.limits.lowest_per_layer,
            )),
        })
        .collect();

    let critical_domain = totals
        .layer(Layer::Domain)
        .map(|domain| summarize_critical_domain(records, domain.totals.file_count, config));

    let targets = totals
        .layers
        .iter()
        .map(|breakdown| {
            let configured = config.target_for(breakdown.layer);
            LayerTarget {
                layer: breakdown.layer,
                current: breakdown.totals.line_coverage(),
                target: configured.unwrap_or(config.threshold),
                configured: configured.is_some(),
            }
        })
        .collect();

    let incoherent: Vec<String> = incoherent_files(records)
        .into_iter()
        .map(|r| r.path.clone())
        .collect();
    for path in &incoherent {
        warn!("{}: hit counters exceed found counters", path);
    }

    debug!(
        "Analysis: {} files, {:.1}% line coverage, {} below {:.1}%",
        totals.global.file_count,
        totals.global.line_coverage(),
        below_threshold.len(),
        config.threshold
    );

    CoverageAnalysis {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        source: String::new(),
        threshold: config.threshold,
        totals,
        below_threshold,
        zero_coverage,
        lowest_by_layer,
        lowest_limit: config.limits.lowest_per_layer,
        critical_domain,
        targets,
        incoherent,
        excluded_patterns: config.exclude.iter().map(|p| p.label().to_string()).collect(),
        parse_stats,
    }
}

fn summarize_critical_domain(
    records: &[FileRecord],
    total_domain_files: usize,
    config: &ReportConfig,
) -> CriticalDomainSummary {
    let target = config.target_for(Layer::Domain).unwrap_or(config.threshold);

    let critical_files = records
        .iter()
        .filter(|r| r.layer == Layer::Domain && is_critical_business_file(&r.path))
        .count();

    let below_target = critical_domain_files(records, target)
        .into_iter()
        .map(|record| CriticalFile {
            priority: Priority::for_coverage(record.line_coverage()),
            record: record.clone(),
        })
        .collect();

    CriticalDomainSummary {
        total_domain_files,
        critical_files,
        target,
        below_target,
    }
}

fn owned(files: Vec<&FileRecord>) -> Vec<FileRecord> {
    files.into_iter().cloned().collect()
}
