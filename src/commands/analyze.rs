//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Resolves settings (defaults, optional TOML file, CLI overrides)
//! 2. Reads and parses the LCOV tracefile
//! 3. Classifies every file into a layer and feature
//! 4. Aggregates and ranks coverage
//! 5. Renders the markdown report
//! 6. Writes output files

use crate::aggregator::{analyze, CoverageAnalysis};
use crate::output::{write_analysis, write_report};
use crate::parser::{parse_lcov, ExclusionPattern};
use crate::report::{render_report, render_terminal_summary};
use crate::utils::config::{load_config, ReportConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::utils::error::AnalyzeError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// LCOV tracefile to read
    pub input: PathBuf,

    /// Markdown report destination
    pub output: PathBuf,

    /// Optional JSON summary destination
    pub output_json: Option<PathBuf>,

    /// Overrides the configured low-coverage threshold
    pub threshold: Option<f64>,

    /// Optional `layercov.toml`
    pub config_path: Option<PathBuf>,

    /// Extra exclusion regexes, appended to the configured list
    pub extra_excludes: Vec<String>,

    /// Drop the configured exclusion list before adding `extra_excludes`
    pub no_default_excludes: bool,

    /// Fail when global line coverage is below this percent
    pub fail_under: Option<f64>,

    /// Do not echo the report to stdout
    pub quiet: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            output_json: None,
            threshold: None,
            config_path: None,
            extra_excludes: Vec::new(),
            no_default_excludes: false,
            fail_under: None,
            quiet: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The finished analysis, after the report (and JSON summary, if requested)
/// has been written
///
/// # Errors
/// * `AnalyzeError::InputNotFound` - tracefile does not exist
/// * `AnalyzeError::EmptyResult` - no record with instrumented lines survives exclusion
/// * `AnalyzeError::BelowFailUnder` - `--fail-under` not met
/// * Config and output errors, with context
pub fn execute_analyze(args: AnalyzeArgs) -> Result<CoverageAnalysis> {
    let start_time = Instant::now();

    info!("Starting coverage analysis of: {}", args.input.display());

    // Step 1: Resolve settings
    info!("Step 1/5: Loading settings...");
    let config = resolve_config(&args)?;
    let filter = config
        .exclusion_filter()
        .context("Failed to compile exclusion patterns")?;

    debug!(
        "Threshold {:.1}%, {} exclusion patterns",
        config.threshold,
        filter.len()
    );

    // Step 2: Read and parse
    info!("Step 2/5: Parsing LCOV data...");
    if !args.input.is_file() {
        return Err(AnalyzeError::InputNotFound(args.input.clone()).into());
    }
    let content = std::fs::read_to_string(&args.input)
        .map_err(AnalyzeError::ReadFailed)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let trace = parse_lcov(&content, &filter);
    let stats = trace.stats;

    if stats.malformed_lines > 0 || stats.dropped_records > 0 {
        warn!(
            "Skipped {} malformed lines and {} unterminated records",
            stats.malformed_lines, stats.dropped_records
        );
    }

    // Files without instrumented lines carry no coverage data
    if !trace.has_line_data() {
        return Err(AnalyzeError::EmptyResult {
            records: stats.records,
            excluded: stats.excluded,
        }
        .into());
    }

    // Step 3: Classify
    info!("Step 3/5: Classifying {} files...", trace.files.len());
    let records = trace.into_records(&config.layout);

    // Step 4: Aggregate
    info!("Step 4/5: Aggregating coverage...");
    let mut analysis = analyze(&records, stats, &config);
    analysis.source = args.input.display().to_string();

    info!(
        "Overall line coverage: {:.1}% across {} files",
        analysis.line_coverage(),
        analysis.files_analyzed()
    );

    // Step 5: Render and write
    info!("Step 5/5: Writing report...");
    let report = render_report(&analysis, &config.limits);

    write_report(&report, &args.output).context("Failed to write markdown report")?;
    info!("✓ Report written to: {}", args.output.display());

    if let Some(json_path) = &args.output_json {
        write_analysis(&analysis, json_path).context("Failed to write JSON summary")?;
        info!("✓ JSON summary written to: {}", json_path.display());
    }

    if !args.quiet {
        println!("{}", report);
    }
    println!("{}", render_terminal_summary(&analysis));

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    if let Some(required) = args.fail_under {
        let actual = analysis.line_coverage();
        if actual < required {
            return Err(AnalyzeError::BelowFailUnder { actual, required }.into());
        }
    }

    Ok(analysis)
}

/// Merge defaults, the optional config file and CLI overrides
///
/// **Private** - internal helper for execute_analyze
fn resolve_config(args: &AnalyzeArgs) -> Result<ReportConfig> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }

    if args.no_default_excludes {
        config.exclude.clear();
    }

    config.exclude.extend(
        args.extra_excludes
            .iter()
            .map(|pattern| ExclusionPattern::new(pattern.as_str(), "")),
    );

    config.validate().context("Invalid analysis settings")?;

    Ok(config)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if let Some(json_path) = &args.output_json {
        if json_path == &args.output {
            anyhow::bail!("JSON summary path must differ from the report path");
        }
    }

    for (name, value) in [("threshold", args.threshold), ("fail-under", args.fail_under)] {
        if let Some(value) = value {
            if !(0.0..=100.0).contains(&value) {
                anyhow::bail!("{} must be between 0 and 100 (got {})", name, value);
            }
        }
    }

    Ok(())
}
