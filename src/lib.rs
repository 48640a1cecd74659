//! layercov
//!
//! Layer-aware test coverage analysis for LCOV tracefiles.
//!
//! Reads an `lcov.info` file, attributes every source file to an
//! architectural layer (domain, data, presentation, core, app, generated)
//! and a feature, then renders a markdown report of where coverage is
//! missing and what to test next.
//!
//! This crate provides the core implementation for the
//! `layercov` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install layercov
//! flutter test --coverage
//! layercov analyze -i coverage/lcov.info -o coverage_analysis.md
//! ```
//!
//! ## Library use
//!
//! ```ignore
//! use layercov::aggregator::analyze;
//! use layercov::parser::parse_lcov;
//! use layercov::report::render_report;
//! use layercov::utils::config::ReportConfig;
//!
//! let config = ReportConfig::default();
//! let trace = parse_lcov(&content, &config.exclusion_filter()?);
//! let stats = trace.stats;
//! let records = trace.into_records(&config.layout);
//! let analysis = analyze(&records, stats, &config);
//! println!("{}", render_report(&analysis, &config.limits));
//! ```

pub mod aggregator;
pub mod classifier;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
