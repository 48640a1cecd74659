//! LCOV tracefile parser.
//!
//! A tracefile is a sequence of records, one per source file:
//!
//! ```text
//! SF:lib/domain/user.dart
//! FNF:3
//! FNH:2
//! DA:1,1
//! LF:10
//! LH:8
//! BRF:4
//! BRH:1
//! end_of_record
//! ```
//!
//! Only the summary counters are consumed. Per-line detail (`DA:`, `FN:`,
//! `FNDA:`, `BRDA:`) and test names (`TN:`) are skipped.

use super::exclusion::ExclusionFilter;
use super::schema::{CoverageCounters, FileRecord};
use crate::classifier::LayerClassifier;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SOURCE_FILE_TAG: &str = "SF:";
const END_OF_RECORD: &str = "end_of_record";

/// Which counter a tagged line feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CounterField {
    LinesFound,
    LinesHit,
    FunctionsFound,
    FunctionsHit,
    BranchesFound,
    BranchesHit,
}

/// Counter tags. `FF:`/`FH:` are older spellings of `FNF:`/`FNH:`.
const COUNTER_TAGS: &[(&str, CounterField)] = &[
    ("LF:", CounterField::LinesFound),
    ("LH:", CounterField::LinesHit),
    ("FNF:", CounterField::FunctionsFound),
    ("FNH:", CounterField::FunctionsHit),
    ("FF:", CounterField::FunctionsFound),
    ("FH:", CounterField::FunctionsHit),
    ("BRF:", CounterField::BranchesFound),
    ("BRH:", CounterField::BranchesHit),
];

/// A single tracefile line, classified
#[derive(Debug, Clone, PartialEq, Eq)]
enum TraceLine<'a> {
    /// `SF:<path>`
    SourceFile(&'a str),
    /// Counter line; `None` when the value is not an integer
    Counter(CounterField, Option<u64>),
    EndOfRecord,
    Ignored,
}

fn classify_line(line: &str) -> TraceLine<'_> {
    if let Some(path) = line.strip_prefix(SOURCE_FILE_TAG) {
        return TraceLine::SourceFile(path.trim());
    }
    if line == END_OF_RECORD {
        return TraceLine::EndOfRecord;
    }
    COUNTER_TAGS
        .iter()
        .find_map(|(tag, field)| {
            line.strip_prefix(tag)
                .map(|value| TraceLine::Counter(*field, value.trim().parse::<u64>().ok()))
        })
        .unwrap_or(TraceLine::Ignored)
}

impl CoverageCounters {
    fn set(&mut self, field: CounterField, value: u64) {
        let slot = match field {
            CounterField::LinesFound => &mut self.lines_found,
            CounterField::LinesHit => &mut self.lines_hit,
            CounterField::FunctionsFound => &mut self.functions_found,
            CounterField::FunctionsHit => &mut self.functions_hit,
            CounterField::BranchesFound => &mut self.branches_found,
            CounterField::BranchesHit => &mut self.branches_hit,
        };
        *slot = value;
    }
}

/// What happened during a parse pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Complete records seen (`SF:` through `end_of_record`), before exclusion
    pub records: usize,

    /// Records dropped by the exclusion filter
    pub excluded: usize,

    /// Records whose path had already been seen and were summed into it
    pub duplicates_merged: usize,

    /// Counter lines whose value could not be parsed
    pub malformed_lines: usize,

    /// Records never closed by `end_of_record`
    pub dropped_records: usize,
}

/// Parser output: counters per file, ordered by path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTrace {
    pub files: BTreeMap<String, CoverageCounters>,
    pub stats: ParseStats,
}

impl ParsedTrace {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True when at least one file has instrumented lines
    pub fn has_line_data(&self) -> bool {
        self.files.values().any(|c| c.lines_found > 0)
    }

    /// Attach layer and feature to every file
    pub fn into_records(self, classifier: &LayerClassifier) -> Vec<FileRecord> {
        self.files
            .into_iter()
            .map(|(path, counters)| FileRecord::classify(path, counters, classifier))
            .collect()
    }
}

/// Parser state for one pass
///
/// `current` is `Some` while a record is open.
struct ParseState<'f> {
    filter: &'f ExclusionFilter,
    current: Option<(String, CoverageCounters)>,
    trace: ParsedTrace,
}

impl<'f> ParseState<'f> {
    fn new(filter: &'f ExclusionFilter) -> Self {
        Self {
            filter,
            current: None,
            trace: ParsedTrace::default(),
        }
    }

    fn process_line(&mut self, line_no: usize, line: TraceLine<'_>) {
        match line {
            TraceLine::SourceFile(path) => {
                if let Some((open, _)) = self.current.take() {
                    warn!(
                        "Line {}: record for '{}' has no end_of_record, dropping it",
                        line_no, open
                    );
                    self.trace.stats.dropped_records += 1;
                }
                self.current = Some((path.to_string(), CoverageCounters::default()));
            }
            TraceLine::Counter(field, value) => {
                let Some((path, counters)) = self.current.as_mut() else {
                    debug!("Line {}: counter outside of a record, ignoring", line_no);
                    return;
                };
                match value {
                    Some(value) => counters.set(field, value),
                    None => {
                        warn!(
                            "Line {}: malformed {:?} value in record for '{}', skipping",
                            line_no, field, path
                        );
                        self.trace.stats.malformed_lines += 1;
                    }
                }
            }
            TraceLine::EndOfRecord => {
                if let Some((path, counters)) = self.current.take() {
                    self.emit(path, counters);
                }
            }
            TraceLine::Ignored => {}
        }
    }

    fn emit(&mut self, path: String, counters: CoverageCounters) {
        if path.is_empty() {
            debug!("Skipping record with empty source path");
            return;
        }

        self.trace.stats.records += 1;

        if self.filter.is_excluded(&path) {
            debug!("Excluding {}", path);
            self.trace.stats.excluded += 1;
            return;
        }

        // Duplicate paths come from merged traces: sum them
        if let Some(existing) = self.trace.files.get_mut(&path) {
            debug!("Merging duplicate record for {}", path);
            *existing += counters;
            self.trace.stats.duplicates_merged += 1;
        } else {
            self.trace.files.insert(path, counters);
        }
    }

    fn finish(mut self) -> ParsedTrace {
        if let Some((path, _)) = self.current.take() {
            warn!(
                "Tracefile ended inside the record for '{}', dropping it",
                path
            );
            self.trace.stats.dropped_records += 1;
        }
        self.trace
    }
}

/// Parse LCOV tracefile text
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `content` - Full tracefile text
/// * `filter` - Files matching this filter are dropped
///
/// # Returns
/// Counters per non-excluded file. Never fails: malformed lines are
/// skipped and counted in `ParseStats`.
pub fn parse_lcov(content: &str, filter: &ExclusionFilter) -> ParsedTrace {
    let mut state = ParseState::new(filter);

    for (index, raw) in content.lines().enumerate() {
        state.process_line(index + 1, classify_line(raw.trim()));
    }

    let trace = state.finish();

    debug!(
        "Parsed {} records ({} kept, {} excluded, {} merged, {} malformed lines)",
        trace.stats.records,
        trace.files.len(),
        trace.stats.excluded,
        trace.stats.duplicates_merged,
        trace.stats.malformed_lines
    );

    trace
}
