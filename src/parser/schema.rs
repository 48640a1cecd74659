//! Coverage data types shared by the parser, aggregator and report.

use crate::classifier::{extract_feature, Layer, LayerClassifier};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Raw coverage counters for one file or group
///
/// Counters are taken as reported. `hit > found` is passed through and shows
/// up as a percentage above 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCounters {
    pub lines_found: u64,
    pub lines_hit: u64,
    pub functions_found: u64,
    pub functions_hit: u64,
    pub branches_found: u64,
    pub branches_hit: u64,
}

impl CoverageCounters {
    /// Counters with only line data
    pub fn lines(found: u64, hit: u64) -> Self {
        Self {
            lines_found: found,
            lines_hit: hit,
            ..Default::default()
        }
    }

    /// Line coverage in percent (0 when no lines were found)
    pub fn line_coverage(&self) -> f64 {
        percentage(self.lines_hit, self.lines_found)
    }

    /// Function coverage in percent (0 when no functions were found)
    pub fn function_coverage(&self) -> f64 {
        percentage(self.functions_hit, self.functions_found)
    }

    /// Branch coverage in percent (0 when no branches were found)
    pub fn branch_coverage(&self) -> f64 {
        percentage(self.branches_hit, self.branches_found)
    }

    /// Lines found but never executed
    pub fn lines_missing(&self) -> u64 {
        self.lines_found.saturating_sub(self.lines_hit)
    }

    /// True when any hit counter exceeds its found counter
    pub fn is_incoherent(&self) -> bool {
        self.lines_hit > self.lines_found
            || self.functions_hit > self.functions_found
            || self.branches_hit > self.branches_found
    }
}

// Saturates at u64::MAX
impl AddAssign for CoverageCounters {
    fn add_assign(&mut self, other: Self) {
        self.lines_found = self.lines_found.saturating_add(other.lines_found);
        self.lines_hit = self.lines_hit.saturating_add(other.lines_hit);
        self.functions_found = self.functions_found.saturating_add(other.functions_found);
        self.functions_hit = self.functions_hit.saturating_add(other.functions_hit);
        self.branches_found = self.branches_found.saturating_add(other.branches_found);
        self.branches_hit = self.branches_hit.saturating_add(other.branches_hit);
    }
}

impl Add for CoverageCounters {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for CoverageCounters {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a CoverageCounters> for CoverageCounters {
    fn sum<I: Iterator<Item = &'a CoverageCounters>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Coverage of one source file, classified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as written in the tracefile
    pub path: String,

    pub counters: CoverageCounters,

    pub layer: Layer,

    pub feature: String,
}

impl FileRecord {
    /// Build a record, classifying the path with the given layout
    pub fn classify(
        path: impl Into<String>,
        counters: CoverageCounters,
        classifier: &LayerClassifier,
    ) -> Self {
        let path = path.into();
        let layer = classifier.classify(&path);
        let feature = extract_feature(&path);
        Self {
            path,
            counters,
            layer,
            feature,
        }
    }

    /// Build a record using the default layout
    pub fn new(path: impl Into<String>, counters: CoverageCounters) -> Self {
        Self::classify(path, counters, &LayerClassifier::default())
    }

    pub fn line_coverage(&self) -> f64 {
        self.counters.line_coverage()
    }

    /// Files with no instrumented lines have no meaningful ratio
    pub fn is_rankable(&self) -> bool {
        self.counters.lines_found > 0
    }
}

fn percentage(hit: u64, found: u64) -> f64 {
    if found == 0 {
        0.0
    } else {
        (hit as f64 / found as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages() {
        let counters = CoverageCounters {
            lines_found: 10,
            lines_hit: 5,
            functions_found: 4,
            functions_hit: 1,
            branches_found: 0,
            branches_hit: 0,
        };
        assert_eq!(counters.line_coverage(), 50.0);
        assert_eq!(counters.function_coverage(), 25.0);
        assert_eq!(counters.branch_coverage(), 0.0);
        assert_eq!(counters.lines_missing(), 5);
    }

    #[test]
    fn test_zero_found_is_zero_percent() {
        assert_eq!(CoverageCounters::default().line_coverage(), 0.0);
    }

    #[test]
    fn test_incoherent_counters_pass_through() {
        let counters = CoverageCounters::lines(10, 12);
        assert!(counters.is_incoherent());
        assert_eq!(counters.line_coverage(), 120.0);
        assert_eq!(counters.lines_missing(), 0);
    }

    #[test]
    fn test_sum_is_componentwise() {
        let a = CoverageCounters {
            lines_found: 10,
            lines_hit: 5,
            functions_found: 2,
            functions_hit: 1,
            branches_found: 4,
            branches_hit: 3,
        };
        let b = CoverageCounters::lines(20, 20);
        let total: CoverageCounters = [a, b].iter().sum();
        assert_eq!(total.lines_found, 30);
        assert_eq!(total.lines_hit, 25);
        assert_eq!(total.functions_found, 2);
        assert_eq!(total.branches_hit, 3);
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn test_sum_saturates() {
        let big = CoverageCounters::lines(u64::MAX, u64::MAX - 1);
        let total: CoverageCounters = [big, big, CoverageCounters::lines(1, 1)].iter().sum();
        assert_eq!(total.lines_found, u64::MAX);
        assert_eq!(total.lines_hit, u64::MAX);
    }

    #[test]
    fn test_file_record_classification() {
        let record = FileRecord::new(
            "lib/features/alpha/domain/usecases/login.dart",
            CoverageCounters::lines(10, 0),
        );
        assert_eq!(record.layer, Layer::Domain);
        assert_eq!(record.feature, "alpha");
        assert!(record.is_rankable());
    }
}
