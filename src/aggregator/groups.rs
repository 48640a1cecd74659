//! Fold file records into layer, feature and global totals.
//!
//! Every record lands in exactly one (layer, feature) bucket, so bucket
//! totals always add up to their layer, and layers to the global total.

use crate::classifier::Layer;
use crate::parser::{CoverageCounters, FileRecord};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed counters for a group of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateGroup {
    pub counters: CoverageCounters,
    pub file_count: usize,
}

impl AggregateGroup {
    fn add(&mut self, record: &FileRecord) {
        self.counters += record.counters;
        self.file_count += 1;
    }

    fn merge(&mut self, other: &AggregateGroup) {
        self.counters += other.counters;
        self.file_count += other.file_count;
    }

    pub fn line_coverage(&self) -> f64 {
        self.counters.line_coverage()
    }
}

/// Totals for one feature inside a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureGroup {
    pub feature: String,
    pub totals: AggregateGroup,
}

/// Totals for one layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerBreakdown {
    pub layer: Layer,
    pub totals: AggregateGroup,

    /// Per-feature totals, only when the layer spans more than one feature
    pub features: Vec<FeatureGroup>,
}

/// Result of folding all records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerAggregation {
    pub global: AggregateGroup,

    /// Layers that have at least one file, in display order
    pub layers: Vec<LayerBreakdown>,
}

impl LayerAggregation {
    /// Look up a layer's breakdown
    pub fn layer(&self, layer: Layer) -> Option<&LayerBreakdown> {
        self.layers.iter().find(|b| b.layer == layer)
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.layer(layer).is_some()
    }
}

/// Aggregate records by layer and feature
///
/// **Public** - main entry point for aggregation
///
/// Order of `records` does not matter; the result is sorted by layer
/// display order and feature name.
pub fn aggregate(records: &[FileRecord]) -> LayerAggregation {
    let mut buckets: BTreeMap<Layer, BTreeMap<&str, AggregateGroup>> = BTreeMap::new();

    for record in records {
        buckets
            .entry(record.layer)
            .or_default()
            .entry(record.feature.as_str())
            .or_default()
            .add(record);
    }

    let mut global = AggregateGroup::default();
    let layers: Vec<LayerBreakdown> = buckets
        .into_iter()
        .map(|(layer, features)| {
            let mut totals = AggregateGroup::default();
            for group in features.values() {
                totals.merge(group);
            }
            global.merge(&totals);

            let features = if features.len() > 1 {
                features
                    .into_iter()
                    .map(|(feature, totals)| FeatureGroup {
                        feature: feature.to_string(),
                        totals,
                    })
                    .collect()
            } else {
                Vec::new()
            };

            LayerBreakdown {
                layer,
                totals,
                features,
            }
        })
        .collect();

    debug!(
        "Aggregated {} files into {} layers",
        global.file_count,
        layers.len()
    );

    LayerAggregation { global, layers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, found: u64, hit: u64) -> FileRecord {
        FileRecord::new(path, CoverageCounters::lines(found, hit))
    }

    #[test]
    fn test_aggregate_by_layer() {
        let records = vec![
            record("lib/domain/a.dart", 10, 10),
            record("lib/domain/b.dart", 10, 0),
            record("lib/data/c.dart", 20, 15),
        ];
        let agg = aggregate(&records);

        assert_eq!(agg.global.file_count, 3);
        assert_eq!(agg.global.counters.lines_found, 40);
        assert_eq!(agg.global.counters.lines_hit, 25);

        let domain = agg.layer(Layer::Domain).unwrap();
        assert_eq!(domain.totals.file_count, 2);
        assert_eq!(domain.totals.line_coverage(), 50.0);
        assert!(domain.features.is_empty());

        assert_eq!(agg.layer(Layer::Data).unwrap().totals.line_coverage(), 75.0);
        assert!(!agg.contains(Layer::Presentation));
    }

    #[test]
    fn test_layers_in_display_order() {
        let records = vec![
            record("lib/widgets/x.dart", 1, 1),
            record("lib/presentation/p.dart", 1, 1),
            record("lib/domain/d.dart", 1, 1),
        ];
        let order: Vec<Layer> = aggregate(&records).layers.iter().map(|b| b.layer).collect();
        assert_eq!(order, vec![Layer::Domain, Layer::Presentation, Layer::Other]);
    }

    #[test]
    fn test_feature_breakdown_only_for_multiple_features() {
        let records = vec![
            record("lib/features/alpha/domain/a.dart", 10, 10),
            record("lib/features/beta/domain/b.dart", 10, 5),
            record("lib/features/alpha/data/c.dart", 10, 0),
        ];
        let agg = aggregate(&records);

        let domain = agg.layer(Layer::Domain).unwrap();
        assert_eq!(domain.features.len(), 2);
        assert_eq!(domain.features[0].feature, "alpha");
        assert_eq!(domain.features[0].totals.line_coverage(), 100.0);
        assert_eq!(domain.features[1].feature, "beta");
        assert_eq!(domain.features[1].totals.line_coverage(), 50.0);

        assert!(agg.layer(Layer::Data).unwrap().features.is_empty());
    }

    #[test]
    fn test_conservation() {
        let records = vec![
            record("lib/features/alpha/domain/a.dart", 13, 7),
            record("lib/features/beta/domain/b.dart", 5, 5),
            record("lib/domain/c.dart", 8, 1),
            record("lib/core/network/d.dart", 21, 20),
            record("lib/main.dart", 3, 0),
            record("lib/empty.dart", 0, 0),
        ];
        let agg = aggregate(&records);

        let layer_found: u64 = agg.layers.iter().map(|b| b.totals.counters.lines_found).sum();
        let layer_files: usize = agg.layers.iter().map(|b| b.totals.file_count).sum();
        assert_eq!(layer_found, agg.global.counters.lines_found);
        assert_eq!(layer_files, records.len());

        for breakdown in &agg.layers {
            if breakdown.features.is_empty() {
                continue;
            }
            let found: u64 = breakdown
                .features
                .iter()
                .map(|f| f.totals.counters.lines_found)
                .sum();
            assert_eq!(found, breakdown.totals.counters.lines_found);
        }
    }

    #[test]
    fn test_order_independent() {
        let mut records = vec![
            record("lib/domain/a.dart", 10, 3),
            record("lib/data/b.dart", 7, 7),
            record("lib/features/x/domain/c.dart", 4, 2),
        ];
        let forward = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), forward);
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate(&[]);
        assert_eq!(agg.global, AggregateGroup::default());
        assert!(agg.layers.is_empty());
    }
}
