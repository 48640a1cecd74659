//! Configuration and constants for the CLI.
//!
//! Defaults live here as constants. A `layercov.toml` file can override
//! any of them; command-line flags override the file.

use crate::classifier::{Layer, LayerClassifier};
use crate::parser::{ExclusionFilter, ExclusionPattern};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Current JSON summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default tracefile location
pub const DEFAULT_INPUT: &str = "coverage/lcov.info";

/// Default markdown report location
pub const DEFAULT_OUTPUT: &str = "coverage_analysis.md";

/// Files below this line coverage are listed as needing work
pub const DEFAULT_THRESHOLD: f64 = 90.0;

/// Critical domain files below this are flagged CRITICAL instead of HIGH
pub const CRITICAL_COVERAGE_CUTOFF: f64 = 80.0;

/// Per-layer target line coverage
pub const DEFAULT_LAYER_TARGETS: &[(Layer, f64)] = &[
    (Layer::Domain, 95.0),
    (Layer::Data, 85.0),
    (Layer::Presentation, 80.0),
    (Layer::Core, 90.0),
];

/// Layers that get their own lowest-coverage table
pub const PRIORITY_LAYERS: &[Layer] = &[Layer::Domain, Layer::Data, Layer::Presentation];

// Display caps
pub const DEFAULT_BELOW_THRESHOLD_LIMIT: usize = 15;
pub const DEFAULT_LOWEST_PER_LAYER_LIMIT: usize = 10;
pub const DEFAULT_ZERO_COVERAGE_LIMIT: usize = 20;

/// Default exclusion patterns as (regex, description)
pub const DEFAULT_EXCLUSIONS: &[(&str, &str)] = &[
    (r"\.g\.dart$", "*.g.dart (generated files)"),
    (r"\.freezed\.dart$", "*.freezed.dart (freezed files)"),
    (r"\.mocks\.dart$", "*.mocks.dart (mock files)"),
];

/// Maximum number of entries shown per report list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayLimits {
    /// Files listed under "below threshold"
    pub below_threshold: usize,

    /// Rows in each priority layer's lowest-coverage table
    pub lowest_per_layer: usize,

    /// Files listed in the zero-coverage section
    pub zero_coverage: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            below_threshold: DEFAULT_BELOW_THRESHOLD_LIMIT,
            lowest_per_layer: DEFAULT_LOWEST_PER_LAYER_LIMIT,
            zero_coverage: DEFAULT_ZERO_COVERAGE_LIMIT,
        }
    }
}

/// Raw shape of `layercov.toml`
///
/// Layer names stay strings here and are checked when the file is turned
/// into a `ReportConfig`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub threshold: Option<f64>,
    pub targets: HashMap<String, f64>,
    pub exclude: Option<Vec<ExclusionPattern>>,
    pub limits: DisplayLimits,
    pub layout: LayerClassifier,
}

/// Effective settings for one analysis run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Low-coverage threshold (percent)
    pub threshold: f64,

    /// Target line coverage per layer (percent)
    pub targets: BTreeMap<Layer, f64>,

    /// Files matching any of these never reach an aggregate
    pub exclude: Vec<ExclusionPattern>,

    pub limits: DisplayLimits,

    pub layout: LayerClassifier,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            targets: DEFAULT_LAYER_TARGETS.iter().copied().collect(),
            exclude: default_exclusions(),
            limits: DisplayLimits::default(),
            layout: LayerClassifier::default(),
        }
    }
}

impl ReportConfig {
    /// Target for a layer, if one is configured
    pub fn target_for(&self, layer: Layer) -> Option<f64> {
        self.targets.get(&layer).copied()
    }

    /// Check value ranges and compile exclusion patterns
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percent("threshold", self.threshold)?;
        for (layer, target) in &self.targets {
            check_percent(&format!("target.{}", layer), *target)?;
        }
        self.exclusion_filter().map(|_| ())
    }

    /// Build the compiled exclusion filter
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter, ConfigError> {
        ExclusionFilter::new(&self.exclude)
    }
}

impl TryFrom<ConfigFile> for ReportConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let mut config = ReportConfig::default();

        if let Some(threshold) = file.threshold {
            config.threshold = threshold;
        }

        // File targets override defaults one layer at a time
        for (name, target) in file.targets {
            let layer: Layer = name.parse()?;
            config.targets.insert(layer, target);
        }

        if let Some(exclude) = file.exclude {
            config.exclude = exclude;
        }

        config.limits = file.limits;
        config.layout = file.layout;

        config.validate()?;
        Ok(config)
    }
}

/// Load settings from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::UnknownLayer` - If a target names an unknown layer
/// * `ConfigError::InvalidThreshold` / `InvalidPattern` - If validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse settings from TOML text
pub fn parse_config(contents: &str) -> Result<ReportConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(contents)?;
    ReportConfig::try_from(file)
}

/// The built-in exclusion list
pub fn default_exclusions() -> Vec<ExclusionPattern> {
    DEFAULT_EXCLUSIONS
        .iter()
        .map(|(pattern, description)| ExclusionPattern::new(*pattern, *description))
        .collect()
}

fn check_percent(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
