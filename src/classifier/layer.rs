//! Architectural layer classification from file paths.
//!
//! Classification is an ordered chain of path-substring tests. The first
//! test that matches decides the layer, so a path like
//! `lib/core/network/client.dart` lands in `data` rather than `core`.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Architectural layer a source file belongs to
///
/// Variant order is the display order used by every report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Domain,
    Data,
    Presentation,
    Core,
    App,
    Generated,
    Other,
}

impl Layer {
    /// Every layer, in display order
    pub const ALL: [Layer; 7] = [
        Layer::Domain,
        Layer::Data,
        Layer::Presentation,
        Layer::Core,
        Layer::App,
        Layer::Generated,
        Layer::Other,
    ];

    /// Lowercase identifier (also used in config files)
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Domain => "domain",
            Layer::Data => "data",
            Layer::Presentation => "presentation",
            Layer::Core => "core",
            Layer::App => "app",
            Layer::Generated => "generated",
            Layer::Other => "other",
        }
    }

    /// Capitalized name for report headings
    pub fn title(&self) -> &'static str {
        match self {
            Layer::Domain => "Domain",
            Layer::Data => "Data",
            Layer::Presentation => "Presentation",
            Layer::Core => "Core",
            Layer::App => "App",
            Layer::Generated => "Generated",
            Layer::Other => "Other",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Layer::ALL
            .iter()
            .copied()
            .find(|layer| layer.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownLayer(s.to_string()))
    }
}

/// Project layout roots consulted by the classifier
///
/// Defaults follow the conventional Flutter `lib/` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerClassifier {
    /// Prefix of shared core code
    pub core_root: String,

    /// Prefix of generated output (localizations, assets)
    pub generated_root: String,

    /// Application entry point file
    pub entry_point: String,
}

impl Default for LayerClassifier {
    fn default() -> Self {
        Self {
            core_root: "lib/core/".to_string(),
            generated_root: "lib/generated/".to_string(),
            entry_point: "lib/main.dart".to_string(),
        }
    }
}

impl LayerClassifier {
    /// Classify a path into exactly one layer
    pub fn classify(&self, path: &str) -> Layer {
        if path.contains("/domain/") {
            Layer::Domain
        } else if path.contains("/data/") {
            Layer::Data
        } else if path.contains("/presentation/") {
            Layer::Presentation
        } else if path.starts_with(&self.core_root) {
            classify_core_path(path)
        } else if path.starts_with(&self.generated_root) {
            Layer::Generated
        } else if path.starts_with(&self.entry_point) || path.contains("/config/") {
            Layer::App
        } else {
            Layer::Other
        }
    }
}

/// Core code is split further by the kind of infrastructure it holds
fn classify_core_path(path: &str) -> Layer {
    let has_any = |needles: &[&str]| needles.iter().any(|n| path.contains(n));

    if has_any(&["/router/", "/navigation/"]) {
        Layer::Presentation
    } else if has_any(&["/network/", "/storage/", "/database/"]) {
        Layer::Data
    } else if has_any(&["/usecases/", "/entities/"]) {
        Layer::Domain
    } else {
        Layer::Core
    }
}

/// Classify a path using the default layout
pub fn classify_layer(path: &str) -> Layer {
    LayerClassifier::default().classify(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_layers() {
        assert_eq!(classify_layer("lib/domain/x.dart"), Layer::Domain);
        assert_eq!(classify_layer("lib/features/auth/data/repo.dart"), Layer::Data);
        assert_eq!(
            classify_layer("lib/features/auth/presentation/page.dart"),
            Layer::Presentation
        );
    }

    #[test]
    fn test_domain_wins_over_data() {
        assert_eq!(classify_layer("lib/domain/data/model.dart"), Layer::Domain);
        assert_eq!(classify_layer("lib/data/domain/model.dart"), Layer::Domain);
    }

    #[test]
    fn test_core_subdivision() {
        assert_eq!(classify_layer("lib/core/network/foo.dart"), Layer::Data);
        assert_eq!(classify_layer("lib/core/storage/prefs.dart"), Layer::Data);
        assert_eq!(classify_layer("lib/core/database/db.dart"), Layer::Data);
        assert_eq!(classify_layer("lib/core/router/app_router.dart"), Layer::Presentation);
        assert_eq!(classify_layer("lib/core/navigation/nav.dart"), Layer::Presentation);
        assert_eq!(classify_layer("lib/core/usecases/usecase.dart"), Layer::Domain);
        assert_eq!(classify_layer("lib/core/entities/user.dart"), Layer::Domain);
        assert_eq!(classify_layer("lib/core/utils/strings.dart"), Layer::Core);
    }

    #[test]
    fn test_router_wins_over_network_in_core() {
        assert_eq!(
            classify_layer("lib/core/router/network/guard.dart"),
            Layer::Presentation
        );
    }

    #[test]
    fn test_generated_app_other() {
        assert_eq!(classify_layer("lib/generated/l10n.dart"), Layer::Generated);
        assert_eq!(classify_layer("lib/main.dart"), Layer::App);
        assert_eq!(classify_layer("lib/main.dart.bak"), Layer::App);
        assert_eq!(classify_layer("lib/app/config/env.dart"), Layer::App);
        assert_eq!(classify_layer("lib/widgets/button.dart"), Layer::Other);
        assert_eq!(classify_layer(""), Layer::Other);
    }

    #[test]
    fn test_core_root_requires_prefix() {
        // Only paths under the core root get core treatment
        assert_eq!(classify_layer("src/core/network/foo.dart"), Layer::Other);
    }

    #[test]
    fn test_custom_layout() {
        let classifier = LayerClassifier {
            core_root: "src/core/".to_string(),
            generated_root: "src/gen/".to_string(),
            entry_point: "src/main.rs".to_string(),
        };
        assert_eq!(classifier.classify("src/core/network/foo.rs"), Layer::Data);
        assert_eq!(classifier.classify("src/core/util.rs"), Layer::Core);
        assert_eq!(classifier.classify("src/gen/bindings.rs"), Layer::Generated);
        assert_eq!(classifier.classify("src/main.rs"), Layer::App);
        assert_eq!(classifier.classify("lib/core/util.dart"), Layer::Other);
    }

    #[test]
    fn test_classification_is_stable() {
        let path = "lib/core/network/foo.dart";
        let first = classify_layer(path);
        for _ in 0..10 {
            assert_eq!(classify_layer(path), first);
        }
    }

    #[test]
    fn test_layer_from_str() {
        assert_eq!("domain".parse::<Layer>().unwrap(), Layer::Domain);
        assert_eq!(" Presentation ".parse::<Layer>().unwrap(), Layer::Presentation);
        assert!("business".parse::<Layer>().is_err());
        for layer in Layer::ALL {
            assert_eq!(layer.as_str().parse::<Layer>().unwrap(), layer);
        }
    }

    #[test]
    fn test_layer_order_matches_display_order() {
        let mut sorted = Layer::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Layer::ALL.to_vec());
    }
}
