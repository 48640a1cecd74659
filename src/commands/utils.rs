use crate::classifier::{extract_feature, is_critical_business_file, LayerClassifier};
use crate::utils::config::SCHEMA_VERSION;

/// Print the layer, feature and critical flag for each path
pub fn classify_paths(paths: &[String]) {
    let classifier = LayerClassifier::default();

    for path in paths {
        let layer = classifier.classify(path);
        let feature = extract_feature(path);
        let marker = if is_critical_business_file(path) {
            "  [critical]"
        } else {
            ""
        };
        println!("{:<14} {:<16} {}{}", layer.as_str(), feature, path, marker);
    }
}

/// Display version information
pub fn display_version() {
    println!("layercov v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Layer-aware test coverage analysis for LCOV tracefiles.");
}
