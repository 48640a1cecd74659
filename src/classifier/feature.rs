//! Feature extraction and critical-file detection.

/// Feature assigned to files outside any `features/` directory
pub const DEFAULT_FEATURE: &str = "core";

/// Feature assigned when `features/` is the last path component
pub const UNKNOWN_FEATURE: &str = "unknown";

/// Path keywords that mark critical business logic
pub const CRITICAL_PATTERNS: &[&str] = &[
    "usecase",
    "use_case",
    "repository",
    "entity",
    "entities",
    "service",
    "value_object",
    "aggregate",
    "domain_service",
];

/// Extract the feature name from a path
///
/// The feature is the component right after a `features` component:
/// `lib/features/auth/domain/user.dart` belongs to `auth`.
pub fn extract_feature(path: &str) -> String {
    let mut components = path.split('/');

    if components.any(|c| c == "features") {
        return match components.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => UNKNOWN_FEATURE.to_string(),
        };
    }

    DEFAULT_FEATURE.to_string()
}

/// Check if a file contains critical business logic
///
/// Cross-cutting tag, independent of the layer.
pub fn is_critical_business_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    CRITICAL_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}
