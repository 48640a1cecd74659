//! Path-based classification of source files.
//!
//! This module handles:
//! - Assigning each file exactly one architectural layer
//! - Extracting the feature a file belongs to
//! - Flagging critical business-logic files

pub mod feature;
pub mod layer;

// Re-export main types
pub use feature::{extract_feature, is_critical_business_file, DEFAULT_FEATURE};
pub use layer::{classify_layer, Layer, LayerClassifier};
