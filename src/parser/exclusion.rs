//! Path exclusion rules applied while parsing.

use crate::utils::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One exclusion rule as written in config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPattern {
    /// Regular expression searched anywhere in the path
    pub pattern: String,

    /// Human description shown in the report footnote
    #[serde(default)]
    pub description: String,
}

impl ExclusionPattern {
    pub fn new(pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            description: description.into(),
        }
    }

    /// Description if set, the raw pattern otherwise
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.pattern
        } else {
            &self.description
        }
    }
}

/// Compiled set of exclusion rules
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: Vec<Regex>,
}

impl ExclusionFilter {
    /// Compile every pattern
    ///
    /// # Errors
    /// * `ConfigError::InvalidPattern` - the first pattern that fails to compile
    pub fn new(patterns: &[ExclusionPattern]) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|p| {
                Regex::new(&p.pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: p.pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Filter that keeps every file
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
