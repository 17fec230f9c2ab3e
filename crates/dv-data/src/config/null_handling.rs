//! Missing value handling for quality inference

use dv_core::Value;
use serde::{Deserialize, Serialize};

/// Which cells count as missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingValues {
    /// String patterns to treat as missing. `Null` cells are always missing.
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for MissingValues {
    fn default() -> Self {
        Self {
            patterns: vec![String::new()],
            trim_whitespace: false,
            case_sensitive: true,
        }
    }
}

impl MissingValues {
    /// Common spreadsheet placeholders on top of the defaults
    pub fn lenient() -> Self {
        Self {
            patterns: ["", "-", "N/A", "NA", "null", "None", "NaN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }

    /// Check if a cell should be treated as missing
    pub fn is_missing(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => self.matches(s),
            _ => false,
        }
    }

    fn matches(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace { value.trim() } else { value };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a missing-value pattern
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Remove a missing-value pattern
    pub fn remove_pattern(&mut self, pattern: &str) {
        self.patterns.retain(|p| p != pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_only_blank_is_missing() {
        let missing = MissingValues::default();
        assert!(missing.is_missing(&Value::Null));
        assert!(missing.is_missing(&Value::from("")));
        assert!(!missing.is_missing(&Value::from(" ")));
        assert!(!missing.is_missing(&Value::from("N/A")));
        assert!(!missing.is_missing(&Value::Number(0.0)));
    }

    #[test]
    fn test_lenient_patterns() {
        let missing = MissingValues::lenient();
        assert!(missing.is_missing(&Value::from(" n/a ")));
        assert!(missing.is_missing(&Value::from("NULL")));
        assert!(!missing.is_missing(&Value::from("0")));
    }

    #[test]
    fn test_pattern_editing() {
        let mut missing = MissingValues::default();
        missing.add_pattern("?".into());
        missing.add_pattern("?".into());
        assert_eq!(missing.patterns.len(), 2);
        assert!(missing.is_missing(&Value::from("?")));
        missing.remove_pattern("?");
        assert!(!missing.is_missing(&Value::from("?")));
    }
}
