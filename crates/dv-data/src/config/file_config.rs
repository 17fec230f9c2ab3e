//! Import configuration

use std::path::Path;

use dv_core::SourceFormat;
use serde::{Deserialize, Serialize};

use super::null_handling::MissingValues;
use crate::DataError;

/// How an uploaded file should be imported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Format override; detected from the file extension when absent
    pub format: Option<SourceFormat>,

    /// CSV delimiter override; sniffed from the content when absent
    pub delimiter: Option<char>,

    /// Missing value handling used by quality inference
    pub missing_values: MissingValues,
}

impl ImportConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(text).map_err(|e| DataError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the override values are usable
    pub fn validate(&self) -> Result<(), DataError> {
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
                return Err(DataError::Config(format!("Unsupported delimiter {:?}", delimiter)));
            }
        }
        Ok(())
    }

    /// The format to import `file_name` with
    pub fn resolve_format(&self, file_name: &str) -> Result<SourceFormat, DataError> {
        self.format
            .or_else(|| SourceFormat::from_file_name(file_name))
            .ok_or_else(|| DataError::Config(format!("Cannot determine the format of '{}'", file_name)))
    }

    /// Delimiter override as a byte
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter.map(|c| c as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = ImportConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_overrides_from_json() {
        let config = ImportConfig::from_json_str(
            r#"{"format": "csv", "delimiter": ";", "missing_values": {"patterns": ["", "NA"]}}"#,
        )
        .unwrap();
        assert_eq!(config.format, Some(SourceFormat::Csv));
        assert_eq!(config.delimiter_byte(), Some(b';'));
        assert_eq!(config.missing_values.patterns, vec!["", "NA"]);
        assert!(config.missing_values.case_sensitive);
    }

    #[test]
    fn test_rejects_quote_delimiter() {
        assert!(matches!(
            ImportConfig::from_json_str(r#"{"delimiter": "\""}"#),
            Err(DataError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_format() {
        let config = ImportConfig::default();
        assert_eq!(config.resolve_format("a.sql").unwrap(), SourceFormat::Sql);
        assert!(config.resolve_format("a.bin").is_err());

        let forced = ImportConfig {
            format: Some(SourceFormat::Csv),
            ..Default::default()
        };
        assert_eq!(forced.resolve_format("a.bin").unwrap(), SourceFormat::Csv);
    }
}
