//! Pipeline configuration
//!
//! Loaded from JSON; every field is optional and falls back to the capture
//! format the benchmark harness writes.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Ingestion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Token delimiter for counter families
    pub delimiter: char,
    /// Header lines skipped at the top of counter files
    pub header_lines: usize,
    /// Literal that reads as `0` in line-oriented files
    pub nan_literal: String,
    /// Run the derived metric engine after ingestion
    pub derive: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header_lines: 1,
            nan_literal: "NaN".to_string(),
            derive: true,
        }
    }
}

impl PipelineConfig {
    /// Decode and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON and [`Error::InvalidInput`]
    /// when [`validate`](Self::validate) rejects the values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use coherency_stats::config::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_json(r#"{ "delimiter": ";" }"#)?;
    /// assert_eq!(config.delimiter, ';');
    /// assert_eq!(config.header_lines, 1);
    /// # Ok::<(), coherency_stats::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can describe a parseable file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the NaN literal is empty or the
    /// delimiter could appear inside a number.
    pub fn validate(&self) -> Result<()> {
        if self.nan_literal.trim().is_empty() {
            return Err(Error::InvalidInput("nan_literal must not be empty".to_string()));
        }
        let d = self.delimiter;
        if d.is_whitespace() || d.is_ascii_digit() || matches!(d, '.' | '-' | '+') {
            return Err(Error::InvalidInput(format!(
                "delimiter '{d}' is ambiguous with numeric tokens"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.header_lines, 1);
        assert_eq!(config.nan_literal, "NaN");
        assert!(config.derive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = PipelineConfig::from_json(r#"{ "header_lines": 0, "derive": false }"#).unwrap();
        assert_eq!(config.header_lines, 0);
        assert!(!config.derive);
        assert_eq!(config.delimiter, ',');
    }

    #[test]
    fn test_rejects_ambiguous_delimiter() {
        let err = PipelineConfig::from_json(r#"{ "delimiter": "." }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = PipelineConfig::from_json("{ delimiter").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
