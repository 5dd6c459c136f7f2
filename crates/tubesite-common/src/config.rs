use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;
pub const DEFAULT_KEYWORD_THRESHOLD: f32 = 0.2;
pub const DEFAULT_BASE_CONFIDENCE: f32 = 0.5;
pub const DEFAULT_DRIFT_TOLERANCE: usize = 5;

/// Tunable thresholds for parsing and validating edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Intents scoring below this are rejected before they reach the applier
    pub confidence_threshold: f32,
    /// Minimum keyword fraction a semantic type needs to be picked as target
    pub keyword_threshold: f32,
    /// Starting point for confidence scoring
    pub base_confidence: f32,
    /// Largest element-count change the validator accepts
    pub drift_tolerance: usize,
    /// Reject any HTML parse error instead of comparing against the original
    pub strict_parse: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
            base_confidence: DEFAULT_BASE_CONFIDENCE,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            strict_parse: false,
        }
    }
}

impl EditorConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!("Loaded editor config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.confidence_threshold, 0.3);
        assert_eq!(config.keyword_threshold, 0.2);
        assert_eq!(config.drift_tolerance, 5);
        assert!(!config.strict_parse);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("editor.json");
        fs::write(&path, r#"{"drift_tolerance": 12}"#).unwrap();

        let config = EditorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.drift_tolerance, 12);
        assert_eq!(config.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EditorConfig::from_json_file(Path::new("/nonexistent/editor.json"));
        assert!(matches!(result, Err(crate::EditError::Io(_))));
    }
}
