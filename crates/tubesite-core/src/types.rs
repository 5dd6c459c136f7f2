use serde::{Deserialize, Serialize};
use tubesite_common::EditError;

/// Outcome of applying one intent to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_fragment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EditResult {
    pub fn applied(fragment: String, summary: String) -> Self {
        Self {
            success: true,
            modified_fragment: Some(fragment),
            change_summary: Some(summary),
            error: None,
        }
    }

    pub fn failed(error: &EditError) -> Self {
        Self {
            success: false,
            modified_fragment: None,
            change_summary: None,
            error: Some(error.to_string()),
        }
    }
}

/// Measurements taken while validating an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub original_elements: usize,
    pub modified_elements: usize,
    pub element_delta: usize,
    pub original_parse_errors: usize,
    pub modified_parse_errors: usize,
}

/// Kinds of files found in a generated site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Html,
    Css,
    Other,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => FileKind::Html,
            "css" => FileKind::Css,
            _ => FileKind::Other,
        }
    }
}
