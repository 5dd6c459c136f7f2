use serde::{Deserialize, Serialize};
use std::fmt;

pub mod changelog;
pub mod config;

pub use changelog::{ChangeLogEntry, ChangeLogSink, FileChangeLog, MemoryChangeLog};
pub use config::EditorConfig;

/// What a page component is, as far as the editor can tell from its markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Header,
    Hero,
    Navigation,
    Video,
    Footer,
    Button,
    Content,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Header => "header",
            SemanticType::Hero => "hero",
            SemanticType::Navigation => "navigation",
            SemanticType::Video => "video",
            SemanticType::Footer => "footer",
            SemanticType::Button => "button",
            SemanticType::Content => "content",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of mutation a user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    StyleUpdate,
    ContentUpdate,
    StructureUpdate,
    AddComponent,
    RemoveComponent,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::StyleUpdate => "style_update",
            EditAction::ContentUpdate => "content_update",
            EditAction::StructureUpdate => "structure_update",
            EditAction::AddComponent => "add_component",
            EditAction::RemoveComponent => "remove_component",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the surrounding page an edit is allowed to touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreservationScope {
    #[default]
    Minimal,
    Component,
    Section,
}

impl PreservationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreservationScope::Minimal => "minimal",
            PreservationScope::Component => "component",
            PreservationScope::Section => "section",
        }
    }
}

impl fmt::Display for PreservationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a validation a document was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Original,
    Modified,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Original => f.write_str("original"),
            DocumentRole::Modified => f.write_str("modified"),
        }
    }
}

/// Every way a targeted edit can be turned down
#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("the edit request is empty")]
    InputEmpty,

    #[error("could not tell which component the request refers to")]
    TargetNotResolved,

    #[error("confidence {confidence:.2} is below the acceptance threshold {threshold:.2}")]
    LowConfidence { confidence: f32, threshold: f32 },

    #[error("component '{component_id}' was not found in the document")]
    ElementNotFound { component_id: String },

    #[error("{document} document is malformed ({errors} parse errors)")]
    MalformedDocument { document: DocumentRole, errors: usize },

    #[error("element count changed by {delta}, more than the tolerance of {tolerance}")]
    StructuralDrift { delta: usize, tolerance: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&EditAction::StyleUpdate).unwrap(),
            "\"style_update\""
        );
        assert_eq!(
            serde_json::to_string(&SemanticType::Navigation).unwrap(),
            "\"navigation\""
        );
        assert_eq!(EditAction::RemoveComponent.to_string(), "remove_component");
    }

    #[test]
    fn test_element_not_found_names_component() {
        let err = EditError::ElementNotFound {
            component_id: "footer-1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("footer-1"));
        assert!(message.contains("not found"));
    }
}
