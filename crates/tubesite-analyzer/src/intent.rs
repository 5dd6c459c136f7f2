use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tubesite_common::{EditAction, EditError, PreservationScope, SemanticType};
use tubesite_parsers::SelectorHint;

/// Structured changes extracted from a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditUpdates {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_class: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_class: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl EditUpdates {
    pub fn is_empty(&self) -> bool {
        self.add_class.is_empty()
            && self.remove_class.is_empty()
            && self.style.is_empty()
            && self.content.is_none()
            && self.attributes.is_empty()
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    /// Queue a class for adding; cancels a pending removal of the same class
    pub fn add_class(&mut self, class: &str) {
        self.remove_class.retain(|c| c != class);
        if !self.add_class.iter().any(|c| c == class) {
            self.add_class.push(class.to_string());
        }
    }

    /// Queue a class for removal; cancels a pending addition of the same class
    pub fn remove_class(&mut self, class: &str) {
        self.add_class.retain(|c| c != class);
        if !self.remove_class.iter().any(|c| c == class) {
            self.remove_class.push(class.to_string());
        }
    }
}

/// A parsed, accepted edit request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditIntent {
    pub target_component_id: String,
    pub target_component_type: SemanticType,
    pub action: EditAction,
    pub updates: EditUpdates,
    pub preservation_scope: PreservationScope,
    pub confidence: f32,
    /// Where the catalog found the target, for components without a real id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hint: Option<SelectorHint>,
}

impl EditIntent {
    /// True when the heuristic applier can carry the intent out on its own
    pub fn is_directly_applicable(&self) -> bool {
        matches!(
            self.action,
            EditAction::StyleUpdate | EditAction::ContentUpdate
        ) && !self.updates.is_empty()
    }
}

/// A request the parser turned down, with hints for rephrasing it
#[derive(thiserror::Error, Debug)]
#[error("{reason}")]
pub struct IntentRejection {
    pub reason: EditError,
    pub suggestions: Vec<String>,
}

impl IntentRejection {
    pub fn new(reason: EditError, suggestions: Vec<String>) -> Self {
        Self { reason, suggestions }
    }
}
