use serde::{Deserialize, Serialize};
use tubesite_common::SemanticType;

/// How the catalog builder reached an element: a CSS selector plus the
/// element's position among that selector's matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorHint {
    pub selector: String,
    pub index: usize,
}

impl SelectorHint {
    pub fn for_id(id: &str) -> Self {
        Self {
            selector: format!("#{}", id),
            index: 0,
        }
    }
}

/// One identifiable component of a generated page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCatalogEntry {
    pub component_id: String,
    pub semantic_type: SemanticType,
    pub source_file: String,
    pub tag_name: String,
    pub css_classes: Vec<String>, // Document order, no duplicates
    pub dom_selector_hint: SelectorHint,
}

/// Design tokens used to resolve symbolic values in edit requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTokenSet {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub font_size_base: String,
    pub spacing: String,
    pub border_radius: String,
}

impl Default for DesignTokenSet {
    fn default() -> Self {
        Self {
            primary_color: "#ff0000".to_string(),
            secondary_color: "#282828".to_string(),
            font_family: "Roboto, Arial, sans-serif".to_string(),
            font_size_base: "16px".to_string(),
            spacing: "1rem".to_string(),
            border_radius: "8px".to_string(),
        }
    }
}

impl DesignTokenSet {
    /// Resolve a color word to a CSS value. Red follows the channel's primary color.
    pub fn resolve_color(&self, word: &str) -> Option<String> {
        let value = match word.to_lowercase().as_str() {
            "red" => self.primary_color.as_str(),
            "blue" => "#3b82f6",
            "green" => "#10b981",
            "yellow" => "#f59e0b",
            "purple" => "#8b5cf6",
            "orange" => "#f97316",
            _ => return None,
        };
        Some(value.to_string())
    }

    /// Render as a `:root` block of custom properties
    pub fn to_css_variables(&self) -> String {
        format!(
            ":root {{\n  --primary-color: {};\n  --secondary-color: {};\n  --font-family: {};\n  --font-size: {};\n  --spacing: {};\n  --border-radius: {};\n}}",
            self.primary_color,
            self.secondary_color,
            self.font_family,
            self.font_size_base,
            self.spacing,
            self.border_radius
        )
    }
}
