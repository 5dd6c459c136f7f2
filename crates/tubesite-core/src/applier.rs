use crate::types::EditResult;
use kuchikiki::{ElementData, NodeDataRef, NodeRef};
use tracing::{debug, warn};
use tubesite_analyzer::{EditIntent, EditUpdates};
use tubesite_common::EditError;
use tubesite_parsers::dom;

/// Find the element an intent points at: exact id, then class name, then
/// the selector hint recorded by the catalog.
pub fn locate_target(root: &NodeRef, intent: &EditIntent) -> Option<NodeDataRef<ElementData>> {
    let id = intent.target_component_id.as_str();

    if let Some(element) = dom::find_by_id(root, id) {
        return Some(element);
    }
    if let Some(element) = dom::find_by_class(root, id) {
        debug!("Resolved '{}' through its class name", id);
        return Some(element);
    }

    let hint = intent.target_hint.as_ref()?;
    let element = dom::select_nth(root, &hint.selector, hint.index)?;
    debug!(
        "Resolved '{}' through selector hint {} #{}",
        id, hint.selector, hint.index
    );
    Some(element)
}

/// Applies structured updates to a single element of a document
pub struct EditApplier;

impl EditApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply the intent's updates to its target and return the changed element.
    /// The caller's document is never touched; `modified_fragment` holds the
    /// serialized element.
    pub fn apply(&self, intent: &EditIntent, html: &str) -> EditResult {
        match self.try_apply(intent, html) {
            Ok((fragment, summary)) => EditResult::applied(fragment, summary),
            Err(err) => {
                warn!("Edit not applied: {}", err);
                EditResult::failed(&err)
            }
        }
    }

    pub(crate) fn try_apply(
        &self,
        intent: &EditIntent,
        html: &str,
    ) -> Result<(String, String), EditError> {
        let document = dom::parse_document(html);
        let element = locate_target(&document.root, intent).ok_or_else(|| {
            EditError::ElementNotFound {
                component_id: intent.target_component_id.clone(),
            }
        })?;

        let changes = mutate(&element, &intent.updates);
        let summary = if changes.is_empty() {
            "No changes".to_string()
        } else {
            changes.join(", ")
        };
        debug!("Applied to {}: {}", intent.target_component_id, summary);

        Ok((dom::serialize(element.as_node()), summary))
    }

    /// Replace the intent's target in `html` with `fragment` and return the
    /// whole document. Pages keep their doctype and head; bare fragments come
    /// back as fragments, including any leading `<style>` or `<link>`.
    pub fn splice(&self, html: &str, intent: &EditIntent, fragment: &str) -> Result<String, EditError> {
        let document = dom::parse_document(html);
        let target = locate_target(&document.root, intent).ok_or_else(|| {
            EditError::ElementNotFound {
                component_id: intent.target_component_id.clone(),
            }
        })?;

        let replacement = dom::parse_document(fragment);
        let nodes = dom::fragment_nodes(&replacement.root);

        let target = target.as_node();
        for node in nodes {
            node.detach();
            target.insert_before(node);
        }
        target.detach();

        Ok(dom::serialize_document(&document.root, dom::is_full_document(html)))
    }
}

impl Default for EditApplier {
    fn default() -> Self {
        Self::new()
    }
}

fn mutate(element: &NodeDataRef<ElementData>, updates: &EditUpdates) -> Vec<String> {
    let mut changes = Vec::new();

    if !updates.style.is_empty() {
        let current = dom::attribute(element, "style").unwrap_or_default();
        let mut declarations = parse_declarations(&current);
        for (property, value) in &updates.style {
            match declarations.iter_mut().find(|(p, _)| p == property) {
                Some(existing) => existing.1 = value.clone(),
                None => declarations.push((property.clone(), value.clone())),
            }
            changes.push(format!("{}: {}", property, value));
        }
        set_attribute(element, "style", render_declarations(&declarations));
    }

    if !updates.add_class.is_empty() || !updates.remove_class.is_empty() {
        let mut classes = dom::class_list(element);
        for class in &updates.add_class {
            if !classes.contains(class) {
                classes.push(class.clone());
            }
            changes.push(format!("Added class: {}", class));
        }
        for class in &updates.remove_class {
            classes.retain(|c| c != class);
            changes.push(format!("Removed class: {}", class));
        }

        if classes.is_empty() {
            element.attributes.borrow_mut().remove("class");
        } else {
            set_attribute(element, "class", classes.join(" "));
        }
    }

    if let Some(content) = &updates.content {
        let tag = dom::tag_name(element);
        if tag == "input" || tag == "textarea" {
            set_attribute(element, "value", content.clone());
        } else {
            let node = element.as_node();
            let children: Vec<NodeRef> = node.children().collect();
            for child in children {
                child.detach();
            }
            node.append(NodeRef::new_text(content.as_str()));
        }
        changes.push(format!("Content: {}", content));
    }

    for (name, value) in &updates.attributes {
        set_attribute(element, name, value.clone());
        changes.push(format!("{}: {}", name, value));
    }

    changes
}

fn set_attribute(element: &ElementData, name: &str, value: String) {
    element.attributes.borrow_mut().insert(name, value);
}

/// Split an inline style into ordered (property, value) pairs
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim().to_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}

fn render_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubesite_common::{EditAction, PreservationScope, SemanticType};
    use tubesite_parsers::SelectorHint;

    const PAGE: &str = r#"<header id="main-header"><h1 class="title">My Channel</h1></header><section class="hero"><button id="cta-btn" class="btn btn-sm" style="padding: 4px">Subscribe</button><input id="search" value="old"></section><footer><p>bye</p></footer>"#;

    fn intent(id: &str, updates: EditUpdates) -> EditIntent {
        EditIntent {
            target_component_id: id.to_string(),
            target_component_type: SemanticType::Button,
            action: EditAction::StyleUpdate,
            updates,
            preservation_scope: PreservationScope::Minimal,
            confidence: 0.7,
            target_hint: None,
        }
    }

    #[test]
    fn test_style_and_classes_in_order() {
        let mut updates = EditUpdates::default();
        updates.set_style("color", "#ff0000");
        updates.add_class("btn-lg");
        updates.remove_class("btn-sm");

        let result = EditApplier::new().apply(&intent("cta-btn", updates), PAGE);
        assert!(result.success);
        assert_eq!(
            result.change_summary.as_deref(),
            Some("color: #ff0000, Added class: btn-lg, Removed class: btn-sm")
        );

        let fragment = result.modified_fragment.unwrap();
        assert!(fragment.contains(r#"style="padding: 4px; color: #ff0000""#));
        assert!(fragment.contains(r#"class="btn btn-lg""#));
        assert!(fragment.contains(">Subscribe</button>"));
    }

    #[test]
    fn test_existing_style_property_is_replaced() {
        let mut updates = EditUpdates::default();
        updates.set_style("padding", "12px");
        let result = EditApplier::new().apply(&intent("cta-btn", updates), PAGE);
        let fragment = result.modified_fragment.unwrap();
        assert!(fragment.contains(r#"style="padding: 12px""#));
    }

    #[test]
    fn test_reapplying_style_is_idempotent() {
        let mut updates = EditUpdates::default();
        updates.set_style("color", "#ff0000");
        updates.add_class("btn-lg");
        let applier = EditApplier::new();
        let edit = intent("cta-btn", updates);

        let once = applier.apply(&edit, PAGE).modified_fragment.unwrap();
        let twice = applier.apply(&edit, &once).modified_fragment.unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_class_lookup_fallback() {
        let updates = EditUpdates {
            content: Some("Welcome".to_string()),
            ..Default::default()
        };
        let result = EditApplier::new().apply(&intent("title", updates), PAGE);
        assert!(result.success);
        assert_eq!(
            result.modified_fragment.as_deref(),
            Some(r#"<h1 class="title">Welcome</h1>"#)
        );
    }

    #[test]
    fn test_selector_hint_fallback() {
        let mut updates = EditUpdates::default();
        updates.set_style("background-color", "#282828");
        let mut edit = intent("footer-0", updates);
        edit.target_hint = Some(SelectorHint {
            selector: "footer".to_string(),
            index: 0,
        });

        let result = EditApplier::new().apply(&edit, PAGE);
        assert!(result.success);
        assert!(result.modified_fragment.unwrap().starts_with("<footer style="));
    }

    #[test]
    fn test_input_content_sets_value() {
        let updates = EditUpdates {
            content: Some("new query".to_string()),
            ..Default::default()
        };
        let result = EditApplier::new().apply(&intent("search", updates), PAGE);
        assert!(result.modified_fragment.unwrap().contains(r#"value="new query""#));
    }

    #[test]
    fn test_missing_target_names_component() {
        let result = EditApplier::new().apply(&intent("footer-1", EditUpdates::default()), PAGE);
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("footer-1"));
        assert!(error.contains("not found"));
    }

    #[test]
    fn test_splice_replaces_only_target() {
        let applier = EditApplier::new();
        let edit = intent("main-header", EditUpdates::default());
        let spliced = applier
            .splice(PAGE, &edit, r#"<header id="main-header"><h1>New</h1></header>"#)
            .unwrap();

        assert!(spliced.starts_with(r#"<header id="main-header"><h1>New</h1></header><section class="hero">"#));
        assert!(!spliced.contains("My Channel"));
        assert!(!spliced.contains("<body>"));
    }

    #[test]
    fn test_splice_keeps_full_documents_whole() {
        let html = "<!DOCTYPE html><html><head></head><body><p id=\"a\">x</p></body></html>";
        let spliced = EditApplier::new()
            .splice(html, &intent("a", EditUpdates::default()), "<p id=\"a\">y</p>")
            .unwrap();
        assert!(spliced.contains("<html>"));
        assert!(spliced.contains("<body><p id=\"a\">y</p></body>"));
    }

    #[test]
    fn test_splice_keeps_leading_style_block() {
        let html = r#"<style>.btn{padding:4px}</style><button id="cta-btn" class="btn">Sub</button>"#;
        let spliced = EditApplier::new()
            .splice(html, &intent("cta-btn", EditUpdates::default()), r#"<button id="cta-btn" class="btn">Go</button>"#)
            .unwrap();
        assert_eq!(
            spliced,
            r#"<style>.btn{padding:4px}</style><button id="cta-btn" class="btn">Go</button>"#
        );
    }

    #[test]
    fn test_splice_keeps_doctype_without_html_tag() {
        let html = "<!DOCTYPE html>\n<head><title>Ana</title><style>p{margin:0}</style></head>\n<body><p id=\"a\">x</p></body>";
        let spliced = EditApplier::new()
            .splice(html, &intent("a", EditUpdates::default()), "<p id=\"a\">y</p>")
            .unwrap();
        assert!(spliced.starts_with("<!DOCTYPE html>"));
        assert!(spliced.contains("<title>Ana</title>"));
        assert!(spliced.contains("p{margin:0}"));
        assert!(spliced.contains("<p id=\"a\">y</p>"));
    }

    #[test]
    fn test_splice_keeps_head_level_nodes_of_replacement() {
        let spliced = EditApplier::new()
            .splice(
                PAGE,
                &intent("main-header", EditUpdates::default()),
                r#"<link rel="stylesheet" href="hdr.css"><header id="main-header">New</header>"#,
            )
            .unwrap();
        assert!(spliced.starts_with(r#"<link rel="stylesheet" href="hdr.css"><header id="main-header">New</header>"#));
    }

    #[test]
    fn test_splice_missing_target() {
        let err = EditApplier::new()
            .splice(PAGE, &intent("nope", EditUpdates::default()), "<p></p>")
            .unwrap_err();
        assert!(matches!(err, EditError::ElementNotFound { .. }));
    }
}
