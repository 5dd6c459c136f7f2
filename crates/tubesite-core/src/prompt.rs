use tubesite_analyzer::EditIntent;
use tubesite_common::PreservationScope;
use tubesite_parsers::DesignTokenSet;

const TARGETED_EDIT_TEMPLATE: &str = r#"You are editing one component of an existing YouTube channel website.

User request: {user_request}

Target component: {component_id} ({component_type})
Requested change: {action}
Preservation: {preservation}

Current markup of the target:
{current_markup}

Structured updates already extracted:
{updates}

Design tokens (reuse these values, do not invent new colors or fonts):
{design_tokens}

Rules:
- Return ONLY the new HTML for the target component, nothing else.
- Keep the id "{component_id}" on the outermost element.
- Do not touch markup outside the target component.
- Keep existing classes unless the request asks to change them."#;

/// Builds the constrained instruction sent to a language model when an
/// intent needs more than attribute and text changes.
pub struct EditPromptBuilder;

impl EditPromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        user_request: &str,
        intent: &EditIntent,
        current_markup: Option<&str>,
        tokens: &DesignTokenSet,
    ) -> String {
        let updates = if intent.updates.is_empty() {
            "(none)".to_string()
        } else {
            serde_json::to_string_pretty(&intent.updates).unwrap_or_else(|_| "(none)".to_string())
        };

        TARGETED_EDIT_TEMPLATE
            .replace("{user_request}", user_request.trim())
            .replace("{component_id}", &intent.target_component_id)
            .replace("{component_type}", intent.target_component_type.as_str())
            .replace("{action}", intent.action.as_str())
            .replace("{preservation}", preservation_rule(intent.preservation_scope))
            .replace(
                "{current_markup}",
                current_markup.unwrap_or("(component does not exist yet)"),
            )
            .replace("{updates}", &updates)
            .replace("{design_tokens}", &tokens.to_css_variables())
    }
}

impl Default for EditPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn preservation_rule(scope: PreservationScope) -> &'static str {
    match scope {
        PreservationScope::Minimal => "change as little as possible; keep structure, text and classes that the request does not mention",
        PreservationScope::Component => "the whole component may be restyled, but keep its content and child structure",
        PreservationScope::Section => "the whole section may be rewritten, keeping its purpose and id",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubesite_analyzer::EditUpdates;
    use tubesite_common::{EditAction, SemanticType};

    fn intent(action: EditAction) -> EditIntent {
        EditIntent {
            target_component_id: "main-footer".to_string(),
            target_component_type: SemanticType::Footer,
            action,
            updates: EditUpdates::default(),
            preservation_scope: PreservationScope::Section,
            confidence: 0.7,
            target_hint: None,
        }
    }

    #[test]
    fn test_prompt_names_target_and_tokens() {
        let prompt = EditPromptBuilder::new().build(
            "move the footer links into two columns",
            &intent(EditAction::StructureUpdate),
            Some("<footer id=\"main-footer\"></footer>"),
            &DesignTokenSet::default(),
        );

        assert!(prompt.contains("User request: move the footer links into two columns"));
        assert!(prompt.contains("Target component: main-footer (footer)"));
        assert!(prompt.contains("Requested change: structure_update"));
        assert!(prompt.contains("<footer id=\"main-footer\"></footer>"));
        assert!(prompt.contains("--primary-color: #ff0000;"));
        assert!(prompt.contains("whole section may be rewritten"));
        assert!(!prompt.contains("{component_id}"));
        assert!(!prompt.contains("{design_tokens}"));
    }

    #[test]
    fn test_prompt_without_markup() {
        let prompt = EditPromptBuilder::new().build(
            "add a footer",
            &intent(EditAction::AddComponent),
            None,
            &DesignTokenSet::default(),
        );
        assert!(prompt.contains("(component does not exist yet)"));
        assert!(prompt.contains("Structured updates already extracted:\n(none)"));
    }
}
