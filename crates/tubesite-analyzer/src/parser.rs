use crate::intent::{EditIntent, EditUpdates, IntentRejection};
use crate::keywords::{
    fallback_id, ACTION_KEYWORDS, COLOR_WORDS, SPECIFICITY_HINTS, TARGET_KEYWORDS,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use tubesite_common::{
    EditAction, EditError, EditorConfig, PreservationScope, SemanticType,
};
use tubesite_parsers::{ComponentCatalogEntry, DesignTokenSet, SelectorHint};

const TARGET_MATCH_BONUS: f32 = 0.3;
const ACTION_MATCH_BONUS: f32 = 0.2;
const SPECIFICITY_BONUS: f32 = 0.1;

const HIGHLIGHT_CLASS: &str = "highlight";
const ENLARGED_FONT_SIZE: &str = "1.25em";
const REDUCED_FONT_SIZE: &str = "0.875em";

fn color_words_pattern() -> String {
    COLOR_WORDS.join("|")
}

fn keyword_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"\b(colou?r|background)\b.*?(#[0-9a-f]{{3,8}}\b|rgba?\([^)]*\)|\b(?:{})\b)",
            color_words_pattern()
        ))
        .expect("keyword color pattern is valid")
    })
}

fn bare_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(#[0-9a-f]{{3,8}}\b|rgba?\([^)]*\)|\b(?:{})\b)",
            color_words_pattern()
        ))
        .expect("bare color pattern is valid")
    })
}

fn quoted_content_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:text|content)\b[^"'“‘]*(?:"([^"]+)"|“([^”]+)”|‘([^’]+)’|'([^']+)')"#)
            .expect("content pattern is valid")
    })
}

fn remove_highlight_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bremove\s+(?:the\s+)?highlight").expect("highlight pattern is valid")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:link|href|url)\b.*?(https?://[^\s"'<>]+)"#)
            .expect("link pattern is valid")
    })
}

fn section_scope_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:entire|whole|all)\b").expect("scope pattern is valid"))
}

fn component_scope_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:component|element)\b").expect("scope pattern is valid"))
}

/// Resolved target of a request
#[derive(Debug, Clone)]
struct Target {
    component_id: String,
    semantic_type: SemanticType,
    hint: Option<SelectorHint>,
}

/// Turns free-text edit requests into structured [`EditIntent`]s.
///
/// The parser is stateless apart from its thresholds. The catalog and token
/// set passed to [`IntentParser::parse`] must describe the current document;
/// rebuilding them after each edit is the caller's job.
pub struct IntentParser {
    config: EditorConfig,
}

impl IntentParser {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn parse(
        &self,
        user_text: &str,
        catalog: &[ComponentCatalogEntry],
        tokens: &DesignTokenSet,
    ) -> Result<EditIntent, IntentRejection> {
        let raw = user_text.trim();
        let lower = raw.to_lowercase();

        if lower.is_empty() {
            return Err(IntentRejection::new(
                EditError::InputEmpty,
                vec![
                    "Describe the change you want, e.g. \"make the subscribe button bigger\"".to_string(),
                    "Mention a part of the page such as the header, hero, navigation, video gallery or footer".to_string(),
                ],
            ));
        }

        let target = self
            .identify_target(&lower, catalog)
            .ok_or_else(|| Self::unresolved_target(catalog))?;
        debug!(
            "Resolved target {} ({})",
            target.component_id, target.semantic_type
        );

        let (action, action_matched) = Self::classify_action(&lower);
        debug!("Classified action {} (keyword match: {})", action, action_matched);

        let updates = Self::extract_updates(raw, &lower, action, target.semantic_type, tokens);
        let preservation_scope = Self::preservation_scope(&lower);
        let confidence = self.score_confidence(&lower, &target.component_id, action_matched);

        if confidence < self.config.confidence_threshold {
            debug!(
                "Rejecting request with confidence {:.2} < {:.2}",
                confidence, self.config.confidence_threshold
            );
            return Err(IntentRejection::new(
                EditError::LowConfidence {
                    confidence,
                    threshold: self.config.confidence_threshold,
                },
                vec![
                    format!(
                        "Be more specific about the component, e.g. mention \"{}\" by name",
                        target.component_id
                    ),
                    "Say exactly what should change: its color, size or text".to_string(),
                ],
            ));
        }

        Ok(EditIntent {
            target_component_id: target.component_id,
            target_component_type: target.semantic_type,
            action,
            updates,
            preservation_scope,
            confidence,
            target_hint: target.hint,
        })
    }

    /// Verbatim catalog id first, keyword scoring second
    fn identify_target(&self, lower: &str, catalog: &[ComponentCatalogEntry]) -> Option<Target> {
        if let Some(entry) = catalog.iter().find(|entry| {
            let id = entry.component_id.to_lowercase();
            !id.is_empty() && lower.contains(&id)
        }) {
            return Some(Target {
                component_id: entry.component_id.clone(),
                semantic_type: entry.semantic_type,
                hint: Some(entry.dom_selector_hint.clone()),
            });
        }

        let mut best: Option<(SemanticType, f32)> = None;
        for (semantic_type, keywords) in TARGET_KEYWORDS {
            let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
            let fraction = hits as f32 / keywords.len() as f32;
            if fraction > self.config.keyword_threshold
                && best.map_or(true, |(_, top)| fraction > top)
            {
                best = Some((*semantic_type, fraction));
            }
        }

        let (semantic_type, fraction) = best?;
        debug!("Keyword match {} with score {:.2}", semantic_type, fraction);

        if let Some(entry) = catalog.iter().find(|e| e.semantic_type == semantic_type) {
            return Some(Target {
                component_id: entry.component_id.clone(),
                semantic_type,
                hint: Some(entry.dom_selector_hint.clone()),
            });
        }

        fallback_id(semantic_type).map(|id| Target {
            component_id: id.to_string(),
            semantic_type,
            hint: None,
        })
    }

    fn unresolved_target(catalog: &[ComponentCatalogEntry]) -> IntentRejection {
        let mut suggestions = vec![
            "Name a specific component, e.g. \"the header\", \"the hero section\" or \"the subscribe button\"".to_string(),
        ];
        let known: Vec<&str> = catalog
            .iter()
            .take(5)
            .map(|e| e.component_id.as_str())
            .collect();
        if !known.is_empty() {
            suggestions.push(format!(
                "Refer to a component by its id: {}",
                known.join(", ")
            ));
        }
        IntentRejection::new(EditError::TargetNotResolved, suggestions)
    }

    fn classify_action(lower: &str) -> (EditAction, bool) {
        ACTION_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(action, _)| (*action, true))
            .unwrap_or((EditAction::StyleUpdate, false))
    }

    fn extract_updates(
        raw: &str,
        lower: &str,
        action: EditAction,
        semantic_type: SemanticType,
        tokens: &DesignTokenSet,
    ) -> EditUpdates {
        let mut updates = EditUpdates::default();

        if action == EditAction::StyleUpdate {
            if let Some((property, value)) = Self::extract_color(lower, tokens) {
                updates.set_style(property, value);
            }
        }

        // Bigger is checked before smaller; when both appear smaller wins
        let mut size: Option<bool> = None;
        if lower.contains("bigger") || lower.contains("larger") {
            size = Some(true);
        }
        if lower.contains("smaller") {
            size = Some(false);
        }
        if let Some(enlarge) = size {
            let (large, small) = if semantic_type == SemanticType::Button {
                ("btn-lg", "btn-sm")
            } else {
                ("text-lg", "text-sm")
            };
            if enlarge {
                updates.add_class(large);
                updates.remove_class(small);
                updates.set_style("font-size", ENLARGED_FONT_SIZE);
            } else {
                updates.add_class(small);
                updates.remove_class(large);
                updates.set_style("font-size", REDUCED_FONT_SIZE);
            }
        }

        if action == EditAction::ContentUpdate {
            updates.content = quoted_content_re().captures(raw).and_then(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .next()
                    .map(|m| m.as_str().to_string())
            });
        }

        if remove_highlight_re().is_match(lower) {
            updates.remove_class(HIGHLIGHT_CLASS);
        } else if lower.contains(HIGHLIGHT_CLASS) {
            updates.add_class(HIGHLIGHT_CLASS);
        }

        if let Some(caps) = link_re().captures(raw) {
            updates
                .attributes
                .insert("href".to_string(), caps[1].to_string());
        }

        updates
    }

    fn extract_color(lower: &str, tokens: &DesignTokenSet) -> Option<(&'static str, String)> {
        let (property, value) = if let Some(caps) = keyword_color_re().captures(lower) {
            let property = if &caps[1] == "background" {
                "background-color"
            } else {
                "color"
            };
            (property, caps[2].to_string())
        } else {
            let caps = bare_color_re().captures(lower)?;
            ("color", caps[1].to_string())
        };

        let resolved = if value.starts_with('#') || value.starts_with("rgb") {
            value
        } else {
            tokens.resolve_color(&value).unwrap_or(value)
        };
        Some((property, resolved))
    }

    fn preservation_scope(lower: &str) -> PreservationScope {
        if section_scope_re().is_match(lower) {
            PreservationScope::Section
        } else if component_scope_re().is_match(lower) {
            PreservationScope::Component
        } else {
            PreservationScope::Minimal
        }
    }

    fn score_confidence(&self, lower: &str, target_id: &str, action_matched: bool) -> f32 {
        let mut confidence = self.config.base_confidence;
        if lower.contains(&target_id.to_lowercase()) {
            confidence += TARGET_MATCH_BONUS;
        }
        if action_matched {
            confidence += ACTION_MATCH_BONUS;
        }
        if SPECIFICITY_HINTS.iter().any(|hint| lower.contains(hint)) {
            confidence += SPECIFICITY_BONUS;
        }
        confidence.clamp(0.0, 1.0)
    }
}

impl Default for IntentParser {
    fn default() -> Self {
        Self::new()
    }
}
