//! Fixed keyword tables used by the intent parser.
//!
//! Every table is an ordered slice: earlier rows win ties.

use tubesite_common::{EditAction, SemanticType};

/// Words that point at each kind of page component
pub const TARGET_KEYWORDS: &[(SemanticType, &[&str])] = &[
    (SemanticType::Header, &["header", "top", "banner", "logo"]),
    (SemanticType::Hero, &["hero", "intro", "welcome", "landing"]),
    (SemanticType::Navigation, &["nav", "menu", "links"]),
    (SemanticType::Video, &["video", "gallery", "thumbnail", "playlist"]),
    (SemanticType::Footer, &["footer", "bottom", "copyright"]),
    (SemanticType::Button, &["button", "btn", "subscribe", "cta"]),
    (SemanticType::Content, &["content", "paragraph", "about", "description"]),
];

/// Component id assumed when the catalog has no entry of the matched type
pub const FALLBACK_IDS: &[(SemanticType, &str)] = &[
    (SemanticType::Header, "main-header"),
    (SemanticType::Hero, "hero-section"),
    (SemanticType::Navigation, "main-nav"),
    (SemanticType::Video, "video-gallery"),
    (SemanticType::Footer, "main-footer"),
    (SemanticType::Button, "cta-btn"),
    (SemanticType::Content, "main-content"),
];

/// Phrases that identify the requested mutation. First action with a hit wins.
pub const ACTION_KEYWORDS: &[(EditAction, &[&str])] = &[
    (
        EditAction::StyleUpdate,
        &[
            "color", "colour", "style", "bigger", "larger", "smaller", "font", "background",
            "highlight", "bold", "size",
        ],
    ),
    (
        EditAction::ContentUpdate,
        &["text", "content", "rename", "wording", "say", "label"],
    ),
    (
        EditAction::StructureUpdate,
        &["move", "reorder", "layout", "position", "align", "swap"],
    ),
    (EditAction::AddComponent, &["add", "insert", "create", "new"]),
    (EditAction::RemoveComponent, &["remove", "delete", "hide"]),
];

/// Words that make a request more concrete and earn a confidence bonus
pub const SPECIFICITY_HINTS: &[&str] = &["color", "size", "text", "style"];

/// Color words recognised in requests; the first six resolve through the token set
pub const COLOR_WORDS: &[&str] = &[
    "red", "blue", "green", "yellow", "purple", "orange", "black", "white", "gray", "grey",
    "pink",
];

pub fn fallback_id(semantic_type: SemanticType) -> Option<&'static str> {
    FALLBACK_IDS
        .iter()
        .find(|(t, _)| *t == semantic_type)
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_target_type_has_fallback() {
        for (semantic_type, _) in TARGET_KEYWORDS {
            assert!(fallback_id(*semantic_type).is_some(), "{}", semantic_type);
        }
        assert_eq!(fallback_id(SemanticType::Hero), Some("hero-section"));
        assert_eq!(fallback_id(SemanticType::Button), Some("cta-btn"));
        assert_eq!(fallback_id(SemanticType::Unknown), None);
    }

    #[test]
    fn test_action_table_order() {
        let order: Vec<EditAction> = ACTION_KEYWORDS.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            order,
            vec![
                EditAction::StyleUpdate,
                EditAction::ContentUpdate,
                EditAction::StructureUpdate,
                EditAction::AddComponent,
                EditAction::RemoveComponent,
            ]
        );
    }
}
