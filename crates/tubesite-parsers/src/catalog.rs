use crate::dom::{self, ParsedDocument};
use crate::types::{ComponentCatalogEntry, SelectorHint};
use kuchikiki::traits::*;
use std::collections::HashSet;
use tracing::debug;
use tubesite_common::SemanticType;

pub const DEFAULT_SOURCE_FILE: &str = "index.html";

/// Structurally significant selectors scanned after explicit ids, in order
pub const STRUCTURAL_SELECTORS: &[&str] = &[
    "header",
    ".hero, [class*=\"hero\"]",
    "nav",
    "footer",
    "button",
    ".video-gallery, [class*=\"video-gallery\"]",
];

/// Keyword table for semantic type inference. Order is priority: first hit wins.
pub const SEMANTIC_KEYWORDS: &[(SemanticType, &[&str])] = &[
    (SemanticType::Header, &["header"]),
    (SemanticType::Navigation, &["nav"]),
    (SemanticType::Footer, &["footer"]),
    (SemanticType::Button, &["button", "btn"]),
    (SemanticType::Hero, &["hero"]),
    (SemanticType::Video, &["video"]),
    (SemanticType::Content, &["content", "section", "main", "article"]),
];

/// Infer a semantic type from an element's tag, id and class string
pub fn infer_semantic_type(tag: &str, id: &str, classes: &str) -> SemanticType {
    let haystack = format!("{} {} {}", tag, id, classes).to_lowercase();
    SEMANTIC_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(semantic_type, _)| *semantic_type)
        .unwrap_or(SemanticType::Unknown)
}

/// Builds the component catalog of a generated page.
///
/// The catalog is a disposable view of one document version: callers must
/// rebuild it after every change to the document.
pub struct CatalogBuilder {
    source_file: String,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            source_file: DEFAULT_SOURCE_FILE.to_string(),
        }
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    pub fn build(&self, html: &str) -> Vec<ComponentCatalogEntry> {
        let document = dom::parse_document(html);
        self.build_from(&document)
    }

    pub fn build_from(&self, document: &ParsedDocument) -> Vec<ComponentCatalogEntry> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        // Pass 1: explicit ids, verbatim
        for element in document.root.descendants().elements() {
            let Some(id) = dom::attribute(&element, "id") else {
                continue;
            };
            if id.trim().is_empty() {
                continue;
            }
            if !seen.insert(id.clone()) {
                debug!("Duplicate component id '{}' ignored", id);
                continue;
            }

            let tag = dom::tag_name(&element);
            let classes = dom::class_list(&element);
            entries.push(ComponentCatalogEntry {
                semantic_type: infer_semantic_type(&tag, &id, &classes.join(" ")),
                dom_selector_hint: SelectorHint::for_id(&id),
                component_id: id,
                source_file: self.source_file.clone(),
                tag_name: tag,
                css_classes: classes,
            });
        }

        // Pass 2: structural elements without an id get a synthesized one
        for selector in STRUCTURAL_SELECTORS {
            let matches = match document.root.select(selector) {
                Ok(matches) => matches,
                Err(()) => continue,
            };

            for (index, element) in matches.enumerate() {
                // Blank ids were not catalogued in pass 1
                let has_id = dom::attribute(&element, "id").map_or(false, |id| !id.trim().is_empty());
                if has_id {
                    continue;
                }

                let tag = dom::tag_name(&element);
                let classes = dom::class_list(&element);
                let semantic_type = infer_semantic_type(&tag, "", &classes.join(" "));
                let component_id = format!("{}-{}", semantic_type, index);

                if !seen.insert(component_id.clone()) {
                    debug!("Synthesized id '{}' already taken, keeping the first", component_id);
                    continue;
                }

                entries.push(ComponentCatalogEntry {
                    component_id,
                    semantic_type,
                    source_file: self.source_file.clone(),
                    tag_name: tag,
                    css_classes: classes,
                    dom_selector_hint: SelectorHint {
                        selector: selector.to_string(),
                        index,
                    },
                });
            }
        }

        debug!(
            "Built catalog with {} components from {}",
            entries.len(),
            self.source_file
        );
        entries
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a catalog for a single-page site
pub fn build_catalog(html: &str) -> Vec<ComponentCatalogEntry> {
    CatalogBuilder::new().build(html)
}

pub fn build_catalog_for_file(html: &str, source_file: &str) -> Vec<ComponentCatalogEntry> {
    CatalogBuilder::new().with_source_file(source_file).build(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <header class="site-header"><h1 id="channel-title">My Channel</h1></header>
        <nav><a href="#videos">Videos</a></nav>
        <section class="hero"><button id="cta-btn" class="btn subscribe">Subscribe</button></section>
        <div class="video-gallery"><div class="video-card">One</div></div>
        <footer><p>© 2024</p></footer>
    "##;

    #[test]
    fn test_explicit_ids_come_first() {
        let catalog = build_catalog(PAGE);
        assert_eq!(catalog[0].component_id, "channel-title");
        assert_eq!(catalog[1].component_id, "cta-btn");
        assert_eq!(catalog[1].semantic_type, SemanticType::Button);
        assert_eq!(catalog[1].css_classes, vec!["btn", "subscribe"]);
        assert_eq!(catalog[1].dom_selector_hint.selector, "#cta-btn");
    }

    #[test]
    fn test_structural_elements_get_synthesized_ids() {
        let catalog = build_catalog(PAGE);
        let ids: Vec<&str> = catalog.iter().map(|e| e.component_id.as_str()).collect();

        assert!(ids.contains(&"header-0"));
        assert!(ids.contains(&"navigation-0"));
        assert!(ids.contains(&"hero-0"));
        assert!(ids.contains(&"footer-0"));
        assert!(ids.contains(&"video-0"));
        // The subscribe button already has an id, so no button-N entry
        assert!(!ids.iter().any(|id| id.starts_with("button-")));
    }

    #[test]
    fn test_synthesized_entry_records_selector() {
        let catalog = build_catalog(PAGE);
        let footer = catalog.iter().find(|e| e.component_id == "footer-0").unwrap();
        assert_eq!(footer.dom_selector_hint.selector, "footer");
        assert_eq!(footer.dom_selector_hint.index, 0);
        assert_eq!(footer.source_file, DEFAULT_SOURCE_FILE);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = build_catalog(r#"<p id="x" class="a">1</p><p id="x" class="b">2</p>"#);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].css_classes, vec!["a"]);
    }

    #[test]
    fn test_empty_document_gives_empty_catalog() {
        assert!(build_catalog("").is_empty());
        assert!(build_catalog("<p>plain text</p>").is_empty());
    }

    #[test]
    fn test_inference_priority() {
        assert_eq!(infer_semantic_type("div", "", "header-nav"), SemanticType::Header);
        assert_eq!(infer_semantic_type("a", "", "btn hero-btn"), SemanticType::Button);
        assert_eq!(infer_semantic_type("div", "", "hero video"), SemanticType::Hero);
        assert_eq!(infer_semantic_type("section", "", ""), SemanticType::Content);
        assert_eq!(infer_semantic_type("span", "", "badge"), SemanticType::Unknown);
    }

    #[test]
    fn test_custom_source_file() {
        let catalog = build_catalog_for_file(r#"<div id="bio"></div>"#, "about.html");
        assert_eq!(catalog[0].source_file, "about.html");
    }

    #[test]
    fn test_blank_id_element_is_synthesized() {
        for html in [r#"<footer id="">x</footer>"#, r#"<footer id="  ">x</footer>"#] {
            let catalog = build_catalog(html);
            assert_eq!(catalog.len(), 1, "{}", html);
            assert_eq!(catalog[0].component_id, "footer-0");
            assert_eq!(catalog[0].semantic_type, SemanticType::Footer);
        }
    }
}
