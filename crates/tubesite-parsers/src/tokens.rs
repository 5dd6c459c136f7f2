use crate::dom;
use crate::types::DesignTokenSet;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenSlot {
    PrimaryColor,
    SecondaryColor,
    FontFamily,
    FontSize,
    Spacing,
    BorderRadius,
}

/// Custom-property name suffixes and the token each one feeds
const PROPERTY_SUFFIXES: &[(&str, TokenSlot)] = &[
    ("primary-color", TokenSlot::PrimaryColor),
    ("secondary-color", TokenSlot::SecondaryColor),
    ("font-family", TokenSlot::FontFamily),
    ("font-size", TokenSlot::FontSize),
    ("font-size-base", TokenSlot::FontSize),
    ("spacing", TokenSlot::Spacing),
    ("border-radius", TokenSlot::BorderRadius),
];

fn custom_property_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"--([A-Za-z0-9_-]+)\s*:\s*([^;}]+)").expect("custom property pattern is valid")
    })
}

fn plain_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[\s;{])color\s*:\s*([^;}]+)").expect("color pattern is valid")
    })
}

/// Design token extractor - pulls brand colors, fonts and spacing out of a stylesheet
pub struct DesignTokenExtractor;

impl DesignTokenExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract tokens from CSS text. Never fails; anything not found keeps its default.
    pub fn extract(&self, css: &str) -> DesignTokenSet {
        let mut tokens = DesignTokenSet::default();
        let mut found_custom = false;

        for caps in custom_property_re().captures_iter(css) {
            let name = caps[1].to_lowercase();
            let value = caps[2].trim().to_string();
            if value.is_empty() {
                continue;
            }

            if let Some(slot) = Self::slot_for(&name) {
                debug!("Design token --{} = {}", name, value);
                Self::assign(&mut tokens, slot, value);
                found_custom = true;
            }
        }

        // Fallback: first plain color declaration stands in for the brand color
        if !found_custom {
            if let Some(caps) = plain_color_re().captures(css) {
                let value = caps[1].trim();
                if !value.is_empty() {
                    debug!("No custom properties, using first color declaration {}", value);
                    tokens.primary_color = value.to_string();
                }
            }
        }

        tokens
    }

    /// Extract tokens from every `<style>` block of a page plus optional external CSS
    pub fn extract_from_html(&self, html: &str, external_css: Option<&str>) -> DesignTokenSet {
        let document = dom::parse_document(html);
        let mut css = String::new();

        if let Ok(styles) = document.root.select("style") {
            for style in styles {
                css.push_str(&style.as_node().text_contents());
                css.push('\n');
            }
        }
        if let Some(external) = external_css {
            css.push_str(external);
        }

        self.extract(&css)
    }

    // Longest suffix wins so `font-size-base` is not mistaken for a shorter name
    fn slot_for(name: &str) -> Option<TokenSlot> {
        PROPERTY_SUFFIXES
            .iter()
            .filter(|(suffix, _)| name.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len())
            .map(|(_, slot)| *slot)
    }

    fn assign(tokens: &mut DesignTokenSet, slot: TokenSlot, value: String) {
        match slot {
            TokenSlot::PrimaryColor => tokens.primary_color = value,
            TokenSlot::SecondaryColor => tokens.secondary_color = value,
            TokenSlot::FontFamily => tokens.font_family = value,
            TokenSlot::FontSize => tokens.font_size_base = value,
            TokenSlot::Spacing => tokens.spacing = value,
            TokenSlot::BorderRadius => tokens.border_radius = value,
        }
    }
}

impl Default for DesignTokenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract tokens from CSS text with the default extractor
pub fn extract_tokens(css: &str) -> DesignTokenSet {
    DesignTokenExtractor::new().extract(css)
}

/// Extract tokens from a page's `<style>` blocks plus optional external CSS
pub fn extract_tokens_from_html(html: &str, extra_css: Option<&str>) -> DesignTokenSet {
    DesignTokenExtractor::new().extract_from_html(html, extra_css)
}
