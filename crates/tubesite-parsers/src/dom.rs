//! Thin helpers over the `kuchikiki` tree: parsing with error capture,
//! element lookup and serialization.

use kuchikiki::traits::*;
use kuchikiki::{ElementData, NodeDataRef, NodeRef, ParseOpts};
use regex::Regex;
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

/// A parsed HTML document together with the parser's error reports
pub struct ParsedDocument {
    pub root: NodeRef,
    pub parse_errors: Vec<String>,
}

impl ParsedDocument {
    pub fn element_count(&self) -> usize {
        element_count(&self.root)
    }
}

/// Parse a full document or a bare fragment. Never fails; problems are
/// collected in `parse_errors`.
pub fn parse_document(html: &str) -> ParsedDocument {
    let errors: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);

    let opts = ParseOpts {
        on_parse_error: Some(Box::new(move |message: Cow<'static, str>| {
            sink.borrow_mut().push(message.into_owned());
        })),
        ..Default::default()
    };

    let root = kuchikiki::parse_html_with_options(opts).one(html);
    let parse_errors = std::mem::take(&mut *errors.borrow_mut());

    ParsedDocument { root, parse_errors }
}

pub fn element_count(root: &NodeRef) -> usize {
    root.descendants().elements().count()
}

pub fn tag_name(element: &ElementData) -> String {
    element.name.local.to_string().to_lowercase()
}

pub fn attribute(element: &ElementData, name: &str) -> Option<String> {
    element.attributes.borrow().get(name).map(str::to_string)
}

/// Class tokens in document order, duplicates dropped
pub fn class_list(element: &ElementData) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    if let Some(raw) = attribute(element, "class") {
        for class in raw.split_whitespace() {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
    }
    classes
}

pub fn find_by_id(root: &NodeRef, id: &str) -> Option<NodeDataRef<ElementData>> {
    root.descendants()
        .elements()
        .find(|el| el.attributes.borrow().get("id") == Some(id))
}

pub fn find_by_class(root: &NodeRef, class: &str) -> Option<NodeDataRef<ElementData>> {
    root.descendants()
        .elements()
        .find(|el| class_list(el).iter().any(|c| c == class))
}

/// The `index`-th match of a selector, if the selector parses and matches
pub fn select_nth(root: &NodeRef, selector: &str, index: usize) -> Option<NodeDataRef<ElementData>> {
    root.select(selector).ok()?.nth(index)
}

/// Serialize a node including itself (documents serialize their children)
pub fn serialize(node: &NodeRef) -> String {
    node.to_string()
}

fn opaque_markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("opaque markup pattern is valid")
    })
}

fn document_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<(?:!doctype|html|head|body)[\s>/]").expect("document tag pattern is valid")
    })
}

/// True when the source is a whole page: it has a doctype or its own
/// `<html>`, `<head>` or `<body>` tag. Comments and script or style text
/// do not count.
pub fn is_full_document(html: &str) -> bool {
    let visible = opaque_markup_re().replace_all(html, "");
    document_tag_re().is_match(&visible)
}

/// Top-level nodes of a parsed fragment: whatever the parser hoisted into
/// `<head>`, then the body content
pub fn fragment_nodes(root: &NodeRef) -> Vec<NodeRef> {
    let mut nodes = Vec::new();
    for container in ["head", "body"] {
        if let Ok(element) = root.select_first(container) {
            nodes.extend(element.as_node().children());
        }
    }
    nodes
}

/// Serialize a parsed document back to text. Whole pages come back whole;
/// bare fragments come back as their head and body content so callers get
/// out what they put in.
pub fn serialize_document(root: &NodeRef, full_document: bool) -> String {
    if full_document {
        return serialize(root);
    }

    fragment_nodes(root).iter().map(serialize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_gets_wrapped() {
        let doc = parse_document("<div id=\"a\"><p>hi</p></div>");
        // html, head, body, div, p
        assert_eq!(doc.element_count(), 5);
    }

    #[test]
    fn test_class_list_dedupes() {
        let doc = parse_document("<div class=\"btn  btn primary\"></div>");
        let div = doc.root.select_first("div").unwrap();
        assert_eq!(class_list(&div), vec!["btn".to_string(), "primary".to_string()]);
    }

    #[test]
    fn test_find_by_id_and_class() {
        let doc = parse_document("<p class=\"intro\">x</p><p id=\"intro\">y</p>");
        let by_id = find_by_id(&doc.root, "intro").unwrap();
        assert_eq!(by_id.as_node().text_contents(), "y");
        let by_class = find_by_class(&doc.root, "intro").unwrap();
        assert_eq!(by_class.as_node().text_contents(), "x");
        assert!(find_by_id(&doc.root, "missing").is_none());
    }

    #[test]
    fn test_select_nth() {
        let doc = parse_document("<button>a</button><button>b</button>");
        let second = select_nth(&doc.root, "button", 1).unwrap();
        assert_eq!(second.as_node().text_contents(), "b");
        assert!(select_nth(&doc.root, "button", 2).is_none());
        assert!(select_nth(&doc.root, "[[bad", 0).is_none());
    }

    #[test]
    fn test_serialize_fragment_round_trip() {
        let html = "<section id=\"s\"><h1>Title</h1></section>";
        let doc = parse_document(html);
        assert_eq!(serialize_document(&doc.root, is_full_document(html)), html);
    }

    #[test]
    fn test_fragment_keeps_hoisted_head_nodes() {
        let html = "<style>.btn{padding:4px}</style><button id=\"cta-btn\" class=\"btn\">Sub</button>";
        let doc = parse_document(html);
        assert!(!is_full_document(html));
        assert_eq!(serialize_document(&doc.root, false), html);
    }

    #[test]
    fn test_full_document_detection() {
        assert!(is_full_document("<!DOCTYPE html>\n<head><title>x</title></head><body></body>"));
        assert!(is_full_document("<body><p>x</p></body>"));
        assert!(is_full_document("<HTML lang=\"en\"></HTML>"));
        assert!(!is_full_document("<section><h1>x</h1></section>"));
        assert!(!is_full_document("<!-- <html> --><p>x</p>"));
        assert!(!is_full_document("<script>document.write('<html>')</script><p>x</p>"));
        // Tags that merely start with a document tag name
        assert!(!is_full_document("<header><p>x</p></header>"));
        assert!(!is_full_document("<bodytext>x</bodytext>"));
    }

    #[test]
    fn test_full_document_keeps_doctype() {
        let html = "<!DOCTYPE html><html><head><title>Ana</title></head><body><p>x</p></body></html>";
        let doc = parse_document(html);
        assert_eq!(serialize_document(&doc.root, is_full_document(html)), html);
    }
}
