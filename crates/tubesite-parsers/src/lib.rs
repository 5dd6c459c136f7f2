pub mod catalog;
pub mod dom;
pub mod tokens;
pub mod types;

pub use catalog::{build_catalog, build_catalog_for_file, infer_semantic_type, CatalogBuilder};
pub use dom::{parse_document, ParsedDocument};
pub use tokens::{extract_tokens, extract_tokens_from_html, DesignTokenExtractor};
pub use types::{ComponentCatalogEntry, DesignTokenSet, SelectorHint};
