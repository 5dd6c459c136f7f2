use crate::types::FileKind;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use tubesite_common::Result;
use tubesite_parsers::{CatalogBuilder, ComponentCatalogEntry, DesignTokenExtractor, DesignTokenSet};

/// Generated sites are small; anything bigger is not ours
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// The files of one generated site, keyed by path relative to the site root
#[derive(Debug, Clone, Default)]
pub struct ProjectFiles {
    files: BTreeMap<String, String>,
}

impl ProjectFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Read every HTML and CSS file under `root`, honoring ignore files.
    /// Files that cannot be read as UTF-8 are skipped with a warning.
    pub fn load_dir(root: &Path) -> Result<Self> {
        let mut project = Self::new();

        for entry in WalkBuilder::new(root).build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Error walking directory: {}", err);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if FileKind::from_extension(extension) == FileKind::Other {
                continue;
            }

            let size = match fs::metadata(path) {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!("Error reading metadata for {:?}: {}", path, err);
                    continue;
                }
            };
            if size > MAX_FILE_SIZE {
                debug!("Skipping large file: {:?} ({} bytes)", path, size);
                continue;
            }

            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("Error reading file {:?}: {}", path, err);
                    continue;
                }
            };
            project.insert(relative_path, content);
        }

        info!("Loaded {} site files from {:?}", project.len(), root);
        Ok(project)
    }

    fn files_of(&self, kind: FileKind) -> impl Iterator<Item = (&String, &String)> {
        self.files.iter().filter(move |(path, _)| {
            let extension = Path::new(path.as_str())
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            FileKind::from_extension(extension) == kind
        })
    }

    pub fn html_files(&self) -> Vec<&str> {
        self.files_of(FileKind::Html).map(|(path, _)| path.as_str()).collect()
    }

    /// Catalog of every HTML file, in path order. An id already taken by an
    /// earlier file is skipped so ids stay unique across the site.
    pub fn build_catalog(&self) -> Vec<ComponentCatalogEntry> {
        let mut catalog: Vec<ComponentCatalogEntry> = Vec::new();

        for (path, html) in self.files_of(FileKind::Html) {
            let entries = CatalogBuilder::new().with_source_file(path.as_str()).build(html);
            for entry in entries {
                if catalog.iter().any(|e| e.component_id == entry.component_id) {
                    debug!("Component '{}' in {} shadowed by an earlier file", entry.component_id, path);
                    continue;
                }
                catalog.push(entry);
            }
        }

        catalog
    }

    /// Concatenated text of every CSS file, in path order
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for (_, content) in self.files_of(FileKind::Css) {
            css.push_str(content);
            css.push('\n');
        }
        css
    }

    pub fn design_tokens(&self) -> DesignTokenSet {
        let extractor = DesignTokenExtractor::new();
        let mut inline = String::new();
        for (_, html) in self.files_of(FileKind::Html) {
            inline.push_str(html);
            inline.push('\n');
        }
        let css = self.stylesheet();
        extractor.extract_from_html(&inline, Some(&css))
    }
}
