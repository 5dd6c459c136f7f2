use crate::types::ValidationReport;
use tracing::debug;
use tubesite_common::{DocumentRole, EditError, EditorConfig};
use tubesite_parsers::dom;

/// Checks that an edited document is still structurally sound.
///
/// The HTML5 parser reports conformance errors for most generated pages
/// (a missing doctype is enough), so by default the original document sets
/// the baseline: the modified one may not report more errors than it. With
/// `strict_parse` any parse error in either document fails.
pub struct EditValidator {
    config: EditorConfig,
}

impl EditValidator {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Advisory pass/fail
    pub fn validate(&self, original: &str, modified: &str) -> bool {
        match self.check(original, modified) {
            Ok(_) => true,
            Err(err) => {
                debug!("Validation failed: {}", err);
                false
            }
        }
    }

    pub fn check(&self, original: &str, modified: &str) -> Result<ValidationReport, EditError> {
        let before = dom::parse_document(original);
        let after = dom::parse_document(modified);

        let report = ValidationReport {
            original_elements: before.element_count(),
            modified_elements: after.element_count(),
            element_delta: before.element_count().abs_diff(after.element_count()),
            original_parse_errors: before.parse_errors.len(),
            modified_parse_errors: after.parse_errors.len(),
        };

        if self.config.strict_parse {
            if report.original_parse_errors > 0 {
                return Err(EditError::MalformedDocument {
                    document: DocumentRole::Original,
                    errors: report.original_parse_errors,
                });
            }
            if report.modified_parse_errors > 0 {
                return Err(EditError::MalformedDocument {
                    document: DocumentRole::Modified,
                    errors: report.modified_parse_errors,
                });
            }
        } else {
            let blanked = modified.trim().is_empty() && !original.trim().is_empty();
            if blanked || report.modified_parse_errors > report.original_parse_errors {
                for message in &after.parse_errors {
                    debug!("Parse error in modified document: {}", message);
                }
                return Err(EditError::MalformedDocument {
                    document: DocumentRole::Modified,
                    errors: report.modified_parse_errors,
                });
            }
        }

        if report.element_delta > self.config.drift_tolerance {
            return Err(EditError::StructuralDrift {
                delta: report.element_delta,
                tolerance: self.config.drift_tolerance,
            });
        }

        Ok(report)
    }
}

impl Default for EditValidator {
    fn default() -> Self {
        Self::new()
    }
}
