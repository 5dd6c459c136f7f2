//! One editing turn: parse the request, apply it, validate the result.
//!
//! ```text
//! Idle -> Parsing -> (ParseFailed | Parsed) -> Applying -> (ApplyFailed | Applied)
//!      -> Validating -> (ValidationFailed | Committed)
//! Parsed -> NeedsGeneration   when the applier cannot express the intent
//! ```

use crate::applier::{locate_target, EditApplier};
use crate::prompt::EditPromptBuilder;
use crate::types::{EditResult, ValidationReport};
use crate::validator::EditValidator;
use std::fmt;
use tracing::{debug, info, warn};
use tubesite_analyzer::{EditIntent, IntentParser, IntentRejection};
use tubesite_common::{ChangeLogEntry, ChangeLogSink, EditError, EditorConfig, Result};
use tubesite_parsers::{dom, CatalogBuilder, ComponentCatalogEntry, DesignTokenExtractor, DesignTokenSet};

/// Stages of an editing turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    Idle,
    Parsing,
    Parsed,
    ParseFailed,
    Applying,
    Applied,
    ApplyFailed,
    Validating,
    ValidationFailed,
    Committed,
    NeedsGeneration,
}

impl fmt::Display for EditStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditStage::Idle => "idle",
            EditStage::Parsing => "parsing",
            EditStage::Parsed => "parsed",
            EditStage::ParseFailed => "parse_failed",
            EditStage::Applying => "applying",
            EditStage::Applied => "applied",
            EditStage::ApplyFailed => "apply_failed",
            EditStage::Validating => "validating",
            EditStage::ValidationFailed => "validation_failed",
            EditStage::Committed => "committed",
            EditStage::NeedsGeneration => "needs_generation",
        };
        f.write_str(name)
    }
}

/// Terminal state of a turn
#[derive(Debug)]
pub enum TurnOutcome {
    Committed {
        document: String,
        intent: EditIntent,
        result: EditResult,
        report: ValidationReport,
        entry: ChangeLogEntry,
    },
    ParseFailed(IntentRejection),
    ApplyFailed {
        intent: EditIntent,
        error: EditError,
    },
    ValidationFailed {
        intent: EditIntent,
        error: EditError,
    },
    /// The intent needs generated markup; `prompt` is ready to send to a model
    NeedsGeneration {
        intent: EditIntent,
        prompt: String,
    },
}

impl TurnOutcome {
    pub fn stage(&self) -> EditStage {
        match self {
            TurnOutcome::Committed { .. } => EditStage::Committed,
            TurnOutcome::ParseFailed(_) => EditStage::ParseFailed,
            TurnOutcome::ApplyFailed { .. } => EditStage::ApplyFailed,
            TurnOutcome::ValidationFailed { .. } => EditStage::ValidationFailed,
            TurnOutcome::NeedsGeneration { .. } => EditStage::NeedsGeneration,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, TurnOutcome::Committed { .. })
    }

    pub fn intent(&self) -> Option<&EditIntent> {
        match self {
            TurnOutcome::Committed { intent, .. }
            | TurnOutcome::ApplyFailed { intent, .. }
            | TurnOutcome::ValidationFailed { intent, .. }
            | TurnOutcome::NeedsGeneration { intent, .. } => Some(intent),
            TurnOutcome::ParseFailed(_) => None,
        }
    }

    /// Human readable reason for any outcome other than a commit
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            TurnOutcome::Committed { .. } | TurnOutcome::NeedsGeneration { .. } => None,
            TurnOutcome::ParseFailed(rejection) => Some(rejection.reason.to_string()),
            TurnOutcome::ApplyFailed { error, .. } | TurnOutcome::ValidationFailed { error, .. } => {
                Some(error.to_string())
            }
        }
    }
}

/// Document state owned by the caller between turns.
///
/// `catalog` and `tokens` describe `html` only as long as nobody edits `html`
/// directly; go through [`WorkingSet::replace_document`] to keep them fresh.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub html: String,
    pub css: Option<String>,
    pub catalog: Vec<ComponentCatalogEntry>,
    pub tokens: DesignTokenSet,
}

impl WorkingSet {
    pub fn new(html: impl Into<String>, css: Option<String>) -> Self {
        let html = html.into();
        let catalog = CatalogBuilder::new().build(&html);
        let tokens = DesignTokenExtractor::new().extract_from_html(&html, css.as_deref());
        Self {
            html,
            css,
            catalog,
            tokens,
        }
    }

    /// Swap in a new document and rebuild everything derived from it
    pub fn replace_document(&mut self, html: impl Into<String>) {
        self.html = html.into();
        self.catalog = CatalogBuilder::new().build(&self.html);
        self.tokens = DesignTokenExtractor::new().extract_from_html(&self.html, self.css.as_deref());
        debug!("Working set refreshed: {} components", self.catalog.len());
    }
}

/// Runs editing turns. Holds configuration only; never retries.
pub struct EditPipeline {
    parser: IntentParser,
    applier: EditApplier,
    validator: EditValidator,
    prompts: EditPromptBuilder,
}

impl EditPipeline {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            parser: IntentParser::new().with_config(config.clone()),
            applier: EditApplier::new(),
            validator: EditValidator::new().with_config(config),
            prompts: EditPromptBuilder::new(),
        }
    }

    pub fn run_turn(&self, working: &WorkingSet, request: &str) -> TurnOutcome {
        debug!("{} -> {}", EditStage::Idle, EditStage::Parsing);
        let intent = match self.parser.parse(request, &working.catalog, &working.tokens) {
            Ok(intent) => intent,
            Err(rejection) => {
                warn!("Edit request rejected: {}", rejection);
                return TurnOutcome::ParseFailed(rejection);
            }
        };
        debug!("{}: {} on {}", EditStage::Parsed, intent.action, intent.target_component_id);

        if !intent.is_directly_applicable() {
            let document = dom::parse_document(&working.html);
            let markup = locate_target(&document.root, &intent).map(|el| dom::serialize(el.as_node()));
            let prompt = self
                .prompts
                .build(request, &intent, markup.as_deref(), &working.tokens);
            info!(
                "Intent {} on {} needs generated markup",
                intent.action, intent.target_component_id
            );
            return TurnOutcome::NeedsGeneration { intent, prompt };
        }

        debug!("{} -> {}", EditStage::Parsed, EditStage::Applying);
        let applied = self
            .applier
            .try_apply(&intent, &working.html)
            .and_then(|(fragment, summary)| {
                let document = self.applier.splice(&working.html, &intent, &fragment)?;
                Ok((document, EditResult::applied(fragment, summary)))
            });
        let (document, result) = match applied {
            Ok(applied) => applied,
            Err(error) => {
                warn!("Edit on {} not applied: {}", intent.target_component_id, error);
                return TurnOutcome::ApplyFailed { intent, error };
            }
        };

        debug!("{} -> {}", EditStage::Applied, EditStage::Validating);
        let report = match self.validator.check(&working.html, &document) {
            Ok(report) => report,
            Err(error) => {
                warn!("Edit on {} failed validation: {}", intent.target_component_id, error);
                return TurnOutcome::ValidationFailed { intent, error };
            }
        };

        let summary = result.change_summary.clone().unwrap_or_default();
        info!("Committed {} on {}: {}", intent.action, intent.target_component_id, summary);
        let entry = ChangeLogEntry::new(intent.action, &intent.target_component_id, request.trim(), summary);

        TurnOutcome::Committed {
            document,
            intent,
            result,
            report,
            entry,
        }
    }

    /// Run a turn and, if it commits, update the working set and record the
    /// change. Other outcomes leave both untouched.
    pub fn run_and_commit(
        &self,
        working: &mut WorkingSet,
        request: &str,
        sink: &mut dyn ChangeLogSink,
    ) -> Result<TurnOutcome> {
        let outcome = self.run_turn(working, request);
        if let TurnOutcome::Committed { document, entry, .. } = &outcome {
            sink.append(entry.clone())?;
            working.replace_document(document.clone());
        }
        Ok(outcome)
    }
}

impl Default for EditPipeline {
    fn default() -> Self {
        Self::new()
    }
}
