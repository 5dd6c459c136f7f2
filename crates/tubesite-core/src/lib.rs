//! Targeted edits of generated channel sites: apply an [`EditIntent`] to one
//! component, validate the result and run whole editing turns.
//!
//! [`EditIntent`]: tubesite_analyzer::EditIntent

pub mod applier;
pub mod pipeline;
pub mod project;
pub mod prompt;
pub mod types;
pub mod validator;

pub use applier::{locate_target, EditApplier};
pub use pipeline::{EditPipeline, EditStage, TurnOutcome, WorkingSet};
pub use project::ProjectFiles;
pub use prompt::EditPromptBuilder;
pub use types::{EditResult, FileKind, ValidationReport};
pub use validator::EditValidator;
