//! Intent parsing for targeted page edits.
//!
//! Turns a free-text request such as "make the subscribe button red" into an
//! [`EditIntent`] resolved against the component catalog of the current page.

pub mod intent;
pub mod keywords;
pub mod parser;

pub use intent::{EditIntent, EditUpdates, IntentRejection};
pub use parser::IntentParser;
