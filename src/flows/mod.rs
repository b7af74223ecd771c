//! Flows module - Selection to clipboard
//!
//! - resolve: Expand a selection into a deduplicated file set
//! - reference: Format files as `#file:'...'` references
//! - command: Visibility check and copy action

pub mod command;
pub mod reference;
pub mod resolve;
