//! Reference formatter
//!
//! Turns a resolved file set into `#file:'<path>'` tokens, relative to the
//! workspace root where possible.

use crate::core::model::{FileSet, Reference, ReferenceToken};
use crate::core::paths::{display_path, normalize_separators, try_relativize};

/// Build one reference per file, in file set order
pub fn reference_tokens(base: Option<&str>, files: &FileSet) -> Vec<Reference> {
    files
        .iter()
        .map(|file| {
            let (path, relative) = match base.filter(|base| !base.is_empty()) {
                Some(base) => match try_relativize(base, file) {
                    Ok(path) => (normalize_separators(&path), true),
                    Err(_) => (display_path(file), false),
                },
                None => (display_path(file), false),
            };
            Reference {
                file: file.to_string(),
                token: ReferenceToken::new(&path),
                path,
                relative,
            }
        })
        .collect()
}

/// Join references into the text placed on the clipboard
fn join_tokens(references: &[Reference]) -> String {
    references
        .iter()
        .map(|reference| reference.token.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a file set as space-separated reference tokens.
///
/// An empty file set yields an empty string, meaning there is nothing to copy.
pub fn format(base: Option<&str>, files: &FileSet) -> String {
    join_tokens(&reference_tokens(base, files))
}
