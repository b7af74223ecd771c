//! Selection manifests
//!
//! Editor integrations describe the current workspace selection as JSON:
//!
//! ```json
//! {
//!   "root": "C:\\Sol",
//!   "selection": [
//!     { "kind": "file", "paths": ["C:\\Sol\\src\\a.cs"] },
//!     { "kind": "folder", "name": "lib", "children": [] }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::model::TreeNode;

/// Workspace root plus the selected nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionManifest {
    /// Directory references are made relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(default)]
    pub selection: Vec<TreeNode>,
}

impl SelectionManifest {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse selection manifest")
    }
}

/// Read a manifest from a file, or from stdin when `source` is `-`
pub fn read_manifest(source: &Path) -> Result<SelectionManifest> {
    let json = if source == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read selection manifest from stdin")?;
        buffer
    } else {
        fs::read_to_string(source)
            .with_context(|| format!("Failed to read selection manifest {}", source.display()))?
    };

    SelectionManifest::parse(&json)
}
