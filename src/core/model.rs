//! Workspace Tree Model
//!
//! The host's selection is modelled as a tagged tree: files carry their on-disk
//! paths, containers (folders, projects, the solution) carry their children.
//! Everything downstream (resolving, formatting, rendering) works on these types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
    Project,
    Solution,
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
            NodeKind::Project => "project",
            NodeKind::Solution => "solution",
            NodeKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Children of a container node.
///
/// Enumeration may fail for a single container (an unloaded project, an
/// unreadable directory); that is recorded here instead of aborting the
/// whole selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Listed(Vec<TreeNode>),
    Unavailable { error: String },
}

impl Children {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Children::Unavailable {
            error: error.into(),
        }
    }

    /// Borrow the listed children, or the reason they could not be enumerated
    pub fn listed(&self) -> Result<&[TreeNode], &str> {
        match self {
            Children::Listed(nodes) => Ok(nodes),
            Children::Unavailable { error } => Err(error),
        }
    }
}

impl Default for Children {
    fn default() -> Self {
        Children::Listed(Vec::new())
    }
}

impl From<Vec<TreeNode>> for Children {
    fn from(nodes: Vec<TreeNode>) -> Self {
        Children::Listed(nodes)
    }
}

/// A node of the host's workspace tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    /// A file item. The first path is the primary one; an item may be backed
    /// by several files on disk (e.g. a form and its designer file).
    File {
        #[serde(default)]
        paths: Vec<String>,
    },
    Folder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        children: Children,
    },
    Project {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        children: Children,
    },
    Solution {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        children: Children,
    },
    #[serde(other)]
    Other,
}

impl TreeNode {
    /// Create a file node backed by a single path
    pub fn file(path: impl Into<String>) -> Self {
        TreeNode::File {
            paths: vec![path.into()],
        }
    }

    /// Create a folder node
    #[allow(dead_code)]
    pub fn folder(name: impl Into<String>, children: impl Into<Children>) -> Self {
        TreeNode::Folder {
            name: Some(name.into()),
            children: children.into(),
        }
    }

    /// Create a project node
    #[allow(dead_code)]
    pub fn project(name: impl Into<String>, children: impl Into<Children>) -> Self {
        TreeNode::Project {
            name: Some(name.into()),
            children: children.into(),
        }
    }

    /// Create a solution node
    #[allow(dead_code)]
    pub fn solution(name: impl Into<String>, children: impl Into<Children>) -> Self {
        TreeNode::Solution {
            name: Some(name.into()),
            children: children.into(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::File { .. } => NodeKind::File,
            TreeNode::Folder { .. } => NodeKind::Folder,
            TreeNode::Project { .. } => NodeKind::Project,
            TreeNode::Solution { .. } => NodeKind::Solution,
            TreeNode::Other => NodeKind::Other,
        }
    }

    /// Human-readable label used in diagnostics
    pub fn label(&self) -> String {
        match self {
            TreeNode::File { paths } => paths
                .first()
                .cloned()
                .unwrap_or_else(|| "<unnamed file>".to_string()),
            TreeNode::Folder { name, .. }
            | TreeNode::Project { name, .. }
            | TreeNode::Solution { name, .. } => match name {
                Some(name) => format!("{} {}", self.kind(), name),
                None => format!("unnamed {}", self.kind()),
            },
            TreeNode::Other => "other item".to_string(),
        }
    }
}

/// A set of absolute file paths, compared case-insensitively.
///
/// Iteration follows insertion order; the first spelling of a path wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSet {
    entries: IndexMap<String, String>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path, returning false if an equivalent path is already present
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        let key = path.to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, path);
        true
    }

    #[allow(dead_code)]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&path.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}

impl Serialize for FileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<S: Into<String>> FromIterator<S> for FileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

/// A `#file:'<path>'` reference understood by AI chat inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceToken(String);

impl ReferenceToken {
    pub fn new(path: &str) -> Self {
        Self(format!("#file:'{}'", path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One formatted file reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    /// Absolute path as resolved from the selection
    pub file: String,

    /// Path written into the token, using '/' as separator
    pub path: String,

    /// The formatted token
    pub token: ReferenceToken,

    /// Whether `path` is relative to the workspace root
    pub relative: bool,
}

/// Why part of a selection contributed no files
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Skip {
    /// A container whose children could not be enumerated
    Unenumerable { node: String, error: String },
    /// A file item none of whose paths exists as a regular file
    Missing { node: String },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Unenumerable { node, error } => write!(f, "skipped {}: {}", node, error),
            Skip::Missing { node } => write!(f, "skipped {}: no such file", node),
        }
    }
}

/// Output of the selection resolver
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub files: FileSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Skip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_set_dedups_case_insensitively() {
        let mut set = FileSet::new();
        assert!(set.insert("C:\\Sol\\A.cs"));
        assert!(!set.insert("c:\\sol\\a.CS"));
        assert_eq!(set.len(), 1);
        // first spelling wins
        assert_eq!(set.iter().next(), Some("C:\\Sol\\A.cs"));
        assert!(set.contains("C:\\SOL\\A.CS"));
    }

    #[test]
    fn test_file_set_keeps_insertion_order() {
        let set: FileSet = ["/b", "/a", "/c", "/A"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_reference_token_shape() {
        let token = ReferenceToken::new("src/a.cs");
        assert_eq!(token.as_str(), "#file:'src/a.cs'");
        assert_eq!(token.to_string(), "#file:'src/a.cs'");
    }

    #[test]
    fn test_tree_node_deserializes_tagged_json() {
        let json = r#"{
            "kind": "folder",
            "name": "lib",
            "children": [
                { "kind": "file", "paths": ["C:\\Sol\\lib\\x.cs"] },
                { "kind": "project", "children": { "error": "project unloaded" } },
                { "kind": "reference" }
            ]
        }"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();

        let TreeNode::Folder { name, children } = &node else {
            panic!("expected folder, got {:?}", node);
        };
        assert_eq!(name.as_deref(), Some("lib"));
        let children = children.listed().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0], TreeNode::file("C:\\Sol\\lib\\x.cs"));
        assert_eq!(children[1].kind(), NodeKind::Project);
        assert!(matches!(
            &children[1],
            TreeNode::Project { children: Children::Unavailable { error }, .. } if error == "project unloaded"
        ));
        assert_eq!(children[2], TreeNode::Other);
    }

    #[test]
    fn test_container_children_default_to_empty() {
        let node: TreeNode = serde_json::from_str(r#"{"kind":"solution"}"#).unwrap();
        assert_eq!(
            node,
            TreeNode::Solution {
                name: None,
                children: Children::default()
            }
        );
    }

    #[test]
    fn test_file_set_serializes_as_array() {
        let set: FileSet = ["/x/a.rs", "/x/b.rs"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["/x/a.rs","/x/b.rs"]"#);
    }

    #[test]
    fn test_node_label() {
        assert_eq!(TreeNode::file("/a.rs").label(), "/a.rs");
        assert_eq!(TreeNode::folder("src", vec![]).label(), "folder src");
        assert_eq!(TreeNode::Other.label(), "other item");
    }
}
