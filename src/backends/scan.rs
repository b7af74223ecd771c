//! Disk-backed workspace tree
//!
//! Builds `TreeNode`s for paths picked on the command line. Directory listings
//! go through the ignore crate (or walkdir when ignore rules are disabled) and
//! are sorted by file name for stable output.

use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::model::{Children, TreeNode};
use crate::core::paths::is_hidden;

/// Files whose presence marks a directory as a project
const PROJECT_MANIFESTS: &[&str] = &[
    "Cargo.toml",
    "package.json",
    "pyproject.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
];

/// Extensions of MSBuild-style project files
const PROJECT_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj", "vcxproj"];

/// How directories are listed
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Include hidden entries (dotfiles)
    pub hidden: bool,
    /// Honor .gitignore/.ignore files
    pub ignore: bool,
    /// Stop listing children below this depth
    pub max_depth: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            ignore: true,
            max_depth: None,
        }
    }
}

impl LoadOptions {
    pub fn new(hidden: bool, ignore: bool) -> Self {
        Self {
            hidden,
            ignore,
            max_depth: None,
        }
    }

    /// Only classify the selected paths, without listing directories
    pub fn shallow(mut self) -> Self {
        self.max_depth = Some(0);
        self
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Absolute, canonical form of a selected path (relative paths are under root).
///
/// Files keep their own name so a symlinked file is referenced where it was
/// selected, not where it points.
fn absolute_selection(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    if joined.is_dir() {
        return joined.canonicalize().unwrap_or(joined);
    }

    match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|parent| parent.join(name))
            .unwrap_or(joined),
        _ => joined,
    }
}

/// Whether a directory directly contains a project manifest
pub fn is_project_dir(dir: &Path) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return false,
    };

    entries.filter_map(|entry| entry.ok()).any(|entry| {
        let path = entry.path();
        if !path.is_file() {
            return false;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        PROJECT_MANIFESTS.contains(&name.as_ref())
            || path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| PROJECT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
    })
}

/// List the direct entries of a directory in file-name order
fn read_entries(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, String> {
    let mut entries = Vec::new();

    if options.ignore {
        let mut builder = WalkBuilder::new(dir);
        builder
            .max_depth(Some(1))
            .hidden(!options.hidden)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        for entry in builder.build() {
            let entry = entry.map_err(|e| e.to_string())?;
            if entry.depth() == 0 {
                continue;
            }
            entries.push(entry.into_path());
        }
    } else {
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| e.to_string())?;
            if !options.hidden && is_hidden(entry.path()) {
                continue;
            }
            entries.push(entry.into_path());
        }
    }

    Ok(entries)
}

/// A symbolic link (or junction) that points at a directory.
///
/// Listings never descend through these: a link back to an ancestor would
/// otherwise repeat the same files under ever longer paths.
fn is_linked_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink())
        && path.is_dir()
}

fn load_children(root: &Path, dir: &Path, options: &LoadOptions, depth: usize) -> Children {
    if options.max_depth.is_some_and(|max| depth >= max) {
        return Children::default();
    }

    match read_entries(dir, options) {
        Ok(entries) => Children::Listed(
            entries
                .iter()
                .filter(|entry| !is_linked_dir(entry))
                .map(|entry| load_node(root, entry, options, depth + 1))
                .collect(),
        ),
        Err(error) => Children::unavailable(error),
    }
}

/// Build the tree node for one absolute path.
///
/// The workspace root is the solution, directories holding a project manifest
/// are projects, other directories are folders. Missing paths become file
/// nodes so the resolver can report them; anything that is neither a file nor
/// a directory is `Other`.
pub fn load_node(root: &Path, path: &Path, options: &LoadOptions, depth: usize) -> TreeNode {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return TreeNode::file(path_string(path)),
    };

    if metadata.is_file() {
        return TreeNode::file(path_string(path));
    }
    if !metadata.is_dir() {
        return TreeNode::Other;
    }

    let name = Some(path_string(path));
    let children = load_children(root, path, options, depth);

    if path == root {
        TreeNode::Solution { name, children }
    } else if is_project_dir(path) {
        TreeNode::Project { name, children }
    } else {
        TreeNode::Folder { name, children }
    }
}

/// Build the selection for paths given relative to `root` (or absolute)
pub fn load_selection(root: &Path, paths: &[PathBuf], options: &LoadOptions) -> Vec<TreeNode> {
    paths
        .iter()
        .map(|path| load_node(root, &absolute_selection(root, path), options, 0))
        .collect()
}
