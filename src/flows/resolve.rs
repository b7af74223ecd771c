//! Selection resolver
//!
//! Expands a heterogeneous selection (files, folders, projects, the solution)
//! into the flat set of regular files it stands for.

use crate::backends::probe::FileProbe;
use crate::core::model::{FileSet, Resolution, Skip, TreeNode};

/// Resolve a selection into the files it contains.
///
/// Traversal is depth-first in document order with an explicit worklist, so
/// deeply nested containers do not grow the call stack. A container whose
/// children cannot be enumerated contributes nothing and is recorded in
/// `Resolution::skipped`; resolution always completes.
pub fn resolve_detailed<P: FileProbe + ?Sized>(nodes: &[TreeNode], probe: &P) -> Resolution {
    let mut resolution = Resolution::default();
    let mut pending: Vec<&TreeNode> = nodes.iter().rev().collect();

    while let Some(node) = pending.pop() {
        match node {
            TreeNode::File { paths } => {
                match paths.iter().find(|path| probe.is_file(path)) {
                    Some(path) => {
                        resolution.files.insert(path.as_str());
                    }
                    None => resolution.skipped.push(Skip::Missing { node: node.label() }),
                }
            }
            TreeNode::Folder { children, .. }
            | TreeNode::Project { children, .. }
            | TreeNode::Solution { children, .. } => match children.listed() {
                Ok(children) => pending.extend(children.iter().rev()),
                Err(error) => resolution.skipped.push(Skip::Unenumerable {
                    node: node.label(),
                    error: error.to_string(),
                }),
            },
            TreeNode::Other => {}
        }
    }

    resolution
}

/// Resolve a selection, discarding the skip records
pub fn resolve<P: FileProbe + ?Sized>(nodes: &[TreeNode], probe: &P) -> FileSet {
    resolve_detailed(nodes, probe).files
}

/// Whether a node can take part in a reference copy.
///
/// Containers always qualify; a file item qualifies when any of its backing
/// paths exists. This never walks into children.
pub fn is_usable<P: FileProbe + ?Sized>(node: &TreeNode, probe: &P) -> bool {
    match node {
        TreeNode::File { paths } => paths.iter().any(|path| probe.is_file(path)),
        TreeNode::Folder { .. } | TreeNode::Project { .. } | TreeNode::Solution { .. } => true,
        TreeNode::Other => false,
    }
}
