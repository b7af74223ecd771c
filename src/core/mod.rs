//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Workspace tree model (TreeNode, FileSet, ReferenceToken)
//! - Path relativization
//! - Rendering functions for different output formats

pub mod model;
pub mod paths;
pub mod render;
