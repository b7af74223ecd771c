//! Backends module - Collaborators outside the resolver and formatter
//!
//! Provides:
//! - probe: Regular-file existence checks
//! - scan: Workspace tree built from disk with ignore/walkdir
//! - manifest: JSON selection manifests from editor integrations
//! - clipboard: System clipboard via arboard

pub mod clipboard;
pub mod manifest;
pub mod probe;
pub mod scan;
