//! Filesystem probe
//!
//! The resolver only needs one question answered about a path: is it a regular
//! file right now? Races with concurrent filesystem changes are accepted.

use std::path::Path;

/// Existence check used by the resolver
pub trait FileProbe {
    /// True if `path` exists and is a regular file (not a directory)
    fn is_file(&self, path: &str) -> bool;
}

/// Probe backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileProbe for LocalFs {
    fn is_file(&self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).is_file()
    }
}

#[cfg(test)]
pub mod fake {
    use super::FileProbe;
    use std::collections::HashSet;

    /// In-memory probe; paths are compared exactly as given
    #[derive(Debug, Default)]
    pub struct FakeFs {
        files: HashSet<String>,
    }

    impl FakeFs {
        pub fn with_files<'a>(files: impl IntoIterator<Item = &'a str>) -> Self {
            Self {
                files: files.into_iter().map(str::to_string).collect(),
            }
        }
    }

    impl FileProbe for FakeFs {
        fn is_file(&self, path: &str) -> bool {
            self.files.contains(path)
        }
    }
}
