//! File-size lookup backed by filesystem metadata.

use std::io;
use std::path::PathBuf;

/// Size of a candidate file in bytes.
pub trait FileSizes {
    fn size_of(&self, file: &str) -> io::Result<u64>;
}

/// Reads sizes from `std::fs::metadata`, optionally relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FsFileSizes {
    root: Option<PathBuf>,
}

impl FsFileSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl FileSizes for FsFileSizes {
    fn size_of(&self, file: &str) -> io::Result<u64> {
        let path = match &self.root {
            Some(root) => root.join(file),
            None => PathBuf::from(file),
        };
        Ok(std::fs::metadata(path)?.len())
    }
}

impl<F> FileSizes for F
where
    F: Fn(&str) -> io::Result<u64>,
{
    fn size_of(&self, file: &str) -> io::Result<u64> {
        self(file)
    }
}
