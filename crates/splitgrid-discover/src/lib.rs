//! Test-file discovery.
//!
//! Turns the paths given on the command line into the ordered list of
//! candidate files the partitioner works on. Files are taken as-is,
//! directories are walked in file-name order and filtered by pattern.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

use splitgrid_core::config::DiscoverConfig;

/// Matches `foo_test.rb`, `foo_spec.ts`, `foo_test.rs` and friends.
pub const DEFAULT_PATTERN: &str = r"_(test|spec)\.[A-Za-z0-9]+$";

#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Files found under a directory must match this.
    pub pattern: Regex,
    /// Anything matching this is dropped, whether walked or given directly.
    pub exclude_pattern: Option<Regex>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN).expect("default pattern is valid"),
            exclude_pattern: None,
        }
    }
}

impl DiscoverOptions {
    pub fn new(pattern: &str, exclude_pattern: Option<&str>) -> Result<Self> {
        let pattern = Regex::new(pattern).with_context(|| format!("invalid pattern: {pattern}"))?;
        let exclude_pattern = exclude_pattern
            .map(|p| Regex::new(p).with_context(|| format!("invalid exclude pattern: {p}")))
            .transpose()?;
        Ok(Self {
            pattern,
            exclude_pattern,
        })
    }

    /// Build options from `[discover]`, letting explicit values win.
    pub fn from_config(
        config: Option<&DiscoverConfig>,
        pattern: Option<&str>,
        exclude_pattern: Option<&str>,
    ) -> Result<Self> {
        let pattern = pattern
            .or_else(|| config.and_then(|c| c.pattern.as_deref()))
            .unwrap_or(DEFAULT_PATTERN);
        let exclude_pattern =
            exclude_pattern.or_else(|| config.and_then(|c| c.exclude_pattern.as_deref()));
        Self::new(pattern, exclude_pattern)
    }

    fn excluded(&self, path: &str) -> bool {
        self.exclude_pattern.as_ref().is_some_and(|re| re.is_match(path))
    }
}

/// Find candidate test files under `roots`, in a stable order.
///
/// The first occurrence of a file wins when roots overlap.
pub fn find_files<P: AsRef<Path>>(roots: &[P], options: &DiscoverOptions) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for root in roots {
        let root = root.as_ref();
        if root.is_file() {
            let file = root.to_string_lossy().into_owned();
            if !options.excluded(&file) && seen.insert(file.clone()) {
                files.push(file);
            }
        } else if root.is_dir() {
            let before = files.len();
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("failed to walk {}", root.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let file = entry.path().to_string_lossy().into_owned();
                if options.pattern.is_match(&file)
                    && !options.excluded(&file)
                    && seen.insert(file.clone())
                {
                    files.push(file);
                }
            }
            tracing::debug!(root = %root.display(), found = files.len() - before, "walked directory");
        } else {
            bail!("No such file or directory: {}", root.display());
        }
    }

    tracing::info!(count = files.len(), "Discovered test files");
    Ok(files)
}
