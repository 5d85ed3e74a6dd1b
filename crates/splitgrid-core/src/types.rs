//! Shared types used across splitgrid crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How test files are weighted before they are split into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Runtime history when any candidate has an entry, file size otherwise.
    #[default]
    Balanced,
    /// Runtime history only. Fails when no history is usable.
    Runtime,
    /// File size only. The runtime log is never read.
    Filesize,
    /// No weighting; files are dealt out in discovery order.
    Found,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Balanced => "balanced",
            GroupBy::Runtime => "runtime",
            GroupBy::Filesize => "filesize",
            GroupBy::Found => "found",
        }
    }

    /// Whether this mode may consult the runtime log.
    pub fn reads_runtime_log(&self) -> bool {
        matches!(self, GroupBy::Balanced | GroupBy::Runtime)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown group-by mode: {0} (expected balanced, runtime, filesize or found)")]
pub struct ParseGroupByError(pub String);

impl FromStr for GroupBy {
    type Err = ParseGroupByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(GroupBy::Balanced),
            "runtime" => Ok(GroupBy::Runtime),
            "filesize" => Ok(GroupBy::Filesize),
            "found" => Ok(GroupBy::Found),
            other => Err(ParseGroupByError(other.to_string())),
        }
    }
}

/// The cost metric that was actually used for one partitioning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSource {
    /// Last recorded duration per file, in seconds.
    RuntimeHistory,
    /// File size in bytes.
    FileSize,
    /// Every file weighs the same.
    Uniform,
}

impl fmt::Display for WeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightSource::RuntimeHistory => "runtime history",
            WeightSource::FileSize => "file size",
            WeightSource::Uniform => "uniform",
        })
    }
}

/// One worker's share of the test files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Zero-based position of the group.
    pub index: usize,
    /// Member identifiers, sorted lexically.
    pub files: Vec<String>,
    /// Sum of member weights.
    pub load: f64,
}

impl Group {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            files: Vec::new(),
            load: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Environment number handed to the worker running this group.
    ///
    /// The first worker gets an empty string unless `first_is_1` is set,
    /// every other worker gets its one-based position.
    pub fn env_number(&self, first_is_1: bool) -> String {
        if self.index == 0 && !first_is_1 {
            String::new()
        } else {
            (self.index + 1).to_string()
        }
    }
}

/// Sum of all group loads.
pub fn total_load(groups: &[Group]) -> f64 {
    groups.iter().map(|g| g.load).sum()
}

/// Largest group load, 0 for no groups.
pub fn makespan(groups: &[Group]) -> f64 {
    groups.iter().map(|g| g.load).fold(0.0, f64::max)
}
