//! splitgrid.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::GroupBy;

/// Where runtime history is read from when nothing else is configured.
pub const DEFAULT_RUNTIME_LOG: &str = "tmp/splitgrid_runtime.log";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitConfig {
    pub partition: Option<PartitionConfig>,
    pub discover: Option<DiscoverConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub groups: Option<usize>,
    pub group_by: Option<GroupBy>,
    pub runtime_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverConfig {
    pub pattern: Option<String>,
    pub exclude_pattern: Option<String>,
}

/// Everything a single partitioning call needs to know.
///
/// Built once by the caller and passed in explicitly; the partitioner never
/// consults process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOptions {
    pub group_count: usize,
    pub group_by: GroupBy,
    /// `None` means [`DEFAULT_RUNTIME_LOG`].
    pub runtime_log: Option<PathBuf>,
}

impl PartitionOptions {
    pub fn new(group_count: usize) -> Self {
        Self {
            group_count,
            group_by: GroupBy::default(),
            runtime_log: None,
        }
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_runtime_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_log = Some(path.into());
        self
    }

    /// The runtime log path in effect.
    pub fn runtime_log_path(&self) -> &Path {
        self.runtime_log
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_RUNTIME_LOG))
    }
}

impl SplitConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SplitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to an empty config.
    pub fn from_file_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a splitgrid.toml with every setting spelled out.
    pub fn scaffold() -> Self {
        SplitConfig {
            partition: Some(PartitionConfig {
                groups: None,
                group_by: Some(GroupBy::Balanced),
                runtime_log: Some(PathBuf::from(DEFAULT_RUNTIME_LOG)),
            }),
            discover: Some(DiscoverConfig {
                pattern: Some(r"_(test|spec)\.[A-Za-z0-9]+$".to_string()),
                exclude_pattern: None,
            }),
        }
    }

    /// Resolve partitioning options.
    ///
    /// Precedence for the group count: `groups_override`, then
    /// `[partition].groups`, then `fallback_groups`.
    pub fn partition_options(
        &self,
        groups_override: Option<usize>,
        fallback_groups: usize,
    ) -> PartitionOptions {
        let section = self.partition.clone().unwrap_or_default();
        PartitionOptions {
            group_count: groups_override.or(section.groups).unwrap_or(fallback_groups),
            group_by: section.group_by.unwrap_or_default(),
            runtime_log: section.runtime_log,
        }
    }
}
