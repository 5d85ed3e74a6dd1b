//! Runtime history — the last observed duration of each test file.
//!
//! The log is line-oriented, one `file:seconds` pair per line. Entries are
//! unordered and a later line for the same file replaces an earlier one.
//! Lines that cannot be parsed are skipped so that one bad write does not
//! throw away the rest of the history.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PartitionError, PartitionResult};

/// Read-only access to recorded durations.
pub trait RuntimeHistory {
    /// Last recorded duration of `file` in seconds, if any.
    fn lookup(&self, file: &str) -> Option<f64>;
}

/// In-memory copy of a runtime log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeLog {
    entries: HashMap<String, f64>,
}

impl RuntimeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse log text, skipping malformed lines.
    pub fn parse(text: &str) -> Self {
        let mut log = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some((file, seconds)) => {
                    log.entries.insert(file.to_string(), seconds);
                }
                None => debug!(line = lineno + 1, content = line, "skipping malformed runtime log line"),
            }
        }
        log
    }

    /// Load the log at `path`.
    ///
    /// A missing file means there is no history yet and yields `Ok(None)`.
    /// Any other read failure is a configuration problem.
    pub fn load(path: &Path) -> PartitionResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let log = Self::parse(&text);
                info!(path = %path.display(), entries = log.len(), "loaded runtime log");
                Ok(Some(log))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no runtime log");
                Ok(None)
            }
            Err(e) => Err(PartitionError::config(format!(
                "runtime log {} is unreadable: {e}",
                path.display()
            ))),
        }
    }

    /// Record (or replace) the duration of `file`.
    ///
    /// Negative and non-finite durations are ignored.
    pub fn insert(&mut self, file: impl Into<String>, seconds: f64) -> bool {
        if !valid_duration(seconds) {
            return false;
        }
        self.entries.insert(file.into(), seconds);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by file identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        let mut entries: Vec<(&str, f64)> =
            self.entries.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn to_log_string(&self) -> String {
        let mut out = String::new();
        for (file, seconds) in self.iter() {
            out.push_str(file);
            out.push(':');
            out.push_str(&seconds.to_string());
            out.push('\n');
        }
        out
    }

    /// Write the log to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> PartitionResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_log_string())?;
        Ok(())
    }
}

impl RuntimeHistory for RuntimeLog {
    fn lookup(&self, file: &str) -> Option<f64> {
        self.entries.get(file).copied()
    }
}

impl RuntimeHistory for HashMap<String, f64> {
    fn lookup(&self, file: &str) -> Option<f64> {
        self.get(file).copied()
    }
}

fn valid_duration(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

// Split on the last ':' so identifiers may themselves contain colons.
fn parse_line(line: &str) -> Option<(&str, f64)> {
    let (file, seconds) = line.rsplit_once(':')?;
    let file = file.trim();
    if file.is_empty() {
        return None;
    }
    let seconds: f64 = seconds.trim().parse().ok()?;
    valid_duration(seconds).then_some((file, seconds))
}
