//! Sync configuration: pivot staleness thresholds and search limits.
use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Distance (in blocks) from the chain head below which the pivot is still
/// considered fresh enough to keep downloading against.
pub const CLOSE_TO_HEAD_THRESHOLD: u64 = 60;

/// Blocks the chain head must be past a ready candidate before switching to it.
pub const SWITCH_MARGIN: u64 = 0;

/// Upper bound for one complete pivot search (peers, selection and header download).
pub const PIVOT_SEARCH_TIMEOUT_SECS: u64 = 5 * 60;

/// Tunables of the dynamic pivot block manager.
///
/// Every field is optional in YAML; omitted keys take the defaults above.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PivotBlockConfig {
    pub close_to_head_threshold: u64,
    pub switch_margin: u64,
    pub search_timeout_secs: u64,
}

impl Default for PivotBlockConfig {
    fn default() -> Self {
        Self {
            close_to_head_threshold: CLOSE_TO_HEAD_THRESHOLD,
            switch_margin: SWITCH_MARGIN,
            search_timeout_secs: PIVOT_SEARCH_TIMEOUT_SECS,
        }
    }
}

impl PivotBlockConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open pivot config {}", path.display()))?;
        let config = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse pivot config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse pivot config")
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Whether a pivot at `pivot` is still fresh with the chain head at `head`.
    pub fn is_close_to_head(&self, pivot: u64, head: u64) -> bool {
        head.saturating_sub(pivot) < self.close_to_head_threshold
    }

    /// Whether the chain head has advanced far enough to adopt `candidate`.
    pub fn can_switch_to(&self, candidate: u64, head: u64) -> bool {
        head >= candidate.saturating_add(self.switch_margin)
    }
}
