//! Persisted engine state.
//!
//! One JSON blob at a fixed path: the day counter, per-rule dynamics,
//! pairwise co-activation counters, and a bounded audit log. Loaded at
//! invocation start, mutated in memory, flushed back atomically (tmp +
//! rename) at the end of each mutating verb. No file locking — concurrent
//! invocations are a read-modify-write race and callers must serialize
//! externally.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::RuleCatalog;
use crate::engine::types::RuleDynamics;
use crate::error::EngineError;

/// Audit entries retained in the state file. Older entries are trimmed.
const LOG_CAP: usize = 1000;

/// One audit log entry, written on every mutating operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Logical day the operation happened on.
    pub day: u64,
    /// Operation name: `"violation"`, `"advance"`, `"activate"`.
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// RFC 3339 wall-clock timestamp.
    pub at: String,
}

/// The process-wide persisted structure.
///
/// `day`, `rules`, and `co_activations` are required on disk — a file missing
/// any of them is corrupt, not a candidate for silent reinitialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineState {
    /// Logical day counter, advanced by the `advance` verb.
    pub day: u64,
    /// Mutable dynamics per rule id.
    pub rules: BTreeMap<String, RuleDynamics>,
    /// Joint-activation counters keyed by [`pair_key`]. Sorted map so the
    /// serialized state is byte-stable across runs.
    pub co_activations: BTreeMap<String, u64>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
}

/// Deterministic key for an unordered rule pair: the two ids sorted
/// lexicographically and joined with `|`.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

impl EngineState {
    /// A brand-new state: day 0, fresh dynamics for every catalog rule.
    pub fn fresh(catalog: &RuleCatalog) -> Self {
        let rules = catalog
            .ids()
            .map(|id| (id.to_string(), RuleDynamics::default()))
            .collect();
        Self {
            day: 0,
            rules,
            co_activations: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    /// Load the state file, or bootstrap a fresh state when none exists yet.
    ///
    /// A missing file is first-run bootstrap. An existing file that fails to
    /// parse or lacks required fields is [`EngineError::StateCorruption`] and
    /// the engine refuses to proceed. Rules new to the catalog get fresh
    /// dynamics; dynamics for ids no longer in the catalog are retained and
    /// reported by `validate`.
    pub fn load_or_init(path: &Path, catalog: &RuleCatalog) -> Result<Self> {
        let mut state = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read state file at {}", path.display()))?;
            serde_json::from_str(&contents).map_err(|e| EngineError::StateCorruption {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            tracing::info!(path = %path.display(), "no state file, starting fresh");
            Self::fresh(catalog)
        };

        state.sync_catalog(catalog);
        Ok(state)
    }

    /// Add fresh dynamics for any catalog rule the state has not seen.
    fn sync_catalog(&mut self, catalog: &RuleCatalog) {
        for id in catalog.ids() {
            self.rules
                .entry(id.to_string())
                .or_insert_with(RuleDynamics::default);
        }
    }

    /// Flush the state back to disk atomically: serialize to `<path>.tmp`,
    /// then rename over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("failed to serialize engine state")?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("failed to write temp state file {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename temp state file over {}", path.display()))?;

        tracing::debug!(path = %path.display(), day = self.day, "state saved");
        Ok(())
    }

    /// Dynamics for a rule id, or [`EngineError::UnknownRule`].
    pub fn dynamics_mut(&mut self, id: &str) -> Result<&mut RuleDynamics, EngineError> {
        self.rules
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownRule(id.to_string()))
    }

    /// Append an audit entry, trimming the log to [`LOG_CAP`].
    pub fn write_log(
        &mut self,
        operation: &str,
        rule_id: Option<&str>,
        details: Option<serde_json::Value>,
    ) {
        self.log.push(LogEntry {
            day: self.day,
            operation: operation.to_string(),
            rule_id: rule_id.map(str::to_string),
            details,
            at: chrono::Utc::now().to_rfc3339(),
        });
        if self.log.len() > LOG_CAP {
            let excess = self.log.len() - LOG_CAP;
            self.log.drain(..excess);
        }
    }
}
