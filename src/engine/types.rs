//! Core engine type definitions.
//!
//! Defines [`Source`] (who reported a violation and the spike delta it
//! carries), [`ToolIntent`] (tool/action categories detected in a task
//! description), and [`RuleDynamics`] (the mutable per-rule state persisted
//! between invocations).

use serde::{Deserialize, Serialize};

/// Where a violation report came from. The source class determines how large
/// a spike the violation applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// An automated hook caught the violation in the act.
    Hook,
    /// The user called it out directly.
    User,
    /// The agent noticed it during its own review.
    SelfCheck,
    /// A later audit pass turned it up.
    Audit,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::User => "user",
            Self::SelfCheck => "self-check",
            Self::Audit => "audit",
        }
    }

    /// Spike added to an active rule for a violation from this source.
    /// Hook and user reports carry the most weight; the further the report is
    /// from the act, the smaller the spike.
    pub fn spike_delta(&self) -> f64 {
        match self {
            Self::Hook | Self::User => 0.15,
            Self::SelfCheck => 0.08,
            Self::Audit => 0.06,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hook" => Ok(Self::Hook),
            "user" => Ok(Self::User),
            "self-check" | "self_check" => Ok(Self::SelfCheck),
            "audit" => Ok(Self::Audit),
            _ => Err(format!("unknown violation source: {s}")),
        }
    }
}

/// Tool/action categories a task description can imply. Catalog
/// `tool_triggers` are matched against these by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToolIntent {
    Edit,
    Bash,
    Write,
    Read,
    Search,
}

impl ToolIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Bash => "bash",
            Self::Write => "write",
            Self::Read => "read",
            Self::Search => "search",
        }
    }
}

impl std::fmt::Display for ToolIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-rule state, persisted in the engine state file.
///
/// Static rule content (keywords, triggers, weight, pin) lives in the
/// read-only catalog; these are only the dynamics the engine itself owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDynamics {
    /// Transient violation boost in `[0, 0.20]`, decaying daily.
    pub spike: f64,
    /// Day of the last spike or recorded selection.
    pub last_active_day: u64,
    /// Dormant rules are excluded from scoring until reactivated.
    pub dormant: bool,
    /// Times this rule has been activated by the selector.
    pub activation_count: u64,
    /// Times a violation has been recorded against this rule.
    pub violation_count: u64,
}

impl Default for RuleDynamics {
    fn default() -> Self {
        Self {
            spike: 0.0,
            last_active_day: 0,
            dormant: false,
            activation_count: 0,
            violation_count: 0,
        }
    }
}
