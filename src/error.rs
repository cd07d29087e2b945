//! Engine error taxonomy.
//!
//! All three variants are terminal for a single invocation: the caller fixes
//! the input (unknown id), the catalog/state pair (validation), or the state
//! file (corruption) and re-invokes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A violation was recorded against a rule id that is not in the catalog.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// One or more structural invariants failed. Carries every violation
    /// found, not just the first.
    #[error("validation failed with {} violation(s): {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),

    /// The persisted state file exists but cannot be used. The engine refuses
    /// to proceed rather than reinitialize — a fresh state would silently
    /// discard spike and dormancy history.
    #[error("state file corrupt at {path}: {reason}")]
    StateCorruption { path: String, reason: String },
}
