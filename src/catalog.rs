//! Read-only rule catalog.
//!
//! The catalog is authored externally as a TOML file with a `[[rules]]` array
//! and is never rewritten by the engine. [`RuleCatalog::parse_from`] only
//! deserializes; [`RuleCatalog::load_from`] additionally runs the structural
//! checks every scoring path depends on (unique ids, weights in bounds), so a
//! broken catalog fails fast instead of corrupting the keyed state.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::EngineError;

/// Lower bound for `consequence_weight` (practice-class rules).
pub const MIN_CONSEQUENCE_WEIGHT: f64 = 0.1;
/// Upper bound for `consequence_weight` (value-class rules).
pub const MAX_CONSEQUENCE_WEIGHT: f64 = 0.3;

/// A single behavioral rule as authored in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// Unique identifier, e.g. `"R4"`.
    pub id: String,
    /// Link to an external principle document, e.g. `"P4"`. Informational only.
    #[serde(default)]
    pub principle_id: Option<String>,
    /// Keywords matched against the task description.
    #[serde(default)]
    pub domain_keywords: Vec<String>,
    /// Tool/action categories relevant to the rule (`"edit"`, `"bash"`, ...).
    #[serde(default)]
    pub tool_triggers: Vec<String>,
    /// Severity scalar in `[0.1, 0.3]`: practice < principle < value.
    pub consequence_weight: f64,
    /// Pinned rules never enter dormancy.
    #[serde(default)]
    pub pinned: bool,
}

/// The full set of rule definitions, keyed lookups by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleCatalog {
    /// Deserialize a catalog from TOML without structural checks.
    ///
    /// Used by the `validate` verb, which wants to enumerate problems rather
    /// than stop at the first one.
    pub fn parse_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule catalog at {}", path.display()))?;
        let catalog: RuleCatalog =
            toml::from_str(&contents).context("failed to parse rule catalog TOML")?;
        Ok(catalog)
    }

    /// Parse and structurally check a catalog. Every other verb goes through
    /// this, so scoring never runs against duplicate ids or out-of-range
    /// weights.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let catalog = Self::parse_from(path)?;
        let violations = catalog.structural_violations();
        if !violations.is_empty() {
            return Err(EngineError::Validation(violations).into());
        }
        Ok(catalog)
    }

    /// Look up a rule spec by id.
    pub fn get(&self, id: &str) -> Option<&RuleSpec> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// All rule ids, in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.id.as_str())
    }

    /// Structural problems with the catalog itself: empty or duplicate ids,
    /// consequence weights outside the declared bounds.
    pub fn structural_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut seen = BTreeSet::new();

        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                violations.push("rule with empty id".to_string());
                continue;
            }
            if !seen.insert(rule.id.as_str()) {
                violations.push(format!("duplicate rule id: {}", rule.id));
            }
            if !(MIN_CONSEQUENCE_WEIGHT..=MAX_CONSEQUENCE_WEIGHT)
                .contains(&rule.consequence_weight)
            {
                violations.push(format!(
                    "rule {}: consequence_weight {} outside [{}, {}]",
                    rule.id, rule.consequence_weight, MIN_CONSEQUENCE_WEIGHT, MAX_CONSEQUENCE_WEIGHT
                ));
            }
        }

        violations
    }
}
