//! Activation scoring.
//!
//! A rule's score against a task is the sum of four components: a domain
//! keyword match, the rule's fixed consequence weight, a tool-intent match,
//! and the rule's current spike. The raw maxima sum to slightly above 1.0,
//! so the result is clamped to `[0, 1]`. Dormant non-pinned rules are
//! excluded before scoring.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{RuleCatalog, RuleSpec};
use crate::config::ScoringConfig;
use crate::engine::types::{RuleDynamics, ToolIntent};
use crate::state::EngineState;

/// Task vocabulary implying each tool intent.
const INTENT_VOCAB: &[(ToolIntent, &[&str])] = &[
    (
        ToolIntent::Edit,
        &["edit", "modify", "change", "refactor", "fix", "patch", "rename", "update", "rewrite"],
    ),
    (
        ToolIntent::Bash,
        &["run", "execute", "shell", "bash", "command", "install", "build", "compile"],
    ),
    (
        ToolIntent::Write,
        &["write", "create", "add", "generate", "scaffold", "implement", "draft"],
    ),
    (
        ToolIntent::Read,
        &["read", "inspect", "review", "view", "examine", "summarize"],
    ),
    (
        ToolIntent::Search,
        &["search", "find", "grep", "locate", "query", "lookup"],
    ),
];

/// Signals extracted once from a task description and shared across all
/// rules being scored.
#[derive(Debug)]
pub struct TaskSignal {
    lowered: String,
    words: BTreeSet<String>,
    intents: BTreeSet<ToolIntent>,
}

impl TaskSignal {
    /// Lowercase the task, split it into words, and detect tool intents from
    /// the fixed verb table.
    pub fn extract(task: &str) -> Self {
        let lowered = task.to_lowercase();
        let words: BTreeSet<String> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        let mut intents = BTreeSet::new();
        for (intent, vocab) in INTENT_VOCAB {
            if vocab.iter().any(|v| words.contains(*v)) {
                intents.insert(*intent);
            }
        }

        Self {
            lowered,
            words,
            intents,
        }
    }

    /// Whether a domain keyword occurs in the task. Single words match on
    /// word boundaries; multi-word keywords match as substrings.
    fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        if keyword.contains(char::is_whitespace) {
            self.lowered.contains(&keyword)
        } else {
            self.words.contains(&keyword)
        }
    }

    /// Whether a catalog trigger names a detected intent.
    fn matches_trigger(&self, trigger: &str) -> bool {
        self.intents
            .iter()
            .any(|i| trigger.eq_ignore_ascii_case(i.as_str()))
    }
}

/// A rule's activation score plus the justification tag for observability.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRule {
    pub id: String,
    pub score: f64,
    /// `+`-joined tag of the components that fired, e.g. `"code+edit+spiked"`.
    pub justification: String,
}

/// Score one rule against the extracted task signal.
///
/// Returns `None` for dormant non-pinned rules — they are out of the running
/// entirely until a violation reactivates them.
pub fn score_rule(
    spec: &RuleSpec,
    dynamics: &RuleDynamics,
    signal: &TaskSignal,
    config: &ScoringConfig,
) -> Option<ScoredRule> {
    if dynamics.dormant && !spec.pinned {
        return None;
    }

    let mut matched_keywords: Vec<&str> = spec
        .domain_keywords
        .iter()
        .filter(|k| signal.matches_keyword(k))
        .map(String::as_str)
        .collect();
    matched_keywords.sort_unstable();
    matched_keywords.dedup();

    let domain = match matched_keywords.len() {
        0 => 0.0,
        1 => config.domain_match_weight,
        _ => config.domain_match_weight + config.domain_multi_bonus,
    };

    let mut matched_triggers: Vec<&str> = spec
        .tool_triggers
        .iter()
        .filter(|t| signal.matches_trigger(t))
        .map(String::as_str)
        .collect();
    matched_triggers.sort_unstable();
    matched_triggers.dedup();

    let tool = if matched_triggers.is_empty() {
        0.0
    } else {
        config.tool_trigger_weight
    };

    let score = (domain + spec.consequence_weight + tool + dynamics.spike).clamp(0.0, 1.0);

    let mut parts: Vec<&str> = matched_keywords;
    parts.extend(matched_triggers);
    if dynamics.spike > 0.0 {
        parts.push("spiked");
    }
    let justification = if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join("+")
    };

    Some(ScoredRule {
        id: spec.id.clone(),
        score,
        justification,
    })
}

/// Score every catalog rule against a task. Catalog order; the selector owns
/// ranking.
pub fn score_catalog(
    catalog: &RuleCatalog,
    state: &EngineState,
    signal: &TaskSignal,
    config: &ScoringConfig,
) -> Vec<ScoredRule> {
    catalog
        .rules
        .iter()
        .filter_map(|spec| {
            let dynamics = state.rules.get(&spec.id)?;
            score_rule(spec, dynamics, signal, config)
        })
        .collect()
}
