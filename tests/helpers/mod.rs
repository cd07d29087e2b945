#![allow(dead_code)]

use reflex::catalog::{RuleCatalog, RuleSpec};
use reflex::config::LifecycleConfig;
use reflex::engine::lifecycle::advance_day;
use reflex::state::EngineState;

/// Build a rule spec with the given shape.
pub fn rule(
    id: &str,
    keywords: &[&str],
    triggers: &[&str],
    weight: f64,
    pinned: bool,
) -> RuleSpec {
    RuleSpec {
        id: id.to_string(),
        principle_id: None,
        domain_keywords: keywords.iter().map(|s| s.to_string()).collect(),
        tool_triggers: triggers.iter().map(|s| s.to_string()).collect(),
        consequence_weight: weight,
        pinned,
    }
}

/// A small catalog with some variety: the worked-example rule R4, a pinned
/// high-severity rule, and assorted unpinned rules.
pub fn sample_catalog() -> RuleCatalog {
    RuleCatalog {
        rules: vec![
            rule("R1", &["test", "tests"], &["bash"], 0.1, false),
            rule("R2", &["secrets", "credentials"], &["write"], 0.3, true),
            rule("R3", &["docs", "documentation"], &["write"], 0.1, false),
            rule("R4", &["code"], &["edit"], 0.2, true),
            rule("R5", &["python"], &["edit"], 0.2, false),
            rule("R6", &["database", "migration"], &["bash"], 0.3, false),
        ],
    }
}

/// Advance the engine clock `n` days.
pub fn advance_n(
    state: &mut EngineState,
    catalog: &RuleCatalog,
    config: &LifecycleConfig,
    n: u64,
) {
    for _ in 0..n {
        advance_day(state, catalog, config);
    }
}
