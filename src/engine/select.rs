//! Rule selection under the activation budget and injection limit.
//!
//! Pipeline: threshold filter → deterministic sort → budget cut (activated)
//! → injection cut (surfaced). Bookkeeping (activation counts, last-active
//! refresh, pairwise co-activation counters) is a separate explicit step so
//! the `test` verb can stay a dry run.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::engine::score::ScoredRule;
use crate::state::{pair_key, EngineState};

/// Outcome of one selection pass.
#[derive(Debug, Serialize)]
pub struct Selection {
    /// Rules above threshold within the activation budget (≤ 5), ranked.
    pub activated: Vec<ScoredRule>,
    /// The subset actually surfaced to the caller (≤ 3), highest-scoring.
    pub surfaced: Vec<ScoredRule>,
}

/// Rank scored rules and apply both limits.
///
/// Ties on score break ascending by rule id, so identical input state and
/// task text always produce an identical ordered list.
pub fn select(mut scored: Vec<ScoredRule>, config: &ScoringConfig) -> Selection {
    scored.retain(|r| r.score >= config.activation_threshold);
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored.truncate(config.budget);

    let surfaced = scored
        .iter()
        .take(config.injection_limit)
        .cloned()
        .collect();

    Selection {
        activated: scored,
        surfaced,
    }
}

/// Persist the bookkeeping for an activated set: bump each rule's activation
/// count, refresh its last-active day, and count every unordered pair as one
/// co-activation.
pub fn record_activation(state: &mut EngineState, activated: &[ScoredRule]) {
    let day = state.day;

    for rule in activated {
        if let Ok(dynamics) = state.dynamics_mut(&rule.id) {
            dynamics.activation_count += 1;
            dynamics.last_active_day = day;
        }
    }

    for (i, a) in activated.iter().enumerate() {
        for b in &activated[i + 1..] {
            *state
                .co_activations
                .entry(pair_key(&a.id, &b.id))
                .or_insert(0) += 1;
        }
    }

    if !activated.is_empty() {
        let ids: Vec<&str> = activated.iter().map(|r| r.id.as_str()).collect();
        state.write_log(
            "activate",
            None,
            Some(serde_json::json!({ "rules": ids })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RuleCatalog, RuleSpec};
    use crate::state::EngineState;

    fn scored(id: &str, score: f64) -> ScoredRule {
        ScoredRule {
            id: id.to_string(),
            score,
            justification: "none".to_string(),
        }
    }

    fn test_state(ids: &[&str]) -> EngineState {
        let catalog = RuleCatalog {
            rules: ids
                .iter()
                .map(|id| RuleSpec {
                    id: id.to_string(),
                    principle_id: None,
                    domain_keywords: vec![],
                    tool_triggers: vec![],
                    consequence_weight: 0.2,
                    pinned: false,
                })
                .collect(),
        };
        EngineState::fresh(&catalog)
    }

    #[test]
    fn filters_below_threshold() {
        let selection = select(
            vec![scored("R1", 0.7), scored("R2", 0.49), scored("R3", 0.5)],
            &ScoringConfig::default(),
        );
        let ids: Vec<&str> = selection.activated.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R3"]);
    }

    #[test]
    fn budget_and_injection_limits_hold() {
        // Seven rules above threshold: at most 5 activate, at most 3 surface.
        let input: Vec<ScoredRule> = (1..=7)
            .map(|i| scored(&format!("R{i}"), 0.5 + i as f64 * 0.05))
            .collect();
        let selection = select(input, &ScoringConfig::default());

        assert_eq!(selection.activated.len(), 5);
        assert_eq!(selection.surfaced.len(), 3);
        // highest scorers first
        assert_eq!(selection.surfaced[0].id, "R7");
        assert_eq!(selection.surfaced[1].id, "R6");
        assert_eq!(selection.surfaced[2].id, "R5");
    }

    #[test]
    fn ties_break_by_rule_id() {
        let selection = select(
            vec![scored("R9", 0.6), scored("R2", 0.6), scored("R5", 0.6)],
            &ScoringConfig::default(),
        );
        let ids: Vec<&str> = selection.activated.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R2", "R5", "R9"]);
    }

    #[test]
    fn selection_is_deterministic() {
        let input = vec![scored("R3", 0.8), scored("R1", 0.8), scored("R2", 0.55)];
        let first = select(input.clone(), &ScoringConfig::default());
        let second = select(input, &ScoringConfig::default());

        let first_ids: Vec<&str> = first.surfaced.iter().map(|r| r.id.as_str()).collect();
        let second_ids: Vec<&str> = second.surfaced.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn record_activation_counts_pairs() {
        let mut state = test_state(&["R1", "R2", "R3"]);
        state.day = 7;

        let activated = vec![scored("R1", 0.8), scored("R2", 0.7), scored("R3", 0.6)];
        record_activation(&mut state, &activated);

        assert_eq!(state.rules["R1"].activation_count, 1);
        assert_eq!(state.rules["R1"].last_active_day, 7);
        assert_eq!(state.co_activations["R1|R2"], 1);
        assert_eq!(state.co_activations["R1|R3"], 1);
        assert_eq!(state.co_activations["R2|R3"], 1);

        record_activation(&mut state, &activated);
        assert_eq!(state.co_activations["R1|R2"], 2);
        assert_eq!(state.rules["R2"].activation_count, 2);
    }

    #[test]
    fn empty_selection_writes_no_log() {
        let mut state = test_state(&["R1"]);
        record_activation(&mut state, &[]);
        assert!(state.log.is_empty());
    }
}
