//! Merge-candidate detection.
//!
//! Pairs of rules that almost always activate together are candidates for
//! consolidation into one rule. Pure reporting query over the persisted
//! co-activation counters — nothing is merged automatically.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::MergeConfig;
use crate::state::EngineState;

/// A rule pair flagged for consolidation review.
#[derive(Debug, Clone, Serialize)]
pub struct MergeCandidate {
    pub rule_a: String,
    pub rule_b: String,
    /// Times the pair activated together.
    pub joint: u64,
    /// `joint / min(activations_a, activations_b)`.
    pub ratio: f64,
}

/// Flag pairs with `joint >= min_joint_activations` whose co-activation
/// ratio exceeds the configured threshold. Sorted by ratio descending, then
/// pair key, so the report is stable.
pub fn merge_candidates(state: &EngineState, config: &MergeConfig) -> Vec<MergeCandidate> {
    let mut candidates = Vec::new();

    for (key, &joint) in &state.co_activations {
        if joint < config.min_joint_activations {
            continue;
        }
        let Some((a, b)) = key.split_once('|') else {
            continue;
        };

        let act_a = state.rules.get(a).map(|d| d.activation_count).unwrap_or(0);
        let act_b = state.rules.get(b).map(|d| d.activation_count).unwrap_or(0);
        let min_act = act_a.min(act_b);
        if min_act == 0 {
            continue;
        }

        let ratio = joint as f64 / min_act as f64;
        if ratio > config.co_activation_ratio {
            candidates.push(MergeCandidate {
                rule_a: a.to_string(),
                rule_b: b.to_string(),
                joint,
                ratio,
            });
        }
    }

    candidates.sort_by(|x, y| {
        y.ratio
            .partial_cmp(&x.ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| (x.rule_a.as_str(), x.rule_b.as_str()).cmp(&(y.rule_a.as_str(), y.rule_b.as_str())))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RuleCatalog, RuleSpec};
    use crate::state::pair_key;

    fn state_with_activations(counts: &[(&str, u64)]) -> EngineState {
        let catalog = RuleCatalog {
            rules: counts
                .iter()
                .map(|(id, _)| RuleSpec {
                    id: id.to_string(),
                    principle_id: None,
                    domain_keywords: vec![],
                    tool_triggers: vec![],
                    consequence_weight: 0.2,
                    pinned: false,
                })
                .collect(),
        };
        let mut state = EngineState::fresh(&catalog);
        for (id, count) in counts {
            state.rules.get_mut(*id).unwrap().activation_count = *count;
        }
        state
    }

    #[test]
    fn flags_high_ratio_pairs_only() {
        // (A,B): 10 joint over min 10 activations -> ratio 1.0, flagged.
        // (C,D): 5 joint -> below the joint floor, never considered.
        let mut state =
            state_with_activations(&[("A", 10), ("B", 10), ("C", 20), ("D", 20)]);
        state.co_activations.insert(pair_key("A", "B"), 10);
        state.co_activations.insert(pair_key("C", "D"), 5);

        let candidates = merge_candidates(&state, &MergeConfig::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].rule_a, "A");
        assert_eq!(candidates[0].rule_b, "B");
        assert_eq!(candidates[0].joint, 10);
        assert!((candidates[0].ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_at_threshold_is_not_flagged() {
        // 18/20 = 0.9 exactly: the threshold comparison is strict.
        let mut state = state_with_activations(&[("A", 20), ("B", 25)]);
        state.co_activations.insert(pair_key("A", "B"), 18);

        let candidates = merge_candidates(&state, &MergeConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn joint_floor_gates_even_perfect_ratios() {
        // 9/9 = 1.0 but only nine joint observations.
        let mut state = state_with_activations(&[("A", 9), ("B", 9)]);
        state.co_activations.insert(pair_key("A", "B"), 9);

        let candidates = merge_candidates(&state, &MergeConfig::default());
        assert!(candidates.is_empty());
    }

    #[test]
    fn report_is_sorted_and_stable() {
        let mut state =
            state_with_activations(&[("A", 10), ("B", 10), ("C", 12), ("D", 12)]);
        state.co_activations.insert(pair_key("A", "B"), 10);
        state.co_activations.insert(pair_key("C", "D"), 11);

        let candidates = merge_candidates(&state, &MergeConfig::default());
        assert_eq!(candidates.len(), 2);
        // A|B ratio 1.0 ahead of C|D ratio ~0.917
        assert_eq!(candidates[0].rule_a, "A");
        assert_eq!(candidates[1].rule_a, "C");
    }
}
