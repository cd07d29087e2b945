use std::path::Path;

use serde::Serialize;

use crate::catalog::RuleCatalog;
use crate::config::MergeConfig;
use crate::engine::merge::{merge_candidates, MergeCandidate};
use crate::state::EngineState;

/// Response from engine_stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub day: u64,
    pub total_rules: usize,
    pub active_rules: usize,
    pub dormant_rules: usize,
    pub pinned_rules: usize,
    /// Rules carrying a nonzero spike right now.
    pub spiked_rules: usize,
    pub total_violations: u64,
    pub total_activations: u64,
    pub tracked_pairs: usize,
    pub state_size_bytes: u64,
    pub merge_candidates: Vec<MergeCandidate>,
}

/// Compute engine statistics.
///
/// `state_path` is used for file size calculation; pass None when the state
/// has not been persisted.
pub fn engine_stats(
    catalog: &RuleCatalog,
    state: &EngineState,
    merge_config: &MergeConfig,
    state_path: Option<&Path>,
) -> StatsResponse {
    let total_rules = catalog.rules.len();
    let pinned_rules = catalog.rules.iter().filter(|r| r.pinned).count();

    let mut dormant_rules = 0;
    let mut spiked_rules = 0;
    let mut total_violations = 0;
    let mut total_activations = 0;
    for id in catalog.ids() {
        let Some(dynamics) = state.rules.get(id) else {
            continue;
        };
        if dynamics.dormant {
            dormant_rules += 1;
        }
        if dynamics.spike > 0.0 {
            spiked_rules += 1;
        }
        total_violations += dynamics.violation_count;
        total_activations += dynamics.activation_count;
    }

    let state_size_bytes = state_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    StatsResponse {
        day: state.day,
        total_rules,
        active_rules: total_rules - dormant_rules,
        dormant_rules,
        pinned_rules,
        spiked_rules,
        total_violations,
        total_activations,
        tracked_pairs: state.co_activations.len(),
        state_size_bytes,
        merge_candidates: merge_candidates(state, merge_config),
    }
}
