//! Structural invariant checks over the catalog/state pair.
//!
//! Diagnostic path only — scoring never calls this. Collects every broken
//! invariant rather than stopping at the first, so one `validate` run shows
//! the full repair list.

use crate::catalog::RuleCatalog;
use crate::error::EngineError;
use crate::state::EngineState;

/// Largest spike any sequence of operations can legally produce.
const MAX_SPIKE: f64 = 0.20;

/// Collect every structural violation in the catalog and state.
pub fn check_invariants(catalog: &RuleCatalog, state: &EngineState) -> Vec<String> {
    let mut violations = catalog.structural_violations();

    for (id, dynamics) in &state.rules {
        match catalog.get(id) {
            None => violations.push(format!("state holds dynamics for unknown rule: {id}")),
            Some(spec) => {
                if spec.pinned && dynamics.dormant {
                    violations.push(format!("pinned rule marked dormant: {id}"));
                }
            }
        }

        if !(0.0..=MAX_SPIKE).contains(&dynamics.spike) {
            violations.push(format!(
                "rule {id}: spike {} outside [0, {MAX_SPIKE}]",
                dynamics.spike
            ));
        }
        if dynamics.last_active_day > state.day {
            violations.push(format!(
                "rule {id}: last_active_day {} is after the current day {}",
                dynamics.last_active_day, state.day
            ));
        }
    }

    for key in state.co_activations.keys() {
        match key.split_once('|') {
            None => violations.push(format!("malformed co-activation key: {key}")),
            Some((a, b)) => {
                for id in [a, b] {
                    if !state.rules.contains_key(id) {
                        violations
                            .push(format!("co-activation key {key} references unknown rule {id}"));
                    }
                }
            }
        }
    }

    violations
}

/// Run the invariant sweep, failing with the enumerated list.
pub fn validate(catalog: &RuleCatalog, state: &EngineState) -> Result<(), EngineError> {
    let violations = check_invariants(catalog, state);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleSpec;
    use crate::state::pair_key;

    fn catalog(rules: &[(&str, f64, bool)]) -> RuleCatalog {
        RuleCatalog {
            rules: rules
                .iter()
                .map(|(id, weight, pinned)| RuleSpec {
                    id: id.to_string(),
                    principle_id: None,
                    domain_keywords: vec![],
                    tool_triggers: vec![],
                    consequence_weight: *weight,
                    pinned: *pinned,
                })
                .collect(),
        }
    }

    #[test]
    fn clean_pair_passes() {
        let catalog = catalog(&[("R1", 0.2, true), ("R2", 0.1, false)]);
        let state = EngineState::fresh(&catalog);
        assert!(validate(&catalog, &state).is_ok());
    }

    #[test]
    fn pinned_dormant_is_flagged() {
        let catalog = catalog(&[("R1", 0.2, true)]);
        let mut state = EngineState::fresh(&catalog);
        state.rules.get_mut("R1").unwrap().dormant = true;

        let violations = check_invariants(&catalog, &state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("pinned rule marked dormant"));
    }

    #[test]
    fn out_of_range_spike_is_flagged() {
        let catalog = catalog(&[("R1", 0.2, false)]);
        let mut state = EngineState::fresh(&catalog);
        state.rules.get_mut("R1").unwrap().spike = 0.5;

        let violations = check_invariants(&catalog, &state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("spike"));
    }

    #[test]
    fn future_last_active_day_is_flagged() {
        let catalog = catalog(&[("R1", 0.2, false)]);
        let mut state = EngineState::fresh(&catalog);
        state.rules.get_mut("R1").unwrap().last_active_day = 5;
        state.day = 3;

        let violations = check_invariants(&catalog, &state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("after the current day"));
    }

    #[test]
    fn orphaned_dynamics_and_bad_pair_keys_are_flagged() {
        let catalog = catalog(&[("R1", 0.2, false)]);
        let mut state = EngineState::fresh(&catalog);
        state
            .rules
            .insert("GONE".into(), crate::engine::types::RuleDynamics::default());
        state.co_activations.insert(pair_key("R1", "MISSING"), 3);
        state.co_activations.insert("notapair".into(), 1);

        let violations = check_invariants(&catalog, &state);
        assert!(violations.iter().any(|v| v.contains("unknown rule: GONE")));
        assert!(violations.iter().any(|v| v.contains("references unknown rule MISSING")));
        assert!(violations.iter().any(|v| v.contains("malformed co-activation key")));
    }

    #[test]
    fn validate_collects_everything_into_one_error() {
        let catalog = catalog(&[("R1", 0.9, true)]);
        let mut state = EngineState::fresh(&catalog);
        state.rules.get_mut("R1").unwrap().dormant = true;

        let err = validate(&catalog, &state).unwrap_err();
        match err {
            EngineError::Validation(violations) => assert_eq!(violations.len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
