//! Rule lifecycle: spikes, decay, dormancy, immune reactivation.
//!
//! Two states per rule: Active and Dormant. Active → Dormant after the
//! dormancy window of inactivity (non-pinned rules only). Dormant → Active
//! on any recorded violation, which applies the elevated reactivation spike
//! instead of the source-based delta. Pinned rules never leave Active.

use serde::Serialize;

use crate::catalog::RuleCatalog;
use crate::config::LifecycleConfig;
use crate::engine::types::Source;
use crate::error::EngineError;
use crate::state::EngineState;

/// Spikes this close to zero are snapped to zero, so repeated decay ticks
/// cannot leave float residue that keeps a rule tagged as spiked.
const SPIKE_EPSILON: f64 = 1e-9;

/// Result of recording one violation.
#[derive(Debug, Serialize)]
pub struct ViolationResult {
    pub rule_id: String,
    pub source: String,
    /// The rule's spike after the violation was applied.
    pub spike: f64,
    /// `true` if the rule was dormant and this violation reactivated it.
    pub reactivated: bool,
}

/// Result of advancing the clock one day.
#[derive(Debug, Serialize)]
pub struct AdvanceResult {
    /// The day counter after the advance.
    pub day: u64,
    /// Rules whose spike decayed this tick.
    pub decayed: usize,
    /// Rules that crossed the dormancy threshold this tick.
    pub newly_dormant: Vec<String>,
}

/// Record a violation against a rule.
///
/// Dormant rule: immune reactivation — spike set to exactly
/// `reactivation_spike`, dormancy cleared. Active rule: the source delta is
/// added and clamped at the normal ceiling; a spike already above the
/// ceiling (fresh reactivation) is left where it is and only decay brings it
/// down. Either way the rule's last-active day resets to today.
pub fn record_violation(
    state: &mut EngineState,
    catalog: &RuleCatalog,
    rule_id: &str,
    source: Source,
    config: &LifecycleConfig,
) -> Result<ViolationResult, EngineError> {
    if catalog.get(rule_id).is_none() {
        return Err(EngineError::UnknownRule(rule_id.to_string()));
    }

    let day = state.day;
    let dynamics = state.dynamics_mut(rule_id)?;

    let reactivated = dynamics.dormant;
    if reactivated {
        dynamics.spike = config.reactivation_spike;
        dynamics.dormant = false;
    } else {
        let ceiling = config.spike_ceiling.max(dynamics.spike);
        dynamics.spike = (dynamics.spike + source.spike_delta()).min(ceiling);
    }
    dynamics.last_active_day = day;
    dynamics.violation_count += 1;
    let spike = dynamics.spike;

    state.write_log(
        "violation",
        Some(rule_id),
        Some(serde_json::json!({
            "source": source.as_str(),
            "spike": spike,
            "reactivated": reactivated,
        })),
    );

    tracing::debug!(rule_id, source = source.as_str(), spike, reactivated, "violation recorded");

    Ok(ViolationResult {
        rule_id: rule_id.to_string(),
        source: source.as_str().to_string(),
        spike,
        reactivated,
    })
}

/// Advance the engine clock by one day.
///
/// Every non-dormant rule's spike decays by `decay_per_day` with a floor of
/// zero; every non-pinned rule past the dormancy window goes dormant.
/// One call is exactly one day — callers wanting N days call N times.
pub fn advance_day(
    state: &mut EngineState,
    catalog: &RuleCatalog,
    config: &LifecycleConfig,
) -> AdvanceResult {
    state.day += 1;
    let day = state.day;

    let mut decayed = 0;
    let mut newly_dormant = Vec::new();

    for (id, dynamics) in state.rules.iter_mut() {
        if dynamics.dormant {
            continue;
        }

        if dynamics.spike > 0.0 {
            dynamics.spike = (dynamics.spike - config.decay_per_day).max(0.0);
            if dynamics.spike < SPIKE_EPSILON {
                dynamics.spike = 0.0;
            }
            decayed += 1;
        }

        let pinned = catalog.get(id).map(|spec| spec.pinned).unwrap_or(false);
        if !pinned && day - dynamics.last_active_day > config.dormancy_days {
            dynamics.dormant = true;
            newly_dormant.push(id.clone());
        }
    }

    state.write_log(
        "advance",
        None,
        Some(serde_json::json!({
            "decayed": decayed,
            "newly_dormant": &newly_dormant,
        })),
    );

    AdvanceResult {
        day,
        decayed,
        newly_dormant,
    }
}
