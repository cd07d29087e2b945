//! CLI `validate` command — run structural invariant checks and report.

use anyhow::{bail, Result};

use crate::catalog::RuleCatalog;
use crate::config::ReflexConfig;
use crate::engine::validate::check_invariants;
use crate::state::EngineState;

/// Check catalog and state invariants; exit code reflects pass/fail.
///
/// Uses the lenient catalog parse so structural problems are enumerated here
/// instead of aborting the load.
pub fn validate(config: &ReflexConfig) -> Result<()> {
    let catalog_path = config.resolved_catalog_path();
    let catalog = RuleCatalog::parse_from(&catalog_path)?;

    let state_path = config.resolved_state_path();
    let state = EngineState::load_or_init(&state_path, &catalog)?;

    println!("Reflex Validation Report");
    println!("========================");
    println!();
    println!("Catalog:           {} ({} rules)", catalog_path.display(), catalog.rules.len());
    println!("State:             {} (day {})", state_path.display(), state.day);
    println!();

    let violations = check_invariants(&catalog, &state);
    if violations.is_empty() {
        println!("Invariant check:   PASSED");
        return Ok(());
    }

    println!("Invariant check:   FAILED");
    for violation in &violations {
        println!("  - {violation}");
    }
    bail!("validation failed with {} violation(s)", violations.len());
}
