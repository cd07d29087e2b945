//! CLI `advance` command — apply decay and dormancy transitions.

use anyhow::Result;

use crate::cli::load_context;
use crate::config::ReflexConfig;
use crate::engine::lifecycle::advance_day;

/// Advance the engine clock by `days` (each one a full decay/dormancy step),
/// persisting once at the end.
pub fn advance(config: &ReflexConfig, days: u64) -> Result<()> {
    let mut ctx = load_context(config)?;

    let mut newly_dormant = Vec::new();
    let mut last_day = ctx.state.day;
    for _ in 0..days {
        let result = advance_day(&mut ctx.state, &ctx.catalog, &config.lifecycle);
        last_day = result.day;
        newly_dormant.extend(result.newly_dormant);
    }

    ctx.state.save(&ctx.state_path)?;

    println!("Advanced {days} day(s); now at day {last_day}.");
    if newly_dormant.is_empty() {
        println!("No rules went dormant.");
    } else {
        println!("Went dormant: {}", newly_dormant.join(", "));
    }

    Ok(())
}
