//! CLI `violation` command — record a rule violation from a given source.

use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::cli::load_context;
use crate::config::ReflexConfig;
use crate::engine::lifecycle::record_violation;
use crate::engine::types::Source;

/// Apply a violation spike to a rule and persist the state.
pub fn violation(config: &ReflexConfig, rule_id: &str, source: &str) -> Result<()> {
    let source = Source::from_str(source)
        .map_err(|e| anyhow!("{e} (expected hook, user, self-check, or audit)"))?;

    let mut ctx = load_context(config)?;
    let result = record_violation(
        &mut ctx.state,
        &ctx.catalog,
        rule_id,
        source,
        &config.lifecycle,
    )?;
    ctx.state.save(&ctx.state_path)?;

    if result.reactivated {
        println!(
            "{} reactivated from dormancy, spike {:.2} ({})",
            result.rule_id, result.spike, result.source
        );
    } else {
        println!(
            "{} spiked to {:.2} ({})",
            result.rule_id, result.spike, result.source
        );
    }

    Ok(())
}
