use anyhow::Result;

use crate::cli::load_context;
use crate::config::ReflexConfig;
use crate::engine::stats::engine_stats;

/// Display engine statistics in the terminal.
pub fn stats(config: &ReflexConfig) -> Result<()> {
    let ctx = load_context(config)?;
    let response = engine_stats(
        &ctx.catalog,
        &ctx.state,
        &config.merge,
        Some(&ctx.state_path),
    );

    println!("Rule Engine Statistics");
    println!("{}", "=".repeat(40));
    println!("  Day:                 {}", response.day);
    println!("  Total rules:         {}", response.total_rules);
    println!("  Active:              {}", response.active_rules);
    println!("  Dormant:             {}", response.dormant_rules);
    println!("  Pinned:              {}", response.pinned_rules);
    println!("  Spiked:              {}", response.spiked_rules);
    println!();

    println!("  Violations recorded: {}", response.total_violations);
    println!("  Activations:         {}", response.total_activations);
    println!("  Tracked pairs:       {}", response.tracked_pairs);
    println!("  State size:          {} bytes", response.state_size_bytes);
    println!();

    if response.merge_candidates.is_empty() {
        println!("No merge candidates.");
    } else {
        println!("Merge candidates (review for consolidation):");
        for candidate in &response.merge_candidates {
            println!(
                "  {} + {}  {} joint activations ({:.0}% co-activation)",
                candidate.rule_a,
                candidate.rule_b,
                candidate.joint,
                candidate.ratio * 100.0
            );
        }
    }

    Ok(())
}
