//! CLI `reset` command — delete the persisted state after user confirmation.
//!
//! The only sanctioned way to reinitialize: corruption never falls back to a
//! fresh state silently, the user asks for it here.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::ReflexConfig;

/// Delete the state file after confirmation. The rule catalog is untouched.
pub fn reset(config: &ReflexConfig) -> Result<()> {
    let state_path = config.resolved_state_path();

    if !state_path.exists() {
        println!("No state file at {}; nothing to reset.", state_path.display());
        return Ok(());
    }

    println!("WARNING: This will permanently delete all spike, dormancy, and co-activation history.");
    println!("State file: {}", state_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    std::fs::remove_file(&state_path)?;

    println!("State deleted. The next invocation starts fresh from the catalog.");
    Ok(())
}
