pub mod advance;
pub mod reset;
pub mod stats;
pub mod validate;
pub mod violation;

use anyhow::Result;
use std::path::PathBuf;

use crate::catalog::RuleCatalog;
use crate::config::ReflexConfig;
use crate::state::EngineState;

/// Everything a verb needs: resolved paths, the parsed catalog, and the
/// loaded (or freshly bootstrapped) state.
pub struct EngineContext {
    pub catalog: RuleCatalog,
    pub state: EngineState,
    pub state_path: PathBuf,
}

/// Load the catalog and state for one invocation.
pub fn load_context(config: &ReflexConfig) -> Result<EngineContext> {
    let catalog = RuleCatalog::load_from(config.resolved_catalog_path())?;
    let state_path = config.resolved_state_path();
    let state = EngineState::load_or_init(&state_path, &catalog)?;
    Ok(EngineContext {
        catalog,
        state,
        state_path,
    })
}
