//! Engine construction and script execution.

use crate::config::Config;
use anyhow::{Context, Result};
use nuv_bridge::{new_engine, ModuleRegistry, ProcessSnapshot};
use nuv_host::{HostFunctions, OsHost, RestrictedHost};
use rhai::Engine;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Host for scripts: the OS, restricted to the configured capabilities.
pub fn build_host(config: &Config) -> Result<Arc<dyn HostFunctions>> {
    match config.granted()? {
        None => Ok(Arc::new(OsHost::new())),
        Some(granted) => {
            if granted.is_empty() {
                warn!("Capability allow list is empty, scripts can only fail");
            }
            info!("Restricting scripts to {} capabilities", granted.len());
            Ok(Arc::new(RestrictedHost::new(OsHost::new(), granted)))
        }
    }
}

/// Engine with the nuv modules enabled and the configured limits applied.
pub fn build_engine(config: &Config, snapshot: &ProcessSnapshot) -> Result<Engine> {
    let registry = ModuleRegistry::new(build_host(config)?, snapshot);
    let mut engine = new_engine(&registry);

    let limits = &config.engine;
    engine.set_max_call_levels(limits.max_call_levels);
    engine.set_max_operations(limits.max_operations);
    engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
    debug!(
        "Engine limits: {} call levels, {} operations, {} expression depth",
        limits.max_call_levels, limits.max_operations, limits.max_expr_depth
    );

    Ok(engine)
}

/// Compile and run the script at `path`.
pub fn run_script(engine: &Engine, path: &Path) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;

    let mut ast = engine
        .compile(&source)
        .map_err(|err| anyhow::anyhow!("Failed to compile {}: {}", path.display(), err))?;
    ast.set_source(path.to_string_lossy().as_ref());

    info!("Running {}", path.display());
    engine
        .run_ast(&ast)
        .map_err(|err| anyhow::anyhow!("Script {} failed: {}", path.display(), err))
}
