//! Module registry for script engines.
//!
//! The registry owns one `nuv` and one `process` module, built once from an
//! explicit host and process snapshot, and hands out the same instances to
//! every engine and every `import`.

use crate::module::nuv_module;
use crate::process::{process_module, ProcessSnapshot};
use nuv_host::{HostFunctions, OsHost};
use rhai::{Engine, EvalAltResult, Module, ModuleResolver, Position};
use std::sync::Arc;
use tracing::{debug, info};

/// Name under which host capabilities are imported.
pub const NUV_MODULE: &str = "nuv";

/// Name under which `argv` and `env` are imported.
pub const PROCESS_MODULE: &str = "process";

/// Shared script modules, resolvable by name.
#[derive(Clone)]
pub struct ModuleRegistry {
    nuv: Arc<Module>,
    process: Arc<Module>,
}

impl ModuleRegistry {
    /// Build the modules over `host` and `snapshot`.
    pub fn new(host: Arc<dyn HostFunctions>, snapshot: &ProcessSnapshot) -> Self {
        let registry = Self {
            nuv: Arc::new(nuv_module(host)),
            process: Arc::new(process_module(snapshot)),
        };
        debug!(
            "Registered modules {} and {} ({} arguments)",
            NUV_MODULE,
            PROCESS_MODULE,
            snapshot.argv.len()
        );
        registry
    }

    /// Registry over the real operating system and the current process.
    pub fn with_default_host() -> Self {
        Self::new(Arc::new(OsHost::new()), &ProcessSnapshot::capture())
    }

    /// The shared `nuv` module.
    pub fn nuv(&self) -> &Arc<Module> {
        &self.nuv
    }

    /// The shared `process` module.
    pub fn process(&self) -> &Arc<Module> {
        &self.process
    }

    /// Look up a module by import name.
    pub fn get(&self, name: &str) -> Option<Arc<Module>> {
        match name {
            NUV_MODULE => Some(Arc::clone(&self.nuv)),
            PROCESS_MODULE => Some(Arc::clone(&self.process)),
            _ => None,
        }
    }

    /// Make both modules importable in `engine`.
    ///
    /// Replaces any module resolver the engine had.
    pub fn install(&self, engine: &mut Engine) {
        engine.set_module_resolver(self.clone());
    }

    /// Make both modules importable and also reachable as `nuv::` and
    /// `process::` without an import.
    pub fn enable(&self, engine: &mut Engine) {
        self.install(engine);
        engine.register_static_module(NUV_MODULE, Arc::clone(&self.nuv));
        engine.register_static_module(PROCESS_MODULE, Arc::clone(&self.process));
        info!("Enabled modules {} and {}", NUV_MODULE, PROCESS_MODULE);
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(
        &self,
        _engine: &Engine,
        _source: Option<&str>,
        path: &str,
        pos: Position,
    ) -> Result<Arc<Module>, Box<EvalAltResult>> {
        self.get(path)
            .ok_or_else(|| EvalAltResult::ErrorModuleNotFound(path.to_string(), pos).into())
    }
}

/// New engine with `registry` installed and enabled.
pub fn new_engine(registry: &ModuleRegistry) -> Engine {
    let mut engine = Engine::new();
    registry.enable(&mut engine);
    engine
}
