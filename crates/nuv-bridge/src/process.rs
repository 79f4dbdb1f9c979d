//! The `process` script module.

use crate::registry::PROCESS_MODULE;
use rhai::{Dynamic, Map, Module};
use std::collections::BTreeMap;

/// Command line arguments and environment seen by scripts.
///
/// Taken once, before any script runs, and never updated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    /// Command line arguments, program first.
    pub argv: Vec<String>,
    /// Environment variables.
    pub env: BTreeMap<String, String>,
}

impl ProcessSnapshot {
    /// Snapshot of the current process.
    ///
    /// Arguments and variables that are not valid unicode are converted lossily.
    pub fn capture() -> Self {
        let argv = std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let env = std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect();
        Self { argv, env }
    }

    /// Snapshot with the given arguments and environment.
    pub fn new(argv: Vec<String>, env: BTreeMap<String, String>) -> Self {
        Self { argv, env }
    }
}

/// Build the `process` module exposing `argv` and `env`.
pub fn process_module(snapshot: &ProcessSnapshot) -> Module {
    let argv: rhai::Array = snapshot.argv.iter().cloned().map(Dynamic::from).collect();
    let env: Map = snapshot
        .env
        .iter()
        .map(|(key, value)| (key.as_str().into(), Dynamic::from(value.clone())))
        .collect();

    let mut module = Module::new();
    module.set_id(PROCESS_MODULE);
    module.set_var("argv", Dynamic::from_array(argv));
    module.set_var("env", Dynamic::from_map(env));
    module.build_index();
    module
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_has_program_name() {
        let snapshot = ProcessSnapshot::capture();
        assert!(!snapshot.argv.is_empty());
    }

    #[test]
    fn test_process_module_variables() {
        let snapshot = ProcessSnapshot::new(
            vec!["deploy.rhai".into(), "--dry-run".into()],
            BTreeMap::from([("NUV_ROOT".to_string(), "/opt/nuv".to_string())]),
        );
        let module = process_module(&snapshot);

        let argv = module.get_var_value::<rhai::Array>("argv").unwrap();
        assert_eq!(argv.len(), 2);
        assert_eq!(argv[1].clone().into_string().unwrap(), "--dry-run");

        let env = module.get_var_value::<Map>("env").unwrap();
        assert_eq!(env["NUV_ROOT"].clone().into_string().unwrap(), "/opt/nuv");
    }
}
