//! The `nuv` script module.
//!
//! Each [`Capability`] is bound under its entry name for every arity up to
//! [`MAX_ARITY`], with untyped parameters. Rhai therefore routes every call
//! here, whatever the script passed, and [`Args`] does the checking.

use crate::callback::ScriptTransform;
use crate::marshal::{
    document_from_map, document_to_dynamic, raise, scalar_text, strings_to_dynamic, Args,
    ScriptResult,
};
use nuv_host::{Capability, HostError, HostFunctions, HostResult};
use rhai::{Dynamic, FuncRegistration, Module, NativeCallContext, Position, RhaiFunc};
use std::any::TypeId;
use std::sync::Arc;
use tracing::{debug, trace};

/// Largest argument count routed to the bridge.
pub const MAX_ARITY: usize = 8;

/// Build the `nuv` module over `host`.
pub fn nuv_module(host: Arc<dyn HostFunctions>) -> Module {
    let mut module = Module::new();
    module.set_id(crate::registry::NUV_MODULE);

    for cap in Capability::ALL {
        for arity in 0..=MAX_ARITY {
            FuncRegistration::new(cap.entry_name())
                .in_internal_namespace()
                .set_into_module_raw(
                    &mut module,
                    vec![TypeId::of::<Dynamic>(); arity],
                    entry(Arc::clone(&host), cap),
                );
        }
    }

    module.build_index();
    debug!("Built nuv module with {} entries", Capability::ALL.len());
    module
}

/// Native function bound for `cap`. It needs the call context for
/// callbacks and must never be cached or constant-folded.
fn entry(host: Arc<dyn HostFunctions>, cap: Capability) -> RhaiFunc {
    RhaiFunc::Method {
        func: Arc::new(move |ctx, args| match ctx {
            Some(ctx) => call(host.as_ref(), cap, &ctx, args),
            None => Err(raise(
                HostError::Argument(format!("{}() requires a calling script", cap.entry_name())),
                Position::NONE,
            )),
        }),
        has_context: true,
        is_pure: true,
        is_volatile: true,
    }
}

fn call(
    host: &dyn HostFunctions,
    cap: Capability,
    ctx: &NativeCallContext,
    values: &mut [&mut Dynamic],
) -> ScriptResult {
    trace!("{}() called with {} argument(s)", cap.entry_name(), values.len());
    let args = Args::new(cap.entry_name(), values);

    match cap {
        Capability::Scan => scan(host, ctx, &args),
        other => invoke(host, other, &args).map_err(|err| raise(err, ctx.call_position())),
    }
}

fn invoke(host: &dyn HostFunctions, cap: Capability, args: &Args<'_>) -> HostResult<Dynamic> {
    match cap {
        Capability::Exists => {
            args.exactly(1)?;
            Ok(Dynamic::from(host.exists(&args.string(0)?)))
        }
        Capability::ReadFile => {
            args.at_least(1)?;
            host.read_file(&args.string(0)?).map(Dynamic::from)
        }
        Capability::WriteFile => {
            args.at_least(2)?;
            let path = args.string(0)?;
            let content = args.string(1)?;
            host.write_file(&path, &content)?;
            Ok(Dynamic::UNIT)
        }
        Capability::ReadDir => {
            args.at_least(1)?;
            host.read_dir(&args.string(0)?).map(strings_to_dynamic)
        }
        Capability::ToYaml => {
            args.at_least(1)?;
            let doc = document_from_map(args.map(0)?)?;
            host.to_yaml(&doc).map(Dynamic::from)
        }
        Capability::FromYaml => {
            args.at_least(1)?;
            host.from_yaml(&args.string(0)?).map(document_to_dynamic)
        }
        Capability::BasePath => {
            args.exactly(1)?;
            Ok(Dynamic::from(host.base_path(&args.string(0)?)))
        }
        Capability::FileExt => {
            args.exactly(1)?;
            Ok(Dynamic::from(host.file_ext(&args.string(0)?)))
        }
        Capability::IsDir => {
            args.exactly(1)?;
            Ok(Dynamic::from(host.is_dir(&args.string(0)?)))
        }
        Capability::JoinPath => {
            args.exactly(2)?;
            let a = args.string(0)?;
            let b = args.string(1)?;
            Ok(Dynamic::from(host.join_path(&a, &b)))
        }
        Capability::Exec => {
            args.at_least(1)?;
            let command = args.string(0)?;
            let rest = exec_args(args)?;
            Ok(Dynamic::from(host.exec(&command, &rest)))
        }
        Capability::Scan => Err(HostError::Argument(
            "scan() requires a calling script".to_string(),
        )),
    }
}

/// Arguments after the command. A lone array is expanded in place.
fn exec_args(args: &Args<'_>) -> HostResult<Vec<String>> {
    if args.len() == 2 {
        if let Some(items) = args.array(1) {
            return items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        HostError::Argument(format!(
                            "exec() cannot pass a {} as a command argument",
                            item.type_name()
                        ))
                    })
                })
                .collect();
        }
    }
    (1..args.len()).map(|idx| args.display(idx)).collect()
}

fn scan(host: &dyn HostFunctions, ctx: &NativeCallContext, args: &Args<'_>) -> ScriptResult {
    let pos = ctx.call_position();
    let (root, fn_ptr) = args
        .at_least(2)
        .and_then(|()| Ok((args.string(0)?, args.fn_ptr(1)?)))
        .map_err(|err| raise(err, pos))?;

    let mut transform = ScriptTransform::new(ctx, fn_ptr);
    let result = host.scan(&root, &mut |path: &str| transform.call(path));

    match result {
        Ok(out) => Ok(Dynamic::from(out)),
        Err(err) => Err(transform.into_error(err, pos)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuv_host::MemoryHost;
    use rhai::Engine;

    fn engine(host: MemoryHost) -> (Engine, Arc<MemoryHost>) {
        let host = Arc::new(host);
        let mut engine = Engine::new();
        engine.register_static_module("nuv", Arc::new(nuv_module(host.clone())));
        (engine, host)
    }

    #[test]
    fn test_every_entry_is_bound() {
        let (engine, host) = engine(MemoryHost::new());
        for cap in Capability::ALL {
            let script = format!("nuv::{}()", cap.entry_name());
            let err = engine.eval::<Dynamic>(&script).unwrap_err();
            assert!(
                err.to_string().contains("ArgumentError"),
                "{} is not bound: {}",
                cap.entry_name(),
                err
            );
        }
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_path_entries() {
        let (engine, _) = engine(MemoryHost::new());
        let ext: String = engine.eval(r#"nuv::fileExt("a/b/sample.txt")"#).unwrap();
        assert_eq!(ext, ".txt");
        let joined: String = engine.eval(r#"nuv::joinPath("a", "b")"#).unwrap();
        assert_eq!(joined, "a/b");
    }

    #[test]
    fn test_exact_arity_rejects_extra_arguments() {
        let (engine, host) = engine(MemoryHost::new().with_file("a.txt", "alpha"));
        let err = engine
            .eval::<bool>(r#"nuv::exists("a.txt", "b.txt")"#)
            .unwrap_err();
        assert!(err.to_string().contains("ArgumentError"));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_exec_expands_array() {
        let (engine, host) = engine(MemoryHost::new().with_command("ls", "a.txt\n"));
        let out: String = engine.eval(r#"nuv::exec("ls", ["-l", 1])"#).unwrap();
        assert_eq!(out, "a.txt\n");
        assert_eq!(host.calls(), vec![Capability::Exec]);
    }

    #[test]
    fn test_exec_at_max_arity() {
        let (engine, host) = engine(MemoryHost::new().with_command("ls", "listing\n"));
        let out: String = engine
            .eval(r#"nuv::exec("ls", 1, 2, 3, 4, 5, 6, 7)"#)
            .unwrap();
        assert_eq!(out, "listing\n");

        let err = engine
            .eval::<String>(r#"nuv::exec("ls", 1, 2, 3, 4, 5, 6, 7, 8)"#)
            .unwrap_err();
        assert!(err.to_string().contains("exec"), "{err}");
        assert_eq!(host.calls(), vec![Capability::Exec]);
    }

    #[test]
    fn test_scan_requires_function() {
        let (engine, host) = engine(MemoryHost::new().with_dir("data"));
        let err = engine
            .eval::<String>(r#"nuv::scan("data", "not a function")"#)
            .unwrap_err();
        assert!(err.to_string().contains("requires a function"));
        assert!(host.calls().is_empty());
    }
}
