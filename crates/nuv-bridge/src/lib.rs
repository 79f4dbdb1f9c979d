//! # nuv-bridge
//!
//! Binds nuv host capabilities into the Rhai scripting engine.
//!
//! This crate provides:
//! - The `nuv` module: one script entry per [`nuv_host::Capability`]
//! - The `process` module: `argv` and `env` of a [`ProcessSnapshot`]
//! - [`ModuleRegistry`], which resolves both modules for `import`
//!
//! ## Example
//!
//! ```rust,no_run
//! use nuv_bridge::{new_engine, ModuleRegistry};
//!
//! let engine = new_engine(&ModuleRegistry::with_default_host());
//! engine
//!     .run(r#"
//!         import "nuv" as nuv;
//!         let doc = nuv::fromYaml(nuv::readFile("nuvfile.yml"));
//!         print(doc.version);
//!     "#)
//!     .unwrap();
//! ```
//!
//! ## Errors
//!
//! Failed operations throw a string `"<Kind>: <message>"` into the script,
//! catchable with `try`/`catch`. Only `exec` never throws: it returns
//! whatever output it could collect.

pub mod callback;
pub mod marshal;
pub mod module;
pub mod process;
pub mod registry;

pub use callback::ScriptTransform;
pub use marshal::{raise, ScriptResult};
pub use module::{nuv_module, MAX_ARITY};
pub use process::{process_module, ProcessSnapshot};
pub use registry::{new_engine, ModuleRegistry, NUV_MODULE, PROCESS_MODULE};
