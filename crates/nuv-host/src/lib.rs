//! # nuv-host
//!
//! Native capabilities exposed to nuv scripts.
//!
//! This crate provides:
//! - The [`HostFunctions`] trait, the narrow set of operations a script may use
//! - [`OsHost`], backed by the real operating system
//! - [`MemoryHost`], a simulated in-memory tree for tests
//! - [`RestrictedHost`], which denies operations missing from a [`CapabilitySet`]
//! - The directory scanner and the YAML document codec
//!
//! ## Security Model
//!
//! Every script-visible entry maps to exactly one [`Capability`]. Hosts embedding
//! untrusted scripts wrap their provider in a [`RestrictedHost`] that only grants
//! the capabilities listed in configuration.

pub mod capability;
pub mod document;
pub mod error;
pub mod host;
pub mod memory;
pub mod os;
pub mod paths;
pub mod restricted;
pub mod scanner;

pub use capability::{Capability, CapabilitySet};
pub use document::{Document, Value};
pub use error::{ErrorKind, HostError, HostResult};
pub use host::{HostFunctions, Transform};
pub use memory::MemoryHost;
pub use os::OsHost;
pub use restricted::RestrictedHost;
pub use scanner::DirectoryTree;
