//! Capability-gated host.
//!
//! Wraps another host and only forwards the operations whose capability has
//! been granted. Fallible operations fail with permission denied; the
//! infallible ones answer as if the host had nothing to offer (`false` or
//! an empty string).

use crate::capability::{Capability, CapabilitySet};
use crate::document::Document;
use crate::error::{HostError, HostResult};
use crate::host::{HostFunctions, Transform};
use tracing::warn;

/// Host that enforces a [`CapabilitySet`] in front of another host.
pub struct RestrictedHost<H> {
    inner: H,
    granted: CapabilitySet,
}

impl<H: HostFunctions> RestrictedHost<H> {
    /// Create a restricted view of `inner`.
    pub fn new(inner: H, granted: CapabilitySet) -> Self {
        Self { inner, granted }
    }

    /// Capabilities granted to scripts.
    pub fn granted(&self) -> &CapabilitySet {
        &self.granted
    }

    /// Get the wrapped host.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn check(&self, cap: Capability) -> HostResult<()> {
        if self.granted.has(cap) {
            Ok(())
        } else {
            warn!("Denied capability {}", cap.as_str());
            Err(HostError::PermissionDenied(format!(
                "capability '{}' is not granted",
                cap.as_str()
            )))
        }
    }
}

impl<H: HostFunctions> HostFunctions for RestrictedHost<H> {
    fn exists(&self, path: &str) -> bool {
        self.check(Capability::Exists).is_ok() && self.inner.exists(path)
    }

    fn read_file(&self, path: &str) -> HostResult<String> {
        self.check(Capability::ReadFile)?;
        self.inner.read_file(path)
    }

    fn write_file(&self, path: &str, content: &str) -> HostResult<()> {
        self.check(Capability::WriteFile)?;
        self.inner.write_file(path, content)
    }

    fn read_dir(&self, path: &str) -> HostResult<Vec<String>> {
        self.check(Capability::ReadDir)?;
        self.inner.read_dir(path)
    }

    fn scan(&self, root: &str, transform: &mut Transform<'_>) -> HostResult<String> {
        self.check(Capability::Scan)?;
        self.inner.scan(root, transform)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.check(Capability::IsDir).is_ok() && self.inner.is_dir(path)
    }

    fn exec(&self, command: &str, args: &[String]) -> String {
        match self.check(Capability::Exec) {
            Ok(()) => self.inner.exec(command, args),
            Err(_) => String::new(),
        }
    }

    fn to_yaml(&self, doc: &Document) -> HostResult<String> {
        self.check(Capability::ToYaml)?;
        self.inner.to_yaml(doc)
    }

    fn from_yaml(&self, text: &str) -> HostResult<Document> {
        self.check(Capability::FromYaml)?;
        self.inner.from_yaml(text)
    }

    fn base_path(&self, path: &str) -> String {
        match self.check(Capability::BasePath) {
            Ok(()) => self.inner.base_path(path),
            Err(_) => String::new(),
        }
    }

    fn file_ext(&self, path: &str) -> String {
        match self.check(Capability::FileExt) {
            Ok(()) => self.inner.file_ext(path),
            Err(_) => String::new(),
        }
    }

    fn join_path(&self, a: &str, b: &str) -> String {
        match self.check(Capability::JoinPath) {
            Ok(()) => self.inner.join_path(a, b),
            Err(_) => String::new(),
        }
    }
}
