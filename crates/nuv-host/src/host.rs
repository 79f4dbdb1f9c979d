//! Host functions exposed to scripts.
//!
//! [`HostFunctions`] is the only way a script reaches the host. The script
//! module binds one entry per method; nothing else touches the filesystem or
//! spawns processes.

use crate::document::{self, Document};
use crate::error::HostResult;
use crate::paths;

/// Per-directory transform supplied by the caller of [`HostFunctions::scan`].
///
/// It is borrowed for the duration of one scan and never stored.
pub type Transform<'a> = dyn FnMut(&str) -> HostResult<String> + 'a;

/// Host functions available to scripts.
///
/// Pure string operations have default implementations shared by every host.
pub trait HostFunctions: Send + Sync {
    /// Check whether `path` exists. Never fails.
    fn exists(&self, path: &str) -> bool;

    /// Read a whole file as text.
    fn read_file(&self, path: &str) -> HostResult<String>;

    /// Create or truncate `path` with `content`.
    fn write_file(&self, path: &str, content: &str) -> HostResult<()>;

    /// Names of the entries in a directory, sorted.
    fn read_dir(&self, path: &str) -> HostResult<Vec<String>>;

    /// Walk the tree under `root`, concatenating `transform(dir)` for every
    /// directory in pre-order.
    fn scan(&self, root: &str, transform: &mut Transform<'_>) -> HostResult<String>;

    /// Check whether `path` is a directory. Never fails.
    fn is_dir(&self, path: &str) -> bool;

    /// Run `command` and return whatever it printed.
    ///
    /// Launch failures and non-zero exits are not reported as errors.
    fn exec(&self, command: &str, args: &[String]) -> String;

    /// Encode a document as YAML.
    fn to_yaml(&self, doc: &Document) -> HostResult<String> {
        document::encode(doc)
    }

    /// Decode YAML text into a document.
    fn from_yaml(&self, text: &str) -> HostResult<Document> {
        document::decode(text)
    }

    /// Last element of `path`.
    fn base_path(&self, path: &str) -> String {
        paths::base(path)
    }

    /// Extension of `path`, including the dot.
    fn file_ext(&self, path: &str) -> String {
        paths::ext(path)
    }

    /// Lexically join two paths.
    fn join_path(&self, a: &str, b: &str) -> String {
        paths::join(a, b)
    }
}
