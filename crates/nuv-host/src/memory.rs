//! In-memory host for tests.
//!
//! [`MemoryHost`] simulates a small filesystem tree and a table of canned
//! command outputs. It records every host-touching call so tests can assert
//! which capabilities a script actually reached.

use crate::capability::Capability;
use crate::error::{HostError, HostResult};
use crate::host::{HostFunctions, Transform};
use crate::paths;
use crate::scanner::{self, DirectoryTree};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
}

#[derive(Debug, Default)]
struct Tree {
    /// Nodes keyed by cleaned path.
    nodes: BTreeMap<String, Node>,

    /// Paths that fail with permission denied.
    denied: HashSet<String>,

    /// Canned output per command name.
    commands: HashMap<String, String>,
}

/// Simulated host with an in-memory tree.
#[derive(Debug)]
pub struct MemoryHost {
    tree: RwLock<Tree>,
    calls: Mutex<Vec<Capability>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create a host containing only the current and root directories.
    pub fn new() -> Self {
        let mut tree = Tree::default();
        tree.nodes.insert(".".to_string(), Node::Dir);
        tree.nodes.insert("/".to_string(), Node::Dir);
        Self {
            tree: RwLock::new(tree),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a directory and any missing ancestors.
    pub fn with_dir(self, path: &str) -> Self {
        {
            let mut tree = self.write();
            let path = paths::clean(path);
            create_ancestors(&mut tree, &path);
            tree.nodes.insert(path, Node::Dir);
        }
        self
    }

    /// Add a file and any missing ancestor directories.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        {
            let mut tree = self.write();
            let path = paths::clean(path);
            create_ancestors(&mut tree, &path);
            tree.nodes.insert(path, Node::File(content.to_string()));
        }
        self
    }

    /// Make every access to `path` fail with permission denied.
    pub fn deny(self, path: &str) -> Self {
        self.write().denied.insert(paths::clean(path));
        self
    }

    /// Register the output `exec` returns for `command`.
    pub fn with_command(self, command: &str, output: &str) -> Self {
        self.write()
            .commands
            .insert(command.to_string(), output.to_string());
        self
    }

    /// Capabilities invoked so far, in call order.
    pub fn calls(&self) -> Vec<Capability> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, cap: Capability) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(cap);
    }

    fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn parent_of(path: &str) -> Option<String> {
    if path == "/" || path == "." {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(path[..idx].to_string()),
        None => Some(".".to_string()),
    }
}

fn create_ancestors(tree: &mut Tree, path: &str) {
    let mut current = parent_of(path);
    while let Some(dir) = current {
        current = parent_of(&dir);
        tree.nodes.entry(dir).or_insert(Node::Dir);
    }
}

impl HostFunctions for MemoryHost {
    fn exists(&self, path: &str) -> bool {
        self.record(Capability::Exists);
        self.contains(path)
    }

    fn read_file(&self, path: &str) -> HostResult<String> {
        self.record(Capability::ReadFile);
        let key = paths::clean(path);
        let tree = self.read();
        if tree.denied.contains(&key) {
            return Err(HostError::PermissionDenied(path.to_string()));
        }
        match tree.nodes.get(&key) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(HostError::Io {
                path: path.to_string(),
                source: std::io::Error::other("is a directory"),
            }),
            None => Err(HostError::NotFound(path.to_string())),
        }
    }

    fn write_file(&self, path: &str, content: &str) -> HostResult<()> {
        self.record(Capability::WriteFile);
        let key = paths::clean(path);
        let mut tree = self.write();
        if tree.denied.contains(&key) {
            return Err(HostError::PermissionDenied(path.to_string()));
        }

        if let Some(parent) = parent_of(&key) {
            if tree.denied.contains(&parent) {
                return Err(HostError::PermissionDenied(path.to_string()));
            }
            match tree.nodes.get(&parent) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(HostError::NotADirectory(parent)),
                None => return Err(HostError::NotFound(parent)),
            }
        }

        if let Some(Node::Dir) = tree.nodes.get(&key) {
            return Err(HostError::Io {
                path: path.to_string(),
                source: std::io::Error::other("is a directory"),
            });
        }
        tree.nodes.insert(key, Node::File(content.to_string()));
        Ok(())
    }

    fn read_dir(&self, path: &str) -> HostResult<Vec<String>> {
        self.record(Capability::ReadDir);
        self.list(path)
    }

    fn scan(&self, root: &str, transform: &mut Transform<'_>) -> HostResult<String> {
        self.record(Capability::Scan);
        scanner::scan(self, root, transform)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.record(Capability::IsDir);
        self.is_directory(path)
    }

    fn exec(&self, command: &str, _args: &[String]) -> String {
        self.record(Capability::Exec);
        match self.read().commands.get(command) {
            Some(output) => output.clone(),
            None => {
                warn!("Failed to launch {}: no such command", command);
                String::new()
            }
        }
    }
}

impl DirectoryTree for MemoryHost {
    fn contains(&self, path: &str) -> bool {
        self.read().nodes.contains_key(&paths::clean(path))
    }

    fn is_directory(&self, path: &str) -> bool {
        matches!(self.read().nodes.get(&paths::clean(path)), Some(Node::Dir))
    }

    fn list(&self, path: &str) -> HostResult<Vec<String>> {
        let key = paths::clean(path);
        let tree = self.read();
        match tree.nodes.get(&key) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(HostError::NotADirectory(path.to_string())),
            None => return Err(HostError::NotFound(path.to_string())),
        }
        if tree.denied.contains(&key) {
            return Err(HostError::PermissionDenied(path.to_string()));
        }

        // BTreeMap iteration keeps the names sorted
        let names = tree
            .nodes
            .keys()
            .filter(|candidate| parent_of(candidate).as_deref() == Some(key.as_str()))
            .map(|candidate| paths::base(candidate))
            .collect();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> MemoryHost {
        MemoryHost::new()
            .with_file("testdata/sample.txt", "a sample text file")
            .with_dir("testdata/subfolder")
            .with_file("testdata/subfolder/deep.yaml", "version: 3\n")
    }

    #[test]
    fn test_read_and_write() {
        let host = sample();
        assert_eq!(
            host.read_file("testdata/sample.txt").unwrap(),
            "a sample text file"
        );

        assert!(!host.exists("testdata/written.txt"));
        host.write_file("testdata/written.txt", "hello").unwrap();
        assert!(host.exists("testdata/written.txt"));
        assert_eq!(host.read_file("./testdata/written.txt").unwrap(), "hello");
    }

    #[test]
    fn test_write_requires_parent() {
        let host = sample();
        let err = host.write_file("missing/file.txt", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = host
            .write_file("testdata/sample.txt/child", "x")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotADirectory);
    }

    #[test]
    fn test_read_dir() {
        let host = sample();
        assert_eq!(
            host.read_dir("testdata").unwrap(),
            vec!["sample.txt", "subfolder"]
        );
        assert_eq!(
            host.read_dir("testdata/sample.txt").unwrap_err().kind(),
            ErrorKind::NotADirectory
        );
    }

    #[test]
    fn test_scan_matches_fixture() {
        let host = sample();
        let out = host
            .scan("testdata", &mut |p: &str| Ok(format!("{p} ")))
            .unwrap();
        assert_eq!(out, "testdata testdata/subfolder ");
    }

    #[test]
    fn test_denied() {
        let host = sample().deny("testdata/sample.txt");
        assert_eq!(
            host.read_file("testdata/sample.txt").unwrap_err().kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_exec_and_calls() {
        let host = MemoryHost::new().with_command("nuv", "ok\n");
        assert_eq!(host.exec("nuv", &["-version".to_string()]), "ok\n");
        assert_eq!(host.exec("missing", &[]), "");
        assert_eq!(host.calls(), vec![Capability::Exec, Capability::Exec]);
    }
}
