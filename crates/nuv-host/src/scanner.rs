//! Directory tree scanner.
//!
//! The scanner walks a tree depth-first in pre-order: a directory is handed
//! to the transform before any of its descendants, and siblings follow the
//! (sorted) listing order. Files are listed so that recursion can reach
//! nested directories, but they are never passed to the transform.

use crate::error::{HostError, HostResult};
use crate::host::Transform;
use crate::paths;
use tracing::{debug, warn};

/// The view of a directory tree the scanner needs.
pub trait DirectoryTree {
    /// Whether anything exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Whether `path` is a directory, without following symlinks.
    fn is_directory(&self, path: &str) -> bool;

    /// Sorted entry names of the directory at `path`.
    fn list(&self, path: &str) -> HostResult<Vec<String>>;
}

/// Scan the tree rooted at `root`, accumulating `transform(dir)` for each
/// directory.
///
/// Errors at the root are reported before the transform is called. Below the
/// root, a directory that cannot be listed for lack of permission is skipped;
/// any other failure, including one raised by the transform, aborts the scan.
pub fn scan<T>(tree: &T, root: &str, transform: &mut Transform<'_>) -> HostResult<String>
where
    T: DirectoryTree + ?Sized,
{
    if !tree.contains(root) {
        return Err(HostError::NotFound(root.to_string()));
    }
    if !tree.is_directory(root) {
        debug!("Scan root {} is not a directory", root);
        return Ok(String::new());
    }

    let entries = tree.list(root)?;
    let mut acc = transform(root)?;
    let mut visited = 1usize;

    walk_entries(tree, root, entries, transform, &mut acc, &mut visited)?;

    debug!("Scanned {} directories under {}", visited, root);
    Ok(acc)
}

fn walk_entries<T>(
    tree: &T,
    parent: &str,
    entries: Vec<String>,
    transform: &mut Transform<'_>,
    acc: &mut String,
    visited: &mut usize,
) -> HostResult<()>
where
    T: DirectoryTree + ?Sized,
{
    for name in entries {
        let path = paths::join(parent, &name);
        if !tree.is_directory(&path) {
            continue;
        }

        acc.push_str(&transform(&path)?);
        *visited += 1;

        match tree.list(&path) {
            Ok(children) => walk_entries(tree, &path, children, transform, acc, visited)?,
            Err(HostError::PermissionDenied(_)) => {
                warn!("Skipping unreadable directory {}", path);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};

    /// Tree described by a list of directories; anything else listed is a file.
    struct FakeTree {
        dirs: BTreeMap<&'static str, Vec<&'static str>>,
        denied: HashSet<&'static str>,
    }

    impl FakeTree {
        fn new(dirs: Vec<(&'static str, Vec<&'static str>)>) -> Self {
            Self {
                dirs: dirs.into_iter().collect(),
                denied: HashSet::new(),
            }
        }

        fn is_file(&self, path: &str) -> bool {
            self.dirs.iter().any(|(dir, entries)| {
                entries
                    .iter()
                    .any(|e| paths::join(dir, e) == path && !self.dirs.contains_key(path))
            })
        }
    }

    impl DirectoryTree for FakeTree {
        fn contains(&self, path: &str) -> bool {
            self.dirs.contains_key(path) || self.is_file(path)
        }

        fn is_directory(&self, path: &str) -> bool {
            self.dirs.contains_key(path)
        }

        fn list(&self, path: &str) -> HostResult<Vec<String>> {
            if self.denied.contains(path) {
                return Err(HostError::PermissionDenied(path.to_string()));
            }
            self.dirs
                .get(path)
                .map(|e| e.iter().map(|s| s.to_string()).collect())
                .ok_or_else(|| HostError::NotADirectory(path.to_string()))
        }
    }

    fn sample_tree() -> FakeTree {
        FakeTree::new(vec![
            ("root", vec!["a", "b", "file.txt"]),
            ("root/a", vec!["x", "y.txt"]),
            ("root/a/x", vec![]),
            ("root/b", vec![]),
        ])
    }

    #[test]
    fn test_pre_order() {
        let tree = sample_tree();
        let out = scan(&tree, "root", &mut |p: &str| Ok(format!("{p} "))).unwrap();
        assert_eq!(out, "root root/a root/a/x root/b ");
    }

    #[test]
    fn test_missing_root() {
        let tree = sample_tree();
        let mut called = false;
        let err = scan(&tree, "nope", &mut |_: &str| {
            called = true;
            Ok(String::new())
        })
        .unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
        assert!(!called);
    }

    #[test]
    fn test_file_root_yields_nothing() {
        let tree = sample_tree();
        let out = scan(&tree, "root/file.txt", &mut |p: &str| Ok(p.to_string())).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_transform_failure_aborts() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        let err = scan(&tree, "root", &mut |p: &str| {
            seen.push(p.to_string());
            if p == "root/a" {
                Err(HostError::Callback("boom".into()))
            } else {
                Ok(p.to_string())
            }
        })
        .unwrap_err();
        assert!(matches!(err, HostError::Callback(_)));
        assert_eq!(seen, vec!["root", "root/a"]);
    }

    #[test]
    fn test_denied_subtree_is_skipped() {
        let mut tree = sample_tree();
        tree.denied.insert("root/a");
        let out = scan(&tree, "root", &mut |p: &str| Ok(format!("{p} "))).unwrap();
        assert_eq!(out, "root root/a root/b ");
    }

    #[test]
    fn test_denied_root_fails_before_transform() {
        let mut tree = sample_tree();
        tree.denied.insert("root");
        let mut called = false;
        let err = scan(&tree, "root", &mut |_: &str| {
            called = true;
            Ok(String::new())
        })
        .unwrap_err();
        assert!(matches!(err, HostError::PermissionDenied(_)));
        assert!(!called);
    }
}
