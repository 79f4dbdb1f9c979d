//! Lexical path utilities.
//!
//! These never touch the filesystem. They operate on strings using the host's
//! separator and follow the usual lexical rules: redundant separators collapse,
//! `.` elements vanish and `..` removes the preceding element where it can.

use std::path::{is_separator, MAIN_SEPARATOR};

/// Last element of `path`, ignoring trailing separators.
///
/// An empty path yields `"."` and a path made only of separators yields the
/// separator itself.
pub fn base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return MAIN_SEPARATOR.to_string();
    }
    match trimmed.rfind(is_separator) {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Extension of the last element of `path`, starting at its last dot.
pub fn ext(path: &str) -> String {
    for (idx, ch) in path.char_indices().rev() {
        if is_separator(ch) {
            break;
        }
        if ch == '.' {
            return path[idx..].to_string();
        }
    }
    String::new()
}

/// Join two paths and clean the result. Empty elements are ignored.
pub fn join(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => String::new(),
        (false, true) => clean(a),
        (true, false) => clean(b),
        (false, false) => clean(&format!("{a}{MAIN_SEPARATOR}{b}")),
    }
}

/// Shortest lexically equivalent form of `path`.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with(is_separator);
    let mut parts: Vec<&str> = Vec::new();

    for element in path.split(is_separator) {
        match element {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` at the root stays at the root
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join(&MAIN_SEPARATOR.to_string());
    if rooted {
        format!("{MAIN_SEPARATOR}{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_base() {
        assert_eq!(base("a/b/sample.txt"), "sample.txt");
        assert_eq!(base("a/b/"), "b");
        assert_eq!(base("sample.txt"), "sample.txt");
        assert_eq!(base(""), ".");
        assert_eq!(base("///"), "/");
    }

    #[test]
    fn test_ext() {
        assert_eq!(ext("a/b/sample.txt"), ".txt");
        assert_eq!(ext("archive.tar.gz"), ".gz");
        assert_eq!(ext("a.d/noext"), "");
        assert_eq!(ext(".bashrc"), ".bashrc");
        assert_eq!(ext(""), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("a", "b/c.txt"), "a/b/c.txt");
        assert_eq!(join("a/", "/b"), "a/b");
        assert_eq!(join("a/b", "../c"), "a/c");
        assert_eq!(join("", "b"), "b");
        assert_eq!(join("a", ""), "a");
        assert_eq!(join("", ""), "");
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("a//b/./c"), "a/b/c");
        assert_eq!(clean("/../a"), "/a");
        assert_eq!(clean("../../a"), "../../a");
        assert_eq!(clean("a/.."), ".");
        assert_eq!(clean("/"), "/");
    }
}
