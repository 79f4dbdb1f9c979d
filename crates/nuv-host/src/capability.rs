//! Capability catalogue for the nuv module.
//!
//! Each script-visible entry of the `nuv` module corresponds to exactly one
//! capability. Hosts can restrict what a script may do by granting only a
//! subset of capabilities (see [`crate::RestrictedHost`]).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An operation that a script can invoke on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Check whether a path exists.
    Exists,

    /// Read a whole file.
    ReadFile,

    /// Write a whole file.
    WriteFile,

    /// List the entries of a directory.
    ReadDir,

    /// Encode a document as YAML.
    ToYaml,

    /// Decode YAML text into a document.
    FromYaml,

    /// Walk a directory tree calling back into the script.
    Scan,

    /// Last component of a path.
    BasePath,

    /// Extension of a path.
    FileExt,

    /// Check whether a path is a directory.
    IsDir,

    /// Join two paths.
    JoinPath,

    /// Run an external command.
    Exec,
}

impl Capability {
    /// All capabilities, in module registration order.
    pub const ALL: [Capability; 12] = [
        Capability::ReadFile,
        Capability::WriteFile,
        Capability::ReadDir,
        Capability::Scan,
        Capability::ToYaml,
        Capability::FromYaml,
        Capability::BasePath,
        Capability::FileExt,
        Capability::IsDir,
        Capability::JoinPath,
        Capability::Exists,
        Capability::Exec,
    ];

    /// Parse a capability from its configuration name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == s)
    }

    /// Configuration name of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Exists => "exists",
            Capability::ReadFile => "read_file",
            Capability::WriteFile => "write_file",
            Capability::ReadDir => "read_dir",
            Capability::ToYaml => "to_yaml",
            Capability::FromYaml => "from_yaml",
            Capability::Scan => "scan",
            Capability::BasePath => "base_path",
            Capability::FileExt => "file_ext",
            Capability::IsDir => "is_dir",
            Capability::JoinPath => "join_path",
            Capability::Exec => "exec",
        }
    }

    /// Name of the entry bound on the script module.
    pub fn entry_name(&self) -> &'static str {
        match self {
            Capability::Exists => "exists",
            Capability::ReadFile => "readFile",
            Capability::WriteFile => "writeFile",
            Capability::ReadDir => "readDir",
            Capability::ToYaml => "toYaml",
            Capability::FromYaml => "fromYaml",
            Capability::Scan => "scan",
            Capability::BasePath => "basePath",
            Capability::FileExt => "fileExt",
            Capability::IsDir => "isDir",
            Capability::JoinPath => "joinPath",
            Capability::Exec => "exec",
        }
    }
}

/// A set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: HashSet<Capability>,
}

impl CapabilitySet {
    /// Create a capability set from a list of capability names.
    ///
    /// Unknown names are returned as the error.
    pub fn from_strings<I, S>(strings: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        strings
            .into_iter()
            .map(|s| Capability::parse(s.as_ref()).ok_or_else(|| s.as_ref().to_string()))
            .collect()
    }

    /// Check if the set contains a capability.
    pub fn has(&self, cap: Capability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// Get the number of capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for cap in Capability::ALL {
            assert_eq!(Capability::parse(cap.as_str()), Some(cap));
        }
        assert_eq!(Capability::parse("network"), None);
    }

    #[test]
    fn test_entry_names_are_unique() {
        let names: HashSet<_> = Capability::ALL.iter().map(|c| c.entry_name()).collect();
        assert_eq!(names.len(), Capability::ALL.len());
    }

    #[test]
    fn test_from_strings() {
        let set = CapabilitySet::from_strings(["read_file", "scan"]).unwrap();
        assert!(set.has(Capability::ReadFile));
        assert!(set.has(Capability::Scan));
        assert!(!set.has(Capability::Exec));
        assert_eq!(set.len(), 2);
        assert!(CapabilitySet::default().is_empty());

        let err = CapabilitySet::from_strings(["read_file", "teleport"]).unwrap_err();
        assert_eq!(err, "teleport");
    }
}
