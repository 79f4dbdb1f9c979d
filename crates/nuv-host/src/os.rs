//! Host functions backed by the real operating system.

use crate::error::{HostError, HostResult};
use crate::host::{HostFunctions, Transform};
use crate::scanner::{self, DirectoryTree};
use std::fs;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// Default, stateless host. Safe to share between engines on different threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsHost;

impl OsHost {
    /// Create a new OS-backed host.
    pub fn new() -> Self {
        Self
    }
}

impl HostFunctions for OsHost {
    fn exists(&self, path: &str) -> bool {
        match fs::metadata(path) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }

    fn read_file(&self, path: &str) -> HostResult<String> {
        let bytes = fs::read(path).map_err(|e| HostError::from_io(e, path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_file(&self, path: &str, content: &str) -> HostResult<()> {
        fs::write(path, content).map_err(|e| HostError::from_io(e, path))
    }

    fn read_dir(&self, path: &str) -> HostResult<Vec<String>> {
        let meta = fs::metadata(path).map_err(|e| HostError::from_io(e, path))?;
        if !meta.is_dir() {
            return Err(HostError::NotADirectory(path.to_string()));
        }
        self.list(path)
    }

    fn scan(&self, root: &str, transform: &mut Transform<'_>) -> HostResult<String> {
        scanner::scan(self, root, transform)
    }

    fn is_dir(&self, path: &str) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn exec(&self, command: &str, args: &[String]) -> String {
        debug!("Executing {} {:?}", command, args);
        match combined_output(command, args) {
            Ok((status, output)) => {
                if !status.success() {
                    warn!("Command {} exited with {}", command, status);
                }
                String::from_utf8_lossy(&output).into_owned()
            }
            Err(e) => {
                warn!("Failed to launch {}: {}", command, e);
                String::new()
            }
        }
    }
}

/// Run `command` with stdout and stderr sharing one pipe, so the output keeps
/// the order in which the two streams were written.
fn combined_output(command: &str, args: &[String]) -> io::Result<(ExitStatus, Vec<u8>)> {
    let (mut reader, writer) = io::pipe()?;
    let mut child = {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        cmd.spawn()?
    };

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait()?;
    read?;
    Ok((status, output))
}

impl DirectoryTree for OsHost {
    fn contains(&self, path: &str) -> bool {
        HostFunctions::exists(self, path)
    }

    fn is_directory(&self, path: &str) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn list(&self, path: &str) -> HostResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| HostError::from_io(e, path))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HostError::from_io(e, path))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
