//! I/O boundary traits for testability
//!
//! The process-information source is abstracted so the tree builder can be
//! exercised against fixture directories or in-memory mocks.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::{parse_child_pids, Pid};
use crate::infrastructure::error::{InfraError, InfraResult};

/// Longest lookup path accepted, in bytes.
pub const MAX_PATH_LENGTH: usize = 1024;

/// Default cap on captured command line bytes.
pub const DEFAULT_NAME_LIMIT: usize = 1024;

/// Keyed read-only lookups into a procfs-style source.
///
/// `Ok(None)` means the resource could not be opened. `Err(InfraError::Io)`
/// means it opened but the read failed.
pub trait ProcSource: Send + Sync {
    /// Whether `pid` names an executing process (its `exe` marker exists).
    fn is_process(&self, pid: Pid) -> InfraResult<bool>;

    /// Raw command line bytes, possibly empty.
    fn cmdline(&self, pid: Pid) -> InfraResult<Option<Vec<u8>>>;

    /// Child pids in source order.
    fn children(&self, pid: Pid) -> InfraResult<Option<Vec<Pid>>>;
}

/// Procfs implementation rooted at a configurable directory.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    name_limit: usize,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name_limit: DEFAULT_NAME_LIMIT,
        }
    }

    /// Cap the number of command line bytes captured per process.
    pub fn with_name_limit(mut self, limit: usize) -> Self {
        self.name_limit = limit;
        self
    }

    /// `<root>/<pid>/<parts..>`, rejected if longer than `MAX_PATH_LENGTH`.
    fn entry(&self, pid: Pid, parts: &[&str]) -> InfraResult<PathBuf> {
        let mut path = self.root.join(pid.to_string());
        for part in parts {
            path.push(part);
        }
        if path.as_os_str().len() > MAX_PATH_LENGTH {
            return Err(InfraError::PathTooLong {
                path,
                limit: MAX_PATH_LENGTH,
            });
        }
        Ok(path)
    }

    fn open(path: &Path) -> Option<File> {
        match File::open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                debug!("cannot open {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl ProcSource for ProcFs {
    fn is_process(&self, pid: Pid) -> InfraResult<bool> {
        let path = self.entry(pid, &["exe"])?;
        // Presence of the link is enough, its target is never resolved
        let exists = path.symlink_metadata().is_ok();
        trace!("{} exists: {}", path.display(), exists);
        Ok(exists)
    }

    fn cmdline(&self, pid: Pid) -> InfraResult<Option<Vec<u8>>> {
        let path = self.entry(pid, &["cmdline"])?;
        let Some(file) = Self::open(&path) else {
            return Ok(None);
        };
        let mut buf = Vec::new();
        file.take(self.name_limit as u64)
            .read_to_end(&mut buf)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        Ok(Some(buf))
    }

    fn children(&self, pid: Pid) -> InfraResult<Option<Vec<Pid>>> {
        let pid_str = pid.to_string();
        let path = self.entry(pid, &["task", &pid_str, "children"])?;
        let Some(mut file) = Self::open(&path) else {
            return Ok(None);
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        Ok(Some(parse_child_pids(&buf)))
    }
}
