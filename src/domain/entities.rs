//! Domain entities: core data structures

use std::borrow::Cow;
use std::fmt;

use tracing::warn;

/// Process identifier as exposed by procfs.
pub type Pid = u32;

/// One process in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub pid: Pid,
    /// Raw command line bytes. `None` means the cmdline could not be read
    /// or was empty, which is not the same as a name made of empty args.
    pub name: Option<Vec<u8>>,
    pub status: NodeStatus,
}

impl ProcessNode {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            name: None,
            status: NodeStatus::Complete,
        }
    }

    pub fn with_name(pid: Pid, name: impl Into<Vec<u8>>) -> Self {
        Self {
            pid,
            name: Some(name.into()),
            status: NodeStatus::Complete,
        }
    }

    /// Render the name for output.
    ///
    /// The absent state renders as an empty byte string.
    pub fn name_bytes(&self, style: NameStyle) -> Cow<'_, [u8]> {
        let Some(name) = self.name.as_deref() else {
            return Cow::Borrowed(&[]);
        };
        match style {
            NameStyle::Command => {
                let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
                Cow::Borrowed(&name[..end])
            }
            NameStyle::Full => {
                let trimmed = match name.iter().rposition(|&b| b != 0) {
                    Some(last) => &name[..=last],
                    None => &[],
                };
                if trimmed.contains(&0) {
                    Cow::Owned(
                        trimmed
                            .iter()
                            .map(|&b| if b == 0 { b' ' } else { b })
                            .collect(),
                    )
                } else {
                    Cow::Borrowed(trimmed)
                }
            }
        }
    }

    /// `pid: name` label, lossy UTF-8.
    pub fn label(&self, style: NameStyle) -> String {
        format!(
            "{}: {}",
            self.pid,
            String::from_utf8_lossy(&self.name_bytes(style))
        )
    }
}

/// Outcome of building a single node, counting only its own checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStatus {
    #[default]
    Complete,
    Degraded,
}

/// How the command line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// Up to the first NUL: the executable as invoked.
    #[default]
    Command,
    /// All arguments, NUL separators shown as spaces.
    Full,
}

/// A non-fatal lookup failure recorded while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degradation {
    pub pid: Pid,
    pub kind: DegradationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationKind {
    MissingCmdline,
    UnreadableCmdline,
    EmptyCmdline,
    MissingChildren,
    UnreadableChildren,
    ChildNotAProcess(Pid),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DegradationKind::MissingCmdline => {
                write!(f, "pid {}: cmdline could not be opened", self.pid)
            }
            DegradationKind::UnreadableCmdline => {
                write!(f, "pid {}: cmdline could not be read", self.pid)
            }
            DegradationKind::EmptyCmdline => write!(f, "pid {}: cmdline is empty", self.pid),
            DegradationKind::MissingChildren => {
                write!(f, "pid {}: children list could not be opened", self.pid)
            }
            DegradationKind::UnreadableChildren => {
                write!(f, "pid {}: children list could not be read", self.pid)
            }
            DegradationKind::ChildNotAProcess(child) => write!(
                f,
                "pid {}: child {} is not an executing process",
                self.pid, child
            ),
        }
    }
}

/// Every degradation recorded during one build, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub degradations: Vec<Degradation>,
}

impl BuildReport {
    pub fn record(&mut self, pid: Pid, kind: DegradationKind) {
        self.degradations.push(Degradation { pid, kind });
    }

    /// Aggregate flag: true if anything anywhere in the tree was lost.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Parse a procfs `children` list.
///
/// Pids are separated by any ASCII whitespace. Reading stops at the first
/// token that is not a pid; everything before it is kept, duplicates included.
pub fn parse_child_pids(content: &[u8]) -> Vec<Pid> {
    let mut pids: Vec<Pid> = Vec::new();
    for token in content
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
    {
        match std::str::from_utf8(token).ok().and_then(|s| s.parse::<Pid>().ok()) {
            Some(pid) => pids.push(pid),
            None => {
                warn!(
                    "children list: stopping at malformed token {:?}",
                    String::from_utf8_lossy(token)
                );
                break;
            }
        }
    }
    pids
}
