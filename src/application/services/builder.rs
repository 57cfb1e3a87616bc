//! Process tree builder
//!
//! Walks the process-information source depth first from a seed pid.
//! Lookups that fail for a node that does exist are recorded and the node is
//! kept with degraded fields. This includes a resource that opens but cannot
//! be read, e.g. a process that exits mid-walk. Only the seed failing its
//! existence check, or a lookup path that cannot be formed, leaves the caller
//! without a tree.

use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    BuildReport, DegradationKind, DomainError, NodeStatus, Pid, ProcessNode, ProcessTree,
};
use crate::infrastructure::traits::ProcSource;
use crate::infrastructure::InfraError;

/// A successfully built tree and everything that was lost along the way.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: ProcessTree,
    pub report: BuildReport,
}

impl BuiltTree {
    pub fn is_degraded(&self) -> bool {
        self.report.is_degraded()
    }
}

/// Builds process trees from a `ProcSource`.
pub struct TreeBuilder {
    source: Arc<dyn ProcSource>,
}

impl TreeBuilder {
    pub fn new(source: Arc<dyn ProcSource>) -> Self {
        Self { source }
    }

    /// Build the tree rooted at `pid`.
    ///
    /// # Errors
    /// * `DomainError::NotAProcess` if `pid` has no `exe` marker
    /// * `InfraError::PathTooLong` if a lookup path cannot be formed; no
    ///   partial tree is returned
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, pid: Pid) -> ApplicationResult<BuiltTree> {
        let mut tree = ProcessTree::new();
        let mut report = BuildReport::default();

        if self.build_node(pid, None, &mut tree, &mut report)?.is_none() {
            return Err(DomainError::NotAProcess(pid).into());
        }

        debug!(
            "build: {} nodes, {} degradations",
            tree.len(),
            report.degradations.len()
        );
        Ok(BuiltTree { tree, report })
    }

    /// Build one node and its subtree, linking it under `parent`.
    ///
    /// Returns `None` if `pid` is not an executing process; nothing is
    /// inserted in that case.
    fn build_node(
        &self,
        pid: Pid,
        parent: Option<Index>,
        tree: &mut ProcessTree,
        report: &mut BuildReport,
    ) -> ApplicationResult<Option<Index>> {
        if !self.source.is_process(pid)? {
            info!("pid {}: not an executing process", pid);
            return Ok(None);
        }

        let mut node = ProcessNode::new(pid);
        let mut degraded = 0usize;

        match Self::readable(self.source.cmdline(pid))? {
            Ok(Some(bytes)) if !bytes.is_empty() => node.name = Some(bytes),
            Ok(Some(_)) => {
                degraded += 1;
                self.degrade(report, pid, DegradationKind::EmptyCmdline);
            }
            Ok(None) => {
                degraded += 1;
                self.degrade(report, pid, DegradationKind::MissingCmdline);
            }
            Err(e) => {
                debug!("pid {}: {}", pid, e);
                degraded += 1;
                self.degrade(report, pid, DegradationKind::UnreadableCmdline);
            }
        }

        let idx = tree.insert_node(node, parent);

        match Self::readable(self.source.children(pid))? {
            Ok(Some(children)) => {
                for child in children {
                    if self.build_node(child, Some(idx), tree, report)?.is_none() {
                        degraded += 1;
                        self.degrade(report, pid, DegradationKind::ChildNotAProcess(child));
                    }
                }
            }
            Ok(None) => {
                degraded += 1;
                self.degrade(report, pid, DegradationKind::MissingChildren);
            }
            Err(e) => {
                debug!("pid {}: {}", pid, e);
                degraded += 1;
                self.degrade(report, pid, DegradationKind::UnreadableChildren);
            }
        }

        if degraded > 0 {
            if let Some(entry) = tree.get_node_mut(idx) {
                entry.data.status = NodeStatus::Degraded;
            }
        }
        debug!("pid {}: built with {} degradations", pid, degraded);
        Ok(Some(idx))
    }

    /// Split a lookup result into fatal and recoverable failures.
    ///
    /// A read error after a successful open only degrades the node; anything
    /// else stays fatal.
    fn readable<T>(lookup: Result<T, InfraError>) -> ApplicationResult<Result<T, InfraError>> {
        match lookup {
            Ok(value) => Ok(Ok(value)),
            Err(e @ InfraError::Io { .. }) => Ok(Err(e)),
            Err(e) => Err(e.into()),
        }
    }

    fn degrade(&self, report: &mut BuildReport, pid: Pid, kind: DegradationKind) {
        report.record(pid, kind);
        if let Some(d) = report.degradations.last() {
            info!("{}", d);
        }
    }
}
