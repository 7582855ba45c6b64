use crate::domain::*;
use crate::error::{Error, ErrorKind};
use std::path::Path;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, Error>;

/// Version-control collaborator for one open repository.
///
/// Every call may block on a subprocess; callers run them off the state owner
/// thread.
pub trait GitRepository: Send + Sync {
    fn spec(&self) -> &RepoSpec;

    fn head(&self) -> Result<HeadRef>;
    /// Local and remote-tracking branches; replaces any prior list wholesale.
    fn list_branches(&self) -> Result<Vec<Branch>>;
    /// Recently checked-out branches, most recent first, derived from the reflog.
    fn list_recent_branches(&self, limit: usize) -> Result<Vec<Branch>>;
    fn default_branch(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Divergence of `base` relative to `target`: `ahead` counts commits only
    /// reachable from `base`.
    fn ahead_behind(&self, base: &CommitId, target: &CommitId) -> Result<Divergence>;
    /// Dry-run merge of `target` into `base` without touching the working tree.
    fn merge_analysis(&self, base: &CommitId, target: &CommitId) -> Result<MergeAnalysis>;
    fn list_commits(&self, tip: &CommitId, range: &RangeSpec, limit: usize)
    -> Result<Vec<CommitId>>;

    fn status(&self) -> Result<RepoStatus> {
        Err(Error::new(ErrorKind::Unsupported(
            "working tree status is not implemented for this backend",
        )))
    }
    fn conflict_state(&self) -> Result<Option<ConflictState>> {
        Ok(None)
    }
}

pub trait GitBackend: Send + Sync {
    fn open(&self, workdir: &Path) -> Result<Arc<dyn GitRepository>>;
}
