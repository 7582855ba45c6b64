use branchscope_core::domain::{
    Branch, CommitId, ConflictState, Divergence, HeadRef, MergeAnalysis, RangeSpec, RepoSpec,
    RepoStatus,
};
use branchscope_core::services::{GitRepository, Result};
use std::path::PathBuf;

mod compare;
mod refs;
mod status;

pub(crate) struct GitCliRepo {
    spec: RepoSpec,
    repo: gix::ThreadSafeRepository,
}

impl GitCliRepo {
    pub(crate) fn new(workdir: PathBuf, repo: gix::ThreadSafeRepository) -> Self {
        Self {
            spec: RepoSpec { workdir },
            repo,
        }
    }
}

impl GitRepository for GitCliRepo {
    fn spec(&self) -> &RepoSpec {
        &self.spec
    }

    fn head(&self) -> Result<HeadRef> {
        self.head_impl()
    }

    fn list_branches(&self) -> Result<Vec<Branch>> {
        self.list_branches_impl()
    }

    fn list_recent_branches(&self, limit: usize) -> Result<Vec<Branch>> {
        self.list_recent_branches_impl(limit)
    }

    fn default_branch(&self) -> Result<Option<String>> {
        self.default_branch_impl()
    }

    fn ahead_behind(&self, base: &CommitId, target: &CommitId) -> Result<Divergence> {
        self.ahead_behind_impl(base, target)
    }

    fn merge_analysis(&self, base: &CommitId, target: &CommitId) -> Result<MergeAnalysis> {
        self.merge_analysis_impl(base, target)
    }

    fn list_commits(
        &self,
        tip: &CommitId,
        range: &RangeSpec,
        limit: usize,
    ) -> Result<Vec<CommitId>> {
        self.list_commits_impl(tip, range, limit)
    }

    fn status(&self) -> Result<RepoStatus> {
        self.status_impl()
    }

    fn conflict_state(&self) -> Result<Option<ConflictState>> {
        self.conflict_state_impl()
    }
}
