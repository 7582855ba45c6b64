use crate::compare::{ComparisonKey, DivergenceRequestId, MergeGeneration};
use crate::model::{CommitListRequest, RepoId};
use branchscope_core::domain::CommitId;
use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    OpenRepo {
        repo_id: RepoId,
        path: PathBuf,
    },
    LoadHead {
        repo_id: RepoId,
    },
    LoadBranches {
        repo_id: RepoId,
    },
    LoadRecentBranches {
        repo_id: RepoId,
        limit: usize,
    },
    LoadDefaultBranch {
        repo_id: RepoId,
    },
    LoadStatus {
        repo_id: RepoId,
    },
    LoadConflictState {
        repo_id: RepoId,
    },
    ComputeDivergence {
        repo_id: RepoId,
        key: ComparisonKey,
        request: DivergenceRequestId,
    },
    ComputeMergeStatus {
        repo_id: RepoId,
        generation: MergeGeneration,
        base: CommitId,
        target: CommitId,
    },
    LoadCommits {
        repo_id: RepoId,
        request: CommitListRequest,
    },
}
