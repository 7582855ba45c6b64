use crate::compare::{ComparisonKey, DivergenceRequestId, MergeGeneration};
use crate::model::{CommitListRequest, RepoId};
use branchscope_core::domain::*;
use branchscope_core::error::Error;
use branchscope_core::services::GitRepository;
use std::path::PathBuf;
use std::sync::Arc;

use super::RepoExternalChange;

pub enum Msg {
    OpenRepo(PathBuf),
    CloseRepo {
        repo_id: RepoId,
    },
    SetActiveRepo {
        repo_id: RepoId,
    },
    ReloadRepo {
        repo_id: RepoId,
    },
    RepoExternallyChanged {
        repo_id: RepoId,
        change: RepoExternalChange,
    },
    SelectCommit {
        repo_id: RepoId,
        commit_id: CommitId,
    },
    ClearCommitSelection {
        repo_id: RepoId,
    },

    ViewHistory {
        repo_id: RepoId,
    },
    CompareToBranch {
        repo_id: RepoId,
        branch: String,
    },
    SwitchCompareMode {
        repo_id: RepoId,
        mode: CompareMode,
    },
    SetFilterText {
        repo_id: RepoId,
        text: String,
    },
    SetBranchListVisibility {
        repo_id: RepoId,
        visible: bool,
    },

    RepoOpenedOk {
        repo_id: RepoId,
        spec: RepoSpec,
        repo: Arc<dyn GitRepository>,
    },
    RepoOpenedErr {
        repo_id: RepoId,
        spec: RepoSpec,
        error: Error,
    },
    HeadLoaded {
        repo_id: RepoId,
        result: Result<HeadRef, Error>,
    },
    BranchesLoaded {
        repo_id: RepoId,
        result: Result<Vec<Branch>, Error>,
    },
    RecentBranchesLoaded {
        repo_id: RepoId,
        result: Result<Vec<Branch>, Error>,
    },
    DefaultBranchLoaded {
        repo_id: RepoId,
        result: Result<Option<String>, Error>,
    },
    StatusLoaded {
        repo_id: RepoId,
        result: Result<RepoStatus, Error>,
    },
    ConflictStateLoaded {
        repo_id: RepoId,
        result: Result<Option<ConflictState>, Error>,
    },
    DivergenceComputed {
        repo_id: RepoId,
        key: ComparisonKey,
        request: DivergenceRequestId,
        result: Result<Divergence, Error>,
    },
    MergeStatusComputed {
        repo_id: RepoId,
        generation: MergeGeneration,
        result: Result<MergeResultStatus, Error>,
    },
    CommitsLoaded {
        repo_id: RepoId,
        request: CommitListRequest,
        result: Result<Vec<CommitId>, Error>,
    },
}
