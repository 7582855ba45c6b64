use crate::compare::{ComparisonKey, DivergenceRequestId, MergeGeneration, compute_merge_status};
use crate::model::CommitListRequest;
use crate::msg::Msg;
use branchscope_core::domain::CommitId;
use std::sync::mpsc;

use super::super::{RepoId, executor::TaskExecutor};
use super::util::{RepoMap, spawn_with_repo};

pub(super) fn schedule_compute_divergence(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
    key: ComparisonKey,
    request: DivergenceRequestId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let result = repo.ahead_behind(&key.from, &key.to);
        let _ = msg_tx.send(Msg::DivergenceComputed {
            repo_id,
            key,
            request,
            result,
        });
    });
}

pub(super) fn schedule_compute_merge_status(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
    generation: MergeGeneration,
    base: CommitId,
    target: CommitId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let result = compute_merge_status(repo.as_ref(), &base, &target);
        let _ = msg_tx.send(Msg::MergeStatusComputed {
            repo_id,
            generation,
            result,
        });
    });
}

pub(super) fn schedule_load_commits(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
    request: CommitListRequest,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let result = repo.list_commits(&request.tip, &request.range, request.limit);
        let _ = msg_tx.send(Msg::CommitsLoaded {
            repo_id,
            request,
            result,
        });
    });
}
