use crate::msg::Msg;
use std::sync::mpsc;

use super::super::{RepoId, executor::TaskExecutor};
use super::util::{RepoMap, spawn_with_repo};

pub(super) fn schedule_load_head(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::HeadLoaded {
            repo_id,
            result: repo.head(),
        });
    });
}

pub(super) fn schedule_load_branches(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::BranchesLoaded {
            repo_id,
            result: repo.list_branches(),
        });
    });
}

pub(super) fn schedule_load_recent_branches(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
    limit: usize,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::RecentBranchesLoaded {
            repo_id,
            result: repo.list_recent_branches(limit),
        });
    });
}

pub(super) fn schedule_load_default_branch(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::DefaultBranchLoaded {
            repo_id,
            result: repo.default_branch(),
        });
    });
}

pub(super) fn schedule_load_status(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::StatusLoaded {
            repo_id,
            result: repo.status(),
        });
    });
}

pub(super) fn schedule_load_conflict_state(
    executor: &TaskExecutor,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    repo_id: RepoId,
) {
    spawn_with_repo(executor, repos, repo_id, msg_tx, move |repo, msg_tx| {
        let _ = msg_tx.send(Msg::ConflictStateLoaded {
            repo_id,
            result: repo.conflict_state(),
        });
    });
}
