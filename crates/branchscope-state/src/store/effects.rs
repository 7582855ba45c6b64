use crate::msg::{Effect, Msg};
use branchscope_core::services::GitBackend;
use std::sync::{Arc, mpsc};

use super::executor::TaskExecutor;

mod compare;
mod open_repo;
mod repo_load;
mod util;

pub(super) use util::RepoMap;

pub(super) fn schedule_effect(
    executor: &TaskExecutor,
    backend: &Arc<dyn GitBackend>,
    repos: &RepoMap,
    msg_tx: mpsc::Sender<Msg>,
    effect: Effect,
) {
    match effect {
        Effect::OpenRepo { repo_id, path } => {
            open_repo::schedule_open_repo(executor, Arc::clone(backend), msg_tx, repo_id, path)
        }
        Effect::LoadHead { repo_id } => {
            repo_load::schedule_load_head(executor, repos, msg_tx, repo_id)
        }
        Effect::LoadBranches { repo_id } => {
            repo_load::schedule_load_branches(executor, repos, msg_tx, repo_id)
        }
        Effect::LoadRecentBranches { repo_id, limit } => {
            repo_load::schedule_load_recent_branches(executor, repos, msg_tx, repo_id, limit)
        }
        Effect::LoadDefaultBranch { repo_id } => {
            repo_load::schedule_load_default_branch(executor, repos, msg_tx, repo_id)
        }
        Effect::LoadStatus { repo_id } => {
            repo_load::schedule_load_status(executor, repos, msg_tx, repo_id)
        }
        Effect::LoadConflictState { repo_id } => {
            repo_load::schedule_load_conflict_state(executor, repos, msg_tx, repo_id)
        }
        Effect::ComputeDivergence {
            repo_id,
            key,
            request,
        } => compare::schedule_compute_divergence(executor, repos, msg_tx, repo_id, key, request),
        Effect::ComputeMergeStatus {
            repo_id,
            generation,
            base,
            target,
        } => compare::schedule_compute_merge_status(
            executor, repos, msg_tx, repo_id, generation, base, target,
        ),
        Effect::LoadCommits { repo_id, request } => {
            compare::schedule_load_commits(executor, repos, msg_tx, repo_id, request)
        }
    }
}
