use crate::msg::Msg;
use branchscope_core::services::GitRepository;
use std::collections::HashMap;
use std::sync::{Arc, mpsc};

use super::super::{RepoId, executor::TaskExecutor};

pub(in crate::store) type RepoMap = HashMap<RepoId, Arc<dyn GitRepository>>;

/// Runs `task` on the pool if the repository is still open; effects for a closed
/// repository are dropped.
pub(super) fn spawn_with_repo(
    executor: &TaskExecutor,
    repos: &RepoMap,
    repo_id: RepoId,
    msg_tx: mpsc::Sender<Msg>,
    task: impl FnOnce(Arc<dyn GitRepository>, mpsc::Sender<Msg>) + Send + 'static,
) {
    match repos.get(&repo_id).cloned() {
        Some(repo) => executor.spawn(move || task(repo, msg_tx)),
        None => log::debug!("dropping effect for closed repo {repo_id:?}"),
    }
}
