use super::util::{
    RepoCtx, normalize_repo_path, push_error, record_error, refresh_effects, with_repo,
    worktree_refresh_effects,
};
use crate::model::{AppState, Loadable, RepoId, RepoState};
use crate::msg::{Effect, RepoExternalChange};
use branchscope_core::domain::{CommitId, RepoSpec};
use branchscope_core::error::{Error, ErrorKind};
use branchscope_core::services::GitRepository;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::super::effects::RepoMap;

pub(super) fn open_repo(id_alloc: &AtomicU64, state: &mut AppState, path: PathBuf) -> Vec<Effect> {
    let path = normalize_repo_path(path);
    if let Some(repo_id) = state
        .repos
        .iter()
        .find(|r| r.spec.workdir == path)
        .map(|r| r.id)
    {
        state.active_repo = Some(repo_id);
        return Vec::new();
    }

    let repo_id = RepoId(id_alloc.fetch_add(1, Ordering::Relaxed));
    log::info!("opening {} as {repo_id:?}", path.display());
    let spec = RepoSpec { workdir: path };
    state
        .repos
        .push(RepoState::new_opening(repo_id, spec.clone()));
    state.active_repo = Some(repo_id);
    vec![Effect::OpenRepo {
        repo_id,
        path: spec.workdir,
    }]
}

/// Drops the repository together with its comparison cache and any result still in
/// flight for it.
pub(super) fn close_repo(repos: &mut RepoMap, state: &mut AppState, repo_id: RepoId) -> Vec<Effect> {
    state.repos.retain(|r| r.id != repo_id);
    repos.remove(&repo_id);
    if state.active_repo == Some(repo_id) {
        state.active_repo = state.repos.first().map(|r| r.id);
    }
    log::info!("closed {repo_id:?}");
    Vec::new()
}

pub(super) fn set_active_repo(state: &mut AppState, repo_id: RepoId) -> Vec<Effect> {
    let Some(repo) = state.repo(repo_id) else {
        return Vec::new();
    };
    if state.active_repo == Some(repo_id) {
        return Vec::new();
    }
    let is_open = matches!(repo.open, Loadable::Ready(()));
    state.active_repo = Some(repo_id);
    if !is_open {
        return Vec::new();
    }
    with_repo(state, repo_id, refresh_effects)
}

pub(super) fn repo_opened_ok(
    repos: &mut RepoMap,
    state: &mut AppState,
    repo_id: RepoId,
    spec: RepoSpec,
    repo: Arc<dyn GitRepository>,
) -> Vec<Effect> {
    if state.repo(repo_id).is_none() {
        log::debug!("{repo_id:?} was closed before it finished opening");
        return Vec::new();
    }
    repos.insert(repo_id, repo);

    with_repo(state, repo_id, |ctx| {
        log::info!("{repo_id:?} opened at {}", spec.workdir.display());
        let repo = &mut *ctx.repo;
        repo.spec = spec;
        repo.open = Loadable::Ready(());
        repo.head = Loadable::Loading;
        repo.branches = Loadable::Loading;
        repo.recent_branches = Loadable::Loading;
        repo.default_branch = if ctx.settings.default_branch.is_some() {
            Loadable::NotLoaded
        } else {
            Loadable::Loading
        };
        repo.status = Loadable::Loading;
        repo.last_error = None;
        refresh_effects(ctx)
    })
}

pub(super) fn repo_opened_err(
    repos: &mut RepoMap,
    state: &mut AppState,
    repo_id: RepoId,
    spec: RepoSpec,
    error: Error,
) -> Vec<Effect> {
    if matches!(error.kind(), ErrorKind::NotARepository) {
        let message = format!("not a git repository: {}", spec.workdir.display());
        log::warn!("{message}");
        push_error(&mut state.errors, None, message);

        repos.remove(&repo_id);
        state.repos.retain(|r| r.id != repo_id);
        if state.active_repo == Some(repo_id) {
            state.active_repo = state.repos.last().map(|r| r.id);
        }
        return Vec::new();
    }

    with_repo(state, repo_id, |ctx| {
        ctx.repo.spec = spec;
        ctx.repo.open = Loadable::Error(error.to_string());
        record_error(ctx, format!("open repository: {error}"));
        Vec::new()
    })
}

pub(super) fn reload_repo(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    if !matches!(ctx.repo.open, Loadable::Ready(())) {
        return Vec::new();
    }
    refresh_effects(ctx)
}

pub(super) fn repo_externally_changed(
    ctx: &mut RepoCtx<'_>,
    change: RepoExternalChange,
) -> Vec<Effect> {
    if !matches!(ctx.repo.open, Loadable::Ready(())) {
        return Vec::new();
    }
    log::debug!("{:?} changed on disk: {change:?}", ctx.repo.id);
    match change {
        RepoExternalChange::Worktree => worktree_refresh_effects(ctx),
        RepoExternalChange::GitState | RepoExternalChange::Both => refresh_effects(ctx),
    }
}

pub(super) fn select_commit(ctx: &mut RepoCtx<'_>, commit_id: CommitId) -> Vec<Effect> {
    ctx.repo.selected_commit = Some(commit_id);
    Vec::new()
}

pub(super) fn clear_commit_selection(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    ctx.repo.selected_commit = None;
    Vec::new()
}
