use crate::model::{
    AppState, DiagnosticEntry, DiagnosticKind, ErrorEntry, RepoId, RepoLoadsInFlight, RepoState,
};
use crate::msg::Effect;
use crate::settings::Settings;
use std::path::PathBuf;
use std::time::SystemTime;

const MAX_DIAGNOSTICS: usize = 200;
const MAX_ERRORS: usize = 200;

/// One repository plus the app-wide pieces its reducers may touch.
pub(super) struct RepoCtx<'a> {
    pub(super) repo: &'a mut RepoState,
    pub(super) errors: &'a mut Vec<ErrorEntry>,
    pub(super) settings: &'a Settings,
}

pub(super) fn with_repo(
    state: &mut AppState,
    repo_id: RepoId,
    f: impl FnOnce(&mut RepoCtx<'_>) -> Vec<Effect>,
) -> Vec<Effect> {
    let AppState {
        repos,
        errors,
        settings,
        ..
    } = state;
    let Some(repo) = repos.iter_mut().find(|r| r.id == repo_id) else {
        log::debug!("dropping message for unknown repo {repo_id:?}");
        return Vec::new();
    };
    f(&mut RepoCtx {
        repo,
        errors,
        settings,
    })
}

pub(super) fn refresh_effects(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let loads = &mut ctx.repo.loads_in_flight;
    let mut effects = Vec::new();

    if loads.request(RepoLoadsInFlight::HEAD) {
        effects.push(Effect::LoadHead { repo_id });
    }
    if loads.request(RepoLoadsInFlight::BRANCHES) {
        effects.push(Effect::LoadBranches { repo_id });
    }
    if loads.request(RepoLoadsInFlight::RECENT_BRANCHES) {
        effects.push(Effect::LoadRecentBranches {
            repo_id,
            limit: ctx.settings.recent_branches_limit,
        });
    }
    // A configured default branch replaces detection altogether.
    if ctx.settings.default_branch.is_none() && loads.request(RepoLoadsInFlight::DEFAULT_BRANCH) {
        effects.push(Effect::LoadDefaultBranch { repo_id });
    }
    effects.extend(worktree_refresh_effects(ctx));
    effects
}

pub(super) fn worktree_refresh_effects(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let loads = &mut ctx.repo.loads_in_flight;
    let mut effects = Vec::new();

    if loads.request(RepoLoadsInFlight::STATUS) {
        effects.push(Effect::LoadStatus { repo_id });
    }
    if loads.request(RepoLoadsInFlight::CONFLICT_STATE) {
        effects.push(Effect::LoadConflictState { repo_id });
    }
    effects
}

pub(super) fn normalize_repo_path(path: PathBuf) -> PathBuf {
    let path = if path.is_relative() {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    } else {
        path
    };

    std::fs::canonicalize(&path).unwrap_or(path)
}

/// Records a collaborator failure on the repository and in the app-wide error list.
pub(super) fn record_error(ctx: &mut RepoCtx<'_>, message: String) {
    log::warn!("repo {:?}: {message}", ctx.repo.id);
    ctx.repo.last_error = Some(message.clone());
    push_diagnostic(ctx.repo, DiagnosticKind::Error, message.clone());
    push_error(ctx.errors, Some(ctx.repo.id), message);
}

pub(super) fn push_error(errors: &mut Vec<ErrorEntry>, repo_id: Option<RepoId>, message: String) {
    errors.push(ErrorEntry {
        time: SystemTime::now(),
        repo_id,
        message,
    });
    if errors.len() > MAX_ERRORS {
        let extra = errors.len() - MAX_ERRORS;
        errors.drain(0..extra);
    }
}

pub(super) fn push_diagnostic(repo_state: &mut RepoState, kind: DiagnosticKind, message: String) {
    repo_state.diagnostics.push(DiagnosticEntry {
        time: SystemTime::now(),
        kind,
        message,
    });
    if repo_state.diagnostics.len() > MAX_DIAGNOSTICS {
        let extra = repo_state.diagnostics.len() - MAX_DIAGNOSTICS;
        repo_state.diagnostics.drain(0..extra);
    }
}
