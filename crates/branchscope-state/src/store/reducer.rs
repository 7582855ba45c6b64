use crate::model::AppState;
use crate::msg::{Effect, Msg};
use std::sync::atomic::AtomicU64;

use super::effects::RepoMap;

mod compare;
mod repo_load;
mod repo_management;
mod util;

use util::with_repo;

pub(super) fn reduce(
    repos: &mut RepoMap,
    id_alloc: &AtomicU64,
    state: &mut AppState,
    msg: Msg,
) -> Vec<Effect> {
    match msg {
        Msg::OpenRepo(path) => repo_management::open_repo(id_alloc, state, path),
        Msg::CloseRepo { repo_id } => repo_management::close_repo(repos, state, repo_id),
        Msg::SetActiveRepo { repo_id } => repo_management::set_active_repo(state, repo_id),
        Msg::ReloadRepo { repo_id } => with_repo(state, repo_id, repo_management::reload_repo),
        Msg::RepoExternallyChanged { repo_id, change } => with_repo(state, repo_id, |ctx| {
            repo_management::repo_externally_changed(ctx, change)
        }),
        Msg::SelectCommit { repo_id, commit_id } => with_repo(state, repo_id, |ctx| {
            repo_management::select_commit(ctx, commit_id)
        }),
        Msg::ClearCommitSelection { repo_id } => {
            with_repo(state, repo_id, repo_management::clear_commit_selection)
        }

        Msg::ViewHistory { repo_id } => with_repo(state, repo_id, compare::view_history),
        Msg::CompareToBranch { repo_id, branch } => {
            with_repo(state, repo_id, |ctx| compare::compare_to_branch(ctx, branch))
        }
        Msg::SwitchCompareMode { repo_id, mode } => {
            with_repo(state, repo_id, |ctx| compare::switch_compare_mode(ctx, mode))
        }
        Msg::SetFilterText { repo_id, text } => {
            with_repo(state, repo_id, |ctx| compare::set_filter_text(ctx, text))
        }
        Msg::SetBranchListVisibility { repo_id, visible } => with_repo(state, repo_id, |ctx| {
            compare::set_branch_list_visibility(ctx, visible)
        }),

        Msg::RepoOpenedOk {
            repo_id,
            spec,
            repo,
        } => repo_management::repo_opened_ok(repos, state, repo_id, spec, repo),
        Msg::RepoOpenedErr {
            repo_id,
            spec,
            error,
        } => repo_management::repo_opened_err(repos, state, repo_id, spec, error),
        Msg::HeadLoaded { repo_id, result } => {
            with_repo(state, repo_id, |ctx| repo_load::head_loaded(ctx, result))
        }
        Msg::BranchesLoaded { repo_id, result } => {
            with_repo(state, repo_id, |ctx| repo_load::branches_loaded(ctx, result))
        }
        Msg::RecentBranchesLoaded { repo_id, result } => with_repo(state, repo_id, |ctx| {
            repo_load::recent_branches_loaded(ctx, result)
        }),
        Msg::DefaultBranchLoaded { repo_id, result } => with_repo(state, repo_id, |ctx| {
            repo_load::default_branch_loaded(ctx, result)
        }),
        Msg::StatusLoaded { repo_id, result } => {
            with_repo(state, repo_id, |ctx| repo_load::status_loaded(ctx, result))
        }
        Msg::ConflictStateLoaded { repo_id, result } => with_repo(state, repo_id, |ctx| {
            repo_load::conflict_state_loaded(ctx, result)
        }),
        Msg::DivergenceComputed {
            repo_id,
            key,
            request,
            result,
        } => with_repo(state, repo_id, |ctx| {
            compare::divergence_computed(ctx, key, request, result)
        }),
        Msg::MergeStatusComputed {
            repo_id,
            generation,
            result,
        } => with_repo(state, repo_id, |ctx| {
            compare::merge_status_computed(ctx, generation, result)
        }),
        Msg::CommitsLoaded {
            repo_id,
            request,
            result,
        } => with_repo(state, repo_id, |ctx| {
            compare::commits_loaded(ctx, request, result)
        }),
    }
}
