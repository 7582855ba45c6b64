use super::compare::{recompute_inference, settle};
use super::util::{RepoCtx, record_error};
use crate::model::{Loadable, RepoLoadsInFlight};
use crate::msg::Effect;
use branchscope_core::domain::{Branch, CommitId, ConflictState, HeadRef, RepoStatus};
use branchscope_core::error::Error;
use rustc_hash::FxHashSet;

/// Marks `load` finished, returning the follow-up effect if another refresh asked
/// for it meanwhile.
fn finish_load(ctx: &mut RepoCtx<'_>, load: u32, effect: impl FnOnce() -> Effect) -> Vec<Effect> {
    if ctx.repo.loads_in_flight.finish(load) {
        vec![effect()]
    } else {
        Vec::new()
    }
}

pub(super) fn head_loaded(ctx: &mut RepoCtx<'_>, result: Result<HeadRef, Error>) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let mut effects = finish_load(ctx, RepoLoadsInFlight::HEAD, || Effect::LoadHead {
        repo_id,
    });

    let next = match result {
        Ok(head) => Loadable::Ready(head),
        Err(e) => {
            record_error(ctx, format!("load HEAD: {e}"));
            Loadable::Error(e.to_string())
        }
    };
    if ctx.repo.head != next {
        ctx.repo.head = next;
        effects.extend(settle(ctx));
    }
    effects
}

pub(super) fn branches_loaded(
    ctx: &mut RepoCtx<'_>,
    result: Result<Vec<Branch>, Error>,
) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let mut effects = finish_load(ctx, RepoLoadsInFlight::BRANCHES, || {
        Effect::LoadBranches { repo_id }
    });

    let branches = match result {
        Ok(branches) => branches,
        Err(e) => {
            record_error(ctx, format!("list branches: {e}"));
            // A failed refresh keeps the last good list.
            if ctx.repo.branches.as_ready().is_none() {
                ctx.repo.branches = Loadable::Error(e.to_string());
            }
            return effects;
        }
    };

    let mut live: FxHashSet<CommitId> = branches.iter().map(|b| b.target.clone()).collect();
    if let Some(head) = ctx.repo.head_ref() {
        live.insert(head.target.clone());
    }
    ctx.repo.comparison_cache.retain_refs(&live);

    // Pruning may have dropped in-flight lookups, so settle even when the list
    // itself is unchanged.
    ctx.repo.branches = Loadable::Ready(branches);
    effects.extend(settle(ctx));
    effects
}

pub(super) fn recent_branches_loaded(
    ctx: &mut RepoCtx<'_>,
    result: Result<Vec<Branch>, Error>,
) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let limit = ctx.settings.recent_branches_limit;
    let mut effects = finish_load(ctx, RepoLoadsInFlight::RECENT_BRANCHES, || {
        Effect::LoadRecentBranches { repo_id, limit }
    });

    let next = match result {
        Ok(recent) => Loadable::Ready(recent),
        Err(e) => {
            record_error(ctx, format!("list recent branches: {e}"));
            Loadable::Error(e.to_string())
        }
    };
    if ctx.repo.recent_branches != next {
        ctx.repo.recent_branches = next;
        effects.extend(recompute_inference(ctx));
    }
    effects
}

pub(super) fn default_branch_loaded(
    ctx: &mut RepoCtx<'_>,
    result: Result<Option<String>, Error>,
) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let mut effects = finish_load(ctx, RepoLoadsInFlight::DEFAULT_BRANCH, || {
        Effect::LoadDefaultBranch { repo_id }
    });

    let next = match result {
        Ok(name) => Loadable::Ready(name),
        Err(e) => {
            record_error(ctx, format!("detect default branch: {e}"));
            Loadable::Error(e.to_string())
        }
    };
    if ctx.repo.default_branch != next {
        ctx.repo.default_branch = next;
        effects.extend(recompute_inference(ctx));
    }
    effects
}

pub(super) fn status_loaded(
    ctx: &mut RepoCtx<'_>,
    result: Result<RepoStatus, Error>,
) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let effects = finish_load(ctx, RepoLoadsInFlight::STATUS, || Effect::LoadStatus {
        repo_id,
    });

    ctx.repo.status = match result {
        Ok(status) => Loadable::Ready(status),
        Err(e) => {
            record_error(ctx, format!("load status: {e}"));
            Loadable::Error(e.to_string())
        }
    };
    effects
}

pub(super) fn conflict_state_loaded(
    ctx: &mut RepoCtx<'_>,
    result: Result<Option<ConflictState>, Error>,
) -> Vec<Effect> {
    let repo_id = ctx.repo.id;
    let effects = finish_load(ctx, RepoLoadsInFlight::CONFLICT_STATE, || {
        Effect::LoadConflictState { repo_id }
    });

    match result {
        Ok(conflict) => ctx.repo.conflict = conflict,
        Err(e) => record_error(ctx, format!("load conflict state: {e}")),
    }
    effects
}
