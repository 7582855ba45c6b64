use super::util::{RepoCtx, record_error};
use crate::compare::{
    CacheLookup, ComparisonKey, DivergenceRequestId, DivergenceWaiter, Inference,
    MergeGeneration, infer,
};
use crate::model::{CommitListRequest, CompareState, Loadable, PendingComparison, RepoState};
use crate::msg::Effect;
use branchscope_core::domain::{
    Branch, CommitId, CompareFormState, CompareMode, Divergence, HeadRef,
    InferredComparisonBranch, MergeResultStatus, RangeSpec,
};
use branchscope_core::error::Error;

pub(super) fn view_history(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    enter_history(ctx.repo);
    let mut effects = recompute_inference(ctx);
    effects.extend(sync_commit_list(ctx));
    effects
}

pub(super) fn compare_to_branch(ctx: &mut RepoCtx<'_>, name: String) -> Vec<Effect> {
    let Some(head) = ctx.repo.head_ref().cloned() else {
        log::debug!("ignoring comparison with {name}: HEAD is not loaded");
        return Vec::new();
    };
    let Some(branch) = live_comparison_branch(ctx.repo, &head, &name).cloned() else {
        log::debug!("ignoring comparison with {name}: not a comparable branch");
        return Vec::new();
    };

    let mut effects = select_branch(ctx, branch);
    effects.extend(sync_commit_list(ctx));
    effects
}

pub(super) fn switch_compare_mode(ctx: &mut RepoCtx<'_>, mode: CompareMode) -> Vec<Effect> {
    match &mut ctx.repo.compare.form {
        CompareFormState::Compare { mode: current, .. } if *current != mode => *current = mode,
        _ => return Vec::new(),
    }
    sync_commit_list(ctx)
}

pub(super) fn set_filter_text(ctx: &mut RepoCtx<'_>, text: String) -> Vec<Effect> {
    ctx.repo.compare.filter_text = text;
    Vec::new()
}

pub(super) fn set_branch_list_visibility(ctx: &mut RepoCtx<'_>, visible: bool) -> Vec<Effect> {
    ctx.repo.compare.branch_list_visible = visible;
    Vec::new()
}

pub(super) fn divergence_computed(
    ctx: &mut RepoCtx<'_>,
    key: ComparisonKey,
    request: DivergenceRequestId,
    result: Result<Divergence, Error>,
) -> Vec<Effect> {
    if !ctx.repo.comparison_cache.is_running(&key, request) {
        log::debug!("dropping divergence for {key:?} from superseded {request:?}");
        return Vec::new();
    }

    let divergence = match result {
        Ok(divergence) => Some(divergence),
        Err(e) => {
            record_error(ctx, format!("ahead/behind {}...{}: {e}", key.from, key.to));
            None
        }
    };

    let waiters = ctx
        .repo
        .comparison_cache
        .complete(&key, request, divergence);

    let mut effects = Vec::new();
    for waiter in waiters {
        match waiter {
            DivergenceWaiter::Selection => resolve_pending_selection(ctx, &key),
            DivergenceWaiter::Inference => {
                let failed = divergence.is_none().then_some(&key);
                effects.extend(run_inference(ctx, failed));
            }
        }
    }
    effects.extend(sync_commit_list(ctx));
    effects
}

pub(super) fn merge_status_computed(
    ctx: &mut RepoCtx<'_>,
    generation: MergeGeneration,
    result: Result<MergeResultStatus, Error>,
) -> Vec<Effect> {
    if !ctx.repo.compare.merge_computer.is_current(generation) {
        log::debug!("dropping superseded merge status {generation:?}");
        return Vec::new();
    }
    let status = match result {
        Ok(status) => Some(status),
        Err(e) => {
            record_error(ctx, format!("merge analysis: {e}"));
            None
        }
    };
    // A pending selection keeps showing `Loading` until its form is applied.
    match &mut ctx.repo.compare.pending {
        Some(pending) => pending.merge_status = status,
        None => ctx.repo.compare.merge_status = status,
    }
    Vec::new()
}

pub(super) fn commits_loaded(
    ctx: &mut RepoCtx<'_>,
    request: CommitListRequest,
    result: Result<Vec<CommitId>, Error>,
) -> Vec<Effect> {
    if ctx.repo.compare.commit_request.as_ref() != Some(&request) {
        log::debug!("dropping commit list for outdated request {request:?}");
        return Vec::new();
    }
    match result {
        Ok(commits) => ctx.repo.compare.commits = Loadable::Ready(commits),
        Err(e) => {
            ctx.repo.compare.commits = Loadable::Error(e.to_string());
            record_error(ctx, format!("list commits: {e}"));
        }
    }
    Vec::new()
}

/// Brings everything derived from head and the branch lists back in line after
/// one of them changed.
pub(super) fn settle(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    let mut effects = revalidate_comparison(ctx);
    effects.extend(recompute_inference(ctx));
    effects.extend(sync_commit_list(ctx));
    effects
}

pub(super) fn recompute_inference(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    run_inference(ctx, None)
}

/// `failed` is a pair whose computation just failed: if inference still hinges on
/// it, the suggestion settles as absent instead of retrying.
fn run_inference(ctx: &mut RepoCtx<'_>, failed: Option<&ComparisonKey>) -> Vec<Effect> {
    let repo = &*ctx.repo;
    let default_branch = ctx
        .settings
        .default_branch
        .as_deref()
        .or_else(|| repo.default_branch.as_ready().and_then(|d| d.as_deref()));
    let outcome = infer(
        repo.head_ref(),
        repo.branches.as_ready().map(Vec::as_slice).unwrap_or_default(),
        repo.recent_branches
            .as_ready()
            .map(Vec::as_slice)
            .unwrap_or_default(),
        default_branch,
        &repo.comparison_cache,
    );

    match outcome {
        Inference::Settled(inferred) => {
            ctx.repo.compare.inferred = Some(inferred);
            Vec::new()
        }
        Inference::NeedsDivergence(key)
            if failed.is_some_and(|f| *f == key || f.swapped() == key) =>
        {
            log::debug!("no suggested comparison branch: divergence lookup failed");
            ctx.repo.compare.inferred = Some(InferredComparisonBranch::absent());
            Vec::new()
        }
        Inference::NeedsDivergence(key) => {
            ctx.repo.compare.inferred = None;
            match ctx
                .repo
                .comparison_cache
                .request(&key, DivergenceWaiter::Inference)
            {
                CacheLookup::Miss(request) => vec![Effect::ComputeDivergence {
                    repo_id: ctx.repo.id,
                    key,
                    request,
                }],
                CacheLookup::Pending | CacheLookup::Hit(_) => Vec::new(),
            }
        }
    }
}

/// Starts comparing against `branch`: a fresh merge-status generation plus the
/// divergence lookup. A cached divergence flips the form right away; otherwise
/// the selection waits as pending.
fn select_branch(ctx: &mut RepoCtx<'_>, branch: Branch) -> Vec<Effect> {
    let Some(base) = ctx.repo.head_ref().map(|h| h.target.clone()) else {
        return Vec::new();
    };
    let repo_id = ctx.repo.id;

    let generation = ctx.repo.compare.merge_computer.issue();
    ctx.repo.compare.merge_status = Some(MergeResultStatus::Loading);
    let mut effects = vec![Effect::ComputeMergeStatus {
        repo_id,
        generation,
        base: base.clone(),
        target: branch.target.clone(),
    }];

    let key = ComparisonKey::new(base.clone(), branch.target.clone());
    match ctx
        .repo
        .comparison_cache
        .request(&key, DivergenceWaiter::Selection)
    {
        CacheLookup::Hit(divergence) => {
            ctx.repo.compare.pending = None;
            apply_comparison(&mut ctx.repo.compare, branch, base, divergence);
        }
        CacheLookup::Pending => {
            ctx.repo.compare.pending = Some(PendingComparison::new(branch, base));
        }
        CacheLookup::Miss(request) => {
            ctx.repo.compare.pending = Some(PendingComparison::new(branch, base));
            effects.push(Effect::ComputeDivergence {
                repo_id,
                key,
                request,
            });
        }
    }
    effects
}

fn resolve_pending_selection(ctx: &mut RepoCtx<'_>, completed: &ComparisonKey) {
    let Some(pending) = ctx.repo.compare.pending.clone() else {
        return;
    };
    let pending_key = ComparisonKey::new(pending.base.clone(), pending.branch.target.clone());

    match ctx
        .repo
        .comparison_cache
        .get(&pending_key.from, &pending_key.to)
    {
        Some(divergence) => {
            ctx.repo.compare.pending = None;
            ctx.repo.compare.merge_status = pending.merge_status;
            apply_comparison(
                &mut ctx.repo.compare,
                pending.branch,
                pending.base,
                divergence,
            );
        }
        None if pending_key == *completed || pending_key.swapped() == *completed => {
            log::debug!(
                "comparison with {} failed; back to history",
                pending.branch.name
            );
            enter_history(ctx.repo);
        }
        // Still waiting on its own computation.
        None => {}
    }
}

fn apply_comparison(
    compare: &mut CompareState,
    branch: Branch,
    base: CommitId,
    divergence: Divergence,
) {
    compare.form = CompareFormState::Compare {
        mode: CompareMode::for_divergence(divergence),
        branch,
        base,
        ahead_behind: divergence.counts(),
    };
}

fn enter_history(repo: &mut RepoState) {
    let compare = &mut repo.compare;
    compare.form = CompareFormState::History;
    compare.pending = None;
    compare.merge_status = None;
    compare.merge_computer.cancel();
}

/// A branch that can be compared against: present in the list and not checked out.
fn live_comparison_branch<'a>(
    repo: &'a RepoState,
    head: &HeadRef,
    name: &str,
) -> Option<&'a Branch> {
    repo.branch_named(name)
        .filter(|b| head.branch.as_deref() != Some(b.name.as_str()))
}

/// Falls back to history when the compared (or pending) branch disappeared or got
/// checked out, and re-runs the selection when either tip moved.
fn revalidate_comparison(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    let Some(head) = ctx.repo.head_ref().cloned() else {
        return Vec::new();
    };
    if ctx.repo.branches.as_ready().is_none() {
        return Vec::new();
    }

    if let Some(shown) = ctx.repo.compare.form.comparison_branch()
        && live_comparison_branch(ctx.repo, &head, &shown.name).is_none()
    {
        log::debug!("compared branch {} is gone", shown.name);
        if ctx.repo.compare.pending.is_some() {
            ctx.repo.compare.form = CompareFormState::History;
        } else {
            enter_history(ctx.repo);
            return Vec::new();
        }
    }

    let (branch, base) = match (&ctx.repo.compare.pending, &ctx.repo.compare.form) {
        (Some(pending), _) => (pending.branch.clone(), pending.base.clone()),
        (None, CompareFormState::Compare { branch, base, .. }) => (branch.clone(), base.clone()),
        (None, CompareFormState::History) => return Vec::new(),
    };
    let Some(live) = live_comparison_branch(ctx.repo, &head, &branch.name).cloned() else {
        log::debug!("pending comparison branch {} is gone", branch.name);
        enter_history(ctx.repo);
        return Vec::new();
    };

    if live.target != branch.target || head.target != base {
        log::debug!("refs moved under comparison with {}; recomputing", live.name);
        return select_branch(ctx, live);
    }
    if live != branch {
        let compare = &mut ctx.repo.compare;
        match (&mut compare.pending, &mut compare.form) {
            (Some(pending), _) => pending.branch = live,
            (None, CompareFormState::Compare { branch, .. }) => *branch = live,
            (None, CompareFormState::History) => {}
        }
    }
    Vec::new()
}

/// Derives which commits the view lists and requests them when that changed.
pub(super) fn sync_commit_list(ctx: &mut RepoCtx<'_>) -> Vec<Effect> {
    let limit = ctx.settings.commit_list_limit;
    let desired = match &ctx.repo.compare.form {
        CompareFormState::History => ctx.repo.head_ref().map(|head| CommitListRequest {
            tip: head.target.clone(),
            range: RangeSpec::All,
            limit,
        }),
        CompareFormState::Compare {
            mode: CompareMode::Ahead,
            branch,
            base,
            ..
        } => Some(CommitListRequest {
            tip: base.clone(),
            range: RangeSpec::Excluding(branch.target.clone()),
            limit,
        }),
        CompareFormState::Compare {
            mode: CompareMode::Behind,
            branch,
            base,
            ..
        } => Some(CommitListRequest {
            tip: branch.target.clone(),
            range: RangeSpec::Excluding(base.clone()),
            limit,
        }),
    };

    let compare = &mut ctx.repo.compare;
    if desired == compare.commit_request {
        return Vec::new();
    }
    compare.commit_request = desired.clone();
    match desired {
        Some(request) => {
            compare.commits = Loadable::Loading;
            vec![Effect::LoadCommits {
                repo_id: ctx.repo.id,
                request,
            }]
        }
        None => {
            compare.commits = Loadable::NotLoaded;
            Vec::new()
        }
    }
}
