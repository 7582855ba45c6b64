use super::cache::{ComparisonCache, ComparisonKey};
use branchscope_core::domain::{Branch, BranchKind, Divergence, HeadRef, InferredComparisonBranch};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Inference {
    Settled(InferredComparisonBranch),
    /// The policy cannot decide until this divergence is known.
    NeedsDivergence(ComparisonKey),
}

/// Picks the branch suggested for comparison while viewing history.
///
/// The default branch wins when it is not the current branch and has diverged
/// from HEAD. Otherwise the most recently checked-out other branch is used. All
/// divergences come from `cache`; a miss is reported as `NeedsDivergence` so the
/// caller can compute it and ask again.
pub fn infer(
    head: Option<&HeadRef>,
    all_branches: &[Branch],
    recent_branches: &[Branch],
    default_branch: Option<&str>,
    cache: &ComparisonCache,
) -> Inference {
    let Some(head) = head else {
        return Inference::Settled(InferredComparisonBranch::absent());
    };
    let current = head.branch.as_deref();
    let lookup = |branch: &Branch| cache.get(&head.target, &branch.target);
    let missing = |branch: &Branch| {
        Inference::NeedsDivergence(ComparisonKey::new(
            head.target.clone(),
            branch.target.clone(),
        ))
    };

    if let Some(default) = default_branch
        .and_then(|name| find_branch(all_branches, name))
        .filter(|b| Some(b.name.as_str()) != current)
    {
        match lookup(default) {
            None => return missing(default),
            Some(Divergence::Counts(ab)) if ab.is_zero() => {}
            Some(divergence) => {
                return Inference::Settled(InferredComparisonBranch {
                    branch: Some(default.clone()),
                    ahead_behind: divergence.counts(),
                });
            }
        }
    }

    let recent = recent_branches
        .iter()
        .filter(|b| Some(b.name.as_str()) != current)
        .find_map(|recent| find_branch(all_branches, &recent.name));
    match recent {
        Some(branch) => match lookup(branch) {
            None => missing(branch),
            Some(divergence) => Inference::Settled(InferredComparisonBranch {
                branch: Some(branch.clone()),
                ahead_behind: divergence.counts(),
            }),
        },
        None => Inference::Settled(InferredComparisonBranch::absent()),
    }
}

/// Resolves against the live branch list, preferring a local branch of that name.
fn find_branch<'a>(branches: &'a [Branch], name: &str) -> Option<&'a Branch> {
    branches
        .iter()
        .find(|b| b.kind == BranchKind::Local && b.name == name)
        .or_else(|| branches.iter().find(|b| b.name == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchscope_core::domain::{AheadBehind, CommitId};

    fn id(s: &str) -> CommitId {
        CommitId(s.to_string())
    }

    fn local(name: &str, tip: &str) -> Branch {
        Branch {
            name: name.to_string(),
            kind: BranchKind::Local,
            target: id(tip),
            upstream: None,
        }
    }

    fn head_on(branch: &str, tip: &str) -> HeadRef {
        HeadRef {
            branch: Some(branch.to_string()),
            target: id(tip),
        }
    }

    #[test]
    fn single_branch_repo_infers_nothing() {
        let branches = vec![local("main", "m")];
        let head = head_on("main", "m");
        let cache = ComparisonCache::default();

        assert_eq!(
            infer(Some(&head), &branches, &branches, Some("main"), &cache),
            Inference::Settled(InferredComparisonBranch::absent())
        );
    }

    #[test]
    fn diverged_default_branch_is_preferred() {
        let branches = vec![local("feature", "c"), local("main", "m"), local("x", "x")];
        let recent = vec![local("x", "x")];
        let head = head_on("feature", "c");
        let mut cache = ComparisonCache::default();

        assert_eq!(
            infer(Some(&head), &branches, &recent, Some("main"), &cache),
            Inference::NeedsDivergence(ComparisonKey::new(id("c"), id("m")))
        );

        cache.set(id("c"), id("m"), Divergence::Counts(AheadBehind::new(2, 5)));
        assert_eq!(
            infer(Some(&head), &branches, &recent, Some("main"), &cache),
            Inference::Settled(InferredComparisonBranch {
                branch: Some(local("main", "m")),
                ahead_behind: Some(AheadBehind::new(2, 5)),
            })
        );
    }

    #[test]
    fn default_branch_without_divergence_falls_back_to_recent() {
        let branches = vec![local("feature", "m"), local("main", "m"), local("x", "x")];
        let recent = vec![local("feature", "m"), local("x", "x"), local("main", "m")];
        let head = head_on("feature", "m");
        let mut cache = ComparisonCache::default();
        cache.set(id("m"), id("m"), Divergence::Counts(AheadBehind::default()));
        cache.set(id("x"), id("m"), Divergence::Counts(AheadBehind::new(1, 0)));

        assert_eq!(
            infer(Some(&head), &branches, &recent, Some("main"), &cache),
            Inference::Settled(InferredComparisonBranch {
                branch: Some(local("x", "x")),
                ahead_behind: Some(AheadBehind::new(0, 1)),
            })
        );
    }

    #[test]
    fn recent_branches_missing_from_the_list_are_skipped() {
        let branches = vec![local("feature", "c"), local("y", "y")];
        let recent = vec![local("deleted", "d"), local("y", "y")];
        let head = head_on("feature", "c");
        let mut cache = ComparisonCache::default();
        cache.set(id("c"), id("y"), Divergence::Unrelated);

        assert_eq!(
            infer(Some(&head), &branches, &recent, None, &cache),
            Inference::Settled(InferredComparisonBranch {
                branch: Some(local("y", "y")),
                ahead_behind: None,
            })
        );
    }
}
