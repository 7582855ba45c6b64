use branchscope_core::domain::*;
use rustc_hash::FxHashSet;

#[test]
fn commit_id_is_hashable() {
    let mut set = FxHashSet::default();
    set.insert(CommitId("a".into()));
    set.insert(CommitId("b".into()));
    assert!(set.contains(&CommitId("a".into())));
}

#[test]
fn swapped_divergence_is_the_inverse_pair() {
    let ab = AheadBehind::new(3, 1);
    assert_eq!(ab.swapped(), AheadBehind::new(1, 3));
    assert_eq!(ab.swapped().swapped(), ab);
    assert_eq!(Divergence::Unrelated.swapped(), Divergence::Unrelated);
    assert_eq!(
        Divergence::Counts(ab).swapped(),
        Divergence::Counts(AheadBehind::new(1, 3))
    );
}

#[test]
fn compare_mode_prefers_ahead_when_both_sides_moved() {
    assert_eq!(
        CompareMode::for_divergence(Divergence::Counts(AheadBehind::new(2, 5))),
        CompareMode::Ahead
    );
    assert_eq!(
        CompareMode::for_divergence(Divergence::Counts(AheadBehind::new(0, 5))),
        CompareMode::Behind
    );
    assert_eq!(
        CompareMode::for_divergence(Divergence::Counts(AheadBehind::default())),
        CompareMode::Behind
    );
    assert_eq!(
        CompareMode::for_divergence(Divergence::Unrelated),
        CompareMode::Behind
    );
}

#[test]
fn history_form_has_no_comparison_branch() {
    let form = CompareFormState::default();
    assert!(form.is_history());
    assert_eq!(form.comparison_branch(), None);

    let branch = Branch {
        name: "main".into(),
        kind: BranchKind::Local,
        target: CommitId("m".into()),
        upstream: None,
    };
    let form = CompareFormState::Compare {
        mode: CompareMode::Behind,
        branch: branch.clone(),
        base: CommitId("c".into()),
        ahead_behind: Some(AheadBehind::new(0, 1)),
    };
    assert!(!form.is_history());
    assert_eq!(form.comparison_branch(), Some(&branch));
}
