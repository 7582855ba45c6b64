use super::*;
use crate::compare::MergeGeneration;
use branchscope_core::domain::{InferredComparisonBranch, MergeResultStatus};

#[test]
fn cached_divergence_flips_the_form_immediately() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.divergence("c", "m", counts(2, 5));
    h.send(Msg::ViewHistory { repo_id: REPO });

    let effects = h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });

    assert!(divergence_keys(&effects).is_empty());
    assert!(h.repo().compare.pending.is_none());
    assert_eq!(
        h.repo().compare.form,
        CompareFormState::Compare {
            mode: CompareMode::Ahead,
            branch: local("main", "m"),
            base: id("c"),
            ahead_behind: Some(AheadBehind::new(2, 5)),
        }
    );
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Loading)
    );
}

#[test]
fn uncached_selection_stays_pending_until_its_divergence_arrives() {
    let mut h = Harness::new();
    h.open_plain();

    let effects = h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });

    assert!(matches!(
        effects.as_slice(),
        [
            Effect::ComputeMergeStatus {
                generation: MergeGeneration(1),
                ..
            },
            Effect::ComputeDivergence { .. },
        ]
    ));
    assert_eq!(divergence_keys(&effects), vec![key("c", "x")]);
    assert!(h.repo().compare.form.is_history());
    assert_eq!(
        h.repo().compare.pending.as_ref().map(|p| p.branch.name.as_str()),
        Some("x")
    );

    let effects = h.divergence("c", "x", counts(0, 3));

    assert!(h.repo().compare.pending.is_none());
    assert_eq!(
        h.repo().compare.form,
        CompareFormState::Compare {
            mode: CompareMode::Behind,
            branch: local("x", "x"),
            base: id("c"),
            ahead_behind: Some(AheadBehind::new(0, 3)),
        }
    );
    assert_eq!(
        commit_requests(&effects),
        vec![CommitListRequest {
            tip: id("x"),
            range: RangeSpec::Excluding(id("c")),
            limit: crate::settings::DEFAULT_COMMIT_LIST_LIMIT,
        }]
    );
}

#[test]
fn a_newer_selection_supersedes_the_older_one() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });

    // The first divergence lands, but the selection already moved on.
    h.divergence("c", "x", counts(1, 0));
    assert!(h.repo().compare.form.is_history());
    assert_eq!(
        h.repo().compare.pending.as_ref().map(|p| p.branch.name.as_str()),
        Some("main")
    );

    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(1),
        result: Ok(MergeResultStatus::Conflicts {
            conflicted_file_count: 4,
        }),
    });
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Loading)
    );

    h.divergence("c", "m", counts(2, 5));
    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(2),
        result: Ok(MergeResultStatus::Clean),
    });

    assert_eq!(
        h.repo().compare.form.comparison_branch().map(|b| b.name.as_str()),
        Some("main")
    );
    assert_eq!(h.repo().compare.merge_status, Some(MergeResultStatus::Clean));
    // The superseded result is still worth keeping.
    assert_eq!(
        h.repo().comparison_cache.get(&id("c"), &id("x")),
        Some(counts(1, 0))
    );
}

#[test]
fn comparing_to_missing_or_current_branch_is_ignored() {
    let mut h = Harness::new();
    h.open_plain();

    for name in ["nope", "feature"] {
        let effects = h.send(Msg::CompareToBranch {
            repo_id: REPO,
            branch: name.to_string(),
        });
        assert!(effects.is_empty(), "{name}");
    }

    let compare = &h.repo().compare;
    assert!(compare.form.is_history());
    assert!(compare.pending.is_none());
    assert!(compare.merge_status.is_none());
}

#[test]
fn failed_divergence_is_not_cached_and_falls_back_to_history() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });

    h.divergence_result("c", "x", Err(Error::backend("rev-list exploded")));

    let repo = h.repo();
    assert!(repo.compare.form.is_history());
    assert!(repo.compare.pending.is_none());
    assert!(repo.compare.merge_status.is_none());
    assert!(repo.comparison_cache.is_empty());
    assert!(repo.last_error.as_deref().is_some_and(|e| e.contains("rev-list exploded")));
    assert_eq!(h.state.errors.len(), 1);
    assert_eq!(h.state.errors[0].repo_id, Some(REPO));

    // The late merge result belongs to a cancelled generation.
    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(1),
        result: Ok(MergeResultStatus::Clean),
    });
    assert!(h.repo().compare.merge_status.is_none());

    let effects = h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });
    assert_eq!(divergence_keys(&effects), vec![key("c", "x")]);
}

#[test]
fn merge_failure_clears_the_status() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });

    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(1),
        result: Err(Error::backend("merge-tree failed")),
    });
    assert_eq!(h.state.errors.len(), 1);
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Loading)
    );

    h.divergence("c", "x", counts(1, 0));
    assert!(!h.repo().compare.form.is_history());
    assert!(h.repo().compare.merge_status.is_none());
}

#[test]
fn merge_result_waits_for_its_pending_selection() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });

    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(1),
        result: Ok(MergeResultStatus::Conflicts {
            conflicted_file_count: 3,
        }),
    });
    assert!(h.repo().compare.form.is_history());
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Loading)
    );

    h.divergence("c", "x", counts(1, 0));
    assert_eq!(
        h.repo().compare.form.comparison_branch().map(|b| b.name.as_str()),
        Some("x")
    );
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Conflicts {
            conflicted_file_count: 3,
        })
    );

    // While `main` is pending the form still shows `x`, so its result is held back.
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.send(Msg::MergeStatusComputed {
        repo_id: REPO,
        generation: MergeGeneration(2),
        result: Ok(MergeResultStatus::Clean),
    });
    assert_eq!(
        h.repo().compare.form.comparison_branch().map(|b| b.name.as_str()),
        Some("x")
    );
    assert_eq!(
        h.repo().compare.merge_status,
        Some(MergeResultStatus::Loading)
    );

    h.divergence("c", "m", counts(2, 5));
    assert_eq!(
        h.repo().compare.form.comparison_branch().map(|b| b.name.as_str()),
        Some("main")
    );
    assert_eq!(h.repo().compare.merge_status, Some(MergeResultStatus::Clean));
}

#[test]
fn result_from_an_earlier_run_of_the_same_pair_is_ignored() {
    let mut h = Harness::new();
    h.open_plain();
    let effects = h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "x".to_string(),
    });
    let first = divergence_requests(&effects);
    assert_eq!(first.len(), 1);

    // `x` moves away and back, so the pair is pruned and requested again.
    h.send(Msg::BranchesLoaded {
        repo_id: REPO,
        result: Ok(vec![local("feature", "c"), local("main", "m"), local("x", "x2")]),
    });
    let effects = h.send(Msg::BranchesLoaded {
        repo_id: REPO,
        result: Ok(vec![local("feature", "c"), local("main", "m"), local("x", "x")]),
    });
    assert_eq!(divergence_keys(&effects), vec![key("c", "x")]);
    let second = divergence_requests(&effects);
    assert_ne!(first, second);

    let effects = h.send(Msg::DivergenceComputed {
        repo_id: REPO,
        key: key("c", "x"),
        request: first[0],
        result: Err(Error::backend("stale run failed")),
    });
    assert!(effects.is_empty());
    assert!(h.state.errors.is_empty());
    assert!(h.repo().compare.form.is_history());
    assert_eq!(
        h.repo().compare.pending.as_ref().map(|p| p.branch.target.clone()),
        Some(id("x"))
    );

    h.send(Msg::DivergenceComputed {
        repo_id: REPO,
        key: key("c", "x"),
        request: second[0],
        result: Ok(counts(2, 0)),
    });
    assert_eq!(
        h.repo().comparison_cache.get(&id("c"), &id("x")),
        Some(counts(2, 0))
    );
    assert_eq!(
        h.repo().compare.form.comparison_branch(),
        Some(&local("x", "x"))
    );
}

#[test]
fn single_branch_repository_has_no_suggestion() {
    let mut h = Harness::new();
    let effects = h.open_loaded(
        head_on("main", "m"),
        vec![local("main", "m")],
        vec![local("main", "m")],
        Some("main"),
    );

    assert!(divergence_keys(&effects).is_empty());
    assert_eq!(
        h.repo().compare.inferred,
        Some(InferredComparisonBranch::absent())
    );
}

#[test]
fn diverged_default_branch_is_suggested_and_follows_its_tip() {
    let mut h = Harness::new();
    let effects = h.open_loaded(
        head_on("feature", "c"),
        vec![local("feature", "c"), local("main", "m")],
        vec![local("main", "m")],
        Some("main"),
    );

    // Recent branches and default branch need the same pair; it is computed once.
    assert_eq!(divergence_keys(&effects), vec![key("c", "m")]);
    assert!(h.repo().compare.inferred.is_none());

    h.divergence("c", "m", counts(2, 5));
    assert_eq!(
        h.repo().compare.inferred,
        Some(InferredComparisonBranch {
            branch: Some(local("main", "m")),
            ahead_behind: Some(AheadBehind::new(2, 5)),
        })
    );

    let effects = h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    assert_eq!(h.repo().compare.view(), crate::model::CompareView::Compare(CompareMode::Ahead));
    assert_eq!(
        commit_requests(&effects),
        vec![CommitListRequest {
            tip: id("c"),
            range: RangeSpec::Excluding(id("m")),
            limit: crate::settings::DEFAULT_COMMIT_LIST_LIMIT,
        }]
    );

    // main moves: the stale pair is pruned and both consumers wait on the new one.
    let effects = h.send(Msg::BranchesLoaded {
        repo_id: REPO,
        result: Ok(vec![local("feature", "c"), local("main", "m2")]),
    });
    assert_eq!(divergence_keys(&effects), vec![key("c", "m2")]);
    assert_eq!(h.repo().comparison_cache.get(&id("c"), &id("m")), None);
    assert!(h.repo().compare.inferred.is_none());

    h.divergence("c", "m2", counts(0, 3));
    let repo = h.repo();
    assert_eq!(
        repo.compare.inferred,
        Some(InferredComparisonBranch {
            branch: Some(local("main", "m2")),
            ahead_behind: Some(AheadBehind::new(0, 3)),
        })
    );
    assert_eq!(
        repo.compare.form,
        CompareFormState::Compare {
            mode: CompareMode::Behind,
            branch: local("main", "m2"),
            base: id("c"),
            ahead_behind: Some(AheadBehind::new(0, 3)),
        }
    );
}

#[test]
fn failed_inference_lookup_settles_as_absent() {
    let mut h = Harness::new();
    h.open_loaded(
        head_on("feature", "c"),
        vec![local("feature", "c"), local("main", "m")],
        Vec::new(),
        Some("main"),
    );

    let effects = h.divergence_result("c", "m", Err(Error::backend("boom")));

    assert!(divergence_keys(&effects).is_empty());
    assert_eq!(
        h.repo().compare.inferred,
        Some(InferredComparisonBranch::absent())
    );
}

#[test]
fn filter_text_only_narrows_the_candidates() {
    let mut h = Harness::new();
    h.open_loaded(
        head_on("feature", "c"),
        vec![local("feature", "c"), local("main", "m"), local("maint", "t")],
        vec![local("main", "m")],
        None,
    );
    h.divergence("c", "m", counts(1, 1));
    let inferred = h.repo().compare.inferred.clone();

    let effects = h.send(Msg::SetFilterText {
        repo_id: REPO,
        text: "MAIN".to_string(),
    });
    assert!(effects.is_empty());
    assert_eq!(h.repo().compare.inferred, inferred);
    let names: Vec<&str> = h
        .repo()
        .compare_candidates()
        .into_iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(names, vec!["main", "maint"]);

    h.send(Msg::SetFilterText {
        repo_id: REPO,
        text: "feat".to_string(),
    });
    assert!(h.repo().compare_candidates().is_empty());

    let effects = h.send(Msg::SetBranchListVisibility {
        repo_id: REPO,
        visible: true,
    });
    assert!(effects.is_empty());
    assert!(h.repo().compare.branch_list_visible);
}

#[test]
fn switching_modes_swaps_the_listed_range() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.divergence("c", "m", counts(2, 5));

    let effects = h.send(Msg::SwitchCompareMode {
        repo_id: REPO,
        mode: CompareMode::Behind,
    });
    assert_eq!(
        commit_requests(&effects),
        vec![CommitListRequest {
            tip: id("m"),
            range: RangeSpec::Excluding(id("c")),
            limit: crate::settings::DEFAULT_COMMIT_LIST_LIMIT,
        }]
    );

    let effects = h.send(Msg::SwitchCompareMode {
        repo_id: REPO,
        mode: CompareMode::Behind,
    });
    assert!(effects.is_empty());

    let effects = h.send(Msg::ViewHistory { repo_id: REPO });
    assert_eq!(commit_requests(&effects), vec![history_request("c")]);
    assert!(h.repo().compare.merge_status.is_none());
    assert!(
        h.send(Msg::SwitchCompareMode {
            repo_id: REPO,
            mode: CompareMode::Ahead,
        })
        .is_empty()
    );
}

#[test]
fn outdated_commit_lists_are_dropped() {
    let mut h = Harness::new();
    h.open_plain();
    assert_eq!(h.repo().compare.commit_request, Some(history_request("c")));

    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.divergence("c", "m", counts(2, 0));

    h.send(Msg::CommitsLoaded {
        repo_id: REPO,
        request: history_request("c"),
        result: Ok(vec![id("c"), id("b"), id("a")]),
    });
    assert!(h.repo().compare.commits.is_loading());

    let current = h.repo().compare.commit_request.clone().expect("request");
    h.send(Msg::CommitsLoaded {
        repo_id: REPO,
        request: current,
        result: Ok(vec![id("c"), id("b")]),
    });
    assert_eq!(
        h.repo().compare.commits,
        Loadable::Ready(vec![id("c"), id("b")])
    );
}

#[test]
fn vanished_comparison_branch_returns_to_history() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.divergence("c", "m", counts(2, 5));

    let effects = h.send(Msg::BranchesLoaded {
        repo_id: REPO,
        result: Ok(vec![local("feature", "c"), local("x", "x")]),
    });

    let repo = h.repo();
    assert!(repo.compare.form.is_history());
    assert!(repo.compare.merge_status.is_none());
    assert_eq!(commit_requests(&effects), vec![history_request("c")]);
}

#[test]
fn checking_out_the_compared_branch_returns_to_history() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::CompareToBranch {
        repo_id: REPO,
        branch: "main".to_string(),
    });
    h.divergence("c", "m", counts(2, 5));

    h.send(Msg::HeadLoaded {
        repo_id: REPO,
        result: Ok(head_on("main", "m")),
    });

    assert!(h.repo().compare.form.is_history());
    assert_eq!(h.repo().compare.commit_request, Some(history_request("m")));
}
