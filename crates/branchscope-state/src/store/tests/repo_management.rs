use super::*;

#[test]
fn open_repo_sets_opening_and_emits_effect() {
    let mut h = Harness::new();

    let effects = h.send(Msg::OpenRepo(PathBuf::from(REPO_PATH)));

    assert_eq!(h.state.active_repo, Some(REPO));
    let repo = h.repo();
    assert!(repo.open.is_loading());
    assert!(matches!(
        effects.as_slice(),
        [Effect::OpenRepo {
            repo_id: REPO,
            ..
        }]
    ));
}

#[test]
fn opening_the_same_path_twice_only_activates_it() {
    let mut h = Harness::new();
    h.send(Msg::OpenRepo(PathBuf::from(REPO_PATH)));
    h.send(Msg::OpenRepo(PathBuf::from("/tmp/branchscope-tests/other")));
    assert_eq!(h.state.active_repo, Some(RepoId(2)));

    let effects = h.send(Msg::OpenRepo(PathBuf::from(REPO_PATH)));

    assert!(effects.is_empty());
    assert_eq!(h.state.repos.len(), 2);
    assert_eq!(h.state.active_repo, Some(REPO));
}

#[test]
fn close_repo_removes_and_moves_active() {
    let mut h = Harness::new();
    h.open();
    h.send(Msg::OpenRepo(PathBuf::from("/tmp/branchscope-tests/other")));
    assert_eq!(h.state.active_repo, Some(RepoId(2)));

    let effects = h.send(Msg::CloseRepo {
        repo_id: RepoId(2),
    });

    assert!(effects.is_empty());
    assert_eq!(h.state.repos.len(), 1);
    assert_eq!(h.state.active_repo, Some(REPO));
    assert!(h.repos.contains_key(&REPO));
}

#[test]
fn switching_to_an_open_repo_refreshes_it() {
    let mut h = Harness::new();
    h.open_plain();
    h.send(Msg::OpenRepo(PathBuf::from("/tmp/branchscope-tests/other")));

    let effects = h.send(Msg::SetActiveRepo { repo_id: REPO });
    assert_eq!(h.state.active_repo, Some(REPO));
    assert!(effects.contains(&Effect::LoadHead { repo_id: REPO }));

    assert!(h.send(Msg::SetActiveRepo { repo_id: REPO }).is_empty());
    assert!(
        h.send(Msg::SetActiveRepo {
            repo_id: RepoId(2)
        })
        .is_empty()
    );
    assert_eq!(h.state.active_repo, Some(RepoId(2)));
}

#[test]
fn not_a_repository_discards_the_entry() {
    let mut h = Harness::new();
    h.send(Msg::OpenRepo(PathBuf::from(REPO_PATH)));

    let effects = h.send(Msg::RepoOpenedErr {
        repo_id: REPO,
        spec: RepoSpec {
            workdir: PathBuf::from(REPO_PATH),
        },
        error: Error::new(ErrorKind::NotARepository),
    });

    assert!(effects.is_empty());
    assert!(h.state.repos.is_empty());
    assert_eq!(h.state.active_repo, None);
    assert_eq!(h.state.errors.len(), 1);
    assert_eq!(h.state.errors[0].repo_id, None);
}

#[test]
fn other_open_failures_keep_the_entry_with_its_error() {
    let mut h = Harness::new();
    h.send(Msg::OpenRepo(PathBuf::from(REPO_PATH)));

    h.send(Msg::RepoOpenedErr {
        repo_id: REPO,
        spec: RepoSpec {
            workdir: PathBuf::from(REPO_PATH),
        },
        error: Error::new(ErrorKind::Io(std::io::ErrorKind::PermissionDenied)),
    });

    let repo = h.repo();
    assert!(matches!(repo.open, Loadable::Error(_)));
    assert!(repo.is_settled());
    assert!(h.send(Msg::ReloadRepo { repo_id: REPO }).is_empty());
}

#[test]
fn commit_selection_is_tracked_per_repo() {
    let mut h = Harness::new();
    h.open_plain();

    h.send(Msg::SelectCommit {
        repo_id: REPO,
        commit_id: id("c"),
    });
    assert_eq!(h.repo().selected_commit, Some(id("c")));

    h.send(Msg::ClearCommitSelection { repo_id: REPO });
    assert_eq!(h.repo().selected_commit, None);
}
