use branchscope_core::domain::CompareFormState;
use branchscope_state::AppStore;
use branchscope_state::model::{AppState, Loadable, RepoState};
use branchscope_state::msg::{Msg, StoreEvent};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os().skip(1);
    let path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let branch = args.next().map(|b| b.to_string_lossy().into_owned());

    let mut settings = branchscope_state::settings::load();
    settings.watch_repositories = false;
    let (store, events) = AppStore::with_settings(branchscope_git::default_backend(), settings);

    store.dispatch(Msg::OpenRepo(path));
    let state = match wait_for(&store, &events, |state| match state.active() {
        Some(repo) => repo.is_settled(),
        None => !state.errors.is_empty(),
    }) {
        Some(state) => state,
        None => return ExitCode::FAILURE,
    };
    let Some(repo) = state.active().filter(|r| matches!(r.open, Loadable::Ready(()))) else {
        report_errors(&state);
        return ExitCode::FAILURE;
    };

    let state = match branch {
        Some(branch) => {
            if !repo.compare_candidates().iter().any(|b| b.name == branch) {
                eprintln!("{branch} is not a branch that can be compared");
                return ExitCode::FAILURE;
            }
            let repo_id = repo.id;
            let errors_before = state.errors.len();
            store.dispatch(Msg::CompareToBranch {
                repo_id,
                branch: branch.clone(),
            });
            let compared = |state: &AppState| {
                state
                    .active()
                    .and_then(|r| r.compare.form.comparison_branch())
                    .is_some_and(|b| b.name == branch)
            };
            let Some(state) = wait_for(&store, &events, |state| {
                state.active().is_some_and(RepoState::is_settled)
                    && (compared(state) || state.errors.len() > errors_before)
            }) else {
                return ExitCode::FAILURE;
            };
            if !compared(&state) {
                eprintln!("cannot compare with {branch}");
                report_errors(&state);
                return ExitCode::FAILURE;
            }
            state
        }
        None => state,
    };

    match state.active() {
        Some(repo) => {
            print_summary(repo);
            ExitCode::SUCCESS
        }
        None => ExitCode::FAILURE,
    }
}

/// Blocks until `done` holds for a snapshot of the store.
fn wait_for(
    store: &AppStore,
    events: &mpsc::Receiver<StoreEvent>,
    done: impl Fn(&AppState) -> bool,
) -> Option<AppState> {
    let start = Instant::now();
    loop {
        let state = store.snapshot();
        if done(&state) {
            return Some(state);
        }
        if start.elapsed() > SETTLE_TIMEOUT {
            eprintln!("timed out waiting for the repository");
            return None;
        }
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(StoreEvent::StateChanged) | Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::error!("store thread exited");
                return None;
            }
        }
    }
}

fn report_errors(state: &AppState) {
    for error in &state.errors {
        eprintln!("error: {}", error.message);
    }
}

fn print_summary(repo: &RepoState) {
    println!("repository: {}", repo.spec.workdir.display());
    if let Some(head) = repo.head_ref() {
        match &head.branch {
            Some(branch) => println!("on {branch} at {}", head.target),
            None => println!("detached at {}", head.target),
        }
    }

    match &repo.compare.inferred {
        Some(inferred) => match (&inferred.branch, inferred.ahead_behind) {
            (Some(branch), Some(ab)) => println!(
                "suggested: {} ({} ahead, {} behind)",
                branch.name, ab.ahead, ab.behind
            ),
            (Some(branch), None) => println!("suggested: {} (unrelated history)", branch.name),
            (None, _) => println!("suggested: none"),
        },
        None => println!("suggested: unknown"),
    }

    if let CompareFormState::Compare {
        mode,
        branch,
        ahead_behind,
        ..
    } = &repo.compare.form
    {
        match ahead_behind {
            Some(ab) => println!(
                "comparing with {}: {} ahead, {} behind ({mode:?})",
                branch.name, ab.ahead, ab.behind
            ),
            None => println!("comparing with {}: unrelated history", branch.name),
        }
        if let Some(status) = &repo.compare.merge_status {
            println!("merge: {status:?}");
        }
    }

    if let Some(commits) = repo.compare.commits.as_ready() {
        println!("{} commit(s):", commits.len());
        for commit in commits {
            println!("  {commit}");
        }
    }
}
