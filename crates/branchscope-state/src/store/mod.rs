use crate::model::{AppState, RepoId};
use crate::msg::{Msg, StoreEvent};
use crate::settings::{self, Settings};
use branchscope_core::services::GitBackend;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, RwLock, mpsc};
use std::thread;

mod effects;
mod executor;
mod reducer;
mod repo_monitor;

use effects::{RepoMap, schedule_effect};
use executor::{TaskExecutor, default_worker_threads};
use reducer::reduce;
use repo_monitor::RepoMonitorManager;

/// Single-writer owner of [`AppState`]. Messages are reduced one at a time on a
/// dedicated thread; collaborator calls run on a worker pool and come back as
/// messages.
pub struct AppStore {
    state: Arc<RwLock<AppState>>,
    msg_tx: mpsc::Sender<Msg>,
}

impl Clone for AppStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            msg_tx: self.msg_tx.clone(),
        }
    }
}

/// Repository lifecycle transitions the owner thread reacts to outside the reducer.
enum Lifecycle {
    Opened(RepoId, PathBuf),
    Closed(RepoId),
}

impl Lifecycle {
    fn of(msg: &Msg) -> Option<Self> {
        match msg {
            Msg::RepoOpenedOk { repo_id, spec, .. } => {
                Some(Lifecycle::Opened(*repo_id, spec.workdir.clone()))
            }
            Msg::CloseRepo { repo_id } => Some(Lifecycle::Closed(*repo_id)),
            _ => None,
        }
    }
}

impl AppStore {
    pub fn new(backend: Arc<dyn GitBackend>) -> (Self, mpsc::Receiver<StoreEvent>) {
        Self::with_settings(backend, settings::load())
    }

    pub fn with_settings(
        backend: Arc<dyn GitBackend>,
        settings: Settings,
    ) -> (Self, mpsc::Receiver<StoreEvent>) {
        let worker_threads = settings
            .worker_threads
            .unwrap_or_else(default_worker_threads);
        let watch_repositories = settings.watch_repositories;
        let state = Arc::new(RwLock::new(AppState {
            settings,
            ..AppState::default()
        }));
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let (event_tx, event_rx) = mpsc::channel::<StoreEvent>();

        let thread_state = Arc::clone(&state);
        let thread_msg_tx = msg_tx.clone();

        thread::spawn(move || {
            let executor = TaskExecutor::new(worker_threads);
            let mut repos: RepoMap = RepoMap::new();
            let mut monitors = RepoMonitorManager::new();
            let id_alloc = AtomicU64::new(1);

            while let Ok(msg) = msg_rx.recv() {
                log::trace!("reduce {msg:?}");
                let lifecycle = Lifecycle::of(&msg);
                let effects = {
                    let mut app_state = thread_state.write().expect("state lock poisoned (write)");

                    reduce(&mut repos, &id_alloc, &mut app_state, msg)
                };

                let _ = event_tx.send(StoreEvent::StateChanged);

                match lifecycle {
                    Some(Lifecycle::Opened(repo_id, workdir))
                        if watch_repositories && repos.contains_key(&repo_id) =>
                    {
                        monitors.start(repo_id, workdir, thread_msg_tx.clone());
                    }
                    Some(Lifecycle::Closed(repo_id)) => monitors.stop(repo_id),
                    _ => {}
                }

                for effect in effects {
                    log::trace!("schedule {effect:?}");
                    schedule_effect(&executor, &backend, &repos, thread_msg_tx.clone(), effect);
                }
            }
        });

        (Self { state, msg_tx }, event_rx)
    }

    pub fn dispatch(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .expect("state lock poisoned (read)")
            .clone()
    }
}
