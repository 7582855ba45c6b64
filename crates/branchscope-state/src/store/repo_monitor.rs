use crate::model::RepoId;
use crate::msg::{Msg, RepoExternalChange};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::event::{AccessKind, AccessMode};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(250);
const MAX_DELAY: Duration = Duration::from_secs(2);
const IDLE_TICK: Duration = Duration::from_secs(30);

enum MonitorMsg {
    Event(notify::Result<notify::Event>),
    Stop,
}

/// Coalesces a burst of filesystem events into one change. Flushes once the
/// burst has been quiet for `debounce`, or `max_delay` after its first event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DebouncedChange {
    pending: Option<RepoExternalChange>,
    first_event_at: Option<Instant>,
    last_event_at: Option<Instant>,
    debounce: Duration,
    max_delay: Duration,
}

impl DebouncedChange {
    fn new(debounce: Duration, max_delay: Duration) -> Self {
        Self {
            pending: None,
            first_event_at: None,
            last_event_at: None,
            debounce,
            max_delay,
        }
    }

    fn push(&mut self, change: RepoExternalChange, now: Instant) -> Option<RepoExternalChange> {
        self.pending = Some(match self.pending {
            Some(pending) => merge_change(pending, change),
            None => change,
        });
        let first = *self.first_event_at.get_or_insert(now);
        self.last_event_at = Some(now);
        if now.duration_since(first) >= self.max_delay {
            self.take()
        } else {
            None
        }
    }

    fn deadline(&self) -> Option<Instant> {
        let (first, last) = (self.first_event_at?, self.last_event_at?);
        Some((last + self.debounce).min(first + self.max_delay))
    }

    fn next_timeout(&self, now: Instant) -> Option<Duration> {
        self.deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn take_if_due(&mut self, now: Instant) -> Option<RepoExternalChange> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.take(),
            _ => None,
        }
    }

    fn take(&mut self) -> Option<RepoExternalChange> {
        self.first_event_at = None;
        self.last_event_at = None;
        self.pending.take()
    }
}

fn merge_change(a: RepoExternalChange, b: RepoExternalChange) -> RepoExternalChange {
    use RepoExternalChange::*;
    match (a, b) {
        (Worktree, Worktree) => Worktree,
        (GitState, GitState) => GitState,
        _ => Both,
    }
}

/// One watcher thread per open repository.
pub(super) struct RepoMonitorManager {
    handles: FxHashMap<RepoId, RepoMonitorHandle>,
}

struct RepoMonitorHandle {
    msg_tx: mpsc::Sender<MonitorMsg>,
    join: thread::JoinHandle<()>,
}

impl RepoMonitorManager {
    pub(super) fn new() -> Self {
        Self {
            handles: FxHashMap::default(),
        }
    }

    pub(super) fn start(&mut self, repo_id: RepoId, workdir: PathBuf, msg_tx: mpsc::Sender<Msg>) {
        if self.handles.contains_key(&repo_id) {
            return;
        }
        let (monitor_tx, monitor_rx) = mpsc::channel::<MonitorMsg>();
        let notify_tx = monitor_tx.clone();
        let join = thread::spawn(move || {
            repo_monitor_thread(repo_id, workdir, msg_tx, monitor_rx, notify_tx)
        });
        self.handles.insert(
            repo_id,
            RepoMonitorHandle {
                msg_tx: monitor_tx,
                join,
            },
        );
    }

    pub(super) fn stop(&mut self, repo_id: RepoId) {
        let Some(handle) = self.handles.remove(&repo_id) else {
            return;
        };
        let _ = handle.msg_tx.send(MonitorMsg::Stop);
        let _ = handle.join.join();
    }

    pub(super) fn stop_all(&mut self) {
        let repo_ids: Vec<RepoId> = self.handles.keys().copied().collect();
        for repo_id in repo_ids {
            self.stop(repo_id);
        }
    }
}

impl Drop for RepoMonitorManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

fn repo_monitor_thread(
    repo_id: RepoId,
    workdir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
    monitor_rx: mpsc::Receiver<MonitorMsg>,
    notify_tx: mpsc::Sender<MonitorMsg>,
) {
    let workdir = workdir.canonicalize().unwrap_or(workdir);
    let git_dir = resolve_git_dir(&workdir);
    let mut paths = WatchedPaths::new(workdir, git_dir);

    let watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(MonitorMsg::Event(res));
    });
    let mut watcher: RecommendedWatcher = match watcher {
        Ok(watcher) => watcher,
        Err(e) => {
            log::warn!("repo {repo_id:?}: cannot create file watcher: {e}");
            return;
        }
    };
    if let Err(e) = watcher.watch(&paths.workdir, RecursiveMode::Recursive) {
        log::warn!(
            "repo {repo_id:?}: cannot watch {}: {e}",
            paths.workdir.display()
        );
        return;
    }
    if let Some(git_dir) = &paths.git_dir
        && !git_dir.starts_with(&paths.workdir)
    {
        let _ = watcher.watch(git_dir, RecursiveMode::Recursive);
    }
    log::debug!("repo {repo_id:?}: watching {}", paths.workdir.display());

    let mut debouncer = DebouncedChange::new(DEBOUNCE, MAX_DELAY);
    let flush = |change: Option<RepoExternalChange>| {
        if let Some(change) = change {
            let _ = msg_tx.send(Msg::RepoExternallyChanged { repo_id, change });
        }
    };

    loop {
        let timeout = debouncer
            .next_timeout(Instant::now())
            .unwrap_or(IDLE_TICK);
        match monitor_rx.recv_timeout(timeout) {
            Ok(MonitorMsg::Stop) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Ok(MonitorMsg::Event(Ok(event))) => {
                if let Some(change) = paths.classify(&event) {
                    flush(debouncer.push(change, Instant::now()));
                }
            }
            Ok(MonitorMsg::Event(Err(e))) => {
                log::debug!("repo {repo_id:?}: watcher error: {e}");
                flush(debouncer.push(RepoExternalChange::Both, Instant::now()));
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                flush(debouncer.take_if_due(Instant::now()));
            }
        }
    }
    log::debug!("repo {repo_id:?}: monitor stopped");
}

/// `.git` is either the git directory itself or a file pointing at it (worktrees,
/// submodules).
fn resolve_git_dir(workdir: &Path) -> Option<PathBuf> {
    let dot_git = workdir.join(".git");
    let metadata = fs::metadata(&dot_git).ok()?;
    if metadata.is_dir() {
        return Some(dot_git);
    }

    let contents = fs::read_to_string(&dot_git).ok()?;
    let gitdir = contents.lines().next()?.trim().strip_prefix("gitdir:")?.trim();
    if gitdir.is_empty() {
        return None;
    }
    let path = PathBuf::from(gitdir);
    Some(if path.is_absolute() {
        path
    } else {
        workdir.join(path)
    })
}

struct WatchedPaths {
    workdir: PathBuf,
    git_dir: Option<PathBuf>,
    ignored: IgnoreRules,
}

impl WatchedPaths {
    fn new(workdir: PathBuf, git_dir: Option<PathBuf>) -> Self {
        let ignored = IgnoreRules::load(&workdir, git_dir.as_deref());
        Self {
            workdir,
            git_dir,
            ignored,
        }
    }

    fn classify(&mut self, event: &notify::Event) -> Option<RepoExternalChange> {
        match &event.kind {
            notify::EventKind::Access(AccessKind::Close(AccessMode::Write)) => {}
            // Our own reads of the repository must not trigger refreshes.
            notify::EventKind::Access(_) => return None,
            _ => {}
        }
        if event.need_rescan() || event.paths.is_empty() {
            return Some(RepoExternalChange::Both);
        }

        let mut change: Option<RepoExternalChange> = None;
        for path in &event.paths {
            let Some(path_change) = self.classify_path(path) else {
                continue;
            };
            change = Some(match change {
                Some(prev) => merge_change(prev, path_change),
                None => path_change,
            });
        }
        change
    }

    fn classify_path(&mut self, path: &Path) -> Option<RepoExternalChange> {
        if self.is_ignore_config(path) {
            self.ignored = IgnoreRules::load(&self.workdir, self.git_dir.as_deref());
            return Some(RepoExternalChange::Worktree);
        }

        let git_dir = self
            .git_dir
            .clone()
            .unwrap_or_else(|| self.workdir.join(".git"));
        if let Ok(rel) = path.strip_prefix(&git_dir) {
            return classify_git_path(rel);
        }

        let rel = path.strip_prefix(&self.workdir).ok()?;
        if self.ignored.is_ignored(rel) {
            return None;
        }
        Some(RepoExternalChange::Worktree)
    }

    fn is_ignore_config(&self, path: &Path) -> bool {
        path == self.workdir.join(".gitignore")
            || self
                .git_dir
                .as_ref()
                .is_some_and(|git_dir| path == git_dir.join("info").join("exclude"))
    }
}

/// Lock files and object writes always accompany a ref or index update that is
/// reported on its own.
fn classify_git_path(rel: &Path) -> Option<RepoExternalChange> {
    if rel.extension().is_some_and(|ext| ext == "lock") || rel.starts_with("objects") {
        return None;
    }
    if rel == Path::new("index") {
        return Some(RepoExternalChange::Worktree);
    }
    Some(RepoExternalChange::GitState)
}

/// Root `.gitignore` and `info/exclude` patterns, enough to keep build output
/// from driving refreshes. Nested ignore files are not consulted.
struct IgnoreRules {
    ignored: GlobSet,
    reincluded: GlobSet,
}

impl IgnoreRules {
    fn load(workdir: &Path, git_dir: Option<&Path>) -> Self {
        let mut ignored = GlobSetBuilder::new();
        let mut reincluded = GlobSetBuilder::new();
        let sources = [
            Some(workdir.join(".gitignore")),
            git_dir.map(|dir| dir.join("info").join("exclude")),
        ];
        for source in sources.into_iter().flatten() {
            let Ok(contents) = fs::read_to_string(&source) else {
                continue;
            };
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (builder, pattern) = match line.strip_prefix('!') {
                    Some(pattern) => (&mut reincluded, pattern),
                    None => (&mut ignored, line.strip_prefix('\\').unwrap_or(line)),
                };
                for glob in pattern_globs(pattern) {
                    if let Ok(glob) = Glob::new(&glob) {
                        builder.add(glob);
                    }
                }
            }
        }

        Self {
            ignored: ignored.build().unwrap_or_else(|_| GlobSet::empty()),
            reincluded: reincluded.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }

    fn is_ignored(&self, rel: &Path) -> bool {
        self.ignored.is_match(rel) && !self.reincluded.is_match(rel)
    }
}

/// A pattern with a slash is anchored at the root; otherwise it matches at any
/// depth. Either way everything below a match is covered.
fn pattern_globs(pattern: &str) -> Vec<String> {
    let pattern = pattern.trim_start_matches("./");
    let anchored = pattern.trim_end_matches('/').contains('/');
    let pattern = pattern.trim_start_matches('/').trim_end_matches('/');
    if pattern.is_empty() {
        return Vec::new();
    }

    let base = if anchored {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    };
    vec![base.clone(), format!("{base}/**")]
}
