use crate::compare::{ComparisonCache, MergeStatusComputer};
use crate::settings::Settings;
use branchscope_core::domain::*;
use std::time::SystemTime;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub repos: Vec<RepoState>,
    pub active_repo: Option<RepoId>,
    /// Process-wide error log, oldest first.
    pub errors: Vec<ErrorEntry>,
    pub settings: Settings,
}

impl AppState {
    pub fn repo(&self, repo_id: RepoId) -> Option<&RepoState> {
        self.repos.iter().find(|r| r.id == repo_id)
    }

    pub fn active(&self) -> Option<&RepoState> {
        self.active_repo.and_then(|id| self.repo(id))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorEntry {
    pub time: SystemTime,
    pub repo_id: Option<RepoId>,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct RepoState {
    pub id: RepoId,
    pub spec: RepoSpec,

    pub open: Loadable<()>,
    pub head: Loadable<HeadRef>,
    pub branches: Loadable<Vec<Branch>>,
    pub recent_branches: Loadable<Vec<Branch>>,
    pub default_branch: Loadable<Option<String>>,
    pub status: Loadable<RepoStatus>,
    pub conflict: Option<ConflictState>,

    pub selected_commit: Option<CommitId>,
    pub compare: CompareState,
    pub comparison_cache: ComparisonCache,
    pub loads_in_flight: RepoLoadsInFlight,

    pub last_error: Option<String>,
    pub diagnostics: Vec<DiagnosticEntry>,
}

impl RepoState {
    pub fn new_opening(id: RepoId, spec: RepoSpec) -> Self {
        Self {
            id,
            spec,
            open: Loadable::Loading,
            head: Loadable::NotLoaded,
            branches: Loadable::NotLoaded,
            recent_branches: Loadable::NotLoaded,
            default_branch: Loadable::NotLoaded,
            status: Loadable::NotLoaded,
            conflict: None,
            selected_commit: None,
            compare: CompareState::default(),
            comparison_cache: ComparisonCache::default(),
            loads_in_flight: RepoLoadsInFlight::default(),
            last_error: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn head_ref(&self) -> Option<&HeadRef> {
        self.head.as_ready()
    }

    pub fn branch_named(&self, name: &str) -> Option<&Branch> {
        self.branches
            .as_ready()
            .and_then(|branches| branches.iter().find(|b| b.name == name))
    }

    /// Branches offered by the branch picker: everything except the checked out branch,
    /// narrowed by the filter text (case-insensitive substring).
    pub fn compare_candidates(&self) -> Vec<&Branch> {
        let current = self.head_ref().and_then(|h| h.branch.as_deref());
        let needle = self.compare.filter_text.trim().to_lowercase();
        self.branches
            .as_ready()
            .map(|branches| {
                branches
                    .iter()
                    .filter(|b| Some(b.name.as_str()) != current)
                    .filter(|b| needle.is_empty() || b.name.to_lowercase().contains(&needle))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// No load, divergence, merge analysis, or commit listing is outstanding.
    pub fn is_settled(&self) -> bool {
        !self.open.is_loading()
            && self.loads_in_flight.is_idle()
            && self.compare.pending.is_none()
            && !self.comparison_cache.has_in_flight()
            && !self
                .compare
                .merge_status
                .as_ref()
                .is_some_and(MergeResultStatus::is_loading)
            && !self.compare.commits.is_loading()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CompareState {
    pub form: CompareFormState,
    /// A selection whose divergence is still being computed. The form keeps showing the
    /// previous state until it resolves.
    pub pending: Option<PendingComparison>,
    pub filter_text: String,
    pub branch_list_visible: bool,
    /// `None` while viewing history. Stays `Loading` while a selection is pending.
    pub merge_status: Option<MergeResultStatus>,
    pub merge_computer: MergeStatusComputer,
    /// `None` until inference settles.
    pub inferred: Option<InferredComparisonBranch>,
    pub commits: Loadable<Vec<CommitId>>,
    pub commit_request: Option<CommitListRequest>,
}

impl CompareState {
    pub fn view(&self) -> CompareView {
        match &self.form {
            CompareFormState::History => CompareView::History,
            CompareFormState::Compare { mode, .. } => CompareView::Compare(*mode),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareView {
    History,
    Compare(CompareMode),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingComparison {
    pub branch: Branch,
    pub base: CommitId,
    /// Merge analysis for this selection, held back until the form flips. `None` once
    /// the analysis failed.
    pub merge_status: Option<MergeResultStatus>,
}

impl PendingComparison {
    pub fn new(branch: Branch, base: CommitId) -> Self {
        Self {
            branch,
            base,
            merge_status: Some(MergeResultStatus::Loading),
        }
    }
}

/// The commit list the view shows: `tip` walked back, minus `range`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CommitListRequest {
    pub tip: CommitId,
    pub range: RangeSpec,
    pub limit: usize,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RepoLoadsInFlight {
    in_flight: u32,
    pending: u32,
}

impl RepoLoadsInFlight {
    pub const HEAD: u32 = 1 << 0;
    pub const BRANCHES: u32 = 1 << 1;
    pub const RECENT_BRANCHES: u32 = 1 << 2;
    pub const DEFAULT_BRANCH: u32 = 1 << 3;
    pub const STATUS: u32 = 1 << 4;
    pub const CONFLICT_STATE: u32 = 1 << 5;

    /// Returns `true` when the caller should issue the load. A request for a load that is
    /// already running is coalesced into a single follow-up.
    pub fn request(&mut self, load: u32) -> bool {
        if self.in_flight & load != 0 {
            self.pending |= load;
            false
        } else {
            self.in_flight |= load;
            true
        }
    }

    /// Returns `true` when a follow-up was requested while the load ran; the load then
    /// stays in flight and the caller must issue it again.
    pub fn finish(&mut self, load: u32) -> bool {
        if self.pending & load != 0 {
            self.pending &= !load;
            true
        } else {
            self.in_flight &= !load;
            false
        }
    }

    pub fn is_in_flight(&self, load: u32) -> bool {
        self.in_flight & load != 0
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticEntry {
    pub time: SystemTime,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RepoId(pub u64);

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Loadable<T> {
    #[default]
    NotLoaded,
    Loading,
    Ready(T),
    Error(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_in_flight_coalesce_into_one_follow_up() {
        let mut loads = RepoLoadsInFlight::default();
        assert!(loads.request(RepoLoadsInFlight::BRANCHES));
        assert!(!loads.request(RepoLoadsInFlight::BRANCHES));
        assert!(!loads.request(RepoLoadsInFlight::BRANCHES));
        assert!(loads.request(RepoLoadsInFlight::HEAD));

        assert!(loads.finish(RepoLoadsInFlight::BRANCHES));
        assert!(loads.is_in_flight(RepoLoadsInFlight::BRANCHES));
        assert!(!loads.finish(RepoLoadsInFlight::BRANCHES));
        assert!(!loads.is_in_flight(RepoLoadsInFlight::BRANCHES));

        assert!(!loads.finish(RepoLoadsInFlight::HEAD));
        assert!(loads.is_idle());
    }
}
