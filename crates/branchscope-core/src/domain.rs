use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RepoSpec {
    pub workdir: PathBuf,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CommitId(pub String);

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BranchKind {
    Local,
    Remote,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Branch {
    pub name: String,
    pub kind: BranchKind,
    pub target: CommitId,
    pub upstream: Option<Upstream>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Upstream {
    pub remote: String,
    pub branch: String,
}

/// Where HEAD points: the checked-out branch (absent when detached) and its tip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeadRef {
    pub branch: Option<String>,
    pub target: CommitId,
}

/// Commit-count divergence of one ref relative to another.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct AheadBehind {
    pub ahead: usize,
    pub behind: usize,
}

impl AheadBehind {
    pub fn new(ahead: usize, behind: usize) -> Self {
        Self { ahead, behind }
    }

    /// The same divergence seen from the other side.
    pub fn swapped(self) -> Self {
        Self {
            ahead: self.behind,
            behind: self.ahead,
        }
    }

    pub fn is_zero(self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Result of an ahead/behind lookup. Unrelated histories are kept distinct from
/// a zero divergence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Divergence {
    Counts(AheadBehind),
    Unrelated,
}

impl Divergence {
    pub fn swapped(self) -> Self {
        match self {
            Divergence::Counts(ab) => Divergence::Counts(ab.swapped()),
            Divergence::Unrelated => Divergence::Unrelated,
        }
    }

    pub fn counts(self) -> Option<AheadBehind> {
        match self {
            Divergence::Counts(ab) => Some(ab),
            Divergence::Unrelated => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MergeAnalysis {
    Clean,
    Conflicts { files: usize },
    /// One of the refs did not resolve, or the histories share no merge base.
    Unresolved,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CompareMode {
    Ahead,
    Behind,
}

impl CompareMode {
    /// `Ahead` whenever the current branch has commits the other lacks.
    pub fn for_divergence(divergence: Divergence) -> Self {
        match divergence {
            Divergence::Counts(ab) if ab.ahead > 0 => CompareMode::Ahead,
            _ => CompareMode::Behind,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CompareFormState {
    #[default]
    History,
    Compare {
        mode: CompareMode,
        branch: Branch,
        /// Tip of the current branch the comparison was computed against.
        base: CommitId,
        /// Absent when the two histories are unrelated.
        ahead_behind: Option<AheadBehind>,
    },
}

impl CompareFormState {
    pub fn comparison_branch(&self) -> Option<&Branch> {
        match self {
            CompareFormState::History => None,
            CompareFormState::Compare { branch, .. } => Some(branch),
        }
    }

    pub fn is_history(&self) -> bool {
        matches!(self, CompareFormState::History)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeResultStatus {
    Loading,
    Conflicts { conflicted_file_count: usize },
    Clean,
    Invalid,
}

impl MergeResultStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, MergeResultStatus::Loading)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InferredComparisonBranch {
    pub branch: Option<Branch>,
    pub ahead_behind: Option<AheadBehind>,
}

impl InferredComparisonBranch {
    pub fn absent() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConflictState {
    pub branch: String,
}

/// Which commits to list starting from a tip.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum RangeSpec {
    All,
    Excluding(CommitId),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileStatus {
    pub path: PathBuf,
    pub kind: FileStatusKind,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RepoStatus {
    pub staged: Vec<FileStatus>,
    pub unstaged: Vec<FileStatus>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileStatusKind {
    Untracked,
    Modified,
    Added,
    Deleted,
    Renamed,
    Conflicted,
}
