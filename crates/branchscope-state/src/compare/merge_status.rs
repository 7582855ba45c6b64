use branchscope_core::domain::{CommitId, MergeAnalysis, MergeResultStatus};
use branchscope_core::services::{GitRepository, Result};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MergeGeneration(pub u64);

/// Hands out merge-analysis generations for one repository. Only a result
/// carrying the latest generation may be applied.
#[derive(Clone, Debug, Default)]
pub struct MergeStatusComputer {
    latest: u64,
}

impl MergeStatusComputer {
    pub fn issue(&mut self) -> MergeGeneration {
        self.latest += 1;
        MergeGeneration(self.latest)
    }

    /// Supersedes whatever is in flight without issuing a new request.
    pub fn cancel(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, generation: MergeGeneration) -> bool {
        generation.0 == self.latest
    }

    pub fn latest(&self) -> MergeGeneration {
        MergeGeneration(self.latest)
    }
}

/// Dry-run merge of `target` into `base`.
pub fn compute_merge_status(
    repo: &dyn GitRepository,
    base: &CommitId,
    target: &CommitId,
) -> Result<MergeResultStatus> {
    Ok(match repo.merge_analysis(base, target)? {
        MergeAnalysis::Clean => MergeResultStatus::Clean,
        MergeAnalysis::Conflicts { files } => MergeResultStatus::Conflicts {
            conflicted_file_count: files,
        },
        MergeAnalysis::Unresolved => MergeResultStatus::Invalid,
    })
}
