use super::message::Msg;

impl std::fmt::Debug for Msg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Msg::OpenRepo(path) => f.debug_tuple("OpenRepo").field(path).finish(),
            Msg::CloseRepo { repo_id } => f
                .debug_struct("CloseRepo")
                .field("repo_id", repo_id)
                .finish(),
            Msg::SetActiveRepo { repo_id } => f
                .debug_struct("SetActiveRepo")
                .field("repo_id", repo_id)
                .finish(),
            Msg::ReloadRepo { repo_id } => f
                .debug_struct("ReloadRepo")
                .field("repo_id", repo_id)
                .finish(),
            Msg::RepoExternallyChanged { repo_id, change } => f
                .debug_struct("RepoExternallyChanged")
                .field("repo_id", repo_id)
                .field("change", change)
                .finish(),
            Msg::SelectCommit { repo_id, commit_id } => f
                .debug_struct("SelectCommit")
                .field("repo_id", repo_id)
                .field("commit_id", commit_id)
                .finish(),
            Msg::ClearCommitSelection { repo_id } => f
                .debug_struct("ClearCommitSelection")
                .field("repo_id", repo_id)
                .finish(),
            Msg::ViewHistory { repo_id } => f
                .debug_struct("ViewHistory")
                .field("repo_id", repo_id)
                .finish(),
            Msg::CompareToBranch { repo_id, branch } => f
                .debug_struct("CompareToBranch")
                .field("repo_id", repo_id)
                .field("branch", branch)
                .finish(),
            Msg::SwitchCompareMode { repo_id, mode } => f
                .debug_struct("SwitchCompareMode")
                .field("repo_id", repo_id)
                .field("mode", mode)
                .finish(),
            Msg::SetFilterText { repo_id, text } => f
                .debug_struct("SetFilterText")
                .field("repo_id", repo_id)
                .field("text", text)
                .finish(),
            Msg::SetBranchListVisibility { repo_id, visible } => f
                .debug_struct("SetBranchListVisibility")
                .field("repo_id", repo_id)
                .field("visible", visible)
                .finish(),
            Msg::RepoOpenedOk { repo_id, spec, .. } => f
                .debug_struct("RepoOpenedOk")
                .field("repo_id", repo_id)
                .field("spec", spec)
                .finish_non_exhaustive(),
            Msg::RepoOpenedErr {
                repo_id,
                spec,
                error,
            } => f
                .debug_struct("RepoOpenedErr")
                .field("repo_id", repo_id)
                .field("spec", spec)
                .field("error", error)
                .finish(),
            Msg::HeadLoaded { repo_id, result } => f
                .debug_struct("HeadLoaded")
                .field("repo_id", repo_id)
                .field("result", result)
                .finish(),
            Msg::BranchesLoaded { repo_id, result } => f
                .debug_struct("BranchesLoaded")
                .field("repo_id", repo_id)
                .field("result", &result.as_ref().map(Vec::len))
                .finish(),
            Msg::RecentBranchesLoaded { repo_id, result } => f
                .debug_struct("RecentBranchesLoaded")
                .field("repo_id", repo_id)
                .field("result", &result.as_ref().map(Vec::len))
                .finish(),
            Msg::DefaultBranchLoaded { repo_id, result } => f
                .debug_struct("DefaultBranchLoaded")
                .field("repo_id", repo_id)
                .field("result", result)
                .finish(),
            Msg::StatusLoaded { repo_id, result } => f
                .debug_struct("StatusLoaded")
                .field("repo_id", repo_id)
                .field("result", result)
                .finish(),
            Msg::ConflictStateLoaded { repo_id, result } => f
                .debug_struct("ConflictStateLoaded")
                .field("repo_id", repo_id)
                .field("result", result)
                .finish(),
            Msg::DivergenceComputed {
                repo_id,
                key,
                request,
                result,
            } => f
                .debug_struct("DivergenceComputed")
                .field("repo_id", repo_id)
                .field("key", key)
                .field("request", request)
                .field("result", result)
                .finish(),
            Msg::MergeStatusComputed {
                repo_id,
                generation,
                result,
            } => f
                .debug_struct("MergeStatusComputed")
                .field("repo_id", repo_id)
                .field("generation", generation)
                .field("result", result)
                .finish(),
            Msg::CommitsLoaded {
                repo_id,
                request,
                result,
            } => f
                .debug_struct("CommitsLoaded")
                .field("repo_id", repo_id)
                .field("request", request)
                .field("result", &result.as_ref().map(Vec::len))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepoId;
    use branchscope_core::domain::{Branch, BranchKind, CommitId};

    #[test]
    fn branch_lists_are_summarized_by_length() {
        let msg = Msg::BranchesLoaded {
            repo_id: RepoId(3),
            result: Ok(vec![Branch {
                name: "main".to_string(),
                kind: BranchKind::Local,
                target: CommitId("abc".to_string()),
                upstream: None,
            }]),
        };
        assert_eq!(
            format!("{msg:?}"),
            "BranchesLoaded { repo_id: RepoId(3), result: Ok(1) }"
        );
    }
}
