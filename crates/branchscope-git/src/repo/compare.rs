use super::GitCliRepo;
use crate::util::{
    command_failed, git_command, parse_left_right_counts, parse_merge_tree_conflicts,
    run_git_capture, run_git_output, run_git_probe,
};
use branchscope_core::domain::{AheadBehind, CommitId, Divergence, MergeAnalysis, RangeSpec};
use branchscope_core::error::Error;
use branchscope_core::services::Result;

impl GitCliRepo {
    /// `false` when the two histories share no common ancestor.
    fn has_merge_base(&self, base: &CommitId, target: &CommitId) -> Result<bool> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("merge-base").arg(&base.0).arg(&target.0);
        let label = "git merge-base";
        let output = run_git_output(cmd, label)?;
        match output.status.code() {
            Some(0) => Ok(true),
            // merge-base exits 1 without output when there is no common ancestor.
            Some(1) if output.stderr.is_empty() => Ok(false),
            _ => Err(command_failed(label, &output)),
        }
    }

    fn resolves_to_commit(&self, rev: &CommitId) -> Result<bool> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("{}^{{commit}}", rev.0));
        run_git_probe(cmd, "git rev-parse --verify")
    }

    pub(super) fn ahead_behind_impl(
        &self,
        base: &CommitId,
        target: &CommitId,
    ) -> Result<Divergence> {
        if base == target {
            return Ok(Divergence::Counts(AheadBehind::default()));
        }
        if !self.has_merge_base(base, target)? {
            return Ok(Divergence::Unrelated);
        }

        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("rev-list")
            .arg("--left-right")
            .arg("--count")
            .arg(format!("{}...{}", base.0, target.0));
        let stdout = run_git_capture(cmd, "git rev-list --left-right --count")?;
        let (ahead, behind) = parse_left_right_counts(&stdout).ok_or_else(|| {
            Error::backend(format!(
                "unexpected rev-list --count output: {:?}",
                stdout.trim()
            ))
        })?;
        Ok(Divergence::Counts(AheadBehind { ahead, behind }))
    }

    pub(super) fn merge_analysis_impl(
        &self,
        base: &CommitId,
        target: &CommitId,
    ) -> Result<MergeAnalysis> {
        if !self.resolves_to_commit(base)? || !self.resolves_to_commit(target)? {
            return Ok(MergeAnalysis::Unresolved);
        }
        if !self.has_merge_base(base, target)? {
            return Ok(MergeAnalysis::Unresolved);
        }

        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("merge-tree")
            .arg("--write-tree")
            .arg("--name-only")
            .arg("--no-messages")
            .arg(&base.0)
            .arg(&target.0);
        let label = "git merge-tree --write-tree";
        let output = run_git_output(cmd, label)?;
        match output.status.code() {
            Some(0) => Ok(MergeAnalysis::Clean),
            Some(1) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(MergeAnalysis::Conflicts {
                    files: parse_merge_tree_conflicts(&stdout).len(),
                })
            }
            _ => Err(command_failed(label, &output)),
        }
    }

    pub(super) fn list_commits_impl(
        &self,
        tip: &CommitId,
        range: &RangeSpec,
        limit: usize,
    ) -> Result<Vec<CommitId>> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("rev-list")
            .arg(format!("--max-count={limit}"))
            .arg(&tip.0);
        if let RangeSpec::Excluding(excluded) = range {
            cmd.arg(format!("^{}", excluded.0));
        }
        cmd.arg("--");
        let stdout = run_git_capture(cmd, "git rev-list")?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| CommitId(line.to_string()))
            .collect())
    }
}
