use super::GitCliRepo;
use crate::util::{git_command, parse_recent_checkouts, run_git_capture, run_git_probe};
use branchscope_core::domain::{Branch, BranchKind, CommitId, HeadRef, Upstream};
use branchscope_core::error::Error;
use branchscope_core::services::Result;

const REFLOG_SCAN_LIMIT: usize = 2500;

impl GitCliRepo {
    pub(super) fn head_impl(&self) -> Result<HeadRef> {
        let repo = self.repo.to_thread_local();
        let target = repo
            .head_id()
            .map_err(|e| Error::backend(format!("gix head_id: {e}")))?
            .detach();
        let branch = repo
            .head_name()
            .map_err(|e| Error::backend(format!("gix head_name: {e}")))?
            .map(|name| name.shorten().to_string());

        Ok(HeadRef {
            branch,
            target: CommitId(target.to_string()),
        })
    }

    pub(super) fn list_branches_impl(&self) -> Result<Vec<Branch>> {
        fn parse_upstream_short(s: &str) -> Option<Upstream> {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            let (remote, branch) = s.split_once('/')?;
            Some(Upstream {
                remote: remote.to_string(),
                branch: branch.to_string(),
            })
        }

        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("for-each-ref")
            .arg("--format=%(refname)\t%(objectname)\t%(upstream:short)")
            .arg("refs/heads")
            .arg("refs/remotes");
        let stdout = run_git_capture(cmd, "git for-each-ref refs/heads refs/remotes")?;

        let mut branches = Vec::new();
        for line in stdout.lines() {
            let mut parts = line.split('\t');
            let Some(refname) = parts.next().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let Some(sha) = parts.next().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let upstream = parse_upstream_short(parts.next().unwrap_or(""));

            let (kind, name) = if let Some(name) = refname.strip_prefix("refs/heads/") {
                (BranchKind::Local, name)
            } else if let Some(name) = refname.strip_prefix("refs/remotes/") {
                // `origin/HEAD` is a symbolic pointer, not a branch.
                if name.ends_with("/HEAD") {
                    continue;
                }
                (BranchKind::Remote, name)
            } else {
                continue;
            };

            branches.push(Branch {
                name: name.to_string(),
                kind,
                target: CommitId(sha.to_string()),
                upstream: if kind == BranchKind::Local {
                    upstream
                } else {
                    None
                },
            });
        }

        branches.sort_by(|a, b| {
            let kind_rank = |k: BranchKind| match k {
                BranchKind::Local => 0,
                BranchKind::Remote => 1,
            };
            kind_rank(a.kind)
                .cmp(&kind_rank(b.kind))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(branches)
    }

    pub(super) fn list_recent_branches_impl(&self, limit: usize) -> Result<Vec<Branch>> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("reflog")
            .arg("show")
            .arg("--format=%gs")
            .arg(format!("-n{REFLOG_SCAN_LIMIT}"))
            .arg("HEAD")
            .arg("--");
        let subjects = run_git_capture(cmd, "git reflog show HEAD")?;

        let branches = self.list_branches_impl()?;
        let recent = parse_recent_checkouts(&subjects)
            .into_iter()
            .filter_map(|name| {
                branches
                    .iter()
                    .find(|b| b.kind == BranchKind::Local && b.name == name)
                    .cloned()
            })
            .take(limit)
            .collect();
        Ok(recent)
    }

    pub(super) fn default_branch_impl(&self) -> Result<Option<String>> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("symbolic-ref")
            .arg("--quiet")
            .arg("--short")
            .arg("refs/remotes/origin/HEAD");
        if let Ok(remote_head) = run_git_capture(cmd, "git symbolic-ref refs/remotes/origin/HEAD") {
            let remote_head = remote_head.trim();
            if let Some(name) = remote_head.strip_prefix("origin/")
                && self.local_branch_exists(name)?
            {
                return Ok(Some(name.to_string()));
            }
            if !remote_head.is_empty() {
                return Ok(Some(remote_head.to_string()));
            }
        }

        for candidate in ["main", "master"] {
            if self.local_branch_exists(candidate)? {
                return Ok(Some(candidate.to_string()));
            }
        }
        Ok(None)
    }

    fn local_branch_exists(&self, name: &str) -> Result<bool> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("show-ref")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("refs/heads/{name}"));
        run_git_probe(cmd, "git show-ref --verify")
    }
}
