use super::GitCliRepo;
use crate::util::{git_command, parse_merge_msg_branch, run_git_capture, run_git_probe};
use branchscope_core::domain::{ConflictState, FileStatus, FileStatusKind, RepoStatus};
use branchscope_core::services::Result;
use std::fs;
use std::path::PathBuf;

impl GitCliRepo {
    pub(super) fn status_impl(&self) -> Result<RepoStatus> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("status")
            .arg("--porcelain=v1")
            .arg("-z")
            .arg("--untracked-files=all");
        let stdout = run_git_capture(cmd, "git status --porcelain")?;
        Ok(parse_porcelain_v1_z(&stdout))
    }

    pub(super) fn conflict_state_impl(&self) -> Result<Option<ConflictState>> {
        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg("MERGE_HEAD");
        if !run_git_probe(cmd, "git rev-parse --verify MERGE_HEAD")? {
            return Ok(None);
        }

        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("diff").arg("--name-only").arg("--diff-filter=U");
        let unmerged = run_git_capture(cmd, "git diff --name-only --diff-filter=U")?;
        if unmerged.trim().is_empty() {
            return Ok(None);
        }

        let mut cmd = git_command(&self.spec.workdir);
        cmd.arg("rev-parse").arg("--git-path").arg("MERGE_MSG");
        let merge_msg_path = PathBuf::from(run_git_capture(cmd, "git rev-parse --git-path")?.trim());
        let merge_msg_path = if merge_msg_path.is_absolute() {
            merge_msg_path
        } else {
            self.spec.workdir.join(merge_msg_path)
        };

        let branch = match fs::read_to_string(&merge_msg_path)
            .ok()
            .and_then(|msg| parse_merge_msg_branch(&msg))
        {
            Some(branch) => branch,
            None => {
                let mut cmd = git_command(&self.spec.workdir);
                cmd.arg("rev-parse").arg("--short").arg("MERGE_HEAD");
                run_git_capture(cmd, "git rev-parse --short MERGE_HEAD")?
                    .trim()
                    .to_string()
            }
        };

        Ok(Some(ConflictState { branch }))
    }
}

fn parse_porcelain_v1_z(output: &str) -> RepoStatus {
    let mut status = RepoStatus::default();
    let mut entries = output.split('\0');

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let mut codes = entry[..2].chars();
        let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
            continue;
        };
        let path = PathBuf::from(&entry[3..]);

        if matches!(x, 'R' | 'C') {
            // The original path follows as its own NUL-terminated field.
            let _ = entries.next();
        }

        if x == '?' && y == '?' {
            status.unstaged.push(FileStatus {
                path,
                kind: FileStatusKind::Untracked,
            });
            continue;
        }

        let unmerged = x == 'U' || y == 'U' || (x == 'A' && y == 'A') || (x == 'D' && y == 'D');
        if unmerged {
            status.unstaged.push(FileStatus {
                path,
                kind: FileStatusKind::Conflicted,
            });
            continue;
        }

        if let Some(kind) = map_status_code(x) {
            status.staged.push(FileStatus {
                path: path.clone(),
                kind,
            });
        }
        if let Some(kind) = map_status_code(y) {
            status.unstaged.push(FileStatus { path, kind });
        }
    }

    status
}

fn map_status_code(code: char) -> Option<FileStatusKind> {
    match code {
        'M' | 'T' => Some(FileStatusKind::Modified),
        'A' | 'C' => Some(FileStatusKind::Added),
        'D' => Some(FileStatusKind::Deleted),
        'R' => Some(FileStatusKind::Renamed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porcelain_z_splits_staged_unstaged_and_conflicts() {
        let out = "M  staged.rs\0 M dirty.rs\0R  new.rs\0old.rs\0?? scratch.txt\0UU both.rs\0";
        let status = parse_porcelain_v1_z(out);

        assert_eq!(
            status.staged,
            vec![
                FileStatus {
                    path: PathBuf::from("staged.rs"),
                    kind: FileStatusKind::Modified,
                },
                FileStatus {
                    path: PathBuf::from("new.rs"),
                    kind: FileStatusKind::Renamed,
                },
            ]
        );
        assert_eq!(
            status.unstaged,
            vec![
                FileStatus {
                    path: PathBuf::from("dirty.rs"),
                    kind: FileStatusKind::Modified,
                },
                FileStatus {
                    path: PathBuf::from("scratch.txt"),
                    kind: FileStatusKind::Untracked,
                },
                FileStatus {
                    path: PathBuf::from("both.rs"),
                    kind: FileStatusKind::Conflicted,
                },
            ]
        );
    }
}
