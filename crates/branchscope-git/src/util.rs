use branchscope_core::error::{Error, ErrorKind};
use branchscope_core::services::Result;
use std::path::Path;
use std::process::{Command, Output};
use std::str;

pub(crate) fn git_command(workdir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(workdir);
    cmd
}

/// Runs the command and returns its raw output; only a spawn failure is an error.
pub(crate) fn run_git_output(mut cmd: Command, label: &str) -> Result<Output> {
    log::debug!("running {label}");
    cmd.output()
        .map_err(|e| Error::new(ErrorKind::Io(e.kind())))
}

pub(crate) fn run_git_capture(cmd: Command, label: &str) -> Result<String> {
    let output = run_git_output(cmd, label)?;

    if !output.status.success() {
        return Err(command_failed(label, &output));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Runs a `--verify --quiet` style probe: success means the thing exists.
pub(crate) fn run_git_probe(cmd: Command, label: &str) -> Result<bool> {
    Ok(run_git_output(cmd, label)?.status.success())
}

pub(crate) fn command_failed(label: &str, output: &Output) -> Error {
    let stderr = str::from_utf8(&output.stderr).unwrap_or("<non-utf8 stderr>");
    let stderr = stderr.trim();
    Error::new(ErrorKind::Backend(if stderr.is_empty() {
        format!("{label} failed")
    } else {
        format!("{label} failed: {stderr}")
    }))
}

/// Parses `git rev-list --left-right --count` output (`<left>\t<right>`).
pub(crate) fn parse_left_right_counts(output: &str) -> Option<(usize, usize)> {
    let mut parts = output.split_whitespace();
    let left = parts.next()?.parse::<usize>().ok()?;
    let right = parts.next()?.parse::<usize>().ok()?;
    Some((left, right))
}

/// Extracts the conflicted paths from `git merge-tree --write-tree --name-only`
/// output: the first line is the tree id, conflicted paths follow until the first
/// blank line.
pub(crate) fn parse_merge_tree_conflicts(output: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for line in output.lines().skip(1) {
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if !paths.iter().any(|p| p == line) {
            paths.push(line.to_string());
        }
    }
    paths
}

/// Collects checked-out branch names from HEAD reflog subjects, most recent first.
/// Branches renamed away are dropped.
pub(crate) fn parse_recent_checkouts(reflog_subjects: &str) -> Vec<String> {
    let mut renamed_away: Vec<String> = Vec::new();
    let mut names: Vec<String> = Vec::new();

    for subject in reflog_subjects.lines() {
        let subject = subject.trim();
        if let Some(rest) = subject.strip_prefix("checkout: moving from ") {
            let Some((_, to)) = rest.rsplit_once(" to ") else {
                continue;
            };
            let to = to.trim().trim_start_matches("refs/heads/");
            if to.is_empty()
                || renamed_away.iter().any(|n| n == to)
                || names.iter().any(|n| n == to)
            {
                continue;
            }
            names.push(to.to_string());
        } else if let Some(rest) = subject.strip_prefix("Branch: renamed ") {
            if let Some((from, _)) = rest.split_once(" to ") {
                renamed_away.push(from.trim().trim_start_matches("refs/heads/").to_string());
            }
        }
    }

    names
}

/// Reads the merged branch name out of the first line of `MERGE_MSG`.
pub(crate) fn parse_merge_msg_branch(merge_msg: &str) -> Option<String> {
    let first = merge_msg.lines().next()?.trim();
    let rest = first
        .strip_prefix("Merge remote-tracking branch ")
        .or_else(|| first.strip_prefix("Merge branch "))?;
    let rest = rest.strip_prefix('\'')?;
    let (name, _) = rest.split_once('\'')?;
    (!name.is_empty()).then(|| name.to_string())
}
