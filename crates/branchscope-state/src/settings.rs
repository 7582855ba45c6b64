use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const DEFAULT_RECENT_BRANCHES_LIMIT: usize = 5;
pub const DEFAULT_COMMIT_LIST_LIMIT: usize = 200;
const MAX_WORKER_THREADS: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Replaces the repository's detected default branch during inference.
    pub default_branch: Option<String>,
    pub recent_branches_limit: usize,
    pub commit_list_limit: usize,
    /// `None` sizes the pool from the available parallelism.
    pub worker_threads: Option<usize>,
    pub watch_repositories: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_branch: None,
            recent_branches_limit: DEFAULT_RECENT_BRANCHES_LIMIT,
            commit_list_limit: DEFAULT_COMMIT_LIST_LIMIT,
            worker_threads: None,
            watch_repositories: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct SettingsFileV1 {
    version: u32,
    default_branch: Option<String>,
    recent_branches_limit: Option<usize>,
    commit_list_limit: Option<usize>,
    worker_threads: Option<usize>,
    watch_repositories: Option<bool>,
}

const SETTINGS_FILE_VERSION_V1: u32 = 1;

pub fn load() -> Settings {
    let Some(path) = default_settings_file_path() else {
        return Settings::default();
    };

    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Settings {
    let Some(file) = load_file_v1(path) else {
        return Settings::default();
    };

    let defaults = Settings::default();
    Settings {
        default_branch: file
            .default_branch
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        recent_branches_limit: file
            .recent_branches_limit
            .unwrap_or(defaults.recent_branches_limit),
        commit_list_limit: file
            .commit_list_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.commit_list_limit),
        worker_threads: file
            .worker_threads
            .map(|n| n.clamp(1, MAX_WORKER_THREADS)),
        watch_repositories: file
            .watch_repositories
            .unwrap_or(defaults.watch_repositories),
    }
}

fn load_file_v1(path: &Path) -> Option<SettingsFileV1> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("cannot read settings {}: {e}", path.display());
            }
            return None;
        }
    };
    let value = match serde_json::from_str::<serde_json::Value>(&contents) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring malformed settings {}: {e}", path.display());
            return None;
        }
    };
    let version = value
        .get("version")
        .and_then(|v| v.as_u64())
        .unwrap_or(SETTINGS_FILE_VERSION_V1 as u64) as u32;
    match version {
        SETTINGS_FILE_VERSION_V1 => serde_json::from_value::<SettingsFileV1>(value).ok(),
        other => {
            log::warn!("unsupported settings version {other} in {}", path.display());
            None
        }
    }
}

fn default_settings_file_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("BRANCHSCOPE_SETTINGS") {
        return Some(PathBuf::from(path));
    }
    // Keep unit tests away from the user's real configuration.
    if cfg!(test) {
        return None;
    }

    Some(app_config_dir()?.join("settings.json"))
}

fn app_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(config_home).join("branchscope"));
        }
        let home = env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/branchscope"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = env::var_os("HOME")?;
        return Some(PathBuf::from(home).join("Library/Application Support/branchscope"));
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = env::var_os("APPDATA")?;
        return Some(PathBuf::from(appdata).join("branchscope"));
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".branchscope"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, contents).expect("write settings");
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            load_from_path(&dir.path().join("nope.json")),
            Settings::default()
        );
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let (_dir, path) = write_settings(r#"{"version":1,"default_branch":" develop ","worker_threads":0}"#);
        let settings = load_from_path(&path);

        assert_eq!(settings.default_branch.as_deref(), Some("develop"));
        assert_eq!(settings.worker_threads, Some(1));
        assert_eq!(settings.recent_branches_limit, DEFAULT_RECENT_BRANCHES_LIMIT);
        assert_eq!(settings.commit_list_limit, DEFAULT_COMMIT_LIST_LIMIT);
        assert!(settings.watch_repositories);
    }

    #[test]
    fn unversioned_files_are_read_as_v1() {
        let (_dir, path) = write_settings(r#"{"commit_list_limit":50,"watch_repositories":false}"#);
        let settings = load_from_path(&path);

        assert_eq!(settings.commit_list_limit, 50);
        assert!(!settings.watch_repositories);
    }

    #[test]
    fn malformed_or_future_files_fall_back_to_defaults() {
        let (_dir, path) = write_settings("{ not json");
        assert_eq!(load_from_path(&path), Settings::default());

        let (_dir, path) = write_settings(r#"{"version":7,"commit_list_limit":3}"#);
        assert_eq!(load_from_path(&path), Settings::default());
    }
}
