mod backend;
mod repo;
mod util;

pub use backend::GitCliBackend;

use branchscope_core::services::{GitBackend, GitRepository, Result};
use std::path::Path;
use std::sync::Arc;

pub fn default_backend() -> Arc<dyn GitBackend> {
    Arc::new(GitCliBackend)
}

pub fn open_repo(workdir: &Path) -> Result<Arc<dyn GitRepository>> {
    default_backend().open(workdir)
}
