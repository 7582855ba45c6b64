use crate::repo::GitCliRepo;
use branchscope_core::error::{Error, ErrorKind};
use branchscope_core::services::{GitBackend, GitRepository, Result};
use std::path::Path;
use std::sync::Arc;

/// Opens repositories with gix and answers comparison queries through the `git` CLI.
pub struct GitCliBackend;

impl Default for GitCliBackend {
    fn default() -> Self {
        Self
    }
}

impl GitBackend for GitCliBackend {
    fn open(&self, workdir: &Path) -> Result<Arc<dyn GitRepository>> {
        let workdir = workdir
            .canonicalize()
            .map_err(|e| Error::new(ErrorKind::Io(e.kind())))?;

        let repo = gix::open(&workdir).map_err(|e| match e {
            gix::open::Error::NotARepository { .. } => Error::new(ErrorKind::NotARepository),
            gix::open::Error::Io(io) => Error::new(ErrorKind::Io(io.kind())),
            e => Error::new(ErrorKind::Backend(format!("gix open: {e}"))),
        })?;

        log::info!("opened repository at {}", workdir.display());
        Ok(Arc::new(GitCliRepo::new(workdir, repo.into_sync())))
    }
}
