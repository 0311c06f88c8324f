use crate::config::SourceSettings;
use anyhow::{Context, Result};
use derive_builder::Builder;
use std::path::PathBuf;

mod discovery;
pub use discovery::*;

mod document_file;
pub use document_file::*;

mod sync;
pub use sync::*;

/// A documentation tree living in a subdirectory of a remote git repository
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct RemoteSource {
    pub url: String,
    pub branch: String,
    /// Subdirectory of the remote to materialise
    pub docs_dir: String,
    /// Where the local working copy lives
    pub local_dir: PathBuf,
    /// Only fetch the tip commit
    #[builder(default = "true")]
    pub shallow: bool,
}

impl RemoteSource {
    pub fn from_settings(settings: &SourceSettings) -> Result<RemoteSource> {
        RemoteSourceBuilder::default()
            .url(settings.repository.as_str())
            .branch(settings.branch.as_str())
            .docs_dir(settings.docs_dir.as_str())
            .local_dir(settings.local_dir.as_path())
            .build()
            .with_context(|| "Failed to build remote source")
    }

    /// The remote-tracking reference the branch is fetched into
    pub fn remote_ref(&self) -> String {
        format!("refs/remotes/origin/{}", self.branch)
    }

    pub fn local_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// The directory documents are discovered from
    pub fn docs_root(&self) -> PathBuf {
        self.local_dir.join(&self.docs_dir)
    }
}
