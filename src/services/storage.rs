//! Artifact storage.
//!
//! Merged SRT files are published through the [`ArtifactStore`] trait. The
//! local-directory store writes to a temp file and renames, so a partial
//! artifact is never visible under its public name. Remote blob and object
//! stores are deployment concerns wired in behind the same trait.

use crate::Result;
use crate::error::DualSubError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Content type of every published artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "text/srt; charset=utf-8";

/// Publishes a finished artifact and returns its public URL.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `content` under `file_name`; returns the URL clients fetch.
    async fn store(&self, file_name: &str, content: &str) -> Result<String>;
}

/// Stores artifacts in a local directory served under a base URL.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
    base_url: String,
}

impl LocalDirStore {
    /// Create a store rooted at `root`, publishing under `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalDirStore {
    async fn store(&self, file_name: &str, content: &str) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DualSubError::storage(format!("create {}: {e}", self.root.display())))?;

        let final_path = self.root.join(file_name);
        let tmp_path = self.root.join(format!(".{file_name}.tmp"));

        tokio::fs::write(&tmp_path, content.as_bytes())
            .await
            .map_err(|e| DualSubError::storage(format!("write {}: {e}", tmp_path.display())))?;
        tokio::fs::rename(&tmp_path, &final_path)
            .await
            .map_err(|e| DualSubError::storage(format!("publish {}: {e}", final_path.display())))?;

        log::info!("stored artifact {}", final_path.display());
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_writes_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let store = LocalDirStore::new(dir.path(), "http://host.test/subs/");

        let url = store.store("tt1_en_de_v1.srt", "1\n00:00:01,000 --> 00:00:02,000\nHi\n")
            .await
            .unwrap();
        assert_eq!(url, "http://host.test/subs/tt1_en_de_v1.srt");

        let written = std::fs::read_to_string(dir.path().join("tt1_en_de_v1.srt")).unwrap();
        assert!(written.starts_with("1\n"));
        // No temp file left behind.
        assert!(!dir.path().join(".tt1_en_de_v1.srt.tmp").exists());
    }
}
