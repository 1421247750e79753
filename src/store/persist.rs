//! Snapshot file I/O.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::models::Snapshot;

/// Result of reading the snapshot file at startup.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Snapshot),
    Missing,
    /// Unparsable content; the file has been moved aside.
    Corrupt,
}

/// The JSON file backing a store.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub async fn load(&self) -> Result<LoadOutcome, AppError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) => Ok(LoadOutcome::Loaded(snapshot)),
            Err(e) => {
                let aside = self.sibling(".corrupt");
                tracing::warn!(
                    "Data file {:?} is unreadable ({}), moving it to {:?}",
                    self.path,
                    e,
                    aside
                );
                tokio::fs::rename(&self.path, &aside).await?;
                Ok(LoadOutcome::Corrupt)
            }
        }
    }

    /// Replace the file with `snapshot`. Written to a temporary sibling first
    /// so a crash mid-write never leaves a truncated document behind.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.sibling(".tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Saved snapshot to {:?}", self.path);
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(&dir.path().join("none.json"));
        assert!(matches!(file.load().await.unwrap(), LoadOutcome::Missing));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(&dir.path().join("nested").join("data.json"));
        file.save(&Snapshot {
            blog_posts: Some(Vec::new()),
            ..Default::default()
        })
        .await
        .unwrap();

        assert!(!dir.path().join("nested").join("data.json.tmp").exists());
        match file.load().await.unwrap() {
            LoadOutcome::Loaded(snapshot) => assert_eq!(snapshot.blog_posts, Some(Vec::new())),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
