// Workspace - request-scoped download directory
//
// Every download gets its own directory. It is removed when the Workspace is
// dropped, which for a successful download happens once the response body
// has been streamed (or abandoned by the client). Creation and removal run on
// the blocking pool since the directory may hold a multi-GB file.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::errors::DownloadError;

const PREFIX: &str = "ytdlp-api-";

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    /// Taken on drop
    temp_dir: Option<TempDir>,
}

impl Workspace {
    /// Create a fresh directory under `parent`, or the system temp dir.
    pub async fn create(parent: Option<PathBuf>) -> Result<Self, DownloadError> {
        tokio::task::spawn_blocking(move || Self::create_blocking(parent.as_deref()))
            .await
            .map_err(|e| DownloadError::Workspace(std::io::Error::other(e)))?
    }

    fn create_blocking(parent: Option<&Path>) -> Result<Self, DownloadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);

        let temp_dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(DownloadError::Workspace)?;

        Ok(Self {
            path: temp_dir.path().to_path_buf(),
            temp_dir: Some(temp_dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` names a regular file inside this workspace.
    ///
    /// Both sides are canonicalized so symlinked temp roots (macOS `/var`)
    /// compare correctly.
    pub async fn contains_file(&self, candidate: &Path) -> bool {
        let (root, file) = match (
            tokio::fs::canonicalize(self.path()).await,
            tokio::fs::canonicalize(candidate).await,
        ) {
            (Ok(root), Ok(file)) => (root, file),
            _ => return false,
        };

        if !file.starts_with(&root) {
            return false;
        }

        tokio::fs::metadata(&file)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Resolve a possibly relative path reported by the extractor.
    pub fn resolve(&self, reported: &Path) -> PathBuf {
        if reported.is_absolute() {
            reported.to_path_buf()
        } else {
            self.path().join(reported)
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(temp_dir) = self.temp_dir.take() else {
            return;
        };

        let remove = move || {
            let path = temp_dir.path().to_path_buf();
            if let Err(e) = temp_dir.close() {
                tracing::warn!(dir = %path.display(), error = %e, "Failed to remove download directory");
            }
        };

        // Outside a runtime (plain tests, shutdown) there is no pool to defer to
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(remove);
            }
            Err(_) => remove(),
        }
    }
}

/// Poll until `dir` is gone; removal happens on the blocking pool.
#[cfg(test)]
pub(crate) async fn wait_removed(dir: &Path) -> bool {
    for _ in 0..200 {
        if !dir.exists() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directory_removed_on_drop() {
        let ws = Workspace::create(None).await.unwrap();
        let dir = ws.path().to_path_buf();
        assert!(dir.is_dir());
        drop(ws);
        assert!(wait_removed(&dir).await);
    }

    #[test]
    fn removed_inline_outside_runtime() {
        let ws = Workspace::create_blocking(None).unwrap();
        let dir = ws.path().to_path_buf();
        std::fs::write(dir.join("clip.mp4"), b"data").unwrap();
        drop(ws);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn created_under_parent() {
        let parent = tempfile::tempdir().unwrap();
        let ws = Workspace::create(Some(parent.path().to_path_buf())).await.unwrap();
        assert!(ws.path().starts_with(parent.path()));
        assert!(ws.path().is_dir());
    }

    #[tokio::test]
    async fn missing_parent_is_workspace_error() {
        let err = Workspace::create(Some(PathBuf::from("/nonexistent/ytdlp-api-parent")))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Workspace(_)));
    }

    #[tokio::test]
    async fn two_workspaces_never_share_a_directory() {
        let a = Workspace::create(None).await.unwrap();
        let b = Workspace::create(None).await.unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[tokio::test]
    async fn contains_file_checks_location_and_kind() {
        let ws = Workspace::create(None).await.unwrap();
        let inside = ws.path().join("clip.mp4");
        std::fs::write(&inside, b"data").unwrap();

        assert!(ws.contains_file(&inside).await);
        assert!(!ws.contains_file(ws.path()).await);
        assert!(!ws.contains_file(&ws.path().join("missing.mp4")).await);

        let other = Workspace::create(None).await.unwrap();
        let outside = other.path().join("clip.mp4");
        std::fs::write(&outside, b"data").unwrap();
        assert!(!ws.contains_file(&outside).await);
    }

    #[tokio::test]
    async fn relative_paths_resolve_into_workspace() {
        let ws = Workspace::create(None).await.unwrap();
        assert_eq!(ws.resolve(Path::new("a.mp4")), ws.path().join("a.mp4"));
        assert_eq!(ws.resolve(Path::new("/x/a.mp4")), PathBuf::from("/x/a.mp4"));
    }
}
