//! File operation handlers
//!
//! Every path a step names is resolved under the workspace root. The
//! handlers propagate operating-system errors unchanged apart from adding
//! the action and path that failed.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::common::{Error, Result};

use super::registry::Action;

/// Root directory that step paths are resolved under
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of `file_name` inside `directory`
    pub fn target(&self, directory: &str, file_name: &str) -> PathBuf {
        self.root.join(directory).join(file_name)
    }

    /// Run the handler bound to a resolved step
    pub async fn execute(&self, action: &Action) -> Result<()> {
        match action {
            Action::CreateFile {
                directory,
                file_name,
                content,
            } => self.create(directory, file_name, content).await,
            Action::DeleteFile {
                directory,
                file_name,
            } => self.delete(directory, file_name).await,
            Action::VerifyAbsent {
                directory,
                file_name,
            } => self.verify_absence(directory, file_name).await,
        }
    }

    /// Create `directory` (and any parents) then write `content` to the file,
    /// replacing whatever it held before
    pub async fn create(&self, directory: &str, file_name: &str, content: &str) -> Result<()> {
        let dir = self.root.join(directory);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::file_operation("create directory", &dir, e))?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| Error::file_operation("write", &path, e))?;

        tracing::info!(path = %path.display(), bytes = content.len(), "File created");
        Ok(())
    }

    /// Remove the file; a missing file is an error
    pub async fn delete(&self, directory: &str, file_name: &str) -> Result<()> {
        let path = self.target(directory, file_name);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| Error::file_operation("remove", &path, e))?;

        tracing::info!(path = %path.display(), "File deleted");
        Ok(())
    }

    /// Succeed only when the file does not exist
    ///
    /// A metadata failure other than "not found" is reported as an I/O
    /// error rather than being read as presence.
    pub async fn verify_absence(&self, directory: &str, file_name: &str) -> Result<()> {
        let path = self.target(directory, file_name);
        match tokio::fs::symlink_metadata(&path).await {
            Ok(_) => Err(Error::FilePresent { path }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "File absent as expected");
                Ok(())
            }
            Err(e) => Err(Error::file_operation("check", &path, e)),
        }
    }
}
