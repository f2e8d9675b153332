// Token storage.
// Persists the personal access token as a single file under the platform
// config directory. Its existence defines "authenticated".

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::Result;

/// Stores a single bearer token on disk.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store backed by the platform config directory
    /// (~/.config/repodeck/token on Linux).
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("", "", "repodeck")
            .map(|dirs| Self::new(dirs.config_dir().join("token")))
    }

    /// Store backed by an explicit path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the stored token, if any. An empty file counts as no token.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let token = contents.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    /// Persist a token, replacing any previous one. Written atomically via
    /// a temp file.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(token.trim().as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Delete the stored token. No-op when none is stored.
    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Pure existence check: true iff a non-empty token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.load().ok().flatten().is_some()
    }
}
