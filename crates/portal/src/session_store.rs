use shared_types::{AppError, StoredSession};
use std::path::{Path, PathBuf};

/// Persists the signed-in identity as a JSON file between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored identity. A missing file means "not signed in"; an
    /// unreadable one is treated the same and logged.
    pub fn load(&self) -> Option<StoredSession> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AppError::internal(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(session).map_err(|e| AppError::internal(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| AppError::internal(e.to_string()))
    }

    /// Forget the stored identity. Clearing an empty store is fine.
    pub fn clear(&self) -> Result<(), AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(e.to_string())),
        }
    }
}
