use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::session::{Session, SessionStore};

/// Session file name in the session directory
const SESSION_FILE: &str = "session.json";

/// Session store persisted as JSON on disk.
///
/// The in-memory copy is authoritative for the running process. Disk errors
/// are logged and otherwise ignored, so a failed write only costs durability
/// across restarts.
pub struct FileSessionStore {
    dir: PathBuf,
    data: RwLock<Session>,
}

impl FileSessionStore {
    /// Open the store in `dir`, loading any session saved by a previous run.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let data = match Self::load(&dir.join(SESSION_FILE)) {
            Ok(Some(session)) => {
                debug!(path = %dir.display(), "Loaded saved session");
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Ignoring unreadable session file");
                Session::default()
            }
        };

        Self {
            dir,
            data: RwLock::new(data),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn load(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
        let session =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("Failed to create session directory")?;
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(self.path(), contents).context("Failed to write session file")?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Session {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, update: &Session) {
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = guard.clone();
        next.merge(update);

        if let Err(e) = self.save(&next) {
            warn!(error = %format!("{:#}", e), "Session not persisted");
        }
        *guard = next;
    }

    fn replace(&self, session: &Session) {
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = self.save(session) {
            warn!(error = %format!("{:#}", e), "Session not persisted");
        }
        *guard = session.clone();
    }

    fn clear(&self) {
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = self.remove() {
            warn!(error = %format!("{:#}", e), "Session file not removed");
        }
        *guard = Session::default();
    }
}
