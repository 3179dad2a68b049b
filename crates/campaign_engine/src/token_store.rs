use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use campaign_logging::{campaign_info, campaign_warn};
use serde::{Deserialize, Serialize};

use crate::{AtomicFileWriter, PersistError};

pub const TOKEN_FILENAME: &str = ".campaign_tool_session.ron";

/// Keeps the campaign token across restarts. Tokens are opaque; an empty or
/// unreadable entry loads as "no token".
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: Option<&str>) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSession {
    campaign_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILENAME)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                campaign_warn!("Failed to read session token from {:?}: {}", path, err);
                return None;
            }
        };

        let session: PersistedSession = match ron::from_str(&content) {
            Ok(session) => session,
            Err(err) => {
                campaign_warn!("Failed to parse session token from {:?}: {}", path, err);
                return None;
            }
        };

        let token = session
            .campaign_token
            .filter(|token| !token.trim().is_empty());
        if token.is_some() {
            campaign_info!("Loaded session token from {:?}", path);
        }
        token
    }

    fn save(&self, token: Option<&str>) -> Result<(), PersistError> {
        let session = PersistedSession {
            campaign_token: token.map(ToOwned::to_owned),
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&session, pretty)
            .map_err(|err| PersistError::Serialize(err.to_string()))?;
        AtomicFileWriter::new(self.dir.clone()).write(TOKEN_FILENAME, &content)?;
        Ok(())
    }
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .filter(|token| !token.trim().is_empty())
    }

    fn save(&self, token: Option<&str>) -> Result<(), PersistError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = token.map(ToOwned::to_owned);
        }
        Ok(())
    }
}
