use crate::api::User;
use crate::errors::{AgriBidError, AgriBidResult};
use crate::session::Session;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SESSION_FILE: &str = "session.json";

#[cfg(feature = "keyring-store")]
const KEYRING_SERVICE: &str = "agribid";
#[cfg(feature = "keyring-store")]
const KEYRING_TOKEN_ENTRY: &str = "session-token";

/// Where the bearer token lives. The profile always goes to the session file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBackend {
    File,
    #[cfg(feature = "keyring-store")]
    Keyring,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    user: User,
    #[serde(rename = "savedAt")]
    saved_at: DateTime<Utc>,
}

/// On-disk key-value storage for the signed-in session.
pub struct SessionStore {
    path: PathBuf,
    backend: TokenBackend,
}

impl SessionStore {
    /// File-only store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            backend: TokenBackend::File,
        }
    }

    /// Store under the agribid home, keeping the token in the OS keyring when
    /// that feature is compiled in.
    pub fn open_default() -> AgriBidResult<Self> {
        let dir = crate::utils::get_agribid_home()?;
        #[cfg(feature = "keyring-store")]
        {
            Ok(Self::with_keyring(dir))
        }
        #[cfg(not(feature = "keyring-store"))]
        {
            Ok(Self::new(dir))
        }
    }

    #[cfg(feature = "keyring-store")]
    pub fn with_keyring(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            backend: TokenBackend::Keyring,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backend(&self) -> TokenBackend {
        self.backend
    }

    /// Load the stored session, if any.
    ///
    /// A profile without a retrievable token counts as signed out.
    pub fn load(&self) -> AgriBidResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file {}", self.path.display()))?;

        let token = match stored.token.filter(|t| !t.is_empty()) {
            Some(t) => Some(t),
            None => self.read_backend_token(),
        };
        match token {
            Some(token) => {
                debug!("loaded session for user {}", stored.user.id);
                Ok(Some(Session::new(token, stored.user)))
            }
            None => {
                warn!("session profile found but no token is stored");
                Ok(None)
            }
        }
    }

    /// Like [`load`](Self::load) but a missing session is an error.
    pub fn require(&self) -> AgriBidResult<Session> {
        self.load()?.ok_or(AgriBidError::MissingCredentials)
    }

    pub fn save(&self, session: &Session) -> AgriBidResult<()> {
        if session.token.trim().is_empty() {
            return Err(AgriBidError::Config("session token must not be empty".into()));
        }
        let token_in_file = match self.backend {
            TokenBackend::File => Some(session.token.clone()),
            #[cfg(feature = "keyring-store")]
            TokenBackend::Keyring => match keyring_set(&session.token) {
                Ok(()) => None,
                Err(e) => {
                    warn!("keyring unavailable, storing token in session file: {e:#}");
                    Some(session.token.clone())
                }
            },
        };
        let stored = StoredSession {
            token: token_in_file,
            user: session.user.clone(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored).context("serialize session")?;
        crate::utils::atomic_write(&self.path, &content)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;
        crate::utils::restrict_permissions(&self.path);
        info!("saved session for user {}", session.user.id);
        Ok(())
    }

    /// Sign out: remove the profile and token. Returns whether anything was removed.
    pub fn clear(&self) -> AgriBidResult<bool> {
        let mut removed = false;
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
            removed = true;
        }
        #[cfg(feature = "keyring-store")]
        if self.backend == TokenBackend::Keyring && keyring_delete() {
            removed = true;
        }
        if removed {
            info!("session cleared");
        }
        Ok(removed)
    }

    fn read_backend_token(&self) -> Option<String> {
        match self.backend {
            TokenBackend::File => None,
            #[cfg(feature = "keyring-store")]
            TokenBackend::Keyring => keyring_get(),
        }
    }
}

#[cfg(feature = "keyring-store")]
fn keyring_set(token: &str) -> anyhow::Result<()> {
    let entry =
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY).context("keyring unavailable")?;
    entry
        .set_password(token)
        .context("failed to store token in keyring")?;
    Ok(())
}

#[cfg(feature = "keyring-store")]
fn keyring_get() -> Option<String> {
    let entry = match keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY) {
        Ok(e) => e,
        Err(e) => {
            debug!("keyring unavailable: {e}");
            return None;
        }
    };
    entry.get_password().ok().filter(|s| !s.is_empty())
}

#[cfg(feature = "keyring-store")]
fn keyring_delete() -> bool {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_ENTRY)
        .ok()
        .is_some_and(|e| e.delete_credential().is_ok())
}
