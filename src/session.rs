//! Sign-in, demo sessions and the persisted session blob.
//!
//! A session is either the built-in demo (served from the in-memory store)
//! or a token issued by the hosted auth backend. The demo flag survives
//! restarts as a JSON token pair stored under [`DEMO_SESSION_KEY`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEMO_EMAIL: &str = "demo@hospital.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_ACCESS_TOKEN: &str = "demo-token-123";
pub const DEMO_REFRESH_TOKEN: &str = "demo-refresh-123";
pub const DEMO_USER_ID: &str = "demo-user-123";
/// Storage key of the persisted demo session.
pub const DEMO_SESSION_KEY: &str = "demo-session";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Demo account cannot be registered")]
    DemoRegistration,
    #[error("Authentication backend is not configured")]
    BackendUnavailable,
    #[error("Authentication backend error: {0}")]
    Backend(String),
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Session blob is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Session types
// ═══════════════════════════════════════════════════════════

/// Who the current caller is, as far as data access is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Demo,
    Authenticated { token: String },
}

impl Session {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }

    /// Bearer token to send with backend requests.
    pub fn bearer_token(&self) -> &str {
        match self {
            Self::Demo => DEMO_ACCESS_TOKEN,
            Self::Authenticated { token } => token.as_str(),
        }
    }
}

/// Token pair as persisted in the session blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionTokens {
    pub fn demo() -> Self {
        Self {
            access_token: DEMO_ACCESS_TOKEN.into(),
            refresh_token: DEMO_REFRESH_TOKEN.into(),
        }
    }
}

/// Signed-in hospital account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalUser {
    pub id: String,
    pub hospital_name: String,
    pub location: String,
    pub email: String,
    pub patient_id: String,
    pub created_at: DateTime<Utc>,
}

impl HospitalUser {
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.into(),
            hospital_name: "Demo General Hospital".into(),
            location: "Mumbai, Maharashtra".into(),
            email: DEMO_EMAIL.into(),
            patient_id: "DEMO001".into(),
            created_at: Utc::now(),
        }
    }
}

/// A session together with the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub session: Session,
    pub user: HospitalUser,
}

impl ActiveSession {
    pub fn demo() -> Self {
        Self {
            session: Session::Demo,
            user: HospitalUser::demo(),
        }
    }
}

/// Hospital account registration form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub hospital_name: String,
    pub location: String,
}

// ═══════════════════════════════════════════════════════════
// Auth backend seam
// ═══════════════════════════════════════════════════════════

/// Hosted authentication service.
pub trait AuthBackend: Send + Sync {
    fn sign_in(&self, email: &str, password: &str)
        -> Result<(SessionTokens, HospitalUser), SessionError>;

    fn sign_up(&self, registration: &Registration) -> Result<HospitalUser, SessionError>;
}

/// Backend used when no hosted service is configured. Every call fails.
pub struct UnavailableBackend;

impl AuthBackend for UnavailableBackend {
    fn sign_in(&self, _: &str, _: &str) -> Result<(SessionTokens, HospitalUser), SessionError> {
        Err(SessionError::BackendUnavailable)
    }

    fn sign_up(&self, _: &Registration) -> Result<HospitalUser, SessionError> {
        Err(SessionError::BackendUnavailable)
    }
}

/// Resolve credentials to a session. Demo credentials never reach the backend.
pub fn authenticate(
    email: &str,
    password: &str,
    backend: &dyn AuthBackend,
) -> Result<ActiveSession, SessionError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(SessionError::MissingCredentials);
    }

    if email == DEMO_EMAIL && password == DEMO_PASSWORD {
        return Ok(ActiveSession::demo());
    }

    let (tokens, user) = backend.sign_in(email, password)?;
    Ok(ActiveSession {
        session: Session::Authenticated {
            token: tokens.access_token,
        },
        user,
    })
}

pub fn register(
    registration: &Registration,
    backend: &dyn AuthBackend,
) -> Result<HospitalUser, SessionError> {
    if registration.email.trim().is_empty() || registration.password.is_empty() {
        return Err(SessionError::MissingCredentials);
    }
    if registration.email.trim() == DEMO_EMAIL {
        return Err(SessionError::DemoRegistration);
    }
    backend.sign_up(registration)
}

// ═══════════════════════════════════════════════════════════
// Persisted session blob
// ═══════════════════════════════════════════════════════════

/// Small key-value store for client-local session state.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn store(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per entry under a directory.
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remember the demo session across restarts.
pub fn persist_demo(storage: &dyn SessionStorage) -> Result<(), SessionError> {
    let blob = serde_json::to_string(&SessionTokens::demo())?;
    storage.store(DEMO_SESSION_KEY, &blob)
}

/// Restore a persisted demo session. A malformed blob is discarded.
pub fn restore_demo(storage: &dyn SessionStorage) -> Result<Option<ActiveSession>, SessionError> {
    let Some(blob) = storage.load(DEMO_SESSION_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str::<SessionTokens>(&blob) {
        Ok(_) => Ok(Some(ActiveSession::demo())),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed demo session blob");
            storage.remove(DEMO_SESSION_KEY)?;
            Ok(None)
        }
    }
}

pub fn forget_demo(storage: &dyn SessionStorage) -> Result<(), SessionError> {
    storage.remove(DEMO_SESSION_KEY)
}
