//! Credential store and authenticator.
//!
//! The user list lives in a flat file that is read on every login; nothing is
//! cached and nothing is ever written back.
//!
//! Passwords are stored and compared as plaintext and the issued token is the
//! user's role string. Both are known weaknesses kept for compatibility with
//! existing user files and clients: a hardened deployment should store password
//! hashes and issue signed tokens carrying verified claims.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One entry of the user file.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("name", &self.name)
            .finish()
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token handed to the client. Equal to `role`.
    pub token: String,
    pub name: String,
    pub role: String,
}

impl From<&UserRecord> for Session {
    fn from(user: &UserRecord) -> Self {
        Self {
            token: user.role.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot read user file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in user file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML in user file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate username in user file: {0}")]
    DuplicateUser(String),
}

/// Source of user records.
pub trait UserStore: Send + Sync {
    /// Load the full user list. Called once per login attempt.
    fn load(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Verify a username/password pair.
    ///
    /// Returns `Ok(None)` when no record matches both fields exactly.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<Session>, StoreError> {
        let users = self.load()?;
        Ok(users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(Session::from))
    }

    /// Whether any stored user holds `role`.
    fn has_role(&self, role: &str) -> Result<bool, StoreError> {
        Ok(self.load()?.iter().any(|u| u.role == role))
    }
}

/// User store backed by a JSON (default) or YAML (`.yaml`/`.yml`) file.
#[derive(Debug, Clone)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
    }
}

impl UserStore for FileUserStore {
    fn load(&self) -> Result<Vec<UserRecord>, StoreError> {
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let users: Vec<UserRecord> = if self.is_yaml() {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        ensure_unique(&users)?;
        Ok(users)
    }
}

/// In-memory store, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticUserStore {
    users: Vec<UserRecord>,
}

impl StaticUserStore {
    pub fn new(users: Vec<UserRecord>) -> Result<Self, StoreError> {
        ensure_unique(&users)?;
        Ok(Self { users })
    }
}

impl UserStore for StaticUserStore {
    fn load(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.users.clone())
    }
}

fn ensure_unique(users: &[UserRecord]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for user in users {
        if !seen.insert(user.username.as_str()) {
            return Err(StoreError::DuplicateUser(user.username.clone()));
        }
    }
    Ok(())
}
