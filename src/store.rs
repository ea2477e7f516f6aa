use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::UserProfile;

/// Error type for consumer-provided store implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// The persisted credential triple.
///
/// The profile, access token and refresh token are all present or all
/// absent — guaranteed by construction: the only constructors are
/// [`CredentialRecord::logged_out`] and [`CredentialRecord::active`], and
/// a persisted form that decodes to a partial triple is read back as
/// logged out.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct CredentialRecord {
    session: Option<ActiveCredentials>,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveCredentials {
    profile: UserProfile,
    access_token: String,
    refresh_token: String,
}

impl CredentialRecord {
    /// The unauthenticated record: no profile, no tokens.
    #[must_use]
    pub fn logged_out() -> Self {
        Self { session: None }
    }

    /// A full, internally consistent credential triple.
    #[must_use]
    pub fn active(profile: UserProfile, access_token: String, refresh_token: String) -> Self {
        Self {
            session: Some(ActiveCredentials {
                profile,
                access_token,
                refresh_token,
            }),
        }
    }

    /// True iff a user profile is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// True iff logged in and the profile carries the superuser flag.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.profile.is_superuser)
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.profile)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.refresh_token.as_str())
    }

    /// The record with a renewed access token. A logged-out record stays
    /// logged out — renewal cannot create a partial triple.
    #[must_use]
    pub fn renewed(mut self, access_token: String) -> Self {
        if let Some(session) = &mut self.session {
            session.access_token = access_token;
        }
        self
    }

    /// Decompose an active record into its triple.
    #[must_use]
    pub fn into_parts(self) -> Option<(UserProfile, String, String)> {
        self.session
            .map(|s| (s.profile, s.access_token, s.refresh_token))
    }
}

/// Storage form: three optional slots, so stale files from older layouts
/// still parse and fall through the triple check.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    user_data: Option<UserProfile>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl From<RawRecord> for CredentialRecord {
    fn from(raw: RawRecord) -> Self {
        match (raw.user_data, raw.access_token, raw.refresh_token) {
            (Some(profile), Some(access), Some(refresh)) => Self::active(profile, access, refresh),
            (None, None, None) => Self::logged_out(),
            _ => {
                tracing::warn!("partial credential triple in storage, treating as logged out");
                Self::logged_out()
            }
        }
    }
}

impl From<CredentialRecord> for RawRecord {
    fn from(record: CredentialRecord) -> Self {
        match record.into_parts() {
            Some((profile, access, refresh)) => Self {
                user_data: Some(profile),
                access_token: Some(access),
                refresh_token: Some(refresh),
            },
            None => Self {
                user_data: None,
                access_token: None,
                refresh_token: None,
            },
        }
    }
}

/// Durable, synchronous storage for the credential triple.
///
/// `set` and `clear` are the only mutators; both replace the whole record,
/// so no observable state ever holds a partial triple. Implementations
/// must not perform network or UI side effects.
pub trait CredentialStore: Send + Sync + 'static {
    /// Current record. Before any write this is the logged-out triple.
    fn get(&self) -> CredentialRecord;

    /// Store a full credential triple (login, or token renewal).
    fn set(
        &self,
        profile: UserProfile,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), StoreError>;

    /// Reset to the logged-out triple. Idempotent.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<CredentialRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> CredentialRecord {
        self.record.lock().expect("credential store lock poisoned").clone()
    }

    fn set(
        &self,
        profile: UserProfile,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), StoreError> {
        *self.record.lock().expect("credential store lock poisoned") =
            CredentialRecord::active(profile, access_token, refresh_token);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.record.lock().expect("credential store lock poisoned") =
            CredentialRecord::logged_out();
        Ok(())
    }
}

/// File-backed store: one JSON document holding the whole triple,
/// rewritten on every mutation. Survives process restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    record: Mutex<CredentialRecord>,
}

impl FileStore {
    /// Open (or initialize) the store at `path`.
    ///
    /// A missing file reads as logged out. A file that exists but does not
    /// parse also reads as logged out — the write side cannot produce one,
    /// and start-up must not fail on stale local state.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let record = Self::load(&path)?;
        Ok(Self {
            path,
            record: Mutex::new(record),
        })
    }

    fn load(path: &Path) -> Result<CredentialRecord, StoreError> {
        if !path.exists() {
            return Ok(CredentialRecord::logged_out());
        }
        let contents = fs::read_to_string(path)?;
        match serde_json::from_str(&contents) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable credential file, treating as logged out");
                Ok(CredentialRecord::logged_out())
            }
        }
    }

    fn persist(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> CredentialRecord {
        self.record.lock().expect("credential store lock poisoned").clone()
    }

    fn set(
        &self,
        profile: UserProfile,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), StoreError> {
        let record = CredentialRecord::active(profile, access_token, refresh_token);
        let mut guard = self.record.lock().expect("credential store lock poisoned");
        self.persist(&record)?;
        *guard = record;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let record = CredentialRecord::logged_out();
        let mut guard = self.record.lock().expect("credential store lock poisoned");
        self.persist(&record)?;
        *guard = record;
        Ok(())
    }
}
