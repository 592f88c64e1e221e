//! Unlock-list persistence
//!
//! The only thing that survives between runs is the list of unlocked
//! fighters. Backends store it as a JSON string under a single key:
//! - `MemoryStore`: in-process (native builds, tests)
//! - `LocalStore`: browser LocalStorage (wasm32 only)

use std::fmt;

/// Storage key for the unlocked-character list
pub const UNLOCKS_KEY: &str = "unlockedChars";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No storage backend in this environment
    Unavailable,
    Read(String),
    Write(String),
    /// Stored payload could not be parsed
    Malformed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Read(msg) => write!(f, "storage read failed: {msg}"),
            Self::Write(msg) => write!(f, "storage write failed: {msg}"),
            Self::Malformed(msg) => write!(f, "stored unlock data is malformed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Raw key/value access for the unlock list
pub trait UnlockStore {
    /// Stored payload, `None` if nothing has been saved yet
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, payload: &str) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    payload: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a payload (may be garbage)
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            writes: 0,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl UnlockStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.payload.clone())
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        self.payload = Some(payload.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl UnlockStore for LocalStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(UNLOCKS_KEY)
            .map_err(|e| StoreError::Read(format!("{e:?}")))
    }

    fn write(&mut self, payload: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(UNLOCKS_KEY, payload)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}
