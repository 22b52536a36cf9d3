//! Persistence adapter for the session snapshot.
//!
//! DESIGN
//! ======
//! The snapshot is wrapped as `{"state": {...}, "version": N}` under
//! [`SESSION_KEY`]. Loading never fails: absent, corrupt, wrong-version or
//! half-authenticated data all come back as the signed-out default, with a
//! warning logged for anything that was present but unusable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::state::PersistedSession;
use crate::storage::{self, KeyValueStore, StorageError};

/// Key holding the serialized session snapshot.
pub const SESSION_KEY: &str = "auth-storage";
/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "auth-token";

const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: PersistedSession,
    version: u32,
}

/// Reads and writes the persisted session subset and the bearer token.
#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl SessionPersistence {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the saved snapshot, falling back to signed out.
    #[must_use]
    pub fn load(&self) -> PersistedSession {
        match storage::load_json::<Envelope>(self.store.as_ref(), SESSION_KEY) {
            Ok(None) => PersistedSession::default(),
            Ok(Some(envelope)) if envelope.version != SNAPSHOT_VERSION => {
                warn!(version = envelope.version, "discarding session snapshot with unknown version");
                PersistedSession::default()
            }
            Ok(Some(envelope)) => envelope.state.normalized(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session snapshot");
                PersistedSession::default()
            }
        }
    }

    /// Write the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium rejects the write.
    pub fn save(&self, snapshot: &PersistedSession) -> Result<(), StorageError> {
        let envelope = Envelope { state: snapshot.clone(), version: SNAPSHOT_VERSION };
        storage::save_json(self.store.as_ref(), SESSION_KEY, &envelope)
    }

    /// Write the snapshot, logging instead of failing. Used from the store's
    /// post-update hook where there is no caller to report to.
    pub fn save_logged(&self, snapshot: &PersistedSession) {
        if let Err(e) = self.save(snapshot) {
            error!(error = %e, "session snapshot write failed");
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "token read failed");
                None
            }
        }
    }

    /// Store the bearer token.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the medium rejects the write.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token)
    }

    /// Remove the bearer token.
    pub fn clear_token(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            error!(error = %e, "token removal failed");
        }
    }

    /// Remove both the token and the snapshot.
    pub fn wipe(&self) {
        self.clear_token();
        if let Err(e) = self.store.remove(SESSION_KEY) {
            error!(error = %e, "session snapshot removal failed");
        }
    }
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod tests;
