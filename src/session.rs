//! Session
//!
//! The signed-in customer, kept in storage next to the cart under the `token` and `user` keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStorage, StorageError};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Profile of the signed-in customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub username: String,

    /// Contact email.
    #[serde(default)]
    pub email: String,

    /// Role, e.g. `user` or `admin`.
    #[serde(default)]
    pub role: String,

    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A bearer token plus, when known, the profile it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for authenticated endpoints.
    pub token: String,

    /// Profile saved at sign-in.
    pub user: Option<UserProfile>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Reads the session from storage.
    ///
    /// Returns `None` without a non-empty token. An unreadable profile is dropped and the
    /// token kept.
    pub fn load(storage: &dyn KeyValueStorage) -> Option<Session> {
        let token = match storage.get_item(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return None,
            Err(error) => {
                warn!(%error, "session storage unreadable");
                return None;
            }
        };

        let user = match storage.get_item(USER_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .inspect_err(|error| warn!(%error, "stored user profile is malformed"))
                .ok(),
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "session storage unreadable");
                None
            }
        };

        Some(Session { token, user })
    }

    /// Writes the session to storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if either key cannot be written.
    pub fn save(&self, storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        storage.set_item(TOKEN_KEY, &self.token)?;

        match &self.user {
            Some(user) => {
                let json = serde_json::to_string(user).map_err(StorageError::Corrupt)?;
                storage.set_item(USER_KEY, &json)
            }
            None => storage.remove_item(USER_KEY),
        }
    }

    /// Signs out by deleting the session keys.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if either key cannot be removed.
    pub fn clear(storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        storage.remove_item(TOKEN_KEY)?;
        storage.remove_item(USER_KEY)
    }
}
