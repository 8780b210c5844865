//! Session domain model and its persisted form.

use super::storage::KeyValueStore;
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Authentication state of the signed-in principal.
///
/// `is_authenticated` is never stored; it is derived from the token and the
/// expiry against a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer credential
    pub token: Option<String>,
    /// Identity of the signed-in principal
    pub user_id: Option<String>,
    /// Role flag; only meaningful while a token is present
    pub is_admin: bool,
    /// Absolute instant after which the token is no longer valid
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Token present and `now` strictly before the expiry.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && self.expires_at.is_some_and(|expires_at| now < expires_at)
    }

    /// Administrator flag, masked by authentication.
    pub fn is_admin_at(&self, now: DateTime<Utc>) -> bool {
        self.is_admin && self.is_authenticated_at(now)
    }

    /// Time left until expiry, or `None` once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let expires_at = self.expires_at?;
        (expires_at - now).to_std().ok().filter(|d| !d.is_zero())
    }

    pub fn is_cleared(&self) -> bool {
        *self == Session::default()
    }
}

/// Keys of the persisted session entries.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const EXPIRATION: &str = "expiration";
    pub const USER_ID: &str = "userId";
    pub const IS_ADMIN: &str = "isAdmin";

    pub const ALL: [&str; 4] = [TOKEN, EXPIRATION, USER_ID, IS_ADMIN];
}

/// The session as it survives a process restart.
///
/// Stored as four independent string entries in a [`KeyValueStore`]:
/// `token`, `expiration` (RFC 3339), `userId` and `isAdmin`
/// (`"true"`/`"false"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: Option<String>,
    pub is_admin: bool,
}

impl PersistedSession {
    /// Reads the persisted entries.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: token and a parseable expiration are present
    /// - `Ok(None)`: token or expiration missing, or expiration unparseable
    /// - `Err(_)`: the store itself failed
    pub fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        let token = store.get(keys::TOKEN)?;
        let expiration = store.get(keys::EXPIRATION)?;
        let (Some(token), Some(expiration)) = (token, expiration) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }

        let expires_at = match DateTime::parse_from_rfc3339(&expiration) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!("Ignoring persisted session with invalid expiration: {}", e);
                return Ok(None);
            }
        };

        let user_id = store.get(keys::USER_ID)?;
        let is_admin = store.get(keys::IS_ADMIN)?.as_deref() == Some("true");

        Ok(Some(Self {
            token,
            expires_at,
            user_id,
            is_admin,
        }))
    }

    /// Writes all four entries.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(keys::TOKEN, &self.token)?;
        store.set(keys::EXPIRATION, &self.expires_at.to_rfc3339())?;
        store.set(keys::USER_ID, self.user_id.as_deref().unwrap_or_default())?;
        store.set(keys::IS_ADMIN, if self.is_admin { "true" } else { "false" })?;
        Ok(())
    }

    /// Removes all four entries together.
    pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
        for key in keys::ALL {
            store.remove(key)?;
        }
        Ok(())
    }

    pub fn into_session(self) -> Session {
        Session {
            token: Some(self.token),
            user_id: self.user_id.filter(|id| !id.is_empty()),
            is_admin: self.is_admin,
            expires_at: Some(self.expires_at),
        }
    }
}
