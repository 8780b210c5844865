//! Shared, synchronously readable session state.

use super::model::Session;
use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// Supplies the bearer token attached to outgoing requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Cloneable handle to the one session record of a composition root.
///
/// All accessors are side-effect-free reads. Writes are reserved for the
/// session manager that owns the handle; other components receive it only
/// to read (the HTTP client reads the token through [`TokenSource`]).
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<Session>>,
    clock: Arc<dyn Clock>,
}

impl SessionHandle {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.read().user_id.clone()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read().expires_at
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated_at(self.clock.now())
    }

    /// Never `true` while [`is_authenticated`](Self::is_authenticated) is `false`.
    pub fn is_admin(&self) -> bool {
        self.read().is_admin_at(self.clock.now())
    }

    /// Replaces the record.
    pub fn replace(&self, session: Session) {
        *self.write() = session;
    }

    /// Resets the record and returns what was held before.
    pub fn clear(&self) -> Session {
        std::mem::take(&mut *self.write())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl TokenSource for SessionHandle {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.read();
        f.debug_struct("SessionHandle")
            .field("user_id", &session.user_id)
            .field("is_admin", &session.is_admin)
            .field("expires_at", &session.expires_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_derived_flags_follow_clock() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let clock = FixedClock::new(now);
        let handle = SessionHandle::new(Arc::new(clock.clone()));

        handle.replace(Session {
            token: Some("tok".into()),
            user_id: Some("u1".into()),
            is_admin: true,
            expires_at: Some(now + Duration::minutes(5)),
        });
        assert!(handle.is_authenticated());
        assert!(handle.is_admin());
        assert_eq!(handle.bearer_token().as_deref(), Some("tok"));

        clock.advance(Duration::minutes(5));
        assert!(!handle.is_authenticated());
        assert!(!handle.is_admin());
    }

    #[test]
    fn test_clear_returns_previous() {
        let handle = SessionHandle::new(Arc::new(crate::clock::SystemClock));
        handle.replace(Session {
            token: Some("tok".into()),
            ..Session::default()
        });

        let previous = handle.clear();
        assert_eq!(previous.token.as_deref(), Some("tok"));
        assert!(handle.snapshot().is_cleared());
    }
}
