//! Route guards.
//!
//! A guard is a synchronous predicate evaluated before a protected route is
//! entered. A denying guard redirects to [`Route::Login`] itself, so the
//! caller only has to stop.

use showcase_core::navigation::{Navigator, Route};
use showcase_core::session::SessionHandle;

/// Decides whether navigation may proceed.
pub trait RouteGuard: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Returns `true` to permit. On denial the guard has already asked
    /// `navigator` to go to the login route.
    fn can_activate(&self, navigator: &dyn Navigator) -> bool;
}

/// Permits signed-in users with an unexpired token.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    session: SessionHandle,
}

impl AuthGuard {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}

impl RouteGuard for AuthGuard {
    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn can_activate(&self, navigator: &dyn Navigator) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        tracing::info!("[Guard] AuthGuard denied: not authenticated");
        navigator.navigate(Route::Login);
        false
    }
}

/// Permits administrators only; authenticated non-admins are denied too.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    session: SessionHandle,
}

impl AdminGuard {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}

impl RouteGuard for AdminGuard {
    fn name(&self) -> &'static str {
        "AdminGuard"
    }

    fn can_activate(&self, navigator: &dyn Navigator) -> bool {
        if self.session.is_admin() {
            return true;
        }
        tracing::info!("[Guard] AdminGuard denied: not an administrator");
        navigator.navigate(Route::Login);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use showcase_core::clock::FixedClock;
    use showcase_core::session::Session;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn handle_with(session: Session) -> (SessionHandle, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let handle = SessionHandle::new(clock.clone());
        handle.replace(session);
        (handle, clock)
    }

    fn signed_in(now_offset_minutes: i64, is_admin: bool) -> Session {
        Session {
            token: Some("abc".into()),
            user_id: Some("u1".into()),
            is_admin,
            expires_at: Some(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
                    + Duration::minutes(now_offset_minutes),
            ),
        }
    }

    #[test]
    fn test_auth_guard_permits_authenticated() {
        let (handle, _) = handle_with(signed_in(60, false));
        let navigator = RecordingNavigator::default();

        assert!(AuthGuard::new(handle).can_activate(&navigator));
        assert!(navigator.routes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_auth_guard_denies_and_redirects() {
        let (handle, _) = handle_with(Session::default());
        let navigator = RecordingNavigator::default();

        assert!(!AuthGuard::new(handle).can_activate(&navigator));
        assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Login]);
    }

    #[test]
    fn test_auth_guard_reads_expiry_without_caching() {
        let (handle, clock) = handle_with(signed_in(1, true));
        let guard = AuthGuard::new(handle);
        let navigator = RecordingNavigator::default();

        assert!(guard.can_activate(&navigator));
        clock.advance(Duration::minutes(2));
        assert!(!guard.can_activate(&navigator));
    }

    #[test]
    fn test_admin_guard_denies_authenticated_non_admin() {
        let (handle, _) = handle_with(signed_in(60, false));
        let navigator = RecordingNavigator::default();

        assert!(!AdminGuard::new(handle.clone()).can_activate(&navigator));
        assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Login]);
        assert!(!handle.is_admin());
        assert!(handle.is_authenticated());
    }

    #[test]
    fn test_admin_guard_denies_expired_admin() {
        let (handle, _) = handle_with(signed_in(-1, true));
        let navigator = RecordingNavigator::default();

        assert!(!AdminGuard::new(handle).can_activate(&navigator));
    }

    #[test]
    fn test_admin_guard_permits_admin() {
        let (handle, _) = handle_with(signed_in(60, true));
        let navigator = RecordingNavigator::default();

        assert!(AdminGuard::new(handle).can_activate(&navigator));
    }
}
