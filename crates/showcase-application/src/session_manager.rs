use chrono::{DateTime, Utc};
use showcase_core::config::DEFAULT_NAVIGATION_DELAY_MS;
use showcase_core::error::{Result, ShowcaseError};
use showcase_core::event_bus::{EventBus, Subscription};
use showcase_core::navigation::{Navigator, Route};
use showcase_core::notification::Notification;
use showcase_core::session::{
    AuthApi, Credentials, KeyValueStore, PersistedSession, Session, SessionHandle, SignupRequest,
};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::router::navigate_after;

const LOGIN_SUCCESS: &str = "Login erfolgreich";
const LOGIN_FAILED: &str = "Email oder Passwort falsch";
const SIGNUP_SUCCESS: &str = "Neuer User angelegt";
const SIGNUP_UNAUTHORIZED: &str = "Bitte erneut anmelden";
const SIGNUP_FAILED: &str = "Registrierung fehlgeschlagen - Email bereits vergeben";

/// The armed expiry timer.
struct ExpiryTimer {
    task: Option<AbortHandle>,
    armed_for: Duration,
}

enum EndReason {
    Logout,
    Expired,
}

struct Inner {
    session: SessionHandle,
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    status: EventBus<bool>,
    notifications: EventBus<Notification>,
    expiry: Mutex<Option<ExpiryTimer>>,
}

/// Single source of truth for who is signed in and with which role.
///
/// `SessionManager` is responsible for:
/// - Exchanging credentials for a token and registering accounts
/// - Persisting the session and restoring it on startup
/// - Ending the session on logout or when the token expires
/// - Publishing status transitions and user-facing notifications
///
/// The session record itself lives in a [`SessionHandle`] so other
/// components (the HTTP client, guards) can read it without a reference to
/// the manager.
pub struct SessionManager {
    inner: Arc<Inner>,
    navigation_delay: Duration,
}

impl SessionManager {
    /// Creates a manager around an empty session.
    ///
    /// # Arguments
    ///
    /// * `session` - The shared session record this manager writes
    /// * `api` - The user endpoints of the remote service
    /// * `storage` - Durable storage for the persisted session entries
    /// * `navigator` - Receives the post-login/-logout navigation
    pub fn new(
        session: SessionHandle,
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session,
                api,
                storage,
                navigator,
                status: EventBus::new(),
                notifications: EventBus::new(),
                expiry: Mutex::new(None),
            }),
            navigation_delay: Duration::from_millis(DEFAULT_NAVIGATION_DELAY_MS),
        }
    }

    /// Sets the delay before navigating home after login or signup.
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Exchanges credentials for a token.
    ///
    /// On success the session is populated, the expiry timer armed, the
    /// entries persisted, status `true` and a success notification emitted,
    /// and navigation to [`Route::Home`] scheduled. On failure status
    /// `false` and an error notification are emitted and the session is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Returns the remote failure, or an internal error if the service
    /// answered without a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(email, password);
        tracing::info!("[Session] Login attempt for {}", credentials.email);

        let response = match self.inner.api.login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[Session] Login failed: {}", e);
                self.inner.login_failed();
                return Err(e);
            }
        };

        let Some(token) = response.token.filter(|token| !token.is_empty()) else {
            tracing::warn!("[Session] Login response carried no token");
            self.inner.login_failed();
            return Err(ShowcaseError::internal("Login response carried no token"));
        };

        let now = self.inner.session.now();
        let ttl = Duration::from_secs(response.expires_in);
        let expires_at = expiry_instant(now, ttl);
        let user_id = response.user_id.filter(|id| !id.is_empty());

        self.inner.session.replace(Session {
            token: Some(token.clone()),
            user_id: user_id.clone(),
            is_admin: response.is_admin,
            expires_at: Some(expires_at),
        });
        Inner::arm_expiry(&self.inner, ttl);

        let persisted = PersistedSession {
            token,
            expires_at,
            user_id: user_id.clone(),
            is_admin: response.is_admin,
        };
        if let Err(e) = persisted.save(self.inner.storage.as_ref()) {
            tracing::warn!("[Session] Failed to persist session: {}", e);
        }

        tracing::info!(
            "[Session] Signed in as {} (admin: {}, expires at {})",
            user_id.as_deref().unwrap_or("<unknown>"),
            response.is_admin,
            expires_at
        );
        self.inner.status.publish(&true);
        self.inner
            .notifications
            .publish_deferred(Notification::success(LOGIN_SUCCESS));
        navigate_after(
            Arc::clone(&self.inner.navigator),
            Route::Home,
            self.navigation_delay,
        );

        Ok(())
    }

    /// Registers a new account without signing the caller in.
    ///
    /// # Errors
    ///
    /// Returns the remote failure. A 401 is reported to the user as an
    /// expired session, anything else as an address already in use.
    pub async fn signup(&self, email: &str, password: &str, is_admin: bool) -> Result<()> {
        let request = SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            is_admin,
        };
        tracing::info!("[Session] Signup for {} (admin: {})", request.email, is_admin);

        match self.inner.api.signup(&request).await {
            Ok(()) => {
                tracing::info!("[Session] Created account {}", request.email);
                self.inner
                    .notifications
                    .publish_deferred(Notification::success(SIGNUP_SUCCESS));
                navigate_after(
                    Arc::clone(&self.inner.navigator),
                    Route::Home,
                    self.navigation_delay,
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Session] Signup failed: {}", e);
                let detail = if e.is_unauthorized() {
                    SIGNUP_UNAUTHORIZED
                } else {
                    SIGNUP_FAILED
                };
                self.inner
                    .notifications
                    .publish_deferred(Notification::error(detail));
                Err(e)
            }
        }
    }

    /// Ends the session and navigates home. Idempotent.
    ///
    /// Always emits status `false`; the info notification is only emitted
    /// when a session was actually cleared.
    pub fn logout(&self) {
        self.inner.end_session(EndReason::Logout);
    }

    /// Restores a persisted, unexpired session.
    ///
    /// # Returns
    ///
    /// `true` if a session was restored. Missing, unparseable or expired
    /// entries leave the state untouched and emit nothing.
    pub fn restore_session(&self) -> bool {
        let persisted = match PersistedSession::load(self.inner.storage.as_ref()) {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                tracing::debug!("[Session] No persisted session");
                return false;
            }
            Err(e) => {
                tracing::warn!("[Session] Failed to read persisted session: {}", e);
                return false;
            }
        };

        let session = persisted.into_session();
        let Some(remaining) = session.remaining_at(self.inner.session.now()) else {
            tracing::debug!("[Session] Persisted session already expired");
            return false;
        };

        tracing::info!(
            "[Session] Restored session for {} ({}s left)",
            session.user_id.as_deref().unwrap_or("<unknown>"),
            remaining.as_secs()
        );
        self.inner.session.replace(session);
        Inner::arm_expiry(&self.inner, remaining);
        self.inner.status.publish(&true);
        true
    }

    pub fn token(&self) -> Option<String> {
        self.inner.session.token()
    }

    pub fn user_id(&self) -> Option<String> {
        self.inner.session.user_id()
    }

    /// Never `true` while [`is_authenticated`](Self::is_authenticated) is `false`.
    pub fn is_admin(&self) -> bool {
        self.inner.session.is_admin()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.session.expires_at()
    }

    pub fn snapshot(&self) -> Session {
        self.inner.session.snapshot()
    }

    /// The shared session record, for guards and the HTTP client.
    pub fn handle(&self) -> &SessionHandle {
        &self.inner.session
    }

    /// Duration the currently armed expiry timer was armed with.
    pub fn pending_expiry(&self) -> Option<Duration> {
        self.inner
            .lock_expiry()
            .as_ref()
            .map(|timer| timer.armed_for)
    }

    /// Registers a listener for authentication status transitions.
    pub fn subscribe_status<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.inner.status.subscribe(listener)
    }

    /// Registers a listener for login, signup, logout and expiry outcomes.
    pub fn subscribe_notifications<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.inner.notifications.subscribe(listener)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.inner.cancel_expiry();
    }
}

impl Inner {
    fn login_failed(&self) {
        self.status.publish(&false);
        self.notifications
            .publish_deferred(Notification::error(LOGIN_FAILED));
    }

    /// Replaces any armed timer with one firing after `ttl`.
    fn arm_expiry(this: &Arc<Self>, ttl: Duration) {
        let weak: Weak<Self> = Arc::downgrade(this);
        let task = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(
                handle
                    .spawn(async move {
                        tokio::time::sleep(ttl).await;
                        if let Some(inner) = weak.upgrade() {
                            inner.end_session(EndReason::Expired);
                        }
                    })
                    .abort_handle(),
            ),
            Err(_) => {
                tracing::warn!("[Session] No runtime; expiry timer not armed");
                None
            }
        };

        let previous = this.lock_expiry().replace(ExpiryTimer {
            task,
            armed_for: ttl,
        });
        if let Some(ExpiryTimer {
            task: Some(previous),
            ..
        }) = previous
        {
            previous.abort();
        }
    }

    fn cancel_expiry(&self) {
        if let Some(ExpiryTimer {
            task: Some(task), ..
        }) = self.lock_expiry().take()
        {
            task.abort();
        }
    }

    fn end_session(&self, reason: EndReason) {
        // Also reached from inside the timer task; it has no await left.
        self.cancel_expiry();

        let previous = self.session.clear();
        if let Err(e) = PersistedSession::clear(self.storage.as_ref()) {
            tracing::warn!("[Session] Failed to erase persisted session: {}", e);
        }

        self.status.publish(&false);
        match reason {
            EndReason::Logout => {
                if !previous.is_cleared() {
                    tracing::info!("[Session] Logged out");
                    self.notifications.publish_deferred(Notification::info(
                        "Abgemeldet",
                        "Logout erfolgreich",
                    ));
                }
            }
            EndReason::Expired => {
                tracing::info!("[Session] Session expired");
                self.notifications.publish_deferred(Notification::warn(
                    "Sitzung abgelaufen",
                    "Bitte erneut anmelden",
                ));
            }
        }
        self.navigator.navigate(Route::Home);
    }

    fn lock_expiry(&self) -> std::sync::MutexGuard<'_, Option<ExpiryTimer>> {
        self.expiry.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// `now + ttl`, saturating at the latest representable instant.
fn expiry_instant(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
#[path = "session_manager_test.rs"]
mod tests;
