//! Route table, guard evaluation and the current view.

use crate::guards::{AdminGuard, AuthGuard, RouteGuard};
use showcase_core::event_bus::{EventBus, Subscription};
use showcase_core::navigation::{Navigator, Route};
use showcase_core::session::SessionHandle;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Tracks the current route and enters new ones only when their guards
/// permit.
///
/// | Route                 | Guards                  |
/// |-----------------------|-------------------------|
/// | Home, Details, Login  | none                    |
/// | Signup                | AuthGuard, AdminGuard   |
/// | Profile               | AuthGuard               |
///
/// Every route change is published to [`subscribe_routes`](Self::subscribe_routes).
pub struct Router {
    auth: Arc<dyn RouteGuard>,
    admin: Arc<dyn RouteGuard>,
    current: RwLock<Route>,
    routes: EventBus<Route>,
}

impl Router {
    /// Creates a router at [`Route::Home`] whose guards read `session`.
    pub fn new(session: SessionHandle) -> Self {
        Self::with_guards(
            Arc::new(AuthGuard::new(session.clone())),
            Arc::new(AdminGuard::new(session)),
        )
    }

    /// Creates a router with custom authentication and admin guards.
    pub fn with_guards(auth: Arc<dyn RouteGuard>, admin: Arc<dyn RouteGuard>) -> Self {
        Self {
            auth,
            admin,
            current: RwLock::new(Route::Home),
            routes: EventBus::new(),
        }
    }

    /// Guards protecting `route`, in evaluation order.
    pub fn guards_for(&self, route: &Route) -> Vec<Arc<dyn RouteGuard>> {
        match route {
            Route::Home | Route::Details(_) | Route::Login => Vec::new(),
            Route::Signup => vec![Arc::clone(&self.auth), Arc::clone(&self.admin)],
            Route::Profile(_) => vec![Arc::clone(&self.auth)],
        }
    }

    pub fn current(&self) -> Route {
        self.current
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Navigates and reports whether `route` was entered.
    ///
    /// Guards run in table order and stop at the first denial. A denial
    /// leaves the router on whatever route the guard redirected to.
    pub fn try_navigate(&self, route: Route) -> bool {
        for guard in self.guards_for(&route) {
            if !guard.can_activate(self) {
                tracing::debug!("[Router] {} blocked {}", guard.name(), route);
                return false;
            }
        }

        tracing::debug!("[Router] Entering {}", route);
        {
            let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
            *current = route.clone();
        }
        self.routes.publish(&route);
        true
    }

    /// Registers a listener for entered routes.
    pub fn subscribe_routes<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Route) + Send + Sync + 'static,
    {
        self.routes.subscribe(listener)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        self.try_navigate(route);
    }
}

/// Navigates to `route` once `delay` has elapsed.
///
/// Runs on the current tokio runtime; without one the navigation happens
/// immediately.
pub(crate) fn navigate_after(navigator: Arc<dyn Navigator>, route: Route, delay: Duration) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                navigator.navigate(route);
            });
        }
        Err(_) => navigator.navigate(route),
    }
}
