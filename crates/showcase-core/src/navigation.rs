//! Routes of the showcase and the navigation seam.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    /// Landing page with the full catalog.
    Home,
    /// Detail view of a single project.
    Details(String),
    Login,
    /// Account creation; administrators only.
    Signup,
    /// Projects owned by one creator.
    Profile(String),
}

impl Route {
    /// Parses a path like `/details/42` into a route.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_matches('/');
        let mut parts = trimmed.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some(""), None) => Some(Route::Home),
            (Some("login"), None) => Some(Route::Login),
            (Some("signup"), None) => Some(Route::Signup),
            (Some("details"), Some(id)) if !id.is_empty() => Some(Route::Details(id.to_string())),
            (Some("profile"), Some(id)) if !id.is_empty() => Some(Route::Profile(id.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Details(id) => write!(f, "/details/{id}"),
            Route::Login => write!(f, "/login"),
            Route::Signup => write!(f, "/signup"),
            Route::Profile(id) => write!(f, "/profile/{id}"),
        }
    }
}

/// Performs navigation requested by services and guards.
///
/// Implementations decide what "showing a view" means; the services only
/// express intent.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
