//! Domain layer of the Showcase client.
//!
//! Holds the session and project models, client-side validation, the
//! observer mechanism used by every stream, and the traits at the seams to
//! the outside world (`AuthApi`, `ProjectApi`, `KeyValueStore`,
//! `TokenSource`, `Navigator`, `Clock`). Nothing in this crate performs I/O.

pub mod clock;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod navigation;
pub mod notification;
pub mod project;
pub mod session;

// Re-export common types
pub use error::{Result, ShowcaseError};
pub use event_bus::{EventBus, Subscription};
pub use navigation::{Navigator, Route};
pub use notification::{Notification, Severity};
