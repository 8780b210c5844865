//! Application layer for the Showcase client.
//!
//! Services that own client state and coordinate the domain seams: the
//! session state machine, the project cache, route guards and the router.

pub mod guards;
pub mod project_store;
pub mod router;
pub mod session_manager;

pub use guards::{AdminGuard, AuthGuard, RouteGuard};
pub use project_store::{ProjectStore, StoreEvent};
pub use router::Router;
pub use session_manager::SessionManager;
