//! Session domain module.
//!
//! This module contains the authentication state model, its persisted form,
//! the storage and remote-service seams it depends on, and the signup form
//! checks.
//!
//! # Module Structure
//!
//! - `model`: Session record (`Session`) and persisted entries (`PersistedSession`)
//! - `handle`: Shared readable session state (`SessionHandle`, `TokenSource`)
//! - `storage`: Durable key/value storage trait (`KeyValueStore`)
//! - `api`: Remote user endpoints (`AuthApi`)
//! - `validation`: Signup form checks (`SignupValidation`)
//!
//! # Usage
//!
//! ```ignore
//! use showcase_core::session::{Session, SessionHandle, KeyValueStore, AuthApi};
//! ```

mod api;
mod handle;
mod model;
mod storage;
pub mod validation;

// Re-export public API
pub use api::{AuthApi, Credentials, LoginResponse, SignupRequest};
pub use handle::{SessionHandle, TokenSource};
pub use model::{PersistedSession, Session, keys};
pub use storage::{KeyValueStore, MemoryStore};
pub use validation::SignupValidation;
