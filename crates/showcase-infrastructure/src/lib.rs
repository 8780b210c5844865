//! Infrastructure layer of the Showcase client.
//!
//! Concrete implementations of the seams declared in `showcase-core`:
//! the HTTP client for the remote service, file-backed session storage,
//! path resolution and configuration loading.

pub mod config_service;
pub mod http_client;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use http_client::{HttpApiClient, read_attachment};
pub use paths::ShowcasePaths;
pub use storage::JsonFileStore;
