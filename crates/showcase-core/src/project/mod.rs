//! Project domain module.
//!
//! # Module Structure
//!
//! - `model`: Catalog entry (`Project`) and upload payload (`Attachment`)
//! - `api`: Remote catalog endpoints (`ProjectApi`)
//! - `validation`: Project form checks (`ProjectValidation`)

mod api;
mod model;
pub mod validation;

// Re-export public API
pub use api::{MutationResponse, ProjectApi, ProjectConfirmation, ProjectList};
pub use model::{Attachment, Project, SUMMARY_LENGTH, flatten_nested, null_as_default};
pub use validation::ProjectValidation;
