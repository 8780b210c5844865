//! Project endpoints of the remote service.

use super::model::{Attachment, Project, null_as_default};
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Body of the catalog endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectList {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
}

/// Server-assigned fields of a created or updated project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfirmation {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images_paths: Vec<String>,
}

/// Body of the create/update endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub project: ProjectConfirmation,
}

/// An abstract client for the project catalog.
///
/// This trait decouples the project store from the transport. Create and
/// update send the project together with zero or more image attachments.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Lists the complete catalog.
    async fn list(&self) -> Result<Vec<Project>>;

    /// Lists the projects owned by `creator_id`.
    async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Project>>;

    /// Fetches a single project.
    async fn get(&self, id: &str) -> Result<Project>;

    /// Sends a draft and its images.
    ///
    /// # Returns
    ///
    /// The identifier and image locations assigned by the service.
    async fn create(&self, project: &Project, images: &[Attachment]) -> Result<ProjectConfirmation>;

    /// Replaces the project stored under `project.id`.
    async fn update(&self, project: &Project, images: &[Attachment]) -> Result<ProjectConfirmation>;

    /// Deletes the project stored under `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
