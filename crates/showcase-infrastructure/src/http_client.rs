//! HttpApiClient - reqwest implementation of the remote service endpoints.
//!
//! Every request carries `Authorization: Bearer <token>` while the attached
//! [`TokenSource`] holds a token. Create and update are sent as multipart
//! forms with a `project` JSON part and one `images` part per attachment.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use showcase_core::config::ApiConfig;
use showcase_core::error::{Result, ShowcaseError};
use showcase_core::project::{
    Attachment, MutationResponse, Project, ProjectApi, ProjectConfirmation, ProjectList,
};
use showcase_core::session::{AuthApi, Credentials, LoginResponse, SignupRequest, TokenSource};
use std::path::Path;
use std::sync::Arc;

/// Client for the `/api` endpoints of one service origin.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl HttpApiClient {
    /// Creates a client without a token source; requests are anonymous.
    ///
    /// # Errors
    ///
    /// Returns a config error if the base URL is empty or not HTTP(S).
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ShowcaseError::config(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                config.base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token_source: None,
        })
    }

    /// Attaches the source of the bearer token.
    pub fn with_token_source(mut self, token_source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(token_source);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Adds the bearer header when a token is held.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self
            .token_source
            .as_ref()
            .and_then(|source| source.bearer_token())
        {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(transport_error)
    }

    fn project_form(project: &Project, images: &[Attachment]) -> Result<Form> {
        let mut form = Form::new().text("project", serde_json::to_string(project)?);

        for image in images {
            let content_type = image.content_type.clone().unwrap_or_else(|| {
                mime_guess::from_path(&image.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&content_type)
                .map_err(|e| {
                    ShowcaseError::validation(format!(
                        "Invalid content type '{}' for {}: {}",
                        content_type, image.file_name, e
                    ))
                })?;
            form = form.part("images", part);
        }

        Ok(form)
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<()> {
        tracing::debug!("POST /api/user/signup for {}", request.email);
        self.send(self.client.post(self.url("/user/signup")).json(request))
            .await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        tracing::debug!("POST /api/user/login for {}", credentials.email);
        self.send_json(self.client.post(self.url("/user/login")).json(credentials))
            .await
    }
}

#[async_trait]
impl ProjectApi for HttpApiClient {
    async fn list(&self) -> Result<Vec<Project>> {
        tracing::debug!("GET /api/projects/");
        let list: ProjectList = self.send_json(self.client.get(self.url("/projects/"))).await?;
        Ok(list.projects)
    }

    async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Project>> {
        tracing::debug!("GET /api/projects/creator/{}", creator_id);
        let list: ProjectList = self
            .send_json(
                self.client
                    .get(self.url(&format!("/projects/creator/{creator_id}"))),
            )
            .await?;
        Ok(list.projects)
    }

    async fn get(&self, id: &str) -> Result<Project> {
        tracing::debug!("GET /api/projects/{}", id);
        self.send_json(self.client.get(self.url(&format!("/projects/{id}"))))
            .await
    }

    async fn create(&self, project: &Project, images: &[Attachment]) -> Result<ProjectConfirmation> {
        tracing::debug!(
            "POST /api/projects/ '{}' with {} image(s)",
            project.title,
            images.len()
        );
        let form = Self::project_form(project, images)?;
        let response: MutationResponse = self
            .send_json(self.client.post(self.url("/projects/")).multipart(form))
            .await?;
        Ok(response.project)
    }

    async fn update(&self, project: &Project, images: &[Attachment]) -> Result<ProjectConfirmation> {
        let id = project
            .id
            .as_deref()
            .ok_or_else(|| ShowcaseError::validation("Cannot update a project without id"))?;
        tracing::debug!("PUT /api/projects/{} with {} image(s)", id, images.len());

        let form = Self::project_form(project, images)?;
        let response: MutationResponse = self
            .send_json(
                self.client
                    .put(self.url(&format!("/projects/{id}")))
                    .multipart(form),
            )
            .await?;
        Ok(response.project)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        tracing::debug!("DELETE /api/projects/{}", id);
        self.send(self.client.delete(self.url(&format!("/projects/{id}"))))
            .await?;
        Ok(())
    }
}

/// Reads an image file into an [`Attachment`], guessing its content type
/// from the extension.
pub async fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Attachment::new(file_name, bytes).with_content_type(content_type.essence_str()))
}

fn transport_error(e: reqwest::Error) -> ShowcaseError {
    match e.status() {
        Some(status) => ShowcaseError::http(status.as_u16(), e.to_string()),
        None => ShowcaseError::transport(e.to_string()),
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        body
    };
    tracing::debug!("Request failed with status {}", status);
    Err(ShowcaseError::http(status.as_u16(), message))
}
