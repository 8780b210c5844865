//! Composition root: wires the services of one CLI invocation.

use anyhow::Result;
use showcase_application::{ProjectStore, Router, SessionManager};
use showcase_core::clock::SystemClock;
use showcase_core::config::AppConfig;
use showcase_core::event_bus::Subscription;
use showcase_core::session::SessionHandle;
use showcase_infrastructure::{HttpApiClient, JsonFileStore, ShowcasePaths};
use std::sync::Arc;

pub struct App {
    pub session: SessionManager,
    pub projects: ProjectStore,
    pub router: Arc<Router>,
    _subscriptions: Vec<Subscription>,
}

impl App {
    /// Builds every service and restores a persisted session.
    pub fn build(config: AppConfig, paths: &ShowcasePaths) -> Result<Self> {
        tracing::debug!("[Bootstrap] Using service at {}", config.api.base_url);

        let handle = SessionHandle::new(Arc::new(SystemClock));
        let client =
            Arc::new(HttpApiClient::new(&config.api)?.with_token_source(Arc::new(handle.clone())));
        let storage = Arc::new(JsonFileStore::new(paths)?);
        tracing::debug!("[Bootstrap] Session file: {}", storage.path().display());

        let router = Arc::new(Router::new(handle.clone()));
        let delay = config.ui.navigation_delay();

        let session = SessionManager::new(handle, client.clone(), storage, router.clone())
            .with_navigation_delay(delay);
        let projects = ProjectStore::new(client, router.clone()).with_navigation_delay(delay);

        let subscriptions = vec![
            session.subscribe_notifications(|n| println!("{n}")),
            projects.subscribe_notifications(|n| println!("{n}")),
            router.subscribe_routes(|route| tracing::info!("[Router] Now at {}", route)),
        ];

        if session.restore_session() {
            tracing::info!("[Bootstrap] Restored persisted session");
        }

        Ok(Self {
            session,
            projects,
            router,
            _subscriptions: subscriptions,
        })
    }

    /// Lets deferred notifications reach their listeners.
    pub async fn settle(&self) {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }
}
