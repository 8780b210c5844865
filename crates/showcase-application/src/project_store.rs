//! Client-side mirror of the remote project catalog.

use crate::router::navigate_after;
use showcase_core::config::DEFAULT_NAVIGATION_DELAY_MS;
use showcase_core::error::{Result, ShowcaseError};
use showcase_core::event_bus::{EventBus, Subscription};
use showcase_core::navigation::{Navigator, Route};
use showcase_core::notification::Notification;
use showcase_core::project::{Attachment, Project, ProjectApi, ProjectConfirmation};
use std::sync::{Arc, RwLock};
use std::time::Duration;

const LOAD_FAILED: &str = "Projekte konnten nicht geladen werden.";
const LOAD_ONE_FAILED: &str = "Projekt konnte nicht geladen werden.";
const CREATE_FAILED: &str = "Projekt konnte nicht erstellt werden.";
const UPDATE_SUCCESS: &str = "Projekt geändert.";
const UPDATE_FAILED: &str = "Projekt konnte nicht geändert werden.";
const DELETE_SUCCESS: &str = "Projekt gelöscht.";
const DELETE_FAILED: &str = "Projekt konnte nicht gelöscht werden.";

/// A mutation confirmed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The draft as confirmed, with its assigned id.
    Created(Project),
    Updated(Project),
    /// Identifier of the removed project.
    Deleted(String),
}

/// Eventually consistent cache of the project catalog.
///
/// Responsibilities:
/// - Load the catalog (or one creator's subset) and replace the cache
/// - Apply create/update/delete to the cache once the service confirmed them
/// - Publish the cache, typed mutation events and user-facing notifications
///
/// Does NOT:
/// - Validate drafts (callers run `ProjectValidation` first)
/// - Detect conflicting edits; the last completed write wins
pub struct ProjectStore {
    api: Arc<dyn ProjectApi>,
    navigator: Arc<dyn Navigator>,
    navigation_delay: Duration,
    projects: RwLock<Vec<Project>>,
    list: EventBus<Vec<Project>>,
    notifications: EventBus<Notification>,
    events: EventBus<StoreEvent>,
}

impl ProjectStore {
    /// Creates a store with an empty cache.
    ///
    /// # Arguments
    ///
    /// * `api` - The project endpoints of the remote service
    /// * `navigator` - Receives the navigation home after a delete
    pub fn new(api: Arc<dyn ProjectApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            navigation_delay: Duration::from_millis(DEFAULT_NAVIGATION_DELAY_MS),
            projects: RwLock::new(Vec::new()),
            list: EventBus::new(),
            notifications: EventBus::new(),
            events: EventBus::new(),
        }
    }

    /// Sets the delay before navigating home after a delete.
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Loads the complete catalog, replacing the cache.
    ///
    /// A failure publishes an error notification and keeps the cache.
    pub async fn fetch_all(&self) -> Result<Vec<Project>> {
        let projects = match self.api.list().await {
            Ok(projects) => projects,
            Err(e) => return Err(self.fail("load catalog", LOAD_FAILED, e)),
        };
        tracing::debug!("[ProjectStore] Loaded {} project(s)", projects.len());
        self.replace_all(projects.clone());
        Ok(projects)
    }

    /// Loads the projects owned by `creator_id`, replacing the cache.
    pub async fn fetch_by_creator(&self, creator_id: &str) -> Result<Vec<Project>> {
        let projects = match self.api.list_by_creator(creator_id).await {
            Ok(projects) => projects,
            Err(e) => return Err(self.fail("load creator projects", LOAD_FAILED, e)),
        };
        tracing::debug!(
            "[ProjectStore] Loaded {} project(s) of {}",
            projects.len(),
            creator_id
        );
        self.replace_all(projects.clone());
        Ok(projects)
    }

    /// Looks up a single project. The cache is not touched.
    pub async fn fetch_one(&self, id: &str) -> Result<Project> {
        self.api
            .get(id)
            .await
            .map_err(|e| self.fail("load project", LOAD_ONE_FAILED, e))
    }

    /// Sends a draft and appends the confirmed project to the cache.
    ///
    /// # Returns
    ///
    /// The draft with the identifier and image paths assigned by the service.
    ///
    /// # Errors
    ///
    /// Returns the remote failure, or an internal error if the confirmation
    /// carried no id. Both also publish an error notification and leave the
    /// cache unchanged.
    pub async fn create(&self, draft: Project, images: &[Attachment]) -> Result<Project> {
        let confirmation = match self.api.create(&draft, images).await {
            Ok(confirmation) => confirmation,
            Err(e) => return Err(self.fail("create", CREATE_FAILED, e)),
        };
        let Some(id) = confirmation.id.clone() else {
            let e = ShowcaseError::internal("Create confirmation carried no id");
            return Err(self.fail("create", CREATE_FAILED, e));
        };

        let mut project = draft;
        project.id = Some(id);
        project.images_paths = confirmation.images_paths;
        tracing::info!(
            "[ProjectStore] Created '{}' ({})",
            project.title,
            project.id.as_deref().unwrap_or_default()
        );

        let snapshot = {
            let mut projects = self.write();
            projects.push(project.clone());
            projects.clone()
        };
        self.list.publish(&snapshot);
        self.events.publish(&StoreEvent::Created(project.clone()));
        Ok(project)
    }

    /// Replaces a project and updates its cache entry in place.
    ///
    /// An entry that is not cached yet is appended.
    ///
    /// # Errors
    ///
    /// A project without id is rejected without a remote call. Remote
    /// failures are returned as-is. Both publish an error notification.
    pub async fn update(&self, project: Project, images: &[Attachment]) -> Result<Project> {
        if project.is_draft() {
            let e = ShowcaseError::validation("Cannot update a project without id");
            return Err(self.fail("update", UPDATE_FAILED, e));
        }

        let confirmation = match self.api.update(&project, images).await {
            Ok(confirmation) => confirmation,
            Err(e) => return Err(self.fail("update", UPDATE_FAILED, e)),
        };
        let project = reconcile(project, confirmation);
        tracing::info!(
            "[ProjectStore] Updated '{}' ({})",
            project.title,
            project.id.as_deref().unwrap_or_default()
        );

        self.notifications
            .publish(&Notification::success(UPDATE_SUCCESS));
        let snapshot = {
            let mut projects = self.write();
            match projects.iter_mut().find(|cached| cached.id == project.id) {
                Some(cached) => *cached = project.clone(),
                None => projects.push(project.clone()),
            }
            projects.clone()
        };
        self.list.publish(&snapshot);
        self.events.publish(&StoreEvent::Updated(project.clone()));
        Ok(project)
    }

    /// Deletes a project, drops it from the cache and schedules navigation
    /// to [`Route::Home`].
    pub async fn delete(&self, project_id: &str) -> Result<()> {
        if let Err(e) = self.api.delete(project_id).await {
            return Err(self.fail("delete", DELETE_FAILED, e));
        }
        tracing::info!("[ProjectStore] Deleted {}", project_id);

        self.notifications
            .publish(&Notification::success(DELETE_SUCCESS));
        let snapshot = {
            let mut projects = self.write();
            projects.retain(|cached| cached.id.as_deref() != Some(project_id));
            projects.clone()
        };
        self.list.publish(&snapshot);
        self.events
            .publish(&StoreEvent::Deleted(project_id.to_string()));
        navigate_after(
            Arc::clone(&self.navigator),
            Route::Home,
            self.navigation_delay,
        );
        Ok(())
    }

    /// Copy of the cache.
    pub fn projects(&self) -> Vec<Project> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registers a listener receiving a fresh copy of the cache on change.
    pub fn subscribe_projects<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Project>) + Send + Sync + 'static,
    {
        self.list.subscribe(listener)
    }

    pub fn subscribe_notifications<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.notifications.subscribe(listener)
    }

    /// Registers a listener for confirmed mutations.
    pub fn subscribe_events<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    fn replace_all(&self, projects: Vec<Project>) {
        {
            let mut cache = self.write();
            *cache = projects.clone();
        }
        self.list.publish(&projects);
    }

    fn fail(&self, operation: &str, detail: &str, error: ShowcaseError) -> ShowcaseError {
        tracing::warn!("[ProjectStore] {} failed: {}", operation, error);
        self.notifications.publish(&Notification::error(detail));
        error
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Project>> {
        self.projects.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Project>> {
        self.projects.write().unwrap_or_else(|p| p.into_inner())
    }
}

/// Applies the server-assigned fields of `confirmation`.
fn reconcile(mut project: Project, confirmation: ProjectConfirmation) -> Project {
    if let Some(id) = confirmation.id {
        project.id = Some(id);
    }
    project.images_paths = confirmation.images_paths;
    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockProjectApi {
        lists: Mutex<VecDeque<Result<Vec<Project>>>>,
        create_result: Mutex<Option<Result<ProjectConfirmation>>>,
        update_result: Mutex<Option<Result<ProjectConfirmation>>>,
        delete_result: Mutex<Option<Result<()>>>,
        remote_calls: AtomicUsize,
    }

    impl MockProjectApi {
        fn with_lists(lists: Vec<Result<Vec<Project>>>) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                ..Default::default()
            }
        }

        fn next_list(&self) -> Result<Vec<Project>> {
            self.remote_calls.fetch_add(1, Ordering::SeqCst);
            self.lists
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn take<T>(&self, slot: &Mutex<Option<Result<T>>>) -> Result<T> {
            self.remote_calls.fetch_add(1, Ordering::SeqCst);
            slot.lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(ShowcaseError::internal("unexpected call")))
        }
    }

    #[async_trait]
    impl ProjectApi for MockProjectApi {
        async fn list(&self) -> Result<Vec<Project>> {
            self.next_list()
        }

        async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<Project>> {
            self.next_list()
                .map(|projects| projects.into_iter().filter(|p| p.creator == creator_id).collect())
        }

        async fn get(&self, id: &str) -> Result<Project> {
            self.next_list()?
                .into_iter()
                .find(|p| p.id.as_deref() == Some(id))
                .ok_or_else(|| ShowcaseError::http(404, "not found"))
        }

        async fn create(&self, _project: &Project, _images: &[Attachment]) -> Result<ProjectConfirmation> {
            self.take(&self.create_result)
        }

        async fn update(&self, _project: &Project, _images: &[Attachment]) -> Result<ProjectConfirmation> {
            self.take(&self.update_result)
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            self.take(&self.delete_result)
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn project(id: &str, creator: &str) -> Project {
        Project::draft(
            format!("Project {id}"),
            Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
        .with_id(id)
        .with_team(["Ada"])
        .with_tech_stack(["Rust"])
        .with_description("<p>Text</p>")
        .with_creator(creator)
    }

    fn confirmation(id: Option<&str>, images: &[&str]) -> ProjectConfirmation {
        ProjectConfirmation {
            id: id.map(str::to_string),
            images_paths: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct Fixture {
        store: ProjectStore,
        api: Arc<MockProjectApi>,
        navigator: Arc<RecordingNavigator>,
        notifications: Arc<Mutex<Vec<Notification>>>,
        events: Arc<Mutex<Vec<StoreEvent>>>,
        emissions: Arc<Mutex<Vec<Vec<Project>>>>,
        _subscriptions: Vec<Subscription>,
    }

    fn fixture(api: MockProjectApi) -> Fixture {
        let api = Arc::new(api);
        let navigator = Arc::new(RecordingNavigator::default());
        let store = ProjectStore::new(api.clone(), navigator.clone());

        let notifications = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let emissions = Arc::new(Mutex::new(Vec::new()));
        let (n, e, l) = (notifications.clone(), events.clone(), emissions.clone());
        let subscriptions = vec![
            store.subscribe_notifications(move |x| n.lock().unwrap().push(x.clone())),
            store.subscribe_events(move |x| e.lock().unwrap().push(x.clone())),
            store.subscribe_projects(move |x| l.lock().unwrap().push(x.clone())),
        ];

        Fixture {
            store,
            api,
            navigator,
            notifications,
            events,
            emissions,
            _subscriptions: subscriptions,
        }
    }

    async fn seeded(api: MockProjectApi, projects: Vec<Project>) -> Fixture {
        api.lists.lock().unwrap().push_front(Ok(projects));
        let fx = fixture(api);
        fx.store.fetch_all().await.unwrap();
        fx.emissions.lock().unwrap().clear();
        fx
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_rather_than_merges() {
        let fx = fixture(MockProjectApi::with_lists(vec![
            Ok(vec![project("p1", "u1"), project("p2", "u1")]),
            Ok(vec![project("p3", "u2")]),
        ]));

        fx.store.fetch_all().await.unwrap();
        assert_eq!(fx.store.len(), 2);

        fx.store.fetch_all().await.unwrap();
        assert_eq!(fx.store.projects(), vec![project("p3", "u2")]);
        assert_eq!(fx.emissions.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_cache() {
        let fx = fixture(MockProjectApi::with_lists(vec![
            Ok(vec![project("p1", "u1")]),
            Err(ShowcaseError::transport("connection refused")),
        ]));

        fx.store.fetch_all().await.unwrap();
        assert!(fx.store.fetch_all().await.is_err());
        assert_eq!(fx.store.projects(), vec![project("p1", "u1")]);
    }

    #[tokio::test]
    async fn test_fetch_failures_publish_one_error_notification() {
        let fx = fixture(MockProjectApi::with_lists(vec![
            Err(ShowcaseError::transport("connection refused")),
            Err(ShowcaseError::http(500, "boom")),
            Err(ShowcaseError::http(404, "missing")),
        ]));

        assert!(fx.store.fetch_all().await.is_err());
        {
            let notifications = fx.notifications.lock().unwrap();
            assert_eq!(notifications.len(), 1);
            assert!(notifications[0].is_error());
            assert_eq!(notifications[0].detail, LOAD_FAILED);
        }

        assert!(fx.store.fetch_by_creator("u1").await.is_err());
        assert!(fx.store.fetch_one("p1").await.is_err());

        let notifications = fx.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 3);
        assert_eq!(notifications[1].detail, LOAD_FAILED);
        assert_eq!(notifications[2].detail, LOAD_ONE_FAILED);
        assert!(fx.emissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_creator_replaces_cache_with_subset() {
        let all = vec![project("p1", "u1"), project("p2", "u2")];
        let fx = seeded(MockProjectApi::with_lists(vec![Ok(all.clone())]), all).await;
        assert_eq!(fx.store.len(), 2);

        let mine = fx.store.fetch_by_creator("u2").await.unwrap();
        assert_eq!(mine, vec![project("p2", "u2")]);
        assert_eq!(fx.store.projects(), mine);
    }

    #[tokio::test]
    async fn test_fetch_one_does_not_touch_cache() {
        let fx = fixture(MockProjectApi::with_lists(vec![Ok(vec![project("p1", "u1")])]));

        let found = fx.store.fetch_one("p1").await.unwrap();
        assert_eq!(found.id.as_deref(), Some("p1"));
        assert!(fx.store.is_empty());
        assert!(fx.emissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_confirmed_project() {
        let api = MockProjectApi::default();
        *api.create_result.lock().unwrap() = Some(Ok(confirmation(Some("p9"), &["/img/a.png"])));
        let fx = seeded(api, vec![project("p1", "u1")]).await;

        let mut draft = project("ignored", "u1");
        draft.id = None;
        let created = fx.store.create(draft, &[]).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("p9"));
        assert_eq!(created.images_paths, vec!["/img/a.png"]);
        assert_eq!(fx.store.len(), 2);
        assert_eq!(
            fx.store
                .projects()
                .iter()
                .filter(|p| p.id.as_deref() == Some("p9"))
                .count(),
            1
        );
        assert_eq!(*fx.events.lock().unwrap(), vec![StoreEvent::Created(created)]);
        assert_eq!(fx.emissions.lock().unwrap().len(), 1);
        assert!(fx.notifications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_leaves_cache_unchanged() {
        let api = MockProjectApi::default();
        *api.create_result.lock().unwrap() = Some(Err(ShowcaseError::http(500, "boom")));
        let fx = seeded(api, vec![project("p1", "u1")]).await;

        assert!(fx.store.create(project("x", "u1"), &[]).await.is_err());

        assert_eq!(fx.store.len(), 1);
        let notifications = fx.notifications.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].is_error());
        assert_eq!(notifications[0].detail, "Projekt konnte nicht erstellt werden.");
        assert!(fx.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_confirmation_without_id_is_failure() {
        let api = MockProjectApi::default();
        *api.create_result.lock().unwrap() = Some(Ok(confirmation(None, &[])));
        let fx = fixture(api);

        let error = fx.store.create(project("x", "u1"), &[]).await.unwrap_err();

        assert!(matches!(error, ShowcaseError::Internal(_)));
        assert!(fx.store.is_empty());
        assert!(fx.notifications.lock().unwrap()[0].is_error());
    }

    #[tokio::test]
    async fn test_update_replaces_entry_in_place() {
        let api = MockProjectApi::default();
        *api.update_result.lock().unwrap() = Some(Ok(confirmation(Some("p2"), &["/img/new.png"])));
        let fx = seeded(
            api,
            vec![project("p1", "u1"), project("p2", "u1"), project("p3", "u1")],
        )
        .await;

        let mut edited = project("p2", "u1");
        edited.title = "Renamed".into();
        let updated = fx.store.update(edited, &[]).await.unwrap();

        let cached = fx.store.projects();
        assert_eq!(cached.len(), 3);
        assert_eq!(cached[1].title, "Renamed");
        assert_eq!(cached[1].images_paths, vec!["/img/new.png"]);
        assert_eq!(*fx.events.lock().unwrap(), vec![StoreEvent::Updated(updated)]);
        assert_eq!(
            fx.notifications.lock().unwrap()[0],
            Notification::success("Projekt geändert.")
        );
    }

    #[tokio::test]
    async fn test_update_appends_uncached_project() {
        let api = MockProjectApi::default();
        *api.update_result.lock().unwrap() = Some(Ok(confirmation(Some("p7"), &[])));
        let fx = seeded(api, vec![project("p1", "u1")]).await;

        fx.store.update(project("p7", "u1"), &[]).await.unwrap();
        assert_eq!(fx.store.len(), 2);
    }

    #[tokio::test]
    async fn test_update_without_id_makes_no_remote_call() {
        let fx = fixture(MockProjectApi::default());
        let mut draft = project("p1", "u1");
        draft.id = None;

        let error = fx.store.update(draft, &[]).await.unwrap_err();

        assert!(error.is_validation());
        assert_eq!(fx.api.remote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            fx.notifications.lock().unwrap()[0].detail,
            "Projekt konnte nicht geändert werden."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_removes_entry_and_navigates_home() {
        let api = MockProjectApi::default();
        *api.delete_result.lock().unwrap() = Some(Ok(()));
        let fx = seeded(api, vec![project("p1", "u1"), project("p2", "u1")]).await;

        fx.store.delete("p1").await.unwrap();

        assert_eq!(fx.store.len(), 1);
        assert!(fx.store.projects().iter().all(|p| p.id.as_deref() != Some("p1")));
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![StoreEvent::Deleted("p1".into())]
        );
        assert_eq!(fx.notifications.lock().unwrap()[0].detail, "Projekt gelöscht.");

        assert!(fx.navigator.routes.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert_eq!(*fx.navigator.routes.lock().unwrap(), vec![Route::Home]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_failure_leaves_cache_unchanged() {
        let api = MockProjectApi::default();
        *api.delete_result.lock().unwrap() = Some(Err(ShowcaseError::http(403, "forbidden")));
        let fx = seeded(api, vec![project("p1", "u1")]).await;

        assert!(fx.store.delete("p1").await.is_err());

        assert_eq!(fx.store.len(), 1);
        assert_eq!(
            fx.notifications.lock().unwrap()[0].detail,
            "Projekt konnte nicht gelöscht werden."
        );
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(fx.navigator.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listeners_run_in_registration_order() {
        let fx = fixture(MockProjectApi::with_lists(vec![Ok(vec![project("p1", "u1")])]));
        let order = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        let _first = fx.store.subscribe_projects(move |_| a.lock().unwrap().push("first"));
        let _second = fx.store.subscribe_projects(move |_| b.lock().unwrap().push("second"));

        fx.store.fetch_all().await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }
}
