use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use leptos::prelude::{ArcReadSignal, ArcRwSignal, Set, WithUntracked};

use crate::base_path::BasePath;
use crate::history::{History, HistoryError};
use crate::lazy::{LoadError, ViewCache, ViewLoader, ViewState};
use crate::route::{RouteDefinition, RouteError};
use crate::table::RouteTable;
use crate::target::{NavigateOptions, Target};

/// Everything that can stop a navigation from committing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigateError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Outcome of a navigation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The route's view is now active and the history shows `url`.
    Activated { route: RouteDefinition, url: String },
    /// A newer navigation was requested while this one was loading.
    Superseded,
}

/// The route currently on screen together with its resolved view.
#[derive(Clone)]
pub struct ActiveRoute<V> {
    pub route: RouteDefinition,
    pub url: String,
    pub view: V,
}

impl<V> fmt::Debug for ActiveRoute<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRoute")
            .field("route", &self.route)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Navigate(Target, NavigateOptions),
    Sync,
}

/// The last navigation that failed, kept so it can be shown and retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationFailure {
    pub error: NavigateError,
    request: Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    Keep,
}

struct Inner<V: Clone + Send + Sync + 'static> {
    table: RouteTable,
    base: BasePath,
    history: Box<dyn History>,
    views: ViewCache<V>,
    generation: Cell<u64>,
    active: ArcRwSignal<Option<ActiveRoute<V>>>,
    pending: ArcRwSignal<Option<RouteDefinition>>,
    failure: ArcRwSignal<Option<NavigationFailure>>,
}

/// Resolves navigation targets, loads views on demand and keeps the history
/// in step with the active view.
///
/// Cloning is cheap; clones drive the same state. Overlapping navigations are
/// settled last-requested-wins: a navigation whose view finishes loading after
/// a newer one was requested reports [`Navigation::Superseded`] and changes
/// nothing.
pub struct Router<V: Clone + Send + Sync + 'static> {
    inner: Rc<Inner<V>>,
}

impl<V: Clone + Send + Sync + 'static> Clone for Router<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Router<V> {
    pub fn new(
        table: RouteTable,
        base: BasePath,
        history: impl History + 'static,
        loader: impl ViewLoader<V> + 'static,
    ) -> Self {
        log::debug!("router created with {} routes under `{}`", table.len(), base);
        Self {
            inner: Rc::new(Inner {
                table,
                base,
                history: Box::new(history),
                views: ViewCache::new(loader),
                generation: Cell::new(0),
                active: ArcRwSignal::new(None),
                pending: ArcRwSignal::new(None),
                failure: ArcRwSignal::new(None),
            }),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    pub fn base(&self) -> &BasePath {
        &self.inner.base
    }

    /// The route on screen, tracked reactively.
    pub fn active(&self) -> ArcReadSignal<Option<ActiveRoute<V>>> {
        self.inner.active.read_only()
    }

    /// The route whose view is being loaded for the newest navigation.
    pub fn pending(&self) -> ArcReadSignal<Option<RouteDefinition>> {
        self.inner.pending.read_only()
    }

    pub fn failure(&self) -> ArcReadSignal<Option<NavigationFailure>> {
        self.inner.failure.read_only()
    }

    pub fn current(&self) -> Option<RouteDefinition> {
        self.inner
            .active
            .with_untracked(|active| active.as_ref().map(|a| a.route))
    }

    /// URL of the active route as the history shows it.
    pub fn current_url(&self) -> Option<String> {
        self.inner
            .active
            .with_untracked(|active| active.as_ref().map(|a| a.url.clone()))
    }

    pub fn view_state(&self, name: &str) -> ViewState {
        self.inner.views.state(name)
    }

    /// URL a link to `target` should carry, base path included. Paths are
    /// already URLs and are returned as given.
    pub fn href(&self, target: &Target) -> Result<String, RouteError> {
        match target {
            Target::Path(url) => Ok(url.to_string()),
            Target::Name(_) => {
                let route = self.inner.table.lookup(target)?;
                if route.is_fallback() {
                    return Err(RouteError::UnknownName {
                        name: route.name.to_string(),
                    });
                }
                Ok(self.inner.base.join(route.path))
            }
        }
    }

    /// Navigates to a URL path (base path included) or a route name. Paths
    /// outside the base path are not found.
    pub async fn navigate(
        &self,
        target: impl Into<Target>,
        options: NavigateOptions,
    ) -> Result<Navigation, NavigateError> {
        let target = target.into();
        let generation = self.begin();
        let planned = self.plan_target(&target);
        let mode = if options.replace {
            HistoryMode::Replace
        } else {
            HistoryMode::Push
        };
        self.activate(generation, Request::Navigate(target, options), planned, mode)
            .await
    }

    /// Activates whatever the history currently shows, without adding an
    /// entry. Used for the initial load, link clicks and back/forward.
    ///
    /// When the history already shows the active route this changes nothing,
    /// so a navigation still in flight is not superseded.
    pub async fn sync_with_history(&self) -> Result<Navigation, NavigateError> {
        let location = self.inner.history.location();
        if let Some(route) = self.shown_at(&location) {
            return Ok(Navigation::Activated {
                route,
                url: location,
            });
        }
        let generation = self.begin();
        let planned = self.plan_location(&location);
        self.activate(generation, Request::Sync, planned, HistoryMode::Keep)
            .await
    }

    /// Repeats the last failed navigation, if any.
    pub async fn retry(&self) -> Option<Result<Navigation, NavigateError>> {
        let request = self
            .inner
            .failure
            .with_untracked(|failure| failure.as_ref().map(|f| f.request.clone()))?;
        log::info!("retrying {:?}", request);
        let result = match request {
            Request::Navigate(target, options) => self.navigate(target, options).await,
            Request::Sync => self.sync_with_history().await,
        };
        Some(result)
    }

    fn shown_at(&self, location: &str) -> Option<RouteDefinition> {
        if self.inner.failure.with_untracked(Option::is_some) {
            return None;
        }
        self.inner.active.with_untracked(|active| {
            active
                .as_ref()
                .filter(|active| active.url == location)
                .map(|active| active.route)
        })
    }

    fn begin(&self) -> u64 {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.get() == generation
    }

    fn plan_target(&self, target: &Target) -> Result<(RouteDefinition, String), RouteError> {
        match target {
            Target::Name(_) => {
                let route = *self.inner.table.lookup(target)?;
                let url = if route.is_fallback() {
                    self.inner.history.location()
                } else {
                    self.inner.base.join(route.path)
                };
                Ok((route, url))
            }
            Target::Path(url) => self.plan_location(url),
        }
    }

    fn plan_location(&self, location: &str) -> Result<(RouteDefinition, String), RouteError> {
        let resolved = match self.inner.base.strip(location) {
            Some(relative) => self.inner.table.resolve(relative).copied(),
            None => Err(RouteError::NotFound {
                path: location.to_string(),
            }),
        };
        let route = self.or_fallback(resolved)?;
        Ok((route, location.to_string()))
    }

    fn or_fallback(
        &self,
        resolved: Result<RouteDefinition, RouteError>,
    ) -> Result<RouteDefinition, RouteError> {
        match resolved {
            Ok(route) => Ok(route),
            Err(err) => match self.inner.table.fallback() {
                Some(fallback) => {
                    log::warn!("{}, showing `{}`", err, fallback.name);
                    Ok(*fallback)
                }
                None => Err(err),
            },
        }
    }

    async fn activate(
        &self,
        generation: u64,
        request: Request,
        planned: Result<(RouteDefinition, String), RouteError>,
        mode: HistoryMode,
    ) -> Result<Navigation, NavigateError> {
        let (route, url) = match planned {
            Ok(planned) => planned,
            Err(err) => return Err(self.fail(generation, request, err.into())),
        };

        self.inner.pending.set(Some(route));
        let view = match self.inner.views.get(route).await {
            Ok(view) => view,
            Err(err) => return Err(self.fail(generation, request, err.into())),
        };

        if !self.is_current(generation) {
            log::warn!("navigation to `{}` superseded by a newer request", route.name);
            return Ok(Navigation::Superseded);
        }

        let written = match mode {
            HistoryMode::Push if self.inner.history.location() != url => {
                self.inner.history.push(&url)
            }
            HistoryMode::Replace => self.inner.history.replace(&url),
            HistoryMode::Push | HistoryMode::Keep => Ok(()),
        };
        if let Err(err) = written {
            return Err(self.fail(generation, request, err.into()));
        }

        log::info!("navigated to `{}` at {}", route.name, url);
        self.inner.pending.set(None);
        self.inner.failure.set(None);
        self.inner.active.set(Some(ActiveRoute {
            route,
            url: url.clone(),
            view,
        }));
        Ok(Navigation::Activated { route, url })
    }

    fn fail(&self, generation: u64, request: Request, error: NavigateError) -> NavigateError {
        log::error!("navigation failed: {}", error);
        if self.is_current(generation) {
            self.inner.pending.set(None);
            self.inner.failure.set(Some(NavigationFailure {
                error: error.clone(),
                request,
            }));
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::FutureExt;
    use leptos::prelude::GetUntracked;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::history::MemoryHistory;

    fn table() -> RouteTable {
        RouteTable::new([
            RouteDefinition::new("/", "home"),
            RouteDefinition::new("/data", "data"),
            RouteDefinition::new("/research", "research"),
            RouteDefinition::new("/docs", "docs"),
        ])
        .unwrap()
    }

    type Loads = Rc<RefCell<HashMap<&'static str, usize>>>;

    fn loader(loads: Loads) -> impl Fn(RouteDefinition) -> futures::future::Ready<Result<String, LoadError>> {
        move |route| {
            *loads.borrow_mut().entry(route.name).or_default() += 1;
            futures::future::ready(Ok(format!("{} view", route.name)))
        }
    }

    fn router(base: &str, location: &str) -> (Router<String>, MemoryHistory, Loads) {
        let history = MemoryHistory::new(location);
        let loads = Loads::default();
        let router = Router::new(
            table(),
            BasePath::parse(base).unwrap(),
            history.clone(),
            loader(loads.clone()),
        );
        (router, history, loads)
    }

    fn active_name<V: Clone + Send + Sync + 'static>(router: &Router<V>) -> Option<&'static str> {
        router.active().get_untracked().map(|a| a.route.name)
    }

    #[test]
    fn navigate_by_path_pushes_and_activates() {
        let (router, history, _) = router("/", "/");
        let outcome = block_on(router.navigate("/data", NavigateOptions::default())).unwrap();

        assert_eq!(
            outcome,
            Navigation::Activated {
                route: RouteDefinition::new("/data", "data"),
                url: "/data".to_string()
            }
        );
        assert_eq!(history.entries(), vec!["/", "/data"]);
        let active = router.active().get_untracked().unwrap();
        assert_eq!(active.view, "data view");
        assert_eq!(router.pending().get_untracked(), None);
    }

    #[test]
    fn navigate_by_name_uses_the_table_path() {
        let (router, history, _) = router("/", "/");
        block_on(router.navigate(Target::name("research"), NavigateOptions::default())).unwrap();
        assert_eq!(history.location(), "/research");
        assert_eq!(router.current().map(|r| r.name), Some("research"));
    }

    #[test]
    fn revisiting_a_route_does_not_reload_its_view() {
        let (router, _, loads) = router("/", "/");
        block_on(async {
            router.navigate("/data", NavigateOptions::default()).await.unwrap();
            router.navigate("/docs", NavigateOptions::default()).await.unwrap();
            router.navigate("/data", NavigateOptions::default()).await.unwrap();
        });
        assert_eq!(loads.borrow()["data"], 1);
        assert_eq!(loads.borrow()["docs"], 1);
        assert_eq!(router.view_state("data"), ViewState::Resolved);
        assert_eq!(router.view_state("research"), ViewState::Unresolved);
    }

    #[test]
    fn unknown_path_without_fallback_is_reported() {
        let (router, history, _) = router("/", "/");
        let err = block_on(router.navigate("/nonexistent", NavigateOptions::default())).unwrap_err();

        assert_eq!(
            err,
            NavigateError::Route(RouteError::NotFound {
                path: "/nonexistent".to_string()
            })
        );
        assert_eq!(history.entries(), vec!["/"]);
        assert_eq!(active_name(&router), None);
        assert_eq!(router.failure().get_untracked().map(|f| f.error), Some(err));
    }

    #[test]
    fn unknown_path_with_fallback_shows_it_at_the_requested_url() {
        let history = MemoryHistory::new("/");
        let router = Router::new(
            table().with_fallback("not_found").unwrap(),
            BasePath::root(),
            history.clone(),
            loader(Loads::default()),
        );
        let outcome = block_on(router.navigate("/nonexistent", NavigateOptions::default())).unwrap();

        assert_eq!(
            outcome,
            Navigation::Activated {
                route: RouteDefinition::fallback("not_found"),
                url: "/nonexistent".to_string()
            }
        );
        assert_eq!(history.location(), "/nonexistent");
        assert_eq!(router.current_url().as_deref(), Some("/nonexistent"));
    }

    #[test]
    fn unknown_name_is_an_error_even_with_fallback() {
        let router = Router::new(
            table().with_fallback("not_found").unwrap(),
            BasePath::root(),
            MemoryHistory::default(),
            loader(Loads::default()),
        );
        let err = block_on(router.navigate(Target::name("ghost"), NavigateOptions::default())).unwrap_err();
        assert!(matches!(err, NavigateError::Route(RouteError::UnknownName { .. })));
    }

    #[test]
    fn base_path_prefixes_history_and_links() {
        let (router, history, _) = router("/crizzle/", "/crizzle");
        block_on(router.navigate(Target::name("docs"), NavigateOptions::default())).unwrap();

        assert_eq!(history.location(), "/crizzle/docs");
        assert_eq!(router.href(&Target::name("data")).unwrap(), "/crizzle/data");
        assert_eq!(router.href(&Target::name("home")).unwrap(), "/crizzle");
        assert_eq!(
            router.href(&Target::path("/crizzle/data?range=1y")).unwrap(),
            "/crizzle/data?range=1y"
        );
    }

    #[test]
    fn navigate_strips_the_base_path_from_paths() {
        let (router, history, _) = router("/crizzle", "/crizzle");
        let outcome = block_on(router.navigate("/crizzle/docs", NavigateOptions::default())).unwrap();

        assert_eq!(
            outcome,
            Navigation::Activated {
                route: RouteDefinition::new("/docs", "docs"),
                url: "/crizzle/docs".to_string()
            }
        );
        assert_eq!(history.entries(), vec!["/crizzle", "/crizzle/docs"]);
    }

    #[test]
    fn navigate_outside_the_base_is_not_found() {
        let (router, history, _) = router("/crizzle", "/crizzle");
        let err = block_on(router.navigate("/docs", NavigateOptions::default())).unwrap_err();

        assert_eq!(
            err,
            NavigateError::Route(RouteError::NotFound {
                path: "/docs".to_string()
            })
        );
        assert_eq!(history.entries(), vec!["/crizzle"]);
    }

    #[test]
    fn sync_strips_the_base_path() {
        let (router, history, _) = router("/crizzle", "/crizzle/data?range=1y");
        let outcome = block_on(router.sync_with_history()).unwrap();

        assert_eq!(
            outcome,
            Navigation::Activated {
                route: RouteDefinition::new("/data", "data"),
                url: "/crizzle/data?range=1y".to_string()
            }
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn locations_outside_the_base_are_not_found() {
        let (router, _, _) = router("/crizzle", "/data");
        let err = block_on(router.sync_with_history()).unwrap_err();
        assert!(matches!(err, NavigateError::Route(RouteError::NotFound { .. })));
    }

    #[test]
    fn back_and_forward_activate_without_pushing() {
        let (router, history, _) = router("/", "/");
        block_on(async {
            router.sync_with_history().await.unwrap();
            router.navigate("/data", NavigateOptions::default()).await.unwrap();
            router.navigate("/docs", NavigateOptions::default()).await.unwrap();
        });

        assert!(history.back());
        block_on(router.sync_with_history()).unwrap();
        assert_eq!(active_name(&router), Some("data"));

        assert!(history.forward());
        block_on(router.sync_with_history()).unwrap();
        assert_eq!(active_name(&router), Some("docs"));
        assert_eq!(history.entries(), vec!["/", "/data", "/docs"]);
    }

    #[test]
    fn replace_rewrites_the_current_entry() {
        let (router, history, _) = router("/", "/");
        block_on(router.navigate("/data", NavigateOptions::default())).unwrap();
        block_on(router.navigate("/docs", NavigateOptions::replace())).unwrap();
        assert_eq!(history.entries(), vec!["/", "/docs"]);
    }

    #[test]
    fn navigating_to_the_shown_url_does_not_duplicate_it() {
        let (router, history, _) = router("/", "/data");
        block_on(router.navigate("/data", NavigateOptions::default())).unwrap();
        assert_eq!(history.entries(), vec!["/data"]);
    }

    #[test]
    fn last_requested_navigation_wins() {
        let (release, gate) = oneshot::channel::<()>();
        let gate = gate.shared();
        let slow_loader = move |route: RouteDefinition| {
            let gate = gate.clone();
            async move {
                if route.name == "data" {
                    let _ = gate.await;
                }
                Ok::<_, LoadError>(route.name.to_string())
            }
        };
        let history = MemoryHistory::new("/");
        let router = Router::new(table(), BasePath::root(), history.clone(), slow_loader);

        let (first, second) = block_on(async {
            futures::join!(router.navigate("/data", NavigateOptions::default()), async {
                let _ = release.send(());
                router.navigate("/docs", NavigateOptions::default()).await
            })
        });

        assert_eq!(first.unwrap(), Navigation::Superseded);
        assert!(matches!(second.unwrap(), Navigation::Activated { .. }));
        assert_eq!(active_name(&router), Some("docs"));
        assert_eq!(history.entries(), vec!["/", "/docs"]);
        // The superseded load still populated the cache.
        assert_eq!(router.view_state("data"), ViewState::Resolved);
    }

    #[test]
    fn sync_at_the_shown_url_leaves_a_pending_navigation_alone() {
        let (release, gate) = oneshot::channel::<()>();
        let gate = gate.shared();
        let slow_loader = move |route: RouteDefinition| {
            let gate = gate.clone();
            async move {
                if route.name == "docs" {
                    let _ = gate.await;
                }
                Ok::<_, LoadError>(route.name.to_string())
            }
        };
        let history = MemoryHistory::new("/");
        let router = Router::new(table(), BasePath::root(), history.clone(), slow_loader);
        block_on(router.navigate("/data", NavigateOptions::default())).unwrap();

        let (navigated, synced) = block_on(async {
            futures::join!(router.navigate("/docs", NavigateOptions::default()), async {
                let synced = router.sync_with_history().await;
                let _ = release.send(());
                synced
            })
        });

        assert_eq!(
            synced.unwrap(),
            Navigation::Activated {
                route: RouteDefinition::new("/data", "data"),
                url: "/data".to_string()
            }
        );
        assert!(matches!(navigated.unwrap(), Navigation::Activated { .. }));
        assert_eq!(active_name(&router), Some("docs"));
        assert_eq!(history.entries(), vec!["/", "/data", "/docs"]);
    }

    #[test]
    fn failed_load_keeps_previous_view_and_can_be_retried() {
        let attempts = Rc::new(Cell::new(0));
        let flaky_loader = {
            let attempts = attempts.clone();
            move |route: RouteDefinition| {
                let failing = route.name == "docs" && attempts.get() == 0;
                if route.name == "docs" {
                    attempts.set(attempts.get() + 1);
                }
                async move {
                    if failing {
                        Err(LoadError::failed(route.name, "chunk request timed out"))
                    } else {
                        Ok(route.name.to_string())
                    }
                }
            }
        };
        let history = MemoryHistory::new("/");
        let router = Router::new(table(), BasePath::root(), history.clone(), flaky_loader);

        block_on(router.navigate("/data", NavigateOptions::default())).unwrap();
        let err = block_on(router.navigate("/docs", NavigateOptions::default())).unwrap_err();

        assert!(matches!(err, NavigateError::Load(_)));
        assert_eq!(active_name(&router), Some("data"));
        assert_eq!(history.location(), "/data");
        assert!(router.failure().get_untracked().is_some());

        let retried = block_on(router.retry()).unwrap().unwrap();
        assert!(matches!(retried, Navigation::Activated { .. }));
        assert_eq!(active_name(&router), Some("docs"));
        assert_eq!(router.failure().get_untracked(), None);
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn retry_without_failure_does_nothing() {
        let (router, _, _) = router("/", "/");
        assert!(block_on(router.retry()).is_none());
    }
}
