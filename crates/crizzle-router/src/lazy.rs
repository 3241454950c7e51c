use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

use crate::route::RouteDefinition;

/// A view's code could not be fetched or initialised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load view for route `{route}`: {reason}")]
    Failed { route: &'static str, reason: String },
}

impl LoadError {
    pub fn failed(route: &'static str, reason: impl Into<String>) -> Self {
        Self::Failed {
            route,
            reason: reason.into(),
        }
    }
}

/// Produces the view for a route on first activation.
///
/// Closures `Fn(RouteDefinition) -> impl Future<Output = Result<V, LoadError>>`
/// implement this directly.
pub trait ViewLoader<V> {
    fn load(&self, route: RouteDefinition) -> LocalBoxFuture<'static, Result<V, LoadError>>;
}

impl<V, F, Fut> ViewLoader<V> for F
where
    F: Fn(RouteDefinition) -> Fut,
    Fut: Future<Output = Result<V, LoadError>> + 'static,
{
    fn load(&self, route: RouteDefinition) -> LocalBoxFuture<'static, Result<V, LoadError>> {
        (self)(route).boxed_local()
    }
}

type PendingLoad<V> = Shared<LocalBoxFuture<'static, Result<V, LoadError>>>;

enum LazyView<V> {
    Loading(PendingLoad<V>),
    Resolved(V),
}

/// Observable state of a single route's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unresolved,
    Loading,
    Resolved,
}

/// Deferred-resolution cache of views keyed by route name.
///
/// Each route moves `Unresolved -> Loading -> Resolved`. Concurrent requests
/// for a route that is still loading await the same in-flight load, so the
/// loader runs at most once per route. A failed load puts the route back to
/// `Unresolved`; the next request tries again.
pub struct ViewCache<V: Clone + 'static> {
    loader: Rc<dyn ViewLoader<V>>,
    slots: RefCell<HashMap<&'static str, LazyView<V>>>,
}

impl<V: Clone + 'static> ViewCache<V> {
    pub fn new(loader: impl ViewLoader<V> + 'static) -> Self {
        Self {
            loader: Rc::new(loader),
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn state(&self, name: &str) -> ViewState {
        match self.slots.borrow().get(name) {
            None => ViewState::Unresolved,
            Some(LazyView::Loading(_)) => ViewState::Loading,
            Some(LazyView::Resolved(_)) => ViewState::Resolved,
        }
    }

    /// Returns the already resolved view, without starting a load.
    pub fn peek(&self, name: &str) -> Option<V> {
        match self.slots.borrow().get(name) {
            Some(LazyView::Resolved(view)) => Some(view.clone()),
            _ => None,
        }
    }

    /// Resolves the view for `route`, loading it if this is the first request.
    pub async fn get(&self, route: RouteDefinition) -> Result<V, LoadError> {
        let pending = {
            let mut slots = self.slots.borrow_mut();
            match slots.get(route.name) {
                Some(LazyView::Resolved(view)) => return Ok(view.clone()),
                Some(LazyView::Loading(pending)) => {
                    log::debug!("view `{}` already loading, joining", route.name);
                    pending.clone()
                }
                None => {
                    log::debug!("loading view `{}`", route.name);
                    let pending = self.loader.load(route).shared();
                    slots.insert(route.name, LazyView::Loading(pending.clone()));
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slots = self.slots.borrow_mut();
        let still_ours = matches!(
            slots.get(route.name),
            Some(LazyView::Loading(current)) if current.ptr_eq(&pending)
        );
        if still_ours {
            match &result {
                Ok(view) => {
                    log::debug!("view `{}` resolved", route.name);
                    slots.insert(route.name, LazyView::Resolved(view.clone()));
                }
                Err(err) => {
                    log::error!("{}", err);
                    slots.remove(route.name);
                }
            }
        }
        result
    }
}
