use leptos::prelude::{provide_context, use_context, GetValue, LocalStorage, StoredValue};
use leptos::task::spawn_local;

use crate::router::Router;
use crate::target::{NavigateOptions, Target};

/// Copyable handle to the router, handed to views through context.
///
/// The router itself is single-threaded, so it lives in local arena storage;
/// the handle can be captured freely by event handlers and reactive closures.
pub struct RouterHandle<V: Clone + Send + Sync + 'static> {
    router: StoredValue<Router<V>, LocalStorage>,
}

impl<V: Clone + Send + Sync + 'static> Clone for RouterHandle<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: Clone + Send + Sync + 'static> Copy for RouterHandle<V> {}

impl<V: Clone + Send + Sync + 'static> RouterHandle<V> {
    pub fn router(&self) -> Router<V> {
        self.router.get_value()
    }

    /// Starts a navigation on the local executor. Failures are kept in
    /// [`Router::failure`] for the outlet to show.
    pub fn navigate(&self, target: impl Into<Target>) {
        self.navigate_with_options(target, NavigateOptions::default());
    }

    pub fn navigate_with_options(&self, target: impl Into<Target>, options: NavigateOptions) {
        let router = self.router();
        let target = target.into();
        spawn_local(async move {
            if let Err(err) = router.navigate(target, options).await {
                log::warn!("navigation did not complete: {}", err);
            }
        });
    }

    /// Activates the location the history shows, e.g. after it changed.
    pub fn sync(&self) {
        let router = self.router();
        spawn_local(async move {
            if let Err(err) = router.sync_with_history().await {
                log::warn!("could not activate current location: {}", err);
            }
        });
    }

    pub fn retry(&self) {
        let router = self.router();
        spawn_local(async move {
            if let Some(Err(err)) = router.retry().await {
                log::warn!("retry failed: {}", err);
            }
        });
    }
}

/// Makes `router` available to every view below the current owner.
pub fn provide_router<V: Clone + Send + Sync + 'static>(router: Router<V>) -> RouterHandle<V> {
    let handle = RouterHandle {
        router: StoredValue::new_local(router),
    };
    provide_context(handle);
    handle
}

pub fn use_router<V: Clone + Send + Sync + 'static>() -> Option<RouterHandle<V>> {
    use_context::<RouterHandle<V>>()
}
