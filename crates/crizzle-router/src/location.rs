use std::rc::Rc;

use leptos::prelude::{Effect, GetUntracked, Track};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::location::Location;
use leptos_router::NavigateOptions as RouterNavigateOptions;

use crate::base_path::BasePath;
use crate::context::{provide_router, RouterHandle};
use crate::history::{History, HistoryError};
use crate::lazy::ViewLoader;
use crate::router::Router;
use crate::table::RouteTable;

/// The history of the enclosing `leptos_router` `<Router>`.
///
/// `leptos_router` owns the browser History API: it writes the entries,
/// listens for `popstate` and intercepts clicks on same-origin links below
/// the base path. Must be created inside `<Router>`.
#[derive(Clone)]
pub struct LocationHistory {
    location: Location,
    navigate: Rc<dyn Fn(&str, RouterNavigateOptions)>,
}

impl LocationHistory {
    pub fn new() -> Self {
        Self {
            location: use_location(),
            navigate: Rc::new(use_navigate()),
        }
    }

    fn go(&self, url: &str, replace: bool) {
        // Router URLs already carry the base path; resolving would add it twice.
        (self.navigate)(
            url,
            RouterNavigateOptions {
                resolve: false,
                replace,
                ..RouterNavigateOptions::default()
            },
        );
    }
}

impl Default for LocationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for LocationHistory {
    fn location(&self) -> String {
        compose_url(
            &self.location.pathname.get_untracked(),
            &self.location.search.get_untracked(),
            &self.location.hash.get_untracked(),
        )
    }

    fn push(&self, url: &str) -> Result<(), HistoryError> {
        self.go(url, false);
        Ok(())
    }

    fn replace(&self, url: &str) -> Result<(), HistoryError> {
        self.go(url, true);
        Ok(())
    }
}

/// Joins location parts given with or without their `?` and `#` markers.
fn compose_url(pathname: &str, search: &str, hash: &str) -> String {
    let mut url = if pathname.is_empty() {
        "/".to_string()
    } else {
        pathname.to_string()
    };
    let search = search.trim_start_matches('?');
    if !search.is_empty() {
        url.push('?');
        url.push_str(search);
    }
    let hash = hash.trim_start_matches('#');
    if !hash.is_empty() {
        url.push('#');
        url.push_str(hash);
    }
    url
}

/// Builds a router over the enclosing `<Router>`'s history and provides it
/// to every view below the current owner.
///
/// The router follows the location: the initial load, link clicks and
/// back/forward all activate through [`Router::sync_with_history`].
pub fn provide_location_router<V: Clone + Send + Sync + 'static>(
    table: RouteTable,
    base: BasePath,
    loader: impl ViewLoader<V> + 'static,
) -> RouterHandle<V> {
    let history = LocationHistory::new();
    let location = history.location.clone();
    let handle = provide_router(Router::new(table, base, history, loader));

    Effect::new(move |_| {
        location.pathname.track();
        location.search.track();
        location.hash.track();
        handle.sync();
    });
    handle
}
