mod base_path;
mod bootstrap;
mod components;
mod config;
mod context;
mod history;
mod lazy;
mod location;
mod route;
mod router;
mod table;
mod target;
mod theme;

pub use crizzle_router_macro::Routable;
pub use base_path::{BasePath, ConfigError};
pub use bootstrap::{AppContext, AssetCache, Bootstrap, BootstrapError, HostPage, Started};
pub use components::{Link, LinkProps, RouterOutlet, RouterOutletProps};
pub use config::AppConfig;
pub use context::{provide_router, use_router, RouterHandle};
pub use history::{History, HistoryError, MemoryHistory};
pub use lazy::{LoadError, ViewCache, ViewLoader, ViewState};
pub use location::{provide_location_router, LocationHistory};
pub use route::{normalize_path, RouteDefinition, RouteError, CATCH_ALL};
pub use router::{ActiveRoute, NavigateError, Navigation, NavigationFailure, Router};
pub use table::{RouteTable, TableError};
pub use target::{NavigateOptions, Target};
pub use theme::{provide_theme, use_theme, Color, ColorRole, Theme, ThemeError};

/// A router whose views are Leptos view functions.
pub type ViewRouter = Router<::leptos::children::ViewFn>;

/// A static route enum, usually implemented with `#[derive(Routable)]`.
///
/// Each variant maps to one path and one symbolic name; an optional
/// `#[fallback]` variant is shown when nothing matches.
pub trait Routable: Copy + Eq + Into<Target> + 'static {
    /// Every variant in declaration order.
    const ALL: &'static [Self];

    /// The route's path; [`CATCH_ALL`] for the fallback, which has no URL of
    /// its own. The derived `Display` writes this value, so the fallback
    /// displays as `*`. Use [`Routable::name`] to label it.
    fn path(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Human readable title, e.g. for the document title.
    fn title(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;

    fn fallback() -> Option<Self>;

    fn is_fallback(&self) -> bool {
        Self::fallback() == Some(*self)
    }

    fn definition(&self) -> RouteDefinition {
        if self.is_fallback() {
            RouteDefinition::fallback(self.name())
        } else {
            RouteDefinition::new(self.path(), self.name())
        }
    }

    /// The variant a resolved definition refers to.
    fn from_definition(route: &RouteDefinition) -> Option<Self> {
        Self::from_name(route.name)
    }

    /// Builds the validated route table for this enum.
    fn route_table() -> Result<RouteTable, TableError> {
        let table = RouteTable::new(
            Self::ALL
                .iter()
                .filter(|route| !route.is_fallback())
                .map(|route| route.definition()),
        )?;
        match Self::fallback() {
            Some(fallback) => table.with_fallback(fallback.name()),
            None => Ok(table),
        }
    }
}

pub mod prelude {
    pub use super::{
        provide_location_router, provide_router, provide_theme, use_router, use_theme, Link,
        NavigateOptions, Routable, RouterOutlet, Target, Theme, ViewRouter,
    };
}
