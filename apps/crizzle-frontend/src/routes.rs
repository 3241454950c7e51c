use crizzle_router::prelude::*;
use crizzle_router::{LoadError, RouteDefinition};
use leptos::children::ViewFn;
use leptos::prelude::lazy;

use crate::views::{
    BacktestingView, ConfigurationView, DataView, DocsView, HomeView, NotFoundView, PortfolioView,
    ResearchView, TradingView,
};

/// Top-level sections of the dashboard, one per navigation drawer entry.
#[derive(Routable, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppRoutes {
    #[route(path = "/")]
    Home,

    #[route(path = "/data")]
    Data,

    #[route(path = "/research")]
    Research,

    #[route(path = "/portfolio")]
    Portfolio,

    #[route(path = "/backtesting")]
    Backtesting,

    #[route(path = "/trading")]
    Trading,

    #[route(path = "/configuration")]
    Configuration,

    #[route(path = "/docs", title = "Documentation")]
    Docs,

    #[fallback]
    #[route(title = "Page Not Found")]
    NotFound,
}

impl AppRoutes {
    /// Routes shown in the navigation drawer.
    pub fn sections() -> impl Iterator<Item = Self> {
        Self::ALL.iter().copied().filter(|route| !route.is_fallback())
    }
}

// Each section's view is split into its own chunk in split builds and
// fetched on first activation.

#[lazy]
fn home_view() -> ViewFn {
    ViewFn::from(HomeView)
}

#[lazy]
fn data_view() -> ViewFn {
    ViewFn::from(DataView)
}

#[lazy]
fn research_view() -> ViewFn {
    ViewFn::from(ResearchView)
}

#[lazy]
fn portfolio_view() -> ViewFn {
    ViewFn::from(PortfolioView)
}

#[lazy]
fn backtesting_view() -> ViewFn {
    ViewFn::from(BacktestingView)
}

#[lazy]
fn trading_view() -> ViewFn {
    ViewFn::from(TradingView)
}

#[lazy]
fn configuration_view() -> ViewFn {
    ViewFn::from(ConfigurationView)
}

#[lazy]
fn docs_view() -> ViewFn {
    ViewFn::from(DocsView)
}

#[lazy]
fn not_found_view() -> ViewFn {
    ViewFn::from(NotFoundView)
}

/// Produces a route's view the first time it is activated. The router caches
/// the result, so this runs at most once per route unless it fails.
pub async fn load_view(route: RouteDefinition) -> Result<ViewFn, LoadError> {
    let section = AppRoutes::from_definition(&route)
        .ok_or_else(|| LoadError::failed(route.name, "no view is registered for this route"))?;
    log::debug!("loading view for {}", route);
    let view = match section {
        AppRoutes::Home => home_view().await,
        AppRoutes::Data => data_view().await,
        AppRoutes::Research => research_view().await,
        AppRoutes::Portfolio => portfolio_view().await,
        AppRoutes::Backtesting => backtesting_view().await,
        AppRoutes::Trading => trading_view().await,
        AppRoutes::Configuration => configuration_view().await,
        AppRoutes::Docs => docs_view().await,
        AppRoutes::NotFound => not_found_view().await,
    };
    Ok(view)
}
