use crizzle_router::prelude::Routable;
use std::str::FromStr;

#[derive(Routable, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TestRoutes {
    #[route(path = "/")]
    Home,

    #[route(path = "/data")]
    Data,

    #[route(path = "/backtesting", name = "backtests", title = "Backtests")]
    Backtesting,

    #[route(path = "/trading/live")]
    LiveTrading,

    #[fallback]
    NotFound,
}

/// No fallback, and an explicit runtime crate path.
#[derive(Routable, Clone, Copy, PartialEq, Eq, Debug)]
#[routes(crate = "::crizzle_router")]
pub enum DocsRoutes {
    #[route(path = "/docs")]
    Index,

    #[route(path = "/docs/getting-started")]
    GettingStarted,
}
