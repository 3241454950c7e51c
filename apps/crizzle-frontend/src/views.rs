use crizzle_router::prelude::*;
use crizzle_router::ColorRole;
use leptos::children::{Children, ViewFn};
use leptos::prelude::*;
use leptos_meta::Title;
use reactive_stores::Store;

use crate::routes::AppRoutes;
use crate::state::{AppState, AppStateStoreFields, TradingStateStoreFields};

// ============================================================================
// Layout shared by the sections
// ============================================================================

#[component]
fn Section(route: AppRoutes, children: Children) -> impl IntoView {
    let accent = use_theme()
        .and_then(|theme| theme.color(ColorRole::Accent).map(|color| color.to_string()))
        .unwrap_or_default();

    view! {
        <Title text=route.title()/>
        <section class="p-4" data-section=route.name()>
            <h1 class="text-2xl font-bold border-b-2" style:border-color=accent>
                {route.title()}
            </h1>
            {children()}
        </section>
    }
}

/// Sections the user opened recently, newest first.
#[component]
fn RecentlyVisited() -> impl IntoView {
    let state = expect_context::<Store<AppState>>();

    view! {
        <ul class="mt-4 text-sm text-gray-600">
            {move || {
                state
                    .visited()
                    .get()
                    .into_iter()
                    .rev()
                    .filter_map(|name| AppRoutes::from_name(&name))
                    .filter(|route| !route.is_fallback())
                    .map(|route| view! { <li><Link to=route>{route.title()}</Link></li> })
                    .collect_view()
            }}
        </ul>
    }
}

// ============================================================================
// Sections
// ============================================================================

#[component]
pub fn HomeView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Home>
            <p>"Collect market data, research strategies and run them live."</p>
            <RecentlyVisited/>
        </Section>
    }
}

#[component]
pub fn DataView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Data>
            <p>"Exchanges, symbols and the candles collected for them."</p>
        </Section>
    }
}

#[component]
pub fn ResearchView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Research>
            <p>"Notebooks and indicators for exploring collected data."</p>
        </Section>
    }
}

#[component]
pub fn PortfolioView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Portfolio>
            <p>"Balances and open positions across accounts."</p>
        </Section>
    }
}

#[component]
pub fn BacktestingView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Backtesting>
            <p>"Replay strategies against historical data."</p>
        </Section>
    }
}

#[component]
pub fn TradingView() -> impl IntoView {
    let state = expect_context::<Store<AppState>>();
    let paper_mode = state.trading().paper_mode();

    view! {
        <Section route=AppRoutes::Trading>
            <p>
                {move || {
                    if paper_mode.get() {
                        "Orders are simulated (paper trading)."
                    } else {
                        "Orders are sent to the exchange."
                    }
                }}
            </p>
            <button
                class="mt-2 px-4 py-2 rounded border"
                on:click=move |_| paper_mode.update(|paper| *paper = !*paper)
            >
                {move || if paper_mode.get() { "Go live" } else { "Back to paper trading" }}
            </button>
        </Section>
    }
}

#[component]
pub fn ConfigurationView() -> impl IntoView {
    let variables = use_theme().map(|theme| theme.css_variables()).unwrap_or_default();

    view! {
        <Section route=AppRoutes::Configuration>
            <p>"Credentials, data sources and theme."</p>
            <pre class="mt-4 text-xs">{variables}</pre>
        </Section>
    }
}

#[component]
pub fn DocsView() -> impl IntoView {
    view! {
        <Section route=AppRoutes::Docs>
            <p>"Guides for writing strategies and deploying bots."</p>
        </Section>
    }
}

#[component]
pub fn NotFoundView() -> impl IntoView {
    let requested = use_router::<ViewFn>()
        .and_then(|handle| handle.router().current_url())
        .unwrap_or_default();

    view! {
        <Section route=AppRoutes::NotFound>
            <p>"Nothing lives at " <code>{requested}</code> "."</p>
            <Link to=AppRoutes::Home>"Back to the dashboard"</Link>
        </Section>
    }
}
