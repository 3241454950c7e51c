use crizzle_router::prelude::*;
use crizzle_router::{AppContext, BasePath, ColorRole};
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, Style, Title};
use leptos_router::components::Router;
use reactive_stores::Store;

use crate::routes::{load_view, AppRoutes};
use crate::state::{provide_app_state, record_visit, AppState, AppStateStoreFields};

/// Root view: installs theme and state, then hands the address bar to
/// `leptos_router` under the configured base path.
#[component]
pub fn App(context: AppContext) -> impl IntoView {
    provide_meta_context();

    let AppContext { config, theme } = context;
    let css = theme.css_variables();
    let primary = theme
        .color(ColorRole::Primary)
        .map(|color| color.to_string())
        .unwrap_or_default();
    provide_theme(theme);
    provide_app_state();

    let base = config.base_path.clone();
    let router_base = if base.is_root() {
        String::new()
    } else {
        base.to_string()
    };

    view! {
        <Meta charset="UTF-8"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1.0"/>
        <Title formatter=|title: String| format!("{title} | Crizzle")/>
        <Style id="crizzle-theme">{css}</Style>

        <Router base=router_base>
            <Shell base=base primary=primary/>
        </Router>
    }
}

/// Everything that needs the router: the drawer links and the outlet.
#[component]
fn Shell(base: BasePath, primary: String) -> impl IntoView {
    let table = match AppRoutes::route_table() {
        Ok(table) => table,
        Err(err) => {
            log::error!("route table rejected: {}", err);
            return view! { <p class="p-4 text-red-600">"Navigation is unavailable: " {err.to_string()}</p> }
                .into_any();
        }
    };
    let handle = provide_location_router(table, base, load_view);

    let state = expect_context::<Store<AppState>>();
    let active = handle.router().active();
    Effect::new(move |_| {
        if let Some(name) = active.with(|active| active.as_ref().map(|a| a.route.name)) {
            state.visited().update(|visited| record_visit(visited, name));
        }
    });

    view! {
        <div class="flex min-h-screen">
            <NavDrawer primary=primary/>
            <main class="flex-1">
                <RouterOutlet/>
            </main>
        </div>
    }
    .into_any()
}

#[component]
fn NavDrawer(primary: String) -> impl IntoView {
    let state = expect_context::<Store<AppState>>();
    let open = state.drawer_open();

    view! {
        <nav
            class="w-56 text-white"
            class:collapsed=move || !open.get()
            style:background-color=primary
        >
            <button class="p-2" on:click=move |_| open.update(|open| *open = !*open)>
                "Menu"
            </button>
            <ul>
                {AppRoutes::sections()
                    .map(|route| {
                        view! {
                            <li>
                                <Link to=route class="block px-4 py-2 hover:opacity-75">
                                    {route.title()}
                                </Link>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
