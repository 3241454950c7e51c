use leptos::children::{Children, ViewFn};
use leptos::prelude::*;
use leptos_router::components::{Route, Routes, A};
use leptos_router::path;

use crate::context::use_router;
use crate::target::Target;

/// Renders the active route's view, a loading indicator while the next view
/// is fetched, and the last navigation failure with a retry button.
///
/// Must be placed inside a `leptos_router` `<Router>`: the outlet is the one
/// catch-all route, so every location change completes through it.
#[component]
pub fn RouterOutlet(
    /// Shown instead of the default indicator while a view is loading.
    #[prop(optional, into)]
    loading: Option<ViewFn>,
) -> impl IntoView {
    let fallback = {
        let loading = loading.clone();
        move || view! { <ActiveView loading=loading.clone() /> }
    };
    let active_view = move || view! { <ActiveView loading=loading.clone() /> };

    view! {
        <Routes fallback=fallback>
            <Route path=path!("/*any") view=active_view />
        </Routes>
    }
}

#[component]
fn ActiveView(loading: Option<ViewFn>) -> impl IntoView {
    let Some(handle) = use_router::<ViewFn>() else {
        log::error!("<RouterOutlet/> rendered without a router in context");
        return view! { <p class="router-error">"Navigation is unavailable."</p> }.into_any();
    };
    let router = handle.router();
    let active = router.active();
    let active_name = active.clone();
    let pending = router.pending();
    let failure = router.failure();

    view! {
        {move || {
            pending
                .get()
                .map(|route| match loading.clone() {
                    Some(loading) => loading.run(),
                    None => {
                        view! {
                            <div class="router-loading" aria-busy="true">
                                "Loading " {route.name} "..."
                            </div>
                        }
                            .into_any()
                    }
                })
        }}
        {move || {
            failure
                .get()
                .map(|failure| {
                    view! {
                        <div class="router-failure" role="alert">
                            <p>{failure.error.to_string()}</p>
                            <button on:click=move |_| handle.retry()>"Retry"</button>
                        </div>
                    }
                })
        }}
        <div
            class="router-view"
            data-route=move || active_name.with(|a| a.as_ref().map(|a| a.route.name))
        >
            {move || active.get().map(|active| active.view.run())}
        </div>
    }
    .into_any()
}

/// Base-path aware anchor over `leptos_router`'s `<A>`.
///
/// Plain left clicks navigate in place and modified clicks open the link
/// the browser's way. Carries `aria-current="page"` while its URL is shown.
#[component]
pub fn Link(
    #[prop(into)] to: Target,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let href = match use_router::<ViewFn>() {
        Some(handle) => handle.router().href(&to).unwrap_or_else(|err| {
            log::warn!("link to {:?} has no URL: {}", to, err);
            "#".to_string()
        }),
        None => {
            log::error!("<Link/> rendered without a router in context");
            "#".to_string()
        }
    };

    view! {
        <A href=href exact=true attr:class=class>
            {children()}
        </A>
    }
}
