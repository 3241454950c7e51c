use crizzle_frontend::app::App;
use crizzle_frontend::platform::{DocumentHost, ServiceWorker};
use crizzle_router::{AppConfig, Bootstrap, HostPage};
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let _ = console_log::init_with_level(log::Level::Error);
            log::error!("invalid build configuration: {}", err);
            DocumentHost.report_fatal(&format!("Crizzle could not start: {}.", err));
            return;
        }
    };
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(config.log_level());

    let started = Bootstrap::new(config, DocumentHost, ServiceWorker).run(|element, context| {
        leptos::mount::mount_to(element, move || view! { <App context=context/> }).forget();
    });
    match started {
        Ok(started) => log::debug!("started: {:?}", started),
        Err(err) => log::error!("startup aborted: {}", err),
    }
}
