use crate::config::AppConfig;
use crate::theme::Theme;

/// Startup failures. All of them abort initialisation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("mount element `#{id}` is missing from the host page")]
    MissingMountElement { id: String },
    #[error(transparent)]
    Config(#[from] crate::base_path::ConfigError),
}

/// The page the application is mounted into.
pub trait HostPage {
    type Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Shows a startup diagnostic to the user when mounting is impossible.
    fn report_fatal(&self, message: &str);
}

/// Background caching of the application's assets (a service worker in the
/// browser). Registration is fire-and-forget.
pub trait AssetCache {
    fn register(&self, script_url: &str);
}

/// Process-wide settings handed to the root view at mount time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    pub config: AppConfig,
    pub theme: Theme,
}

/// What a successful startup did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub mount_id: String,
    /// Service worker script registered, if any.
    pub service_worker: Option<String>,
}

/// One-time startup sequence: log level, theme, mount, asset cache.
///
/// Router and state store are created by the root view inside the mount
/// callback, so they live in the root reactive owner.
pub struct Bootstrap<H, A> {
    config: AppConfig,
    theme: Theme,
    host: H,
    assets: A,
}

impl<H: HostPage, A: AssetCache> Bootstrap<H, A> {
    pub fn new(config: AppConfig, host: H, assets: A) -> Self {
        Self {
            config,
            theme: Theme::crizzle(),
            host,
            assets,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Runs the sequence. `mount` receives the host element and the context
    /// the root view should provide to its children; it is called exactly
    /// once, and only if the element exists.
    pub fn run<F>(self, mount: F) -> Result<Started, BootstrapError>
    where
        F: FnOnce(H::Element, AppContext),
    {
        let Self {
            config,
            theme,
            host,
            assets,
        } = self;

        log::set_max_level(config.log_level().to_level_filter());
        log::info!(
            "starting under `{}` (production: {})",
            config.base_path,
            config.production
        );

        let Some(element) = host.element_by_id(&config.mount_id) else {
            let err = BootstrapError::MissingMountElement {
                id: config.mount_id.clone(),
            };
            log::error!("{}", err);
            host.report_fatal(&format!("Crizzle could not start: {}.", err));
            return Err(err);
        };

        let mount_id = config.mount_id.clone();
        let production = config.production;
        let service_worker = config.service_worker_url();
        mount(element, AppContext { config, theme });
        log::debug!("mounted into #{}", mount_id);

        let service_worker = if production {
            assets.register(&service_worker);
            Some(service_worker)
        } else {
            log::debug!("skipping service worker outside production");
            None
        };

        Ok(Started {
            mount_id,
            service_worker,
        })
    }
}
