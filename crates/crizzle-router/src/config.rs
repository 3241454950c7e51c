use crate::base_path::{BasePath, ConfigError};

/// Deployment settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix the app is served under (`BASE_URL`).
    pub base_path: BasePath,
    /// Id of the host element the root view is mounted into.
    pub mount_id: String,
    /// Production builds log quietly and register the service worker.
    pub production: bool,
    /// Service worker script, relative to the base path.
    pub service_worker: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: BasePath::root(),
            mount_id: "app".to_string(),
            production: false,
            service_worker: "service-worker.js".to_string(),
        }
    }
}

impl AppConfig {
    pub const BASE_URL: &'static str = "BASE_URL";
    pub const MOUNT_ID: &'static str = "CRIZZLE_MOUNT_ID";
    pub const PRODUCTION: &'static str = "CRIZZLE_PRODUCTION";

    /// Configuration baked in at compile time.
    ///
    /// `BASE_URL` comes from the build environment; release builds count as
    /// production unless `CRIZZLE_PRODUCTION` says otherwise.
    pub fn from_env() -> Result<Self, ConfigError> {
        let baked = |key: &str| match key {
            Self::BASE_URL => option_env!("BASE_URL").map(str::to_string),
            Self::MOUNT_ID => option_env!("CRIZZLE_MOUNT_ID").map(str::to_string),
            Self::PRODUCTION => option_env!("CRIZZLE_PRODUCTION")
                .map(str::to_string)
                .or_else(|| Some((!cfg!(debug_assertions)).to_string())),
            _ => None,
        };
        Self::from_lookup(baked)
    }

    /// Builds a configuration from any key lookup, falling back to defaults
    /// for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base) = lookup(Self::BASE_URL) {
            config.base_path = BasePath::parse(&base)?;
        }
        if let Some(id) = lookup(Self::MOUNT_ID).filter(|id| !id.trim().is_empty()) {
            config.mount_id = id.trim().to_string();
        }
        if let Some(flag) = lookup(Self::PRODUCTION) {
            config.production = parse_flag(Self::PRODUCTION, &flag)?;
        }
        Ok(config)
    }

    /// Verbosity for the logger: warnings only in production.
    pub fn log_level(&self) -> log::Level {
        if self.production {
            log::Level::Warn
        } else {
            log::Level::Debug
        }
    }

    pub fn service_worker_url(&self) -> String {
        self.base_path.asset(&self.service_worker)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
