use std::fmt;
use std::str::FromStr;

/// Errors raised while reading deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The base path contains characters that cannot appear in a path prefix.
    #[error("invalid base path `{0}`: expected a plain path such as `/` or `/crizzle/`")]
    InvalidBasePath(String),
    /// A boolean setting could not be parsed.
    #[error("invalid value `{value}` for `{key}`: expected true/false")]
    InvalidFlag { key: &'static str, value: String },
}

/// The prefix under which the whole application is served.
///
/// Stored normalised: either `/` or `/segment[/segment..]` without a trailing
/// slash. Every route match strips it, every generated link gets it back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasePath(String);

impl BasePath {
    /// The root base path, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Parses and normalises a deployment base such as `BASE_URL`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.contains("://")
            || trimmed.contains(['?', '#', ' ', '\\'])
        {
            return Err(ConfigError::InvalidBasePath(raw.to_string()));
        }

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(ConfigError::InvalidBasePath(raw.to_string()));
        }

        if segments.is_empty() {
            Ok(Self::root())
        } else {
            Ok(Self(format!("/{}", segments.join("/"))))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Removes the base from a browser location, yielding the app-relative
    /// path (query and fragment preserved). Locations outside the base yield
    /// [`None`].
    pub fn strip<'a>(&self, location: &'a str) -> Option<&'a str> {
        if self.is_root() {
            return Some(if location.is_empty() { "/" } else { location });
        }

        let rest = location.strip_prefix(self.0.as_str())?;
        match rest.chars().next() {
            None => Some("/"),
            Some('/') => Some(rest),
            // `/crizzle?x=1` addresses the root of the app.
            Some('?') | Some('#') => Some(rest),
            // `/crizzlefoo` shares the prefix but is not inside the base.
            Some(_) => None,
        }
    }

    /// Prefixes an app-relative path with the base.
    pub fn join(&self, nested: &str) -> String {
        let prefix = self.0.trim_end_matches('/');
        let nested = nested.trim_start_matches('/');

        let prefix_is_root = prefix.is_empty();
        let nested_is_root = nested.is_empty();

        match (prefix_is_root, nested_is_root) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{}", nested),
            (false, true) => prefix.to_string(),
            (false, false) if nested.starts_with(['?', '#']) => format!("{}{}", prefix, nested),
            (false, false) => format!("{}/{}", prefix, nested),
        }
    }

    /// URL of a file served next to the application, e.g. the service worker.
    ///
    /// Unlike [`BasePath::join`] this keeps the directory slash, matching how
    /// static assets are laid out under the base.
    pub fn asset(&self, file: &str) -> String {
        let file = file.trim_start_matches('/');
        if self.is_root() {
            format!("/{}", file)
        } else {
            format!("{}/{}", self.0, file)
        }
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for BasePath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_slashes() {
        assert_eq!(BasePath::parse("").unwrap().as_str(), "/");
        assert_eq!(BasePath::parse("/").unwrap().as_str(), "/");
        assert_eq!(BasePath::parse("/crizzle/").unwrap().as_str(), "/crizzle");
        assert_eq!(BasePath::parse("crizzle").unwrap().as_str(), "/crizzle");
        assert_eq!(BasePath::parse("//apps//crizzle/").unwrap().as_str(), "/apps/crizzle");
    }

    #[test]
    fn parse_rejects_urls_and_queries() {
        assert!(BasePath::parse("https://example.com/").is_err());
        assert!(BasePath::parse("/app?x=1").is_err());
        assert!(BasePath::parse("/app#top").is_err());
        assert!(BasePath::parse("/../etc").is_err());
    }

    #[test]
    fn strip_under_root() {
        let base = BasePath::root();
        assert_eq!(base.strip("/data"), Some("/data"));
        assert_eq!(base.strip(""), Some("/"));
    }

    #[test]
    fn strip_under_sub_path() {
        let base = BasePath::parse("/crizzle/").unwrap();
        assert_eq!(base.strip("/crizzle/data"), Some("/data"));
        assert_eq!(base.strip("/crizzle"), Some("/"));
        assert_eq!(base.strip("/crizzle/"), Some("/"));
        assert_eq!(base.strip("/crizzle?tab=1"), Some("?tab=1"));
        assert_eq!(base.strip("/crizzlefoo/data"), None);
        assert_eq!(base.strip("/data"), None);
    }

    #[test]
    fn join_mirrors_strip() {
        let base = BasePath::parse("/crizzle").unwrap();
        assert_eq!(base.join("/"), "/crizzle");
        assert_eq!(base.join("/docs"), "/crizzle/docs");
        assert_eq!(base.join("/docs?page=2"), "/crizzle/docs?page=2");

        let root = BasePath::root();
        assert_eq!(root.join("/"), "/");
        assert_eq!(root.join("docs"), "/docs");
    }

    #[test]
    fn asset_keeps_directory_slash() {
        assert_eq!(BasePath::root().asset("service-worker.js"), "/service-worker.js");
        assert_eq!(
            BasePath::parse("/crizzle/").unwrap().asset("service-worker.js"),
            "/crizzle/service-worker.js"
        );
    }
}
