use std::fmt;

/// Path marker carried by a fallback definition. It never matches a request.
pub const CATCH_ALL: &str = "*";

/// One entry of the route table: a static path and the symbolic name views
/// use for programmatic navigation.
///
/// The view itself is resolved lazily by the router's view cache, keyed by
/// [`RouteDefinition::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteDefinition {
    pub path: &'static str,
    pub name: &'static str,
}

impl RouteDefinition {
    pub const fn new(path: &'static str, name: &'static str) -> Self {
        Self { path, name }
    }

    /// A definition that is only ever activated when nothing else matches.
    pub const fn fallback(name: &'static str) -> Self {
        Self { path: CATCH_ALL, name }
    }

    pub fn is_fallback(&self) -> bool {
        self.path == CATCH_ALL
    }
}

impl fmt::Display for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Lookup failures against a route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route matches path `{path}`")]
    NotFound { path: String },
    #[error("no route is named `{name}`")]
    UnknownName { name: String },
}

/// Reduces a request to the part that participates in matching.
///
/// Query and fragment are dropped and a single trailing slash on a non-root
/// path is ignored, so `/data/?tab=1` and `/data` match the same route.
/// Matching stays case-sensitive.
pub fn normalize_path(request: &str) -> &str {
    let end = request.find(['?', '#']).unwrap_or(request.len());
    let path = &request[..end];
    if path.is_empty() || path == "/" {
        return "/";
    }
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() && !stripped.ends_with('/') => stripped,
        _ => path,
    }
}
