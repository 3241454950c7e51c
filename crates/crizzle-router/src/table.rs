use std::collections::HashSet;

use crate::route::{normalize_path, RouteDefinition, RouteError, CATCH_ALL};
use crate::target::Target;

/// Reasons a set of definitions cannot form a route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("path `{path}` is declared by both `{first}` and `{second}`")]
    DuplicatePath {
        path: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("route name `{0}` is declared more than once")]
    DuplicateName(&'static str),
    #[error("route `{name}` has path `{path}`, expected a static path starting with `/`")]
    InvalidPath {
        name: &'static str,
        path: &'static str,
    },
}

/// The ordered, immutable list of routes an application knows about.
///
/// Built once at startup. Paths and names are pairwise distinct; the optional
/// fallback is never matched by [`RouteTable::resolve`] and is only used by the
/// router when resolution fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    fallback: Option<RouteDefinition>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = RouteDefinition>) -> Result<Self, TableError> {
        let routes: Vec<RouteDefinition> = routes.into_iter().collect();
        let mut names = HashSet::new();

        for (index, route) in routes.iter().enumerate() {
            if !is_static_path(route.path) {
                return Err(TableError::InvalidPath {
                    name: route.name,
                    path: route.path,
                });
            }
            if !names.insert(route.name) {
                return Err(TableError::DuplicateName(route.name));
            }
            if let Some(first) = routes[..index].iter().find(|r| r.path == route.path) {
                return Err(TableError::DuplicatePath {
                    path: route.path,
                    first: first.name,
                    second: route.name,
                });
            }
        }

        Ok(Self {
            routes,
            fallback: None,
        })
    }

    /// Attaches the definition activated for unmatched requests.
    pub fn with_fallback(mut self, name: &'static str) -> Result<Self, TableError> {
        if self.routes.iter().any(|r| r.name == name) {
            return Err(TableError::DuplicateName(name));
        }
        self.fallback = Some(RouteDefinition::fallback(name));
        Ok(self)
    }

    /// Exact match of the request's path component against the table.
    pub fn resolve(&self, path: &str) -> Result<&RouteDefinition, RouteError> {
        let wanted = normalize_path(path);
        let found = self.routes.iter().find(|r| r.path == wanted);
        log::debug!("resolve `{}` -> {:?}", path, found.map(|r| r.name));
        found.ok_or_else(|| RouteError::NotFound {
            path: path.to_string(),
        })
    }

    pub fn by_name(&self, name: &str) -> Result<&RouteDefinition, RouteError> {
        self.routes
            .iter()
            .chain(self.fallback.iter())
            .find(|r| r.name == name)
            .ok_or_else(|| RouteError::UnknownName {
                name: name.to_string(),
            })
    }

    /// Resolves either kind of navigation target. Paths are app-relative
    /// here; the router strips its base path before resolving.
    pub fn lookup(&self, target: &Target) -> Result<&RouteDefinition, RouteError> {
        match target {
            Target::Path(path) => self.resolve(path),
            Target::Name(name) => self.by_name(name),
        }
    }

    pub fn fallback(&self) -> Option<&RouteDefinition> {
        self.fallback.as_ref()
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn is_static_path(path: &str) -> bool {
    path.starts_with('/')
        && path != CATCH_ALL
        && !path.contains(['?', '#', ':', '*'])
        && (path == "/" || !path.ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> RouteTable {
        RouteTable::new([
            RouteDefinition::new("/", "home"),
            RouteDefinition::new("/data", "data"),
            RouteDefinition::new("/research", "research"),
            RouteDefinition::new("/portfolio", "portfolio"),
            RouteDefinition::new("/backtesting", "backtesting"),
            RouteDefinition::new("/trading", "trading"),
            RouteDefinition::new("/configuration", "configuration"),
            RouteDefinition::new("/docs", "docs"),
        ])
        .unwrap()
    }

    #[test]
    fn every_literal_path_resolves_to_its_name() {
        let table = sections();
        let expected = [
            ("/", "home"),
            ("/data", "data"),
            ("/research", "research"),
            ("/portfolio", "portfolio"),
            ("/backtesting", "backtesting"),
            ("/trading", "trading"),
            ("/configuration", "configuration"),
            ("/docs", "docs"),
        ];
        for (path, name) in expected {
            assert_eq!(table.resolve(path).unwrap().name, name, "path {path}");
        }
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let table = sections();
        assert_eq!(
            table.resolve("/nonexistent"),
            Err(RouteError::NotFound {
                path: "/nonexistent".to_string()
            })
        );
        assert!(table.resolve("/data/extra").is_err());
        assert!(table.resolve("/DATA").is_err());
    }

    #[test]
    fn resolve_tolerates_query_and_trailing_slash() {
        let table = sections();
        assert_eq!(table.resolve("/trading/?pair=ETHBTC").unwrap().name, "trading");
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let err = RouteTable::new([
            RouteDefinition::new("/data", "data"),
            RouteDefinition::new("/data", "datasets"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TableError::DuplicatePath {
                path: "/data",
                first: "data",
                second: "datasets"
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RouteTable::new([
            RouteDefinition::new("/data", "data"),
            RouteDefinition::new("/datasets", "data"),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateName("data"));
    }

    #[test]
    fn non_static_paths_are_rejected() {
        for path in ["data", "/asset/:id", "*", "/docs/"] {
            let result = RouteTable::new([RouteDefinition::new(path, "bad")]);
            assert!(matches!(result, Err(TableError::InvalidPath { .. })), "{path}");
        }
    }

    #[test]
    fn fallback_is_never_resolved_by_path() {
        let table = sections().with_fallback("not_found").unwrap();
        assert!(table.resolve("*").is_err());
        assert_eq!(table.fallback().unwrap().name, "not_found");
        assert!(table.by_name("not_found").unwrap().is_fallback());
    }

    #[test]
    fn fallback_name_must_be_unique() {
        assert_eq!(
            sections().with_fallback("docs"),
            Err(TableError::DuplicateName("docs"))
        );
    }

    #[test]
    fn lookup_accepts_names_and_paths() {
        let table = sections();
        assert_eq!(table.lookup(&Target::name("portfolio")).unwrap().path, "/portfolio");
        assert_eq!(table.lookup(&Target::path("/portfolio")).unwrap().name, "portfolio");
        assert!(matches!(
            table.lookup(&Target::name("missing")),
            Err(RouteError::UnknownName { .. })
        ));
    }
}
