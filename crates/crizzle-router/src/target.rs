use std::borrow::Cow;
use std::fmt;

/// Where a navigation should go: a URL path as the address bar shows it
/// (base path included) or a route name.
///
/// Plain strings convert to [`Target::Path`]; enums deriving `Routable`
/// convert to [`Target::Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Path(Cow<'static, str>),
    Name(Cow<'static, str>),
}

impl Target {
    pub fn path(path: impl Into<Cow<'static, str>>) -> Self {
        Self::Path(path.into())
    }

    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Name(name) => write!(f, "@{}", name),
        }
    }
}

impl From<&'static str> for Target {
    fn from(path: &'static str) -> Self {
        Self::Path(Cow::Borrowed(path))
    }
}

impl From<String> for Target {
    fn from(path: String) -> Self {
        Self::Path(Cow::Owned(path))
    }
}

/// Options accepted by [`crate::Router::navigate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self { replace: true }
    }
}
