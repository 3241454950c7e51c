use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use leptos::prelude::{provide_context, use_context};

/// Theme values that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("`{0}` is not a hex color such as #4CAF50")]
    InvalidColor(String),
    #[error("unknown color role `{0}`")]
    UnknownRole(String),
}

/// Semantic color roles every view can rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Error,
    Info,
    Success,
    Warning,
}

impl ColorRole {
    pub const ALL: [ColorRole; 7] = [
        Self::Primary,
        Self::Secondary,
        Self::Accent,
        Self::Error,
        Self::Info,
        Self::Success,
        Self::Warning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Error => "error",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

impl FromStr for ColorRole {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ThemeError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `#RRGGBB` color, stored upper-case. `#RGB` shorthand is expanded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThemeError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let full = match hex.len() {
            6 => hex.to_ascii_uppercase(),
            3 => hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_uppercase(),
            _ => return Err(invalid()),
        };
        Ok(Self(format!("#{}", full)))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Built-in palette, already in the form [`Color`] normalises to.
const CRIZZLE_PALETTE: [(ColorRole, &str); 7] = [
    (ColorRole::Primary, "#4CAF50"),
    (ColorRole::Secondary, "#424242"),
    (ColorRole::Accent, "#FF5722"),
    (ColorRole::Error, "#FF5252"),
    (ColorRole::Info, "#2196F3"),
    (ColorRole::Success, "#4CAF50"),
    (ColorRole::Warning, "#FFC107"),
];

/// Mapping of color roles to concrete colors, installed once at startup and
/// read by every view through context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    colors: BTreeMap<ColorRole, Color>,
}

impl Theme {
    /// A theme with no roles assigned.
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    /// The Crizzle palette: green primary, deep orange accent, material
    /// defaults for the remaining roles.
    pub fn crizzle() -> Self {
        Self {
            colors: CRIZZLE_PALETTE
                .into_iter()
                .map(|(role, value)| (role, Color(value.to_string())))
                .collect(),
        }
    }

    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (ColorRole, &'a str)>,
    ) -> Result<Self, ThemeError> {
        pairs
            .into_iter()
            .try_fold(Self::empty(), |theme, (role, value)| theme.with(role, value))
    }

    /// Assigns `value` to `role`, replacing any previous color.
    pub fn with(mut self, role: ColorRole, value: &str) -> Result<Self, ThemeError> {
        self.colors.insert(role, value.parse()?);
        Ok(self)
    }

    pub fn color(&self, role: ColorRole) -> Option<&Color> {
        self.colors.get(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, &Color)> {
        self.colors.iter().map(|(role, color)| (*role, color))
    }

    /// CSS custom properties for the document root, one per role:
    /// `--crizzle-primary`, `--crizzle-accent`, and so on.
    pub fn css_variables(&self) -> String {
        let mut css = String::from(":root {\n");
        for (role, color) in self.iter() {
            css.push_str(&format!("  --crizzle-{}: {};\n", role, color));
        }
        css.push('}');
        css
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::crizzle()
    }
}

/// Installs `theme` for the current reactive owner and its children.
pub fn provide_theme(theme: Theme) {
    log::debug!("installing theme with {} roles", theme.colors.len());
    provide_context(theme);
}

pub fn use_theme() -> Option<Theme> {
    use_context::<Theme>()
}
