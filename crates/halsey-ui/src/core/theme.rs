//! Light/dark theme preference.

/// Storage key holding the chosen theme name.
pub const THEME_KEY: &str = "HALSEY_THEME";

/// Light or dark theme preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    /// Light theme mode.
    Light,
    /// Dark theme mode.
    Dark,
}

impl ThemeMode {
    /// Theme name written to `data-theme`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "nord",
            Self::Dark => "night",
        }
    }

    /// Parse a stored theme name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nord" => Some(Self::Light),
            "night" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Stored preference first, then the OS dark-mode query.
    #[must_use]
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        stored.and_then(Self::from_name).unwrap_or(if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        })
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Checked state of the theme toggle.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}
