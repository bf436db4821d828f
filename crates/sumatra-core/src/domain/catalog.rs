//! Built-in theme catalog.
//!
//! Three themes ship with the tool.  Each carries a complete value for every
//! [`ColorSetting`], so applying one never needs to fall back to the values
//! already in the settings file.  User-defined themes live in a separate,
//! persisted store and are merged in at lookup time by the application layer.

use std::fmt;

use super::color::{ColorSetting, ThemeColors};

/// A theme compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTheme {
    /// SumatraPDF's stock colours.
    Light,
    Dark,
    Dracula,
}

impl BuiltinTheme {
    /// All built-in themes in menu order.
    pub const ALL: [BuiltinTheme; 3] = [BuiltinTheme::Light, BuiltinTheme::Dark, BuiltinTheme::Dracula];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinTheme::Light => "Light",
            BuiltinTheme::Dark => "Dark",
            BuiltinTheme::Dracula => "Dracula",
        }
    }

    /// Looks a theme up by its exact display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.name() == name)
    }

    /// Raw `(setting, value)` table for this theme.
    ///
    /// Gradient tokens are kept distinct from every single-colour value in
    /// the same theme so that switching between built-ins never hits the
    /// shared-value substitution collision.
    pub fn table(self) -> [(ColorSetting, &'static str); 5] {
        use ColorSetting::*;
        match self {
            BuiltinTheme::Light => [
                (TextColor, "#000000"),
                (BackgroundColor, "#ffffff"),
                (MainWindowBackground, "#80fff200"),
                (SelectionColor, "#f5fc0c"),
                (GradientColors, "#2828aa #28aa28 #aa2828"),
            ],
            BuiltinTheme::Dark => [
                (TextColor, "#dddddd"),
                (BackgroundColor, "#2e2e2e"),
                (MainWindowBackground, "#1e1e1e"),
                (SelectionColor, "#4a90d9"),
                (GradientColors, "#3a3a3a #333333 #2b2b2b"),
            ],
            BuiltinTheme::Dracula => [
                (TextColor, "#f8f8f2"),
                (BackgroundColor, "#282a36"),
                (MainWindowBackground, "#21222c"),
                (SelectionColor, "#44475a"),
                (GradientColors, "#6272a4 #bd93f9 #ff79c6"),
            ],
        }
    }

    /// The theme's complete colour set.
    pub fn colors(self) -> ThemeColors {
        match ThemeColors::from_pairs(self.table()) {
            Ok(colors) => colors,
            // The tables above list every setting.
            Err(_) => unreachable!("built-in theme tables are complete"),
        }
    }
}

impl fmt::Display for BuiltinTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
