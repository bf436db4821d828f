//! Colour settings understood by the theme engine.
//!
//! SumatraPDF stores its colours as plain `Key = value` lines in
//! `SumatraPDF-settings.txt`.  Only five of those keys are ever touched by
//! this project; everything else in the file is opaque text.
//!
//! # Colour tokens (for beginners)
//!
//! A *colour token* is a hex colour written the way SumatraPDF writes it:
//! a `#` followed by 3, 4, 6 or 8 hexadecimal digits (`#fff`, `#dddddd`,
//! `#80fff200`).  `GradientColors` is special: its value is three tokens
//! separated by spaces, e.g. `#2828aa #28aa28 #aa2828`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of colour tokens a `GradientColors` value must contain.
pub const GRADIENT_TOKEN_COUNT: usize = 3;

/// One of the fixed, ordered colour keys in the settings file.
///
/// The declaration order is significant: extraction and rewriting always walk
/// the settings in this order (see [`ColorSetting::ALL`]), and the derived
/// `Ord` makes `BTreeMap<ColorSetting, _>` iterate in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorSetting {
    TextColor,
    BackgroundColor,
    MainWindowBackground,
    SelectionColor,
    /// Only present once it has been enabled in SumatraPDF's advanced settings.
    GradientColors,
}

impl ColorSetting {
    /// Every setting, in scan order.
    pub const ALL: [ColorSetting; 5] = [
        ColorSetting::TextColor,
        ColorSetting::BackgroundColor,
        ColorSetting::MainWindowBackground,
        ColorSetting::SelectionColor,
        ColorSetting::GradientColors,
    ];

    /// The key exactly as it appears in the settings file.
    pub fn key(self) -> &'static str {
        match self {
            ColorSetting::TextColor => "TextColor",
            ColorSetting::BackgroundColor => "BackgroundColor",
            ColorSetting::MainWindowBackground => "MainWindowBackground",
            ColorSetting::SelectionColor => "SelectionColor",
            ColorSetting::GradientColors => "GradientColors",
        }
    }

    /// Number of colour tokens the value of this setting holds.
    pub fn token_count(self) -> usize {
        match self {
            ColorSetting::GradientColors => GRADIENT_TOKEN_COUNT,
            _ => 1,
        }
    }
}

impl fmt::Display for ColorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors raised while reading, building or validating colour values.
///
/// Kept separate from I/O errors so a front end can say "settings file
/// malformed" instead of reporting a generic failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// No `Key = value` line exists for the setting.
    #[error("\"{0}\" is not defined in settings")]
    MissingSetting(ColorSetting),

    /// The line exists but carries no value.
    #[error("no color found for {0} in settings")]
    EmptyValue(ColorSetting),

    /// A theme does not supply a value for every setting.
    #[error("theme is missing a value for {0}")]
    IncompleteTheme(ColorSetting),

    /// A value is not a valid colour token.
    #[error("invalid color {value:?} for {setting}")]
    InvalidColor { setting: ColorSetting, value: String },

    /// A gradient does not hold exactly three colour tokens.
    #[error("{setting} needs {expected} colors, got {found}")]
    GradientArity {
        setting: ColorSetting,
        expected: usize,
        found: usize,
    },
}

/// Returns `true` if `token` is `#` followed by 3, 4, 6 or 8 hex digits.
pub fn is_color_token(token: &str) -> bool {
    let Some(digits) = token.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// A complete set of colour values, one per [`ColorSetting`].
///
/// The only way to obtain a `ThemeColors` is through a constructor that has
/// checked completeness, so [`ThemeColors::get`] never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ColorSetting, String>", into = "BTreeMap<ColorSetting, String>")]
pub struct ThemeColors {
    values: BTreeMap<ColorSetting, String>,
}

impl ThemeColors {
    /// Builds a complete colour set from a possibly partial map.
    ///
    /// Only completeness is checked here; values read from a settings file
    /// are accepted as they are.  Use [`ThemeColors::validate`] for values a
    /// user typed in.
    ///
    /// # Errors
    ///
    /// [`ThemeError::IncompleteTheme`] naming the first missing setting.
    pub fn from_map(values: BTreeMap<ColorSetting, String>) -> Result<Self, ThemeError> {
        if let Some(missing) = ColorSetting::ALL
            .into_iter()
            .find(|setting| !values.contains_key(setting))
        {
            return Err(ThemeError::IncompleteTheme(missing));
        }
        Ok(Self { values })
    }

    /// Builds a colour set from `(setting, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ThemeError>
    where
        I: IntoIterator<Item = (ColorSetting, S)>,
        S: Into<String>,
    {
        Self::from_map(pairs.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    /// Returns the value stored for `setting`.
    pub fn get(&self, setting: ColorSetting) -> &str {
        // Completeness is established at construction.
        self.values.get(&setting).map(String::as_str).unwrap_or_default()
    }

    /// Replaces the value for `setting`, returning the previous one.
    pub fn set(&mut self, setting: ColorSetting, value: impl Into<String>) -> String {
        self.values
            .insert(setting, value.into())
            .unwrap_or_default()
    }

    /// Iterates settings and values in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorSetting, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Checks that every value is made of well-formed colour tokens.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::EmptyValue`] for a blank value.
    /// - [`ThemeError::GradientArity`] when `GradientColors` is not three tokens.
    /// - [`ThemeError::InvalidColor`] for any malformed token.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (setting, value) in self.iter() {
            let tokens: Vec<&str> = value.split_whitespace().collect();
            if tokens.is_empty() {
                return Err(ThemeError::EmptyValue(setting));
            }
            if tokens.len() != setting.token_count() {
                if setting == ColorSetting::GradientColors {
                    return Err(ThemeError::GradientArity {
                        setting,
                        expected: GRADIENT_TOKEN_COUNT,
                        found: tokens.len(),
                    });
                }
                return Err(ThemeError::InvalidColor {
                    setting,
                    value: value.to_string(),
                });
            }
            if let Some(bad) = tokens.iter().find(|t| !is_color_token(t)) {
                return Err(ThemeError::InvalidColor {
                    setting,
                    value: (*bad).to_string(),
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<ColorSetting, String>> for ThemeColors {
    type Error = ThemeError;

    fn try_from(values: BTreeMap<ColorSetting, String>) -> Result<Self, Self::Error> {
        Self::from_map(values)
    }
}

impl From<ThemeColors> for BTreeMap<ColorSetting, String> {
    fn from(colors: ThemeColors) -> Self {
        colors.values
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
