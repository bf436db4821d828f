//! Reads the current colour values out of the settings text.
//!
//! The settings file is not parsed as a whole.  Each [`ColorSetting`] is found
//! by a line-oriented scan for `Key = value`; the first matching line wins.
//! Keys may be indented (SumatraPDF nests most colours inside blocks such as
//! `FixedPageUI [ ... ]`) and the value runs to the end of the line.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::color::{ColorSetting, ThemeColors, ThemeError};

/// One compiled `^\s*Key\s*=\s*(value)$` pattern per setting, in scan order.
fn patterns() -> &'static [(ColorSetting, Regex)] {
    static PATTERNS: OnceLock<Vec<(ColorSetting, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ColorSetting::ALL
            .into_iter()
            .map(|setting| {
                let pattern = format!(
                    r"(?m)^[ \t]*{}[ \t]*=[ \t]*(.*?)[ \t]*\r?$",
                    regex::escape(setting.key())
                );
                // Built from fixed identifiers; cannot fail to compile.
                let re = Regex::new(&pattern).expect("static settings pattern");
                (setting, re)
            })
            .collect()
    })
}

/// Finds the value of a single setting, if a line declares it.
///
/// Returns `Some("")` for a declared-but-blank value.
pub fn find_value(text: &str, setting: ColorSetting) -> Option<&str> {
    patterns()
        .iter()
        .find(|(s, _)| *s == setting)
        .and_then(|(_, re)| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts all five colour values from the settings text.
///
/// Settings are resolved in [`ColorSetting::ALL`] order and the first failure
/// aborts the scan; partial results are never returned.
///
/// # Errors
///
/// - [`ThemeError::MissingSetting`] when no line declares a setting.
/// - [`ThemeError::EmptyValue`] when the declared value is blank.
pub fn extract_current(text: &str) -> Result<ThemeColors, ThemeError> {
    let mut values = BTreeMap::new();
    for (setting, re) in patterns() {
        let value = re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .ok_or(ThemeError::MissingSetting(*setting))?
            .as_str();
        if value.is_empty() {
            return Err(ThemeError::EmptyValue(*setting));
        }
        values.insert(*setting, value.to_string());
    }
    ThemeColors::from_map(values)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
