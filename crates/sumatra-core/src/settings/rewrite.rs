//! Rewrites colour values in the settings text.
//!
//! # How the substitution works (for beginners)
//!
//! The rewriter does not know where each setting is declared.  It only knows
//! the value each setting has *now* (from [`extract_current`]) and the value it
//! *should* have.  For every line of the file, and for every setting in
//! [`ColorSetting::ALL`] order, every literal occurrence of the current value
//! is replaced by the target value.
//!
//! Consequences worth knowing:
//!
//! - A value reused elsewhere in the file (for example `#ffffff` appearing in
//!   both `BackgroundColor` and some unrelated block) is replaced everywhere.
//! - Later settings see the text already produced by earlier ones.  If two
//!   settings share a current value, the first substitution consumes every
//!   occurrence and the second finds nothing left to replace.
//!
//! Matching is plain substring matching; values are never interpreted as
//! patterns.
//!
//! [`extract_current`]: super::extract::extract_current

use std::borrow::Cow;

use tracing::debug;

use crate::domain::color::{ColorSetting, ThemeColors};

/// Substitutes `current` values with `target` values throughout `text`.
///
/// Returns `text` unchanged when `target` is `None`.  Line endings and every
/// byte not covered by a substitution are preserved.
pub fn rewrite_theme(text: &str, current: &ThemeColors, target: Option<&ThemeColors>) -> String {
    let Some(target) = target else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut changed_lines = 0usize;

    for original in text.split_inclusive('\n') {
        let mut line = Cow::Borrowed(original);
        for setting in ColorSetting::ALL {
            let from = current.get(setting);
            let to = target.get(setting);
            // An empty needle would match between every character.
            if from.is_empty() || from == to || !line.contains(from) {
                continue;
            }
            line = Cow::Owned(line.replace(from, to));
        }
        if line != original {
            changed_lines += 1;
        }
        out.push_str(&line);
    }

    debug!(changed_lines, "theme substitution finished");
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
