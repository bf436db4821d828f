//! Line-oriented terminal front end.
//!
//! Menus are printed as numbered lists and answered by typing the number.
//! A blank line (or end of input) cancels; anything else that is not a
//! listed number prints a hint and asks again.
//!
//! The reader and writer are generic so tests can feed a `Cursor` and
//! inspect a `Vec<u8>` instead of a real terminal.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use sumatra_core::ColorSetting;
use tracing::warn;

use crate::application::actions::{Action, Prompter};

/// [`Prompter`] over any buffered reader and writer.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            warn!("failed to write to terminal: {e}");
        }
    }

    /// Prints `prompt` and reads one trimmed line.  `None` on end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{prompt}").and_then(|_| self.output.flush()) {
            warn!("failed to write to terminal: {e}");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("failed to read from terminal: {e}");
                None
            }
        }
    }

    /// Shows `items` as a numbered list and returns the 1-based choice.
    fn choose_numbered(&mut self, heading: &str, items: &[String]) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        self.say(heading);
        for (i, item) in items.iter().enumerate() {
            self.say(&format!("  {}. {item}", i + 1));
        }
        loop {
            let answer = self.read_line("Select a number (blank to cancel): ")?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Some(n),
                _ => self.say(&format!("Please enter a number from 1 to {}.", items.len())),
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose_action(&mut self) -> Option<Action> {
        let labels: Vec<String> = Action::ALL.iter().map(ToString::to_string).collect();
        let choice = self.choose_numbered("\nWhat would you like to do?", &labels)?;
        Action::ALL.get(choice - 1).copied()
    }

    fn choose_index(&mut self, items: &[String], task: &str) -> Option<usize> {
        self.choose_numbered(&format!("Select the backup to {task}:"), items)
    }

    fn choose_theme(&mut self, names: &[String]) -> Option<String> {
        let choice = self.choose_numbered("Select a theme:", names)?;
        names.get(choice - 1).cloned()
    }

    fn pick_color(&mut self, setting: ColorSetting, current: &str) -> Option<String> {
        let hint = if setting == ColorSetting::GradientColors {
            " (three colors separated by spaces)"
        } else {
            ""
        };
        self.read_line(&format!("{setting}{hint} [{current}]: "))
    }

    fn notify(&mut self, message: &str) {
        self.say(message);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
