//! User actions and the interactive session loop.
//!
//! The front end is hidden behind the [`Prompter`] trait: it is asked which
//! action to run, which backup or theme to pick, and which colours to use,
//! and it is told what happened.  [`run_action`] never fails; every error is
//! turned into a message for the user so the session can carry on.
//!
//! # Why a trait? (for beginners)
//!
//! The terminal prompter reads stdin and writes stdout, which tests cannot
//! drive.  Tests instead use `MockPrompter` (generated by `mockall`) or a
//! scripted implementation, and assert on the notifications they receive.

use std::fmt;

use sumatra_core::{ColorSetting, ThemeColors};
use tracing::{debug, error};

use super::manage_backups::{BackupError, DeleteOutcome, RevertOutcome};
use super::manager::{ManagerError, SettingsManager, ThemeApplyOutcome};
use crate::infrastructure::storage::ledger::{LedgerError, LedgerLookup};

pub const NO_BACKUPS_TO_REVERT: &str = "No backups to revert to!";
pub const NO_BACKUPS_CREATED: &str = "No backups created yet!";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBackup,
    ListBackups,
    RevertBackup,
    DeleteBackup,
    ApplyTheme,
    CustomTheme,
    Quit,
}

impl Action {
    /// Menu order.
    pub const ALL: [Action; 7] = [
        Action::CreateBackup,
        Action::ListBackups,
        Action::RevertBackup,
        Action::DeleteBackup,
        Action::ApplyTheme,
        Action::CustomTheme,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::CreateBackup => "Create backup",
            Action::ListBackups => "List backups",
            Action::RevertBackup => "Revert to backup",
            Action::DeleteBackup => "Delete backup",
            Action::ApplyTheme => "Apply theme",
            Action::CustomTheme => "Custom theme",
            Action::Quit => "Quit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the session should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the actions need from a user interface.
///
/// Every `choose_*` / `pick_*` method returns `None` when the user cancels.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Asks for the next action.  `None` ends the session.
    fn choose_action(&mut self) -> Option<Action>;

    /// Asks the user to pick one of `items` for `task` (e.g. "revert to").
    /// Returns a 1-based index.
    fn choose_index(&mut self, items: &[String], task: &str) -> Option<usize>;

    /// Asks the user to pick one theme name.
    fn choose_theme(&mut self, names: &[String]) -> Option<String>;

    /// Asks for a new value for `setting`, showing `current`.
    ///
    /// A blank answer keeps the current value; `None` cancels the dialog.
    fn pick_color(&mut self, setting: ColorSetting, current: &str) -> Option<String>;

    /// Shows a message.
    fn notify(&mut self, message: &str);
}

/// Runs `action` against `manager`, reporting the outcome through `prompter`.
pub fn run_action<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
    action: Action,
) -> Flow {
    debug!(%action, "running action");
    let result = match action {
        Action::Quit => return Flow::Quit,
        Action::CreateBackup => create_backup(manager, prompter),
        Action::ListBackups => list_backups(manager, prompter),
        Action::RevertBackup => revert_backup(manager, prompter),
        Action::DeleteBackup => delete_backup(manager, prompter),
        Action::ApplyTheme => apply_theme(manager, prompter),
        Action::CustomTheme => custom_theme(manager, prompter),
    };
    if let Err(e) = result {
        error!(%action, "action failed: {e}");
        prompter.notify(&describe_error(&e));
    }
    Flow::Continue
}

/// Keeps asking for actions until the user quits or cancels.
pub fn run_session<P: Prompter + ?Sized>(manager: &SettingsManager, prompter: &mut P) {
    while let Some(action) = prompter.choose_action() {
        if run_action(manager, prompter, action) == Flow::Quit {
            break;
        }
    }
}

/// User-facing text for a failed action.
pub fn describe_error(err: &ManagerError) -> String {
    match err {
        ManagerError::Theme(e) => format!("Settings file malformed: {e}"),
        ManagerError::Backup(BackupError::Ledger(LedgerError::EmptyLedger { .. })) => {
            NO_BACKUPS_CREATED.to_string()
        }
        other => format!("Error: {other}"),
    }
}

// ── Individual actions ────────────────────────────────────────────────────────

fn create_backup<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    let record = manager.create_backup()?;
    prompter.notify(&format!("Backup created: {record}"));
    Ok(())
}

fn list_backups<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    match manager.list_backups()? {
        LedgerLookup::Missing | LedgerLookup::Empty => prompter.notify(NO_BACKUPS_CREATED),
        LedgerLookup::Records(records) => {
            let lines: Vec<String> = records
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{}. {r}", i + 1))
                .collect();
            prompter.notify(&lines.join("\n"));
        }
    }
    Ok(())
}

fn backup_items(manager: &SettingsManager) -> Result<Option<Vec<String>>, ManagerError> {
    Ok(match manager.list_backups()? {
        LedgerLookup::Missing | LedgerLookup::Empty => None,
        LedgerLookup::Records(records) => Some(records.iter().map(ToString::to_string).collect()),
    })
}

fn revert_backup<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    let Some(items) = backup_items(manager)? else {
        prompter.notify(NO_BACKUPS_TO_REVERT);
        return Ok(());
    };
    let Some(index) = prompter.choose_index(&items, "revert to") else {
        return Ok(());
    };
    match manager.revert_to_backup(index)? {
        RevertOutcome::NoBackups => prompter.notify(NO_BACKUPS_TO_REVERT),
        RevertOutcome::Reverted(record) => {
            prompter.notify(&format!("Settings reverted to {}", record.file_name))
        }
    }
    Ok(())
}

fn delete_backup<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    let Some(items) = backup_items(manager)? else {
        prompter.notify(NO_BACKUPS_CREATED);
        return Ok(());
    };
    let Some(index) = prompter.choose_index(&items, "delete") else {
        return Ok(());
    };
    match manager.delete_backup(index)? {
        DeleteOutcome::NoBackups => prompter.notify(NO_BACKUPS_CREATED),
        DeleteOutcome::Deleted(record) => {
            prompter.notify(&format!("Deleted backup {}", record.file_name))
        }
        DeleteOutcome::FileAlreadyMissing(record) => prompter.notify(&format!(
            "Backup file {} was already missing; record removed",
            record.file_name
        )),
    }
    Ok(())
}

fn apply_theme<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    let names = manager.list_themes()?;
    let Some(name) = prompter.choose_theme(&names) else {
        return Ok(());
    };
    notify_applied(prompter, &name, manager.apply_theme(&name)?);
    Ok(())
}

fn custom_theme<P: Prompter + ?Sized>(
    manager: &SettingsManager,
    prompter: &mut P,
) -> Result<(), ManagerError> {
    let current = manager.current_colors()?;
    let mut colors: ThemeColors = current.clone();
    for setting in ColorSetting::ALL {
        let Some(answer) = prompter.pick_color(setting, current.get(setting)) else {
            return Ok(());
        };
        let answer = answer.trim();
        if !answer.is_empty() {
            colors.set(setting, answer);
        }
    }
    let outcome = manager.add_custom_theme(&colors)?;
    notify_applied(prompter, super::themes::CUSTOM_THEME_NAME, outcome);
    Ok(())
}

fn notify_applied<P: Prompter + ?Sized>(prompter: &mut P, name: &str, outcome: ThemeApplyOutcome) {
    let message = match outcome {
        ThemeApplyOutcome::Applied => format!("Applied theme {name}"),
        ThemeApplyOutcome::Unchanged => format!("Theme {name} is already in use"),
        ThemeApplyOutcome::UnknownTheme => format!("Unknown theme {name}"),
    };
    prompter.notify(&message);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
