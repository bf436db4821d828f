//! SumatraPDF settings manager: entry point.
//!
//! Takes backups of `SumatraPDF-settings.txt`, restores or deletes them, and
//! switches the reader's colour theme by rewriting the colour lines in place.
//!
//! # Usage
//!
//! ```text
//! sumatra-settings [OPTIONS] [COMMAND]
//!
//! Commands:
//!   backup create | list | revert <N> | delete <N>
//!   theme  list | current | apply <NAME> | custom [--text-color <C> ...]
//!   config show | init
//!   interactive            (default) numbered menus on stdin/stdout
//!
//! Options:
//!   --config <PATH>            Config file [env: SUMATRA_SETTINGS_CONFIG]
//!   --settings-folder <DIR>    SumatraPDF settings folder [env: SUMATRA_SETTINGS_FOLDER]
//! ```
//!
//! Backup numbers are 1-based positions in `backup list`, oldest first.
//!
//! # Logging
//!
//! `RUST_LOG` wins when set; otherwise `[logging] level` from the config file
//! is used.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sumatra_core::{ColorSetting, ThemeColors};
use sumatra_settings::application::actions::{run_session, NO_BACKUPS_CREATED, NO_BACKUPS_TO_REVERT};
use sumatra_settings::application::manage_backups::{DeleteOutcome, RevertOutcome};
use sumatra_settings::application::{SettingsManager, ThemeApplyOutcome};
use sumatra_settings::infrastructure::prompt::TerminalPrompter;
use sumatra_settings::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig,
};
use sumatra_settings::infrastructure::storage::ledger::LedgerLookup;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Backup and theme manager for SumatraPDF's settings file.
#[derive(Debug, Parser)]
#[command(name = "sumatra-settings", version)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, env = "SUMATRA_SETTINGS_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding `SumatraPDF-settings.txt`; overrides the config file.
    #[arg(long, env = "SUMATRA_SETTINGS_FOLDER")]
    settings_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage settings backups.
    #[command(subcommand)]
    Backup(BackupCommand),
    /// List, inspect and apply colour themes.
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// Inspect or write the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Menu-driven session on the terminal.
    Interactive,
}

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Copy the settings file to a new backup.
    Create,
    /// Show recorded backups, oldest first.
    List,
    /// Replace the settings file with backup N (the backup is consumed).
    Revert { index: usize },
    /// Delete backup N.
    Delete { index: usize },
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    /// Show built-in and saved theme names.
    List,
    /// Show the colours currently in the settings file.
    Current,
    /// Rewrite the settings file to use a named theme.
    Apply { name: String },
    /// Save and apply the "Custom" theme; omitted colours keep their current value.
    Custom(CustomColors),
}

#[derive(Debug, Args)]
struct CustomColors {
    #[arg(long)]
    text_color: Option<String>,
    #[arg(long)]
    background_color: Option<String>,
    #[arg(long)]
    main_window_background: Option<String>,
    #[arg(long)]
    selection_color: Option<String>,
    /// Three colours separated by spaces.
    #[arg(long)]
    gradient_colors: Option<String>,
}

impl CustomColors {
    fn overrides(&self) -> [(ColorSetting, Option<&String>); 5] {
        [
            (ColorSetting::TextColor, self.text_color.as_ref()),
            (ColorSetting::BackgroundColor, self.background_color.as_ref()),
            (ColorSetting::MainWindowBackground, self.main_window_background.as_ref()),
            (ColorSetting::SelectionColor, self.selection_color.as_ref()),
            (ColorSetting::GradientColors, self.gradient_colors.as_ref()),
        ]
    }

    /// `current` with every supplied colour replaced.
    fn merge_into(&self, mut current: ThemeColors) -> ThemeColors {
        for (setting, value) in self.overrides() {
            if let Some(value) = value {
                current.set(setting, value.trim());
            }
        }
        current
    }
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
    /// Write the effective configuration to the config file.
    Init,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path().context("failed to locate config file")?,
    };
    let config = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    if let Some(Command::Config(cmd)) = &cli.command {
        return run_config(cmd, &config_path, &config);
    }

    let paths = config.settings_paths(cli.settings_folder.as_deref())?;
    info!(settings = %paths.settings_file.display(), "using settings file");
    let manager = SettingsManager::new(paths, config.backup_options());
    if !manager.settings_file_exists() {
        warn!(
            path = %manager.paths().settings_file.display(),
            "Sumatra settings file not found; set paths.settings_folder or --settings-folder"
        );
    }

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Backup(cmd) => run_backup(&manager, cmd),
        Command::Theme(cmd) => run_theme(&manager, cmd),
        Command::Interactive => {
            let mut prompter = TerminalPrompter::stdio();
            run_session(&manager, &mut prompter);
            Ok(())
        }
        Command::Config(_) => Ok(()),
    }
}

fn run_backup(manager: &SettingsManager, cmd: BackupCommand) -> anyhow::Result<()> {
    match cmd {
        BackupCommand::Create => {
            let record = manager.create_backup().context("failed to create backup")?;
            println!("Backup created: {record}");
        }
        BackupCommand::List => match manager.list_backups()? {
            LedgerLookup::Missing | LedgerLookup::Empty => println!("{NO_BACKUPS_CREATED}"),
            LedgerLookup::Records(records) => {
                for (i, record) in records.iter().enumerate() {
                    println!("{}. {record}", i + 1);
                }
            }
        },
        BackupCommand::Revert { index } => match manager
            .revert_to_backup(index)
            .with_context(|| format!("failed to revert to backup {index}"))?
        {
            RevertOutcome::NoBackups => println!("{NO_BACKUPS_TO_REVERT}"),
            RevertOutcome::Reverted(record) => {
                println!("Settings reverted to {}", record.file_name)
            }
        },
        BackupCommand::Delete { index } => match manager
            .delete_backup(index)
            .with_context(|| format!("failed to delete backup {index}"))?
        {
            DeleteOutcome::NoBackups => println!("{NO_BACKUPS_CREATED}"),
            DeleteOutcome::Deleted(record) => println!("Deleted backup {}", record.file_name),
            DeleteOutcome::FileAlreadyMissing(record) => println!(
                "Backup file {} was already missing; record removed",
                record.file_name
            ),
        },
    }
    Ok(())
}

fn run_theme(manager: &SettingsManager, cmd: ThemeCommand) -> anyhow::Result<()> {
    match cmd {
        ThemeCommand::List => {
            for name in manager.list_themes()? {
                println!("{name}");
            }
        }
        ThemeCommand::Current => {
            let colors = manager.current_colors().context("failed to read current colors")?;
            for (setting, value) in colors.iter() {
                println!("{setting} = {value}");
            }
        }
        ThemeCommand::Apply { name } => {
            let outcome = manager
                .apply_theme(&name)
                .with_context(|| format!("failed to apply theme {name}"))?;
            print_outcome(&name, outcome);
        }
        ThemeCommand::Custom(colors) => {
            let current = manager.current_colors().context("failed to read current colors")?;
            let outcome = manager
                .add_custom_theme(&colors.merge_into(current))
                .context("failed to apply custom theme")?;
            print_outcome("Custom", outcome);
        }
    }
    Ok(())
}

fn print_outcome(name: &str, outcome: ThemeApplyOutcome) {
    match outcome {
        ThemeApplyOutcome::Applied => println!("Applied theme {name}"),
        ThemeApplyOutcome::Unchanged => println!("Theme {name} is already in use"),
        ThemeApplyOutcome::UnknownTheme => println!("Unknown theme {name}"),
    }
}

fn run_config(cmd: &ConfigCommand, path: &std::path::Path, config: &AppConfig) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigCommand::Init => {
            save_config_to(path, config)
                .with_context(|| format!("failed to write config to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sumatra_core::BuiltinTheme;

    #[test]
    fn test_no_subcommand_means_interactive() {
        let cli = Cli::parse_from(["sumatra-settings"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_backup_revert_takes_index() {
        let cli = Cli::parse_from(["sumatra-settings", "backup", "revert", "2"]);
        assert!(matches!(
            cli.command,
            Some(Command::Backup(BackupCommand::Revert { index: 2 }))
        ));
    }

    #[test]
    fn test_settings_folder_flag() {
        let cli = Cli::parse_from(["sumatra-settings", "--settings-folder", "/tmp/s", "theme", "list"]);
        assert_eq!(cli.settings_folder, Some(PathBuf::from("/tmp/s")));
    }

    #[test]
    fn test_custom_colors_merge_keeps_unset_values() {
        // Arrange
        let cli = Cli::parse_from([
            "sumatra-settings",
            "theme",
            "custom",
            "--background-color",
            "#fdf6e3",
        ]);
        let Some(Command::Theme(ThemeCommand::Custom(colors))) = cli.command else {
            panic!("expected theme custom");
        };

        // Act
        let merged = colors.merge_into(BuiltinTheme::Light.colors());

        // Assert
        assert_eq!(merged.get(ColorSetting::BackgroundColor), "#fdf6e3");
        assert_eq!(merged.get(ColorSetting::TextColor), "#000000");
    }
}
