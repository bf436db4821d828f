//! Application layer use cases for the settings manager.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The domain crate (`sumatra-core`) knows what a theme is and how to rewrite
//! settings text, but it never touches the disk.  This layer combines those
//! pure functions with the JSON stores and the settings file to carry out
//! one user goal at a time, such as "take a backup" or "switch to Dracula".
//!
//! # Sub-modules
//!
//! - **`manage_backups`** – Snapshot, revert and delete, keeping the ledger
//!   and the snapshot files in step.
//! - **`themes`**         – Built-in plus user-saved themes, looked up by name.
//! - **`manager`**        – `SettingsManager`, the facade front ends call.
//! - **`actions`**        – Menu actions, the `Prompter` trait and the
//!   interactive session loop.

pub mod actions;
pub mod manage_backups;
pub mod manager;
pub mod themes;

pub use manager::{ManagerError, SettingsManager, SettingsPaths, ThemeApplyOutcome};
