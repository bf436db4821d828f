//! Infrastructure layer: everything that touches the file system or the
//! terminal.
//!
//! - **`storage`** – Atomic writes, the JSON ledger and theme store, and the
//!   TOML app configuration.
//! - **`prompt`**  – Line-oriented terminal implementation of `Prompter`.

pub mod prompt;
pub mod storage;
