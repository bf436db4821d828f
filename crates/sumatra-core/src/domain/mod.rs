//! Domain value types.
//!
//! Nothing in this module performs I/O.  The types here are shared by the
//! text-processing code in [`crate::settings`] and by the application crate,
//! which persists them.

/// Colour settings, colour tokens and complete colour sets.
pub mod color;

/// The fixed Light/Dark/Dracula theme table.
pub mod catalog;

/// Ledger entries and snapshot file naming.
pub mod backup;
