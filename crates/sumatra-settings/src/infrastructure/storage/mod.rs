//! Persistence for the settings manager.
//!
//! All JSON documents are rewritten whole through [`atomic::write_atomic`],
//! so a crash mid-write leaves either the old or the new document on disk.

pub mod atomic;
pub mod config;
pub mod document;
pub mod ledger;
pub mod theme_store;
