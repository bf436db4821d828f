//! Settings-text processing: reading colour values and substituting new ones.

pub mod extract;
pub mod rewrite;
