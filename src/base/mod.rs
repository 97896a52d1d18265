//! Foundation types for the kermlc front-end.
//!
//! This module provides the types every later stage builds on:
//! - [`SourceFile`] - source text with a precomputed line index
//! - [`LineCol`] - 1-based line/column positions
//! - [`TextRange`], [`TextSize`] - half-open byte ranges into the source
//! - [`Name`], [`Interner`] - arena-backed string interning
//!
//! This module has NO dependencies on other kermlc modules.

mod intern;
mod source;

pub use intern::{Interner, Name};
pub use source::{LineCol, SourceFile, invalid_range, is_valid_range};

// Re-export the range types used throughout the crate
pub use text_size::{TextRange, TextSize};
