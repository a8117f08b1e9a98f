//! # lumen-base
//!
//! Pure structural atoms for the lumen compiler front end.
//!
//! This crate provides the foundational types every other `lumen` crate
//! builds on:
//!
//! - [`Position`]/[`Region`]/[`LinePos`] — source location primitives
//! - [`SourceMap`]/[`Source`]/[`Snippet`] — owns file contents, derives
//!   line/column pairs and diagnostic snippets from byte offsets
//! - [`SpannedError`]/[`Result`] — errors carrying a [`Region`]
//!
//! It has no knowledge of Lumen's grammar or vocabulary.

pub mod error;
pub mod position;
pub mod source_map;

pub use error::{Result, SpannedError};
pub use position::{is_no_pos, LinePos, Position, Region, NO_POS};
pub use source_map::{Snippet, Source, SourceMap, SourceMapError};
