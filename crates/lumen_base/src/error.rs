//! Error types with source location tracking.
//!
//! Every fallible operation below the diagnostics layer reports through a
//! [`SpannedError`], which pairs a message with the [`Region`] it concerns.
//! Higher layers (scanner, parser, resolver) have their own richer
//! diagnostic types; this one is for base-layer failures such as an
//! out-of-range position handed to [`crate::SourceMap::line_pos`].

use crate::position::Region;
use std::fmt;

/// An error annotated with its source location.
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub message: String,
    pub region: Region,
}

impl SpannedError {
    pub fn new(message: impl Into<String>, region: Region) -> Self {
        Self {
            message: message.into(),
            region,
        }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.region.start, self.region.end)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_error_display_includes_message_and_region() {
        let err = SpannedError::new("bad offset", Region::new(5, 10));
        let rendered = err.to_string();
        assert!(rendered.contains("bad offset"));
        assert!(rendered.contains("5..10"));
    }
}
