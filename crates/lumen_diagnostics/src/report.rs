//! The diagnostic data model: what a report *is*, independent of how it is
//! eventually rendered.

use lumen_base::{Position, Region};

/// The kind of condition a [`Report`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SyntaxError,
    NameError,
    TypeError,
    Info,
    Warning,
    OtherError,
}

impl ReportKind {
    /// `true` for everything except [`ReportKind::Info`] and
    /// [`ReportKind::Warning`] — the kinds that make a phase unsuccessful.
    pub fn is_error(self) -> bool {
        !matches!(self, ReportKind::Info | ReportKind::Warning)
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::SyntaxError => "syntax error",
            ReportKind::NameError => "name error",
            ReportKind::TypeError => "type error",
            ReportKind::Info => "info",
            ReportKind::Warning => "warning",
            ReportKind::OtherError => "error",
        }
    }
}

/// A single diagnostic: what went wrong, and where.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub message: String,
    pub position: Position,
    pub region: Option<Region>,
}

impl Report {
    pub fn new(kind: ReportKind, message: impl Into<String>, position: Position) -> Self {
        Report {
            kind,
            message: message.into(),
            position,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::new(ReportKind::SyntaxError, message, position)
    }

    pub fn name(message: impl Into<String>, position: Position) -> Self {
        Self::new(ReportKind::NameError, message, position)
    }

    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Self::new(ReportKind::Warning, message, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_and_info_are_not_errors() {
        assert!(!ReportKind::Warning.is_error());
        assert!(!ReportKind::Info.is_error());
    }

    #[test]
    fn everything_else_is_an_error() {
        for kind in [
            ReportKind::SyntaxError,
            ReportKind::NameError,
            ReportKind::TypeError,
            ReportKind::OtherError,
        ] {
            assert!(kind.is_error());
        }
    }

    #[test]
    fn with_region_attaches_region() {
        let r = Report::syntax("oops", 3).with_region(Region::new(3, 6));
        assert_eq!(r.region, Some(Region::new(3, 6)));
    }
}
