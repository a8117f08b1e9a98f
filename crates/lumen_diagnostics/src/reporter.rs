//! Groups reports by the file that produced them.

use crate::report::Report;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An append-only collection of [`Report`]s, keyed by source file path.
///
/// `Reporter` never removes a report once recorded; phases that run after
/// an earlier failing phase simply accumulate more entries into the same
/// buckets.
#[derive(Default)]
pub struct Reporter {
    by_file: BTreeMap<PathBuf, Vec<Report>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a report against `path`.
    pub fn report(&mut self, path: impl AsRef<Path>, report: Report) {
        self.by_file.entry(path.as_ref().to_path_buf()).or_default().push(report);
    }

    /// Reports for a single file, in the order they were recorded.
    pub fn for_file(&self, path: impl AsRef<Path>) -> &[Report] {
        self.by_file.get(path.as_ref()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All files that have at least one recorded report, in path order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.by_file.keys().map(PathBuf::as_path)
    }

    /// Iterates `(path, report)` pairs in file order, then recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Report)> {
        self.by_file
            .iter()
            .flat_map(|(path, reports)| reports.iter().map(move |r| (path.as_path(), r)))
    }

    /// Total number of recorded reports across all files.
    pub fn len(&self) -> usize {
        self.by_file.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A phase is successful iff no *error*-kind report was recorded.
    /// Warnings and info reports do not affect this — they are suppressed
    /// at render time, not at the success-check level.
    pub fn is_ok(&self) -> bool {
        self.iter().all(|(_, r)| !r.kind.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use std::path::Path;

    #[test]
    fn empty_reporter_is_ok() {
        let reporter = Reporter::new();
        assert!(reporter.is_ok());
        assert!(reporter.is_empty());
    }

    #[test]
    fn warning_only_reporter_is_still_ok() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::warning("unused import", 0));
        assert!(reporter.is_ok());
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn error_report_makes_reporter_not_ok() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::syntax("expected expression", 10));
        assert!(!reporter.is_ok());
    }

    #[test]
    fn reports_group_by_file_and_preserve_order() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::syntax("first", 1));
        reporter.report("b.lum", Report::syntax("other file", 1));
        reporter.report("a.lum", Report::syntax("second", 2));

        let a_reports = reporter.for_file(Path::new("a.lum"));
        assert_eq!(a_reports.len(), 2);
        assert_eq!(a_reports[0].message, "first");
        assert_eq!(a_reports[1].message, "second");
    }

    #[test]
    fn files_without_reports_are_absent() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::syntax("x", 0));
        assert!(reporter.for_file(Path::new("never-touched.lum")).is_empty());
    }
}
