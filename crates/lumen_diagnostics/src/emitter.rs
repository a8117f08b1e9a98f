//! Rendering reports for a sink: a plain-text emitter for CLI tools, and a
//! structured emitter that returns data instead of strings, for tests.

use crate::report::Report;
use crate::reporter::Reporter;
use lumen_base::SourceMap;
use std::fmt::Write as _;

/// One rendered diagnostic, ready to print or to assert against in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub severity: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub snippet_lines: Vec<String>,
    pub caret_column: u32,
}

/// Renders every non-suppressed report in a [`Reporter`] against a
/// [`SourceMap`], in file order then recorded order.
///
/// Warnings are dropped unless `show_warnings` is set. `color` toggles
/// ANSI escapes around the severity tag in [`plain_text`]; the structured
/// form never carries color since it is meant for assertions.
pub struct Emitter {
    pub show_warnings: bool,
    pub color: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter {
            show_warnings: false,
            color: false,
        }
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warnings(mut self, show: bool) -> Self {
        self.show_warnings = show;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn visible<'a>(&self, reporter: &'a Reporter) -> Vec<(&'a std::path::Path, &'a Report)> {
        reporter
            .iter()
            .filter(|(_, r)| self.show_warnings || r.kind.is_error())
            .collect()
    }

    /// Produces one [`RenderedReport`] per visible report.
    pub fn render(&self, reporter: &Reporter, source_map: &SourceMap) -> Vec<RenderedReport> {
        self.visible(reporter)
            .into_iter()
            .map(|(path, report)| {
                let line_pos = source_map
                    .get(path)
                    .map(|s| s.line_pos(report.position))
                    .unwrap_or(lumen_base::LinePos::new(0, 0));
                let snippet_lines = report
                    .region
                    .and_then(|region| source_map.get(path).map(|s| s.snippet(region)))
                    .map(|s| s.lines)
                    .unwrap_or_default();
                RenderedReport {
                    severity: report.kind.label().to_string(),
                    message: report.message.clone(),
                    file: path.display().to_string(),
                    line: line_pos.line,
                    column: line_pos.column,
                    snippet_lines,
                    caret_column: line_pos.column,
                }
            })
            .collect()
    }

    /// Renders the reporter to the exact terminal format described for the
    /// core: severity tag, message, blank line, snippet with line numbers
    /// and a caret, file path, `line:col`.
    pub fn plain_text(&self, reporter: &Reporter, source_map: &SourceMap) -> String {
        let mut out = String::new();
        for rendered in self.render(reporter, source_map) {
            let tag = if self.color {
                color_tag(&rendered.severity)
            } else {
                rendered.severity.clone()
            };
            let _ = writeln!(out, "{}: {}", tag, rendered.message);
            let _ = writeln!(out);
            for (i, line) in rendered.snippet_lines.iter().enumerate() {
                let line_no = rendered.line + i as u32;
                let _ = writeln!(out, "{:>4} | {}", line_no, line);
                if i == 0 {
                    let caret = " ".repeat(rendered.caret_column.saturating_sub(1) as usize);
                    let _ = writeln!(out, "     | {}^", caret);
                }
            }
            let _ = writeln!(out, "{}:{}:{}", rendered.file, rendered.line, rendered.column);
            let _ = writeln!(out);
        }
        out
    }
}

fn color_tag(severity: &str) -> String {
    let code = match severity {
        "warning" => "33",
        "info" => "36",
        _ => "31",
    };
    format!("\u{1b}[{}m{}\u{1b}[0m", code, severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use lumen_base::Region;

    #[test]
    fn warnings_are_suppressed_by_default() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::warning("unused", 0));
        let mut map = SourceMap::new();
        map.insert("a.lum", "x\n");
        let rendered = Emitter::new().render(&reporter, &map);
        assert!(rendered.is_empty());
    }

    #[test]
    fn warnings_show_when_enabled() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::warning("unused", 0));
        let mut map = SourceMap::new();
        map.insert("a.lum", "x\n");
        let rendered = Emitter::new().with_warnings(true).render(&reporter, &map);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].severity, "warning");
    }

    #[test]
    fn errors_always_render() {
        let mut reporter = Reporter::new();
        reporter.report("a.lum", Report::syntax("expected expression", 4));
        let mut map = SourceMap::new();
        map.insert("a.lum", "let x\n");
        let rendered = Emitter::new().render(&reporter, &map);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].line, 1);
    }

    #[test]
    fn plain_text_includes_file_and_line_col() {
        let mut reporter = Reporter::new();
        reporter
            .report("a.lum", Report::syntax("expected expression", 4).with_region(Region::new(4, 5)));
        let mut map = SourceMap::new();
        map.insert("a.lum", "let x\n");
        let text = Emitter::new().plain_text(&reporter, &map);
        assert!(text.contains("a.lum:1:5"));
        assert!(text.contains("expected expression"));
    }
}
