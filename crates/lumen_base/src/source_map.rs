//! Source map: owns file contents and maps byte offsets to line/column pairs
//! and source snippets.
//!
//! Every [`Position`] the scanner hands out is only meaningful relative to
//! the [`Source`] it came from. The map is a simple write-once cache keyed
//! by path: [`SourceMap::load`] reads a file at most once, [`SourceMap::insert`]
//! registers text that did not come from disk (used by the REPL and by
//! tests), and [`SourceMap::line_pos`]/[`SourceMap::region`] do the actual
//! offset bookkeeping.

use crate::position::{LinePos, Position, Region};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One line's byte range, newline included (except possibly the last line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRange {
    start: u32,
    end: u32,
}

/// An already-loaded source file: its raw bytes and a line index.
pub struct Source {
    path: PathBuf,
    text: String,
    lines: Vec<LineRange>,
}

impl Source {
    fn new(path: PathBuf, text: String) -> Self {
        let lines = build_line_index(&text);
        Source { path, text, lines }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Converts a byte offset into a 1-based (line, column) pair.
    ///
    /// `offset` may point one past the end of the text (as EOF tokens do);
    /// it is clamped into the last line.
    pub fn line_pos(&self, offset: Position) -> LinePos {
        let offset = (offset as usize).min(self.text.len());
        let idx = match self
            .lines
            .binary_search_by(|l| {
                if (offset as u32) < l.start {
                    std::cmp::Ordering::Greater
                } else if (offset as u32) >= l.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            }) {
            Ok(i) => i,
            Err(i) => i.min(self.lines.len().saturating_sub(1)),
        };
        let line = &self.lines[idx];
        let column = offset as u32 - line.start + 1;
        LinePos::new(idx as u32 + 1, column)
    }

    /// Extracts the source lines covering `[start, end)` as a [`Snippet`],
    /// for diagnostic rendering. Tabs in the lines are expanded to four
    /// spaces so caret markers line up under the source region; the leading
    /// whitespace of the first line is preserved (also tab-expanded) so
    /// that underline columns stay meaningful.
    pub fn snippet(&self, region: Region) -> Snippet {
        let start_idx = self.line_index_for(region.start);
        let end_idx = self.line_index_for(region.end.max(region.start));
        let mut text_lines = Vec::new();
        for line in &self.lines[start_idx..=end_idx] {
            let raw = &self.text[line.start as usize..line.end as usize];
            let raw = raw.trim_end_matches(['\n', '\r']);
            text_lines.push(expand_tabs(raw));
        }
        Snippet {
            lines: text_lines,
            first_line: start_idx as u32 + 1,
        }
    }

    fn line_index_for(&self, offset: Position) -> usize {
        let offset = (offset as usize).min(self.text.len()) as u32;
        match self
            .lines
            .binary_search_by(|l| {
                if offset < l.start {
                    std::cmp::Ordering::Greater
                } else if offset >= l.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            }) {
            Ok(i) => i,
            Err(i) => i.min(self.lines.len().saturating_sub(1)),
        }
    }
}

/// A contiguous slice of source lines, ready to render in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// The source text lines, tab-expanded, without trailing newline.
    pub lines: Vec<String>,
    /// The 1-based line number of `lines[0]`.
    pub first_line: u32,
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        if ch == '\t' {
            out.push_str("    ");
        } else {
            out.push(ch);
        }
    }
    out
}

fn build_line_index(text: &str) -> Vec<LineRange> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            lines.push(LineRange {
                start: start as u32,
                end: (i + 1) as u32,
            });
            start = i + 1;
        }
    }
    lines.push(LineRange {
        start: start as u32,
        end: bytes.len() as u32,
    });
    lines
}

/// Errors raised while loading or querying sources.
#[derive(Debug)]
pub enum SourceMapError {
    Io(PathBuf, String),
    NotLoaded(PathBuf),
}

impl fmt::Display for SourceMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMapError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            SourceMapError::NotLoaded(path) => {
                write!(f, "source not loaded into the source map: {}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceMapError {}

/// Owns every source file touched during a compilation.
#[derive(Default)]
pub struct SourceMap {
    sources: HashMap<PathBuf, Source>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` from disk if it has not been loaded yet; a no-op
    /// (idempotent) if it has.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&Source, SourceMapError> {
        let path = path.as_ref().to_path_buf();
        if !self.sources.contains_key(&path) {
            let text = fs::read_to_string(&path).map_err(|e| SourceMapError::Io(path.clone(), e.to_string()))?;
            self.sources.insert(path.clone(), Source::new(path.clone(), text));
        }
        Ok(self.sources.get(&path).unwrap())
    }

    /// Registers already-known text under `path` without touching the
    /// filesystem. Used by the REPL and by tests.
    pub fn insert(&mut self, path: impl AsRef<Path>, text: impl Into<String>) -> &Source {
        let path = path.as_ref().to_path_buf();
        self.sources.insert(path.clone(), Source::new(path.clone(), text.into()));
        self.sources.get(&path).unwrap()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Source> {
        self.sources.get(path.as_ref())
    }

    pub fn line_pos(&self, path: impl AsRef<Path>, offset: Position) -> Result<LinePos, SourceMapError> {
        self.get(&path)
            .map(|s| s.line_pos(offset))
            .ok_or_else(|| SourceMapError::NotLoaded(path.as_ref().to_path_buf()))
    }

    pub fn snippet(&self, path: impl AsRef<Path>, region: Region) -> Result<Snippet, SourceMapError> {
        self.get(&path)
            .map(|s| s.snippet(region))
            .ok_or_else(|| SourceMapError::NotLoaded(path.as_ref().to_path_buf()))
    }
}
