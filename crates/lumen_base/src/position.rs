//! Source positions: byte offsets, derived line/column pairs, and regions.
//!
//! A [`Position`] is a byte offset into a single source file. [`NO_POS`]
//! marks synthesised nodes that have no corresponding source text. A
//! [`Region`] is the half-open `[start, end)` range most AST nodes and
//! diagnostics carry.

/// A byte offset into a source file.
pub type Position = u32;

/// Sentinel position meaning "no position" — used by synthesised AST nodes
/// that were not produced directly from source text.
pub const NO_POS: Position = u32::MAX;

/// Returns `true` if `pos` is the "no position" sentinel.
pub fn is_no_pos(pos: Position) -> bool {
    pos == NO_POS
}

/// A derived, 1-based (line, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePos {
    pub line: u32,
    pub column: u32,
}

impl LinePos {
    pub fn new(line: u32, column: u32) -> Self {
        LinePos { line, column }
    }
}

impl std::fmt::Display for LinePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open `[start, end)` range of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

impl Region {
    pub fn new(start: Position, end: Position) -> Self {
        Region { start, end }
    }

    /// A zero-width region at a single position, for synthesised nodes.
    pub fn at(pos: Position) -> Self {
        Region { start: pos, end: pos }
    }

    /// The smallest region covering both `self` and `other`.
    pub fn merge(self, other: Region) -> Region {
        Region {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_merge_takes_the_outer_bounds() {
        let a = Region::new(5, 10);
        let b = Region::new(2, 7);
        let m = a.merge(b);
        assert_eq!(m, Region::new(2, 10));
    }

    #[test]
    fn region_at_is_zero_width() {
        let r = Region::at(4);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn no_pos_is_recognised() {
        assert!(is_no_pos(NO_POS));
        assert!(!is_no_pos(0));
    }

    #[test]
    fn line_pos_display_is_line_colon_column() {
        let lp = LinePos::new(3, 14);
        assert_eq!(lp.to_string(), "3:14");
    }
}
