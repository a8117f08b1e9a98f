//! # lumen-parser
//!
//! Layout-sensitive recursive-descent parser over the token vector
//! `lumen-syntax` produces. [`Parser`] owns the session (source map,
//! reporter, operator table), the token cursor, and the layout stack; the
//! grammar itself is organised by concern across [`decl`], [`expr`],
//! [`pattern`] and [`types`], each a trait implemented for `Parser` so the
//! surface stays one struct while the coverage stays easy to navigate.
//!
//! Two entry points: [`Parser::parse_module`] runs the full grammar,
//! [`Parser::parse_imports_and_fixity`] runs the lighter pre-pass that
//! only looks at the module header, imports and fixity declarations.

mod decl;
mod error;
mod expr;
mod layout;
mod pattern;
mod types;

pub use decl::DeclParsing;
pub use error::{Bailout, ParseErrorKind};
pub use expr::ExprParsing;
pub use pattern::PatternParsing;
pub use types::TypeParsing;

use error::PResult;
use layout::LayoutFrame;
use lumen_base::{LinePos, Position, Region, SourceMap};
use lumen_diagnostics::{Report, Reporter};
use lumen_syntax::{Declaration, ModulePath, OperatorTable, Token, TokenKind, TokenStream};
use std::path::PathBuf;

/// Which grammar the parser runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    FullParse,
    ImportsAndFixity,
}

/// A fully parsed module: its header, its imports, and the rest of its
/// top-level declarations. Deliberately does not carry a scope — that is
/// built by `lumen-resolve`, not the parser.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub path: PathBuf,
    pub name: String,
    pub module_decl: Option<Declaration>,
    pub imports: Vec<Declaration>,
    pub declarations: Vec<Declaration>,
}

/// The result of [`Parser::parse_imports_and_fixity`]: enough to build the
/// dependency graph and to wire cross-module operator scopes, without
/// paying for a full parse. Locally declared fixities are applied to the
/// shared operator table as a side effect of running the pre-pass; wiring
/// an imported operator into scope (which needs to know what the imported
/// module exposes) is left to the driver that calls this for every module
/// in the package.
#[derive(Debug, Clone)]
pub struct ImportsAndFixity {
    pub name: String,
    pub imports: Vec<Declaration>,
    pub infixes: Vec<Declaration>,
}

pub struct Parser<'a> {
    stream: TokenStream,
    source_map: &'a SourceMap,
    file: PathBuf,
    reporter: &'a mut Reporter,
    operators: &'a mut OperatorTable,
    mode: ParseMode,
    module_name: String,
    layout_stack: Vec<LayoutFrame>,
    /// The most recently consumed token; used both to frame regions
    /// (`last_token.end()`) and to check zero-gap adjacency for glued
    /// qualified names.
    last_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(
        source_map: &'a SourceMap,
        file: impl Into<PathBuf>,
        tokens: Vec<Token>,
        reporter: &'a mut Reporter,
        operators: &'a mut OperatorTable,
        mode: ParseMode,
    ) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            source_map,
            file: file.into(),
            reporter,
            operators,
            mode,
            module_name: String::new(),
            layout_stack: vec![LayoutFrame { indent: 1 }],
            last_token: Token::new(TokenKind::Eof, "", 0),
        }
    }

    /// Runs the full grammar: module header, imports, and every remaining
    /// top-level declaration, with error recovery at each boundary.
    pub fn parse_module(mut self) -> ParsedModule {
        let (module_decl, module_name) = self.parse_module_header();
        self.module_name = module_name.clone();
        let mut imports = Vec::new();
        while matches!(self.stream.current_kind(), TokenKind::Import) {
            imports.push(self.parse_top_level_declaration());
        }
        let mut declarations = Vec::new();
        while !self.stream.is_at_end() {
            declarations.push(self.parse_top_level_declaration());
        }
        ParsedModule {
            path: self.file.clone(),
            name: module_name,
            module_decl,
            imports,
            declarations,
        }
    }

    /// Runs the lightweight pre-pass: module header, imports, and fixity
    /// declarations only. Everything else is skipped silently (no
    /// diagnostics) until the next fixity keyword or EOF.
    pub fn parse_imports_and_fixity(mut self) -> ImportsAndFixity {
        let (_, module_name) = self.parse_module_header();
        self.module_name = module_name.clone();
        let mut imports = Vec::new();
        let mut infixes = Vec::new();
        loop {
            match self.stream.current_kind() {
                TokenKind::Import => imports.push(self.parse_top_level_declaration()),
                TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr => {
                    let decl = self.parse_top_level_declaration();
                    self.apply_local_fixity(&decl);
                    infixes.push(decl);
                }
                TokenKind::Eof => break,
                _ => self.skip_until_next_fixity_or_eof(),
            }
        }
        ImportsAndFixity {
            name: module_name,
            imports,
            infixes,
        }
    }

    fn apply_local_fixity(&mut self, decl: &Declaration) {
        if let Declaration::Infix {
            associativity,
            precedence,
            operator,
            ..
        } = decl
        {
            let _ = self
                .operators
                .add(operator.clone(), Some(self.module_name.clone()), *associativity, *precedence);
            self.operators
                .bind_to_module(self.module_name.clone(), operator.clone(), Some(self.module_name.clone()));
        }
    }

    fn skip_until_next_fixity_or_eof(&mut self) {
        loop {
            match self.stream.current_kind() {
                TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr | TokenKind::Eof => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // -- token cursor -----------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        self.stream.current()
    }

    pub(crate) fn current_kind(&self) -> &TokenKind {
        self.stream.current_kind()
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        self.stream.peek_at(offset)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.stream.is_at_end()
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.stream.advance().clone();
        self.last_token = tok.clone();
        tok
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.stream.check(kind)
    }

    /// `true` if the current token is the operator with exactly this
    /// spelling. `TokenKind::Operator` carries no payload, so distinguishing
    /// `+` from `::` from `|>` means comparing `Token::lexeme`.
    pub(crate) fn check_op(&self, lexeme: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Operator) && self.current().lexeme == lexeme
    }

    pub(crate) fn eat_op(&mut self, lexeme: &str) -> bool {
        if self.check_op(lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_op(&mut self, lexeme: &str, expected: &str) -> PResult<Token> {
        if self.check_op(lexeme) {
            Ok(self.advance())
        } else {
            self.error_expected(expected);
            Err(error::Bailout)
        }
    }

    /// Consumes the current token if it has exactly `kind`, reporting
    /// `expected` otherwise and leaving the cursor where it was.
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            self.error_expected(expected);
            Err(error::Bailout)
        }
    }

    pub(crate) fn error_expected(&mut self, expected: &str) {
        let found = self.current_kind().clone();
        let position = self.current().position;
        if found == TokenKind::Eof {
            self.error(ParseErrorKind::UnexpectedEof, position);
        } else {
            self.error(ParseErrorKind::Expected { expected: expected.to_string(), found }, position);
        }
    }

    /// Like [`Parser::error_expected`], but for term-starting positions
    /// (an expression, pattern, or type atom) where a layout violation is
    /// a more useful diagnosis than a generic "expected X": a token sitting
    /// at column 1 reads as a new top-level declaration the previous one
    /// never finished into; any other token at or before the enclosing
    /// block's column simply isn't indented enough to continue it.
    pub(crate) fn error_expected_term(&mut self, expected: &str) {
        let position = self.current().position;
        if self.current_kind() == &TokenKind::Eof {
            self.error(ParseErrorKind::UnexpectedEof, position);
            return;
        }
        let lp = self.line_pos(position);
        if lp.column == 1 {
            self.error(ParseErrorKind::NewTopLevelDeclarationTooSoon, position);
        } else if lp.column <= self.current_indent() {
            self.error(ParseErrorKind::ExpectedMoreIndentation, position);
        } else {
            let found = self.current_kind().clone();
            self.error(ParseErrorKind::Expected { expected: expected.to_string(), found }, position);
        }
    }

    // -- diagnostics --------------------------------------------------------

    /// Records a syntax error unless the parser is silently skipping
    /// tokens in `ImportsAndFixity` mode.
    pub(crate) fn error(&mut self, kind: ParseErrorKind, position: Position) {
        if self.mode == ParseMode::ImportsAndFixity {
            return;
        }
        self.reporter.report(&self.file, Report::syntax(kind.to_string(), position));
    }

    pub(crate) fn error_with_region(&mut self, kind: ParseErrorKind, position: Position, region: Region) {
        if self.mode == ParseMode::ImportsAndFixity {
            return;
        }
        self.reporter.report(&self.file, Report::syntax(kind.to_string(), position).with_region(region));
    }

    pub(crate) fn bail(&mut self, kind: ParseErrorKind) -> error::Bailout {
        let position = self.current().position;
        self.error(kind, position);
        error::Bailout
    }

    // -- regions --------------------------------------------------------

    pub(crate) fn start_region(&self) -> Position {
        self.current().position
    }

    pub(crate) fn region_from(&self, start: Position) -> Region {
        Region::new(start, self.last_token.end().max(start))
    }

    // -- layout -----------------------------------------------------------

    pub(crate) fn line_pos(&self, position: Position) -> LinePos {
        self.source_map.line_pos(&self.file, position).unwrap_or(LinePos::new(0, 0))
    }

    pub(crate) fn current_indent(&self) -> u32 {
        self.layout_stack.last().map(|f| f.indent).unwrap_or(1)
    }

    /// Opens a new layout context: the current token's column becomes the
    /// column every sibling item of this block must start at. Fails (and
    /// records a diagnostic) if that token is not indented past the
    /// enclosing block.
    pub(crate) fn open_block(&mut self) -> PResult<u32> {
        let lp = self.line_pos(self.current().position);
        if lp.column <= self.current_indent() {
            let position = self.current().position;
            self.error(ParseErrorKind::ExpectedMoreIndentation, position);
            return Err(error::Bailout);
        }
        self.layout_stack.push(LayoutFrame { indent: lp.column });
        Ok(lp.column)
    }

    pub(crate) fn close_block(&mut self) {
        self.layout_stack.pop();
    }

    /// `true` while the current token begins another item of the
    /// innermost open block: it sits on a line after `last_item_end_line`,
    /// at exactly the block's column.
    pub(crate) fn at_block_item_boundary(&self, last_item_end_line: u32) -> bool {
        if self.is_at_end() {
            return false;
        }
        let lp = self.line_pos(self.current().position);
        lp.line > last_item_end_line && lp.column == self.current_indent()
    }

    /// `true` while the current token continues the same logical item
    /// (application arguments, a binary operator chain, ...): it is on the
    /// same line as `reference_end_line`, or on a later line indented
    /// strictly past the block's column.
    pub(crate) fn continues_item(&self, reference_end_line: u32) -> bool {
        if self.is_at_end() {
            return false;
        }
        let lp = self.line_pos(self.current().position);
        lp.line == reference_end_line || lp.column > self.current_indent()
    }

    // -- qualified names --------------------------------------------------

    /// Parses a dotted sequence of upper-case identifiers, e.g. `Data.List`.
    /// Each `.` must be glued (no whitespace) to both its neighbours, since
    /// the scanner tokenises `.` as a plain operator rune.
    pub(crate) fn parse_module_path(&mut self) -> PResult<ModulePath> {
        let mut segments = vec![self.expect(TokenKind::Identifier, "a module name")?.lexeme];
        loop {
            let dot = self.current().clone();
            if dot.kind != TokenKind::Operator || dot.lexeme != "." || !dot.immediately_follows(&self.last_token) {
                break;
            }
            self.advance();
            let next = self.current().clone();
            if next.kind != TokenKind::Identifier || !next.immediately_follows(&dot) {
                self.error_expected("a module name segment glued to the preceding `.`");
                return Err(error::Bailout);
            }
            self.advance();
            segments.push(next.lexeme);
        }
        Ok(segments)
    }
}
