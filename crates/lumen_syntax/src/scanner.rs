//! The lumen scanner: turns source text into a flat, pre-materialised
//! vector of [`Token`]s.
//!
//! The scanner is single-pass and does not enforce layout — it only
//! records exact byte positions for every token so that the parser can
//! derive columns (via [`lumen_base::SourceMap`]) and enforce indentation
//! itself. Error conditions (bad numbers, unterminated strings, stray
//! characters) are emitted as [`TokenKind::Error`] tokens rather than
//! aborting the scan; the parser decides whether to treat them as fatal.

use crate::token::{LexError, Token, TokenKind};
use lumen_base::Position;

/// The fixed ASCII symbol-rune alphabet, used to recognise operators.
/// The vertical bar, backtick, and bracket characters are punctuation and
/// are excluded even though some would otherwise qualify.
const ASCII_SYMBOLS: &str = "+-/*=.$<>:&^?%#@~!";

fn is_symbol_rune(c: char) -> bool {
    if ASCII_SYMBOLS.contains(c) {
        return true;
    }
    if c.is_ascii() {
        return false;
    }
    // Unicode symbol runes: anything that is not alphanumeric, not
    // whitespace, and not one of the punctuation characters handled
    // elsewhere in the scanner.
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Tokenises an entire source file. The returned vector always ends with
/// exactly one [`TokenKind::Eof`] token.
pub fn scan(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor { source, pos: 0 };
    while let Some(c) = cursor.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                cursor.advance();
            }
            '(' => tokens.push(cursor.take_char(TokenKind::LParen)),
            ')' => tokens.push(cursor.take_char(TokenKind::RParen)),
            '[' => tokens.push(cursor.take_char(TokenKind::LBracket)),
            ']' => tokens.push(cursor.take_char(TokenKind::RBracket)),
            ',' => tokens.push(cursor.take_char(TokenKind::Comma)),
            '`' => tokens.push(cursor.take_char(TokenKind::Backtick)),
            '\\' => tokens.push(cursor.take_char(TokenKind::Backslash)),
            '|' => tokens.push(cursor.take_char(TokenKind::Pipe)),
            '{' if cursor.peek_at(1) == Some('-') => {
                tokens.push(scan_block_comment(&mut cursor));
            }
            '{' => tokens.push(cursor.take_char(TokenKind::LBrace)),
            '}' => tokens.push(cursor.take_char(TokenKind::RBrace)),
            '"' => tokens.push(scan_string(&mut cursor)),
            '\'' => tokens.push(scan_char(&mut cursor)),
            '-' if cursor.peek_at(1) == Some('-') => {
                tokens.push(scan_line_comment(&mut cursor));
            }
            c if c.is_ascii_digit() => tokens.push(scan_number(&mut cursor)),
            c if is_ident_start(c) => tokens.push(scan_identifier(&mut cursor)),
            c if is_symbol_rune(c) => tokens.push(scan_operator(&mut cursor)),
            other => {
                let start = cursor.pos as Position;
                cursor.advance();
                tokens.push(Token::new(TokenKind::Error(LexError::InvalidChar(other)), other.to_string(), start));
            }
        }
    }
    tokens.push(Token::new(TokenKind::Eof, "", cursor.pos as Position));
    tokens
}

/// A cursor over source bytes with one-rune lookahead, used only while
/// scanning; it is not the parser's seekable [`crate::stream::TokenStream`].
struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes exactly one character (assumed ASCII-width-1 punctuation)
    /// and returns its token.
    fn take_char(&mut self, kind: TokenKind) -> Token {
        let start = self.pos as Position;
        let c = self.advance().expect("take_char called at EOF");
        Token::new(kind, c.to_string(), start)
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.pos]
    }
}

fn scan_identifier(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    while let Some(c) = cursor.peek() {
        if is_ident_continue(c) {
            cursor.advance();
        } else {
            break;
        }
    }
    let text = cursor.slice_from(start);
    let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
    Token::new(kind, text, start as Position)
}

fn scan_operator(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    while let Some(c) = cursor.peek() {
        if is_symbol_rune(c) {
            cursor.advance();
        } else {
            break;
        }
    }
    let text = cursor.slice_from(start);
    let kind = match text {
        "->" => TokenKind::Arrow,
        ".." => TokenKind::Range,
        _ => TokenKind::Operator,
    };
    Token::new(kind, text, start as Position)
}

fn scan_number(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    while let Some(c) = cursor.peek() {
        if c.is_ascii_digit() {
            cursor.advance();
        } else {
            break;
        }
    }
    let mut kind = TokenKind::Int;
    if cursor.peek() == Some('.') {
        match cursor.peek_at(1) {
            Some(d) if d.is_ascii_digit() => {
                cursor.advance(); // '.'
                while let Some(c) = cursor.peek() {
                    if c.is_ascii_digit() {
                        cursor.advance();
                    } else {
                        break;
                    }
                }
                kind = TokenKind::Float;
            }
            _ => {
                // Either a bare trailing '.' or the start of a ".." range
                // token; neither is consumed as part of the number.
            }
        }
    }
    // An identifier-class rune immediately after the number is a lex error.
    if let Some(c) = cursor.peek() {
        if is_ident_start(c) {
            while let Some(c) = cursor.peek() {
                if is_ident_continue(c) {
                    cursor.advance();
                } else {
                    break;
                }
            }
            let text = cursor.slice_from(start);
            return Token::new(TokenKind::Error(LexError::BadNumberSyntax), text, start as Position);
        }
    }
    let text = cursor.slice_from(start);
    Token::new(kind, text, start as Position)
}

fn scan_string(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    cursor.advance(); // opening quote
    loop {
        match cursor.peek() {
            None | Some('\n') => {
                let text = cursor.slice_from(start);
                return Token::new(TokenKind::Error(LexError::UnterminatedString), text, start as Position);
            }
            Some('\\') => {
                cursor.advance();
                cursor.advance(); // escaped rune, whatever it is
            }
            Some('"') => {
                cursor.advance();
                let text = cursor.slice_from(start);
                return Token::new(TokenKind::Str, text, start as Position);
            }
            Some(_) => {
                cursor.advance();
            }
        }
    }
}

fn scan_char(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    cursor.advance(); // opening quote
    match cursor.peek() {
        Some('\\') => {
            cursor.advance();
            cursor.advance(); // escaped rune
        }
        Some(_) => {
            cursor.advance();
        }
        None => {
            let text = cursor.slice_from(start);
            return Token::new(TokenKind::Error(LexError::UnterminatedChar), text, start as Position);
        }
    }
    if cursor.peek() == Some('\'') {
        cursor.advance();
        let text = cursor.slice_from(start);
        Token::new(TokenKind::Char, text, start as Position)
    } else {
        let text = cursor.slice_from(start);
        Token::new(TokenKind::Error(LexError::UnterminatedChar), text, start as Position)
    }
}

fn scan_line_comment(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    while let Some(c) = cursor.peek() {
        if c == '\n' {
            break;
        }
        cursor.advance();
    }
    let text = cursor.slice_from(start);
    Token::new(TokenKind::Comment, text, start as Position)
}

/// Block comments nest: `{- {- -} -}` is one well-formed comment.
fn scan_block_comment(cursor: &mut Cursor) -> Token {
    let start = cursor.pos;
    cursor.advance(); // '{'
    cursor.advance(); // '-'
    let mut depth = 1u32;
    loop {
        match (cursor.peek(), cursor.peek_at(1)) {
            (Some('{'), Some('-')) => {
                cursor.advance();
                cursor.advance();
                depth += 1;
            }
            (Some('-'), Some('}')) => {
                cursor.advance();
                cursor.advance();
                depth -= 1;
                if depth == 0 {
                    let text = cursor.slice_from(start);
                    return Token::new(TokenKind::Comment, text, start as Position);
                }
            }
            (Some(_), _) => {
                cursor.advance();
            }
            (None, _) => {
                let text = cursor.slice_from(start);
                return Token::new(TokenKind::Error(LexError::UnterminatedBlockComment), text, start as Position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn punctuation_and_keywords() {
        let tokens = scan("module Foo exposing (..)");
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Module,
                &TokenKind::Identifier,
                &TokenKind::Exposing,
                &TokenKind::LParen,
                &TokenKind::Range,
                &TokenKind::RParen,
                &TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn integer_and_float_literals() {
        let tokens = scan("42 3.14");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].lexeme, "3.14");
    }

    #[test]
    fn range_token_is_not_absorbed_into_number() {
        let tokens = scan("1..5");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, TokenKind::Range);
        assert_eq!(tokens[2].kind, TokenKind::Int);
        assert_eq!(tokens[2].lexeme, "5");
    }

    #[test]
    fn identifier_rune_after_number_is_lex_error() {
        let tokens = scan("123abc");
        assert!(matches!(tokens[0].kind, TokenKind::Error(LexError::BadNumberSyntax)));
        assert_eq!(tokens[0].lexeme, "123abc");
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = scan("\"hello");
        assert!(matches!(tokens[0].kind, TokenKind::Error(LexError::UnterminatedString)));
    }

    #[test]
    fn string_with_escape_keeps_raw_backslash_in_lexeme() {
        let tokens = scan(r#""a\"b""#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, r#""a\"b""#);
    }

    #[test]
    fn char_literal_with_escape() {
        let tokens = scan(r"'\n'");
        assert_eq!(tokens[0].kind, TokenKind::Char);
        assert_eq!(tokens[0].lexeme, r"'\n'");
    }

    #[test]
    fn unterminated_char_literal_is_an_error() {
        let tokens = scan("'a");
        assert!(matches!(tokens[0].kind, TokenKind::Error(LexError::UnterminatedChar)));
    }

    #[test]
    fn line_comment_runs_to_newline() {
        let tokens = scan("x -- trailing comment\ny");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].lexeme, "-- trailing comment");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].lexeme, "y");
    }

    #[test]
    fn block_comments_nest() {
        let tokens = scan("{- outer {- inner -} still outer -} x");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].lexeme, "{- outer {- inner -} still outer -}");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn unterminated_nested_block_comment_is_an_error() {
        let tokens = scan("{- outer {- inner -}");
        assert!(matches!(tokens[0].kind, TokenKind::Error(LexError::UnterminatedBlockComment)));
    }

    #[test]
    fn operators_include_builtin_spellings() {
        let tokens = scan("a + b");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].lexeme, "+");
    }

    #[test]
    fn arrow_is_its_own_kind() {
        let tokens = scan("a -> b");
        assert_eq!(tokens[1].kind, TokenKind::Arrow);
    }

    #[test]
    fn cons_operator_is_generic_operator_kind() {
        let tokens = scan("x :: xs");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].lexeme, "::");
    }

    #[test]
    fn dotted_module_path_is_glued_identifiers_and_dots() {
        let tokens = scan("Foo.Bar.baz");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert!(tokens[1].immediately_follows(&tokens[0]));
        assert!(tokens[2].immediately_follows(&tokens[1]));
    }

    #[test]
    fn positions_are_exact_byte_offsets() {
        let tokens = scan("let x = 1");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 4);
        assert_eq!(tokens[2].position, 6);
        assert_eq!(tokens[3].position, 8);
    }

    #[test]
    fn every_token_stream_ends_with_exactly_one_eof() {
        let tokens = scan("module A exposing (a, b)\nx = 1\n");
        let eofs = tokens.iter().filter(|t| t.kind.is_eof()).count();
        assert_eq!(eofs, 1);
        assert!(tokens.last().unwrap().kind.is_eof());
    }

    #[test]
    fn true_false_are_keywords_not_identifiers() {
        let tokens = scan("True False Truex");
        assert_eq!(tokens[0].kind, TokenKind::True);
        assert_eq!(tokens[1].kind, TokenKind::False);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn position_round_trips_through_the_source_map() {
        let mut map = lumen_base::SourceMap::new();
        let text = "module Foo exposing (..)\nx = 1\n";
        map.insert("a.lum", text);
        for token in scan(text) {
            if token.kind.is_eof() {
                continue;
            }
            let lp = map.line_pos("a.lum", token.position).unwrap();
            let region = lumen_base::Region::new(token.position, token.end());
            let snippet = map.snippet("a.lum", region).unwrap();
            assert_eq!(snippet.first_line, lp.line);
            assert!(snippet.lines.concat().contains(token.lexeme.trim_end_matches('\n')) || token.lexeme.is_empty());
        }
    }
}
