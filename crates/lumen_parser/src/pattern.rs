//! Pattern grammar.
//!
//! [`PatternParsing::parse_pattern`] is the full grammar used by `case`
//! branches and destructuring right-hand sides: atoms, the `::` cons
//! pattern (rebuilt as `Ctor("::", [head, tail])`, right-associative), and
//! a trailing `p as x` alias. [`PatternParsing::parse_arg_pattern`] is the
//! restricted subset usable as a function argument — variable, `_`,
//! tuple, record — where `as` is only recognised *inside* parentheses, so
//! `f (x as y) = …` must be parenthesised and a bare `f x as y = …` is not
//! ambiguous with the next argument.

use crate::error::{ParseErrorKind, PResult};
use crate::{Bailout, Parser};
use lumen_syntax::{ArgPattern, Pattern, PatternLiteral, TokenKind};

pub trait PatternParsing {
    fn parse_pattern(&mut self) -> PResult<Pattern>;
    fn parse_arg_pattern(&mut self) -> PResult<ArgPattern>;
}

impl<'a> PatternParsing for Parser<'a> {
    fn parse_pattern(&mut self) -> PResult<Pattern> {
        let start = self.start_region();
        let head = self.parse_pattern_atom()?;
        let pattern = if self.check_op("::") {
            self.advance();
            let tail = self.parse_pattern()?;
            let region = self.region_from(start);
            Pattern::Ctor {
                module_path: Vec::new(),
                name: "::".to_string(),
                args: vec![head, tail],
                region,
            }
        } else {
            head
        };
        if self.check(&TokenKind::As) {
            self.advance();
            let name = self.expect(TokenKind::Identifier, "a name to bind")?.lexeme;
            let region = self.region_from(start);
            return Ok(Pattern::Alias {
                pattern: Box::new(pattern),
                name,
                region,
            });
        }
        Ok(pattern)
    }

    fn parse_arg_pattern(&mut self) -> PResult<ArgPattern> {
        let start = self.start_region();
        match self.current_kind() {
            TokenKind::Identifier if self.current().lexeme == "_" => {
                self.advance();
                let region = self.region_from(start);
                Ok(ArgPattern::Anything { region })
            }
            TokenKind::Identifier if self.current().lexeme.starts_with(|c: char| c.is_uppercase()) => {
                self.error_expected("a variable, `_`, tuple or record pattern (a bare constructor must be parenthesised)");
                Err(self.bail(ParseErrorKind::InvalidArgumentPattern))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(ArgPattern::Var { name, region })
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    self.advance();
                    let region = self.region_from(start);
                    return Ok(ArgPattern::Tuple { items: Vec::new(), region });
                }
                let first = self.parse_arg_pattern()?;
                if self.check(&TokenKind::As) {
                    self.advance();
                    let name = self.expect(TokenKind::Identifier, "a name to bind")?.lexeme;
                    self.expect(TokenKind::RParen, "`)`")?;
                    let region = self.region_from(start);
                    return Ok(ArgPattern::Alias {
                        pattern: Box::new(first),
                        name,
                        region,
                    });
                }
                if self.check(&TokenKind::Comma) {
                    let mut items = vec![first];
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        items.push(self.parse_arg_pattern()?);
                    }
                    self.expect(TokenKind::RParen, "`)`")?;
                    let region = self.region_from(start);
                    Ok(ArgPattern::Tuple { items, region })
                } else {
                    self.expect(TokenKind::RParen, "`)`")?;
                    Ok(first)
                }
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    fields.push(self.expect(TokenKind::Identifier, "a field name")?.lexeme);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        fields.push(self.expect(TokenKind::Identifier, "a field name")?.lexeme);
                    }
                }
                self.expect(TokenKind::RBrace, "`}`")?;
                let region = self.region_from(start);
                Ok(ArgPattern::Record { fields, region })
            }
            _ => {
                self.error_expected("a pattern");
                Err(self.bail(ParseErrorKind::InvalidArgumentPattern))
            }
        }
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_pattern_atom(&mut self) -> PResult<Pattern> {
        let start = self.start_region();
        match self.current_kind() {
            TokenKind::Identifier if self.current().lexeme == "_" => {
                self.advance();
                let region = self.region_from(start);
                Ok(Pattern::Anything { region })
            }
            TokenKind::Identifier if self.current().lexeme.starts_with(|c: char| c.is_uppercase()) => {
                let mut path = self.parse_module_path()?;
                let name = path.pop().unwrap_or_default();
                let mut args = Vec::new();
                while self.starts_pattern_atom() {
                    args.push(self.parse_pattern_atom()?);
                }
                let region = self.region_from(start);
                Ok(Pattern::Ctor { module_path: path, name, args, region })
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Pattern::Var { name, region })
            }
            TokenKind::Int => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Int(text), region })
            }
            TokenKind::Float => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Float(text), region })
            }
            TokenKind::Str => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Str(text), region })
            }
            TokenKind::Char => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Char(text), region })
            }
            TokenKind::True => {
                self.advance();
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Bool(true), region })
            }
            TokenKind::False => {
                self.advance();
                let region = self.region_from(start);
                Ok(Pattern::Literal { value: PatternLiteral::Bool(false), region })
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    items.push(self.parse_pattern()?);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        items.push(self.parse_pattern()?);
                    }
                }
                self.expect(TokenKind::RBracket, "`]`")?;
                let region = self.region_from(start);
                Ok(Pattern::List { items, region })
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    self.advance();
                    let region = self.region_from(start);
                    return Ok(Pattern::Tuple { items: Vec::new(), region });
                }
                let mut items = vec![self.parse_pattern()?];
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    items.push(self.parse_pattern()?);
                }
                self.expect(TokenKind::RParen, "`)`")?;
                let region = self.region_from(start);
                if items.len() == 1 {
                    Ok(items.pop().unwrap())
                } else {
                    Ok(Pattern::Tuple { items, region })
                }
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    fields.push(self.expect(TokenKind::Identifier, "a field name")?.lexeme);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        fields.push(self.expect(TokenKind::Identifier, "a field name")?.lexeme);
                    }
                }
                self.expect(TokenKind::RBrace, "`}`")?;
                let region = self.region_from(start);
                Ok(Pattern::Record { fields, region })
            }
            _ => {
                self.error_expected_term("a pattern");
                Err(Bailout)
            }
        }
    }

    fn starts_pattern_atom(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Identifier
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Str
                | TokenKind::Char
                | TokenKind::True
                | TokenKind::False
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
        )
    }
}
