//! Type grammar: `Atom (-> Atom)*`, right-associative, plus record and
//! tuple atoms.

use crate::error::{PResult, ParseErrorKind};
use crate::{Bailout, Parser};
use lumen_syntax::{RecordField, TokenKind, Type};

pub trait TypeParsing {
    /// A full type: one or more arrow-separated atoms, right-associative.
    fn parse_type(&mut self) -> PResult<Type>;

    /// A single type atom: named (optionally applied to argument atoms),
    /// a type variable, a parenthesised or tuple type, or a record type.
    fn parse_type_atom(&mut self) -> PResult<Type>;
}

impl<'a> TypeParsing for Parser<'a> {
    fn parse_type(&mut self) -> PResult<Type> {
        let start = self.start_region();
        let param = self.parse_type_atom()?;
        if self.check(&TokenKind::Arrow) {
            self.advance();
            let ret = self.parse_type()?;
            let region = self.region_from(start);
            return Ok(Type::Function {
                param: Box::new(param),
                ret: Box::new(ret),
                region,
            });
        }
        Ok(param)
    }

    fn parse_type_atom(&mut self) -> PResult<Type> {
        let start = self.start_region();
        match self.current_kind() {
            TokenKind::Identifier if self.current().lexeme.starts_with(|c: char| c.is_uppercase()) => {
                let module_path = self.parse_module_path()?;
                let (module_path, name) = split_qualified(module_path);
                let mut args = Vec::new();
                while self.starts_type_atom() {
                    args.push(self.parse_type_atom()?);
                }
                let region = self.region_from(start);
                Ok(Type::Named { module_path, name, args, region })
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Type::Var { name, region })
            }
            TokenKind::LParen => {
                self.advance();
                if self.check(&TokenKind::RParen) {
                    return Err(self.bail(ParseErrorKind::Expected {
                        expected: "a type".to_string(),
                        found: TokenKind::RParen,
                    }));
                }
                let mut items = vec![self.parse_type()?];
                while self.check(&TokenKind::Comma) {
                    self.advance();
                    items.push(self.parse_type()?);
                }
                self.expect(TokenKind::RParen, "`)`")?;
                let region = self.region_from(start);
                if items.len() == 1 {
                    Ok(items.pop().unwrap())
                } else {
                    Ok(Type::Tuple { items, region })
                }
            }
            TokenKind::LBrace => {
                self.advance();
                let extension = if matches!(self.current_kind(), TokenKind::Identifier)
                    && matches!(self.peek_at(1).kind, TokenKind::Pipe)
                {
                    let name = self.advance().lexeme;
                    self.advance(); // `|`
                    Some(name)
                } else {
                    None
                };
                let mut fields = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    fields.push(self.parse_record_field_type()?);
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        fields.push(self.parse_record_field_type()?);
                    }
                }
                self.expect(TokenKind::RBrace, "`}`")?;
                let region = self.region_from(start);
                Ok(Type::Record { fields, extension, region })
            }
            _ => {
                self.error_expected_term("a type");
                Err(Bailout)
            }
        }
    }
}

impl<'a> Parser<'a> {
    /// `true` if the current token can begin another type atom applied to
    /// the one just parsed: a type-application argument, not a sibling
    /// constructor or the next declaration.
    pub(crate) fn starts_type_atom(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Identifier | TokenKind::LParen | TokenKind::LBrace
        )
    }

    fn parse_record_field_type(&mut self) -> PResult<RecordField<Type>> {
        let start = self.start_region();
        let name = self.expect(TokenKind::Identifier, "a field name")?.lexeme;
        self.expect_op(":", "`:`")?;
        let value = self.parse_type()?;
        let region = self.region_from(start);
        Ok(RecordField { name, value, region })
    }
}

fn split_qualified(mut path: Vec<String>) -> (Vec<String>, String) {
    let name = path.pop().unwrap_or_default();
    (path, name)
}
