//! Declaration grammar: the module header, imports, fixity declarations,
//! type aliases and unions, definitions (plain and operator-named, with
//! an optional leading type signature) and top-level destructuring.
//!
//! [`DeclParsing::parse_top_level_declaration`] is the entry point the
//! top-level loop in `lib.rs` drives; [`DeclParsing::parse_let_binding`]
//! is the same grammar reused for the bindings inside a `let` block.
//! Both dispatch on the current token's kind and never fail outright:
//! [`Parser::recover_declaration`] turns a [`Bailout`] into a placeholder
//! `Destructuring` node and skips to the next column-1 token, so one bad
//! declaration never derails the rest of the file.

use std::collections::HashSet;

use crate::error::{ParseErrorKind, PResult};
use crate::expr::ExprParsing;
use crate::pattern::PatternParsing;
use crate::types::TypeParsing;
use crate::{Bailout, Parser};
use lumen_base::Position;
use lumen_syntax::{
    ArgPattern, Associativity, Ctor, Declaration, Expression, ExposedItem, ExposedList, TokenKind, TypeSignature,
};

pub trait DeclParsing {
    /// Parses one top-level declaration, recovering to a placeholder on
    /// any unrecoverable error so the caller's loop always makes
    /// progress.
    fn parse_top_level_declaration(&mut self) -> Declaration;

    /// The same declaration grammar, for use inside a `let` block — a
    /// malformed binding here still bails out to the nearest `let`
    /// boundary via the normal `?` propagation, rather than being
    /// recovered locally.
    fn parse_let_binding(&mut self) -> PResult<Declaration>;
}

impl<'a> DeclParsing for Parser<'a> {
    fn parse_top_level_declaration(&mut self) -> Declaration {
        let start = self.start_region();
        match self.parse_declaration_inner() {
            Ok(decl) => decl,
            Err(Bailout) => self.recover_declaration(start),
        }
    }

    fn parse_let_binding(&mut self) -> PResult<Declaration> {
        self.parse_declaration_inner()
    }
}

impl<'a> Parser<'a> {
    fn parse_declaration_inner(&mut self) -> PResult<Declaration> {
        match self.current_kind() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Infix | TokenKind::Infixl | TokenKind::Infixr => self.parse_infix(),
            TokenKind::TypeKw => self.parse_type_decl(),
            TokenKind::Identifier if self.current().lexeme == "_" => self.parse_destructuring(),
            TokenKind::LParen if self.is_operator_name_paren() => self.parse_definition(),
            TokenKind::LParen | TokenKind::LBrace => self.parse_destructuring(),
            TokenKind::Identifier if !starts_uppercase(&self.current().lexeme) => self.parse_definition(),
            _ => {
                self.error_expected("a declaration (a definition, `import`, `type`, or `infix`)");
                Err(Bailout)
            }
        }
    }

    /// Skips tokens until the next column-1 token or EOF, and synthesises
    /// a placeholder declaration covering the skipped region. Declaration
    /// has no dedicated "bad" variant (unlike `Expression::Bad`), so an
    /// anything-pattern destructuring with a bad body stands in for one.
    fn recover_declaration(&mut self, start: Position) -> Declaration {
        if !self.is_at_end() {
            self.advance();
        }
        while !self.is_at_end() {
            let lp = self.line_pos(self.current().position);
            if lp.column == 1 {
                break;
            }
            self.advance();
        }
        let region = self.region_from(start);
        Declaration::Destructuring {
            pattern: ArgPattern::Anything { region },
            body: Box::new(Expression::Bad { region }),
            region,
        }
    }

    // -- module header ----------------------------------------------------

    /// `module <ModuleName> [exposing <ExposedList>]`. Returns `None` for
    /// the declaration if the leading `module` keyword is missing (the
    /// error is still recorded); the returned dotted name is empty in
    /// that case.
    pub(crate) fn parse_module_header(&mut self) -> (Option<Declaration>, String) {
        let start = self.start_region();
        if !self.check(&TokenKind::Module) {
            self.error_expected("`module`");
            return (None, String::new());
        }
        let keyword_pos = self.current().position;
        self.advance();
        let name = match self.parse_module_path() {
            Ok(segments) => segments,
            Err(Bailout) => Vec::new(),
        };
        let module_name = name.join(".");
        let exposing = if self.check(&TokenKind::Exposing) {
            self.advance();
            self.parse_exposed_list().unwrap_or_else(|_| ExposedList::Open {
                region: self.region_from(start),
            })
        } else {
            ExposedList::Open {
                region: self.region_from(start),
            }
        };
        let region = self.region_from(start);
        (
            Some(Declaration::Module {
                keyword_pos,
                name,
                exposing,
                region,
            }),
            module_name,
        )
    }

    fn parse_exposed_list(&mut self) -> PResult<ExposedList> {
        let start = self.start_region();
        self.expect(TokenKind::LParen, "`(`")?;
        if self.check(&TokenKind::Range) {
            self.advance();
            self.expect(TokenKind::RParen, "`)`")?;
            return Ok(ExposedList::Open {
                region: self.region_from(start),
            });
        }
        let mut items = vec![self.parse_exposed_item()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            items.push(self.parse_exposed_item()?);
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(ExposedList::Closed {
            items,
            region: self.region_from(start),
        })
    }

    fn parse_exposed_item(&mut self) -> PResult<ExposedItem> {
        let start = self.start_region();
        match self.current_kind() {
            TokenKind::LParen => {
                self.advance();
                let name = self.expect(TokenKind::Operator, "an operator")?.lexeme;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(ExposedItem::Value {
                    name,
                    region: self.region_from(start),
                })
            }
            TokenKind::Identifier if starts_uppercase(&self.current().lexeme) => {
                let name = self.advance().lexeme;
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    if self.check(&TokenKind::Range) {
                        self.advance();
                        self.expect(TokenKind::RParen, "`)`")?;
                        return Ok(ExposedItem::UnionOpen {
                            name,
                            region: self.region_from(start),
                        });
                    }
                    let mut ctors = vec![self.expect(TokenKind::Identifier, "a constructor name")?.lexeme];
                    while self.check(&TokenKind::Comma) {
                        self.advance();
                        ctors.push(self.expect(TokenKind::Identifier, "a constructor name")?.lexeme);
                    }
                    self.expect(TokenKind::RParen, "`)`")?;
                    Ok(ExposedItem::UnionClosed {
                        name,
                        ctors,
                        region: self.region_from(start),
                    })
                } else {
                    Ok(ExposedItem::Type {
                        name,
                        region: self.region_from(start),
                    })
                }
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                Ok(ExposedItem::Value {
                    name,
                    region: self.region_from(start),
                })
            }
            _ => {
                self.error_expected("an exposed name, `Type(..)`, or `Type(Ctor, ...)`");
                Err(Bailout)
            }
        }
    }

    // -- import -------------------------------------------------------------

    fn parse_import(&mut self) -> PResult<Declaration> {
        let start = self.start_region();
        let keyword_pos = self.current().position;
        self.advance(); // `import`
        let name = self.parse_module_path()?;
        let alias = if self.check(&TokenKind::As) {
            self.advance();
            Some(self.expect(TokenKind::Identifier, "a module alias")?.lexeme)
        } else {
            None
        };
        let exposing = if self.check(&TokenKind::Exposing) {
            self.advance();
            Some(self.parse_exposed_list()?)
        } else {
            None
        };
        Ok(Declaration::Import {
            keyword_pos,
            name,
            alias,
            exposing,
            region: self.region_from(start),
        })
    }

    // -- infix ----------------------------------------------------------

    fn parse_infix(&mut self) -> PResult<Declaration> {
        let start = self.start_region();
        let keyword_pos = self.current().position;
        let associativity = match self.current_kind() {
            TokenKind::Infix => Associativity::NonAssoc,
            TokenKind::Infixl => Associativity::Left,
            TokenKind::Infixr => Associativity::Right,
            _ => unreachable!("parse_infix only called on an infix keyword"),
        };
        self.advance();
        let prec_token = self.expect(TokenKind::Int, "a precedence between 0 and 9")?;
        let precedence = match prec_token.lexeme.parse::<u8>() {
            Ok(v) if v <= 9 => v,
            Ok(v) => {
                self.error(
                    ParseErrorKind::OutOfRangePrecedence {
                        value: prec_token.lexeme.clone(),
                    },
                    prec_token.position,
                );
                v.min(9)
            }
            Err(_) => {
                self.error(
                    ParseErrorKind::OutOfRangePrecedence {
                        value: prec_token.lexeme.clone(),
                    },
                    prec_token.position,
                );
                0
            }
        };
        let operator = self.expect(TokenKind::Operator, "an operator")?.lexeme;
        Ok(Declaration::Infix {
            keyword_pos,
            associativity,
            precedence,
            operator,
            region: self.region_from(start),
        })
    }

    // -- type alias / union ----------------------------------------------

    fn parse_type_decl(&mut self) -> PResult<Declaration> {
        let start = self.start_region();
        let keyword_pos = self.current().position;
        self.advance(); // `type`
        if self.check(&TokenKind::Alias) {
            self.advance();
            let name = self.expect(TokenKind::Identifier, "an alias name")?.lexeme;
            let type_vars = self.parse_type_var_list();
            self.check_duplicate_type_vars(&type_vars);
            self.expect_op("=", "`=`")?;
            let ty = self.parse_type()?;
            Ok(Declaration::Alias {
                keyword_pos,
                name,
                type_vars,
                ty,
                region: self.region_from(start),
            })
        } else {
            let name = self.expect(TokenKind::Identifier, "a type name")?.lexeme;
            let type_vars = self.parse_type_var_list();
            self.check_duplicate_type_vars(&type_vars);
            self.expect_op("=", "`=`")?;
            let mut ctors = vec![self.parse_ctor()?];
            while self.check(&TokenKind::Pipe) {
                self.advance();
                ctors.push(self.parse_ctor()?);
            }
            self.check_duplicate_ctors(&ctors);
            Ok(Declaration::Union {
                keyword_pos,
                name,
                type_vars,
                ctors,
                region: self.region_from(start),
            })
        }
    }

    fn parse_type_var_list(&mut self) -> Vec<String> {
        let mut vars = Vec::new();
        while matches!(self.current_kind(), TokenKind::Identifier) && !starts_uppercase(&self.current().lexeme) {
            vars.push(self.advance().lexeme);
        }
        vars
    }

    fn parse_ctor(&mut self) -> PResult<Ctor> {
        let start = self.start_region();
        let name = self.expect(TokenKind::Identifier, "a constructor name")?.lexeme;
        let mut args = Vec::new();
        while self.starts_type_atom() {
            args.push(self.parse_type_atom()?);
        }
        Ok(Ctor {
            name,
            args,
            region: self.region_from(start),
        })
    }

    fn check_duplicate_type_vars(&mut self, type_vars: &[String]) {
        let mut seen = HashSet::new();
        for name in type_vars {
            if !seen.insert(name.clone()) {
                self.error(
                    ParseErrorKind::DuplicateTypeVariable { name: name.clone() },
                    self.current().position,
                );
            }
        }
    }

    fn check_duplicate_ctors(&mut self, ctors: &[Ctor]) {
        let mut seen = HashSet::new();
        for ctor in ctors {
            if !seen.insert(ctor.name.clone()) {
                self.error(
                    ParseErrorKind::DuplicateConstructor { name: ctor.name.clone() },
                    ctor.region.start,
                );
            }
        }
    }

    // -- definitions and destructuring -------------------------------------

    /// `true` if the parser is sitting on `(op)`: a parenthesised operator
    /// used as a definable name, as in `(+) : Int -> Int -> Int`.
    fn is_operator_name_paren(&self) -> bool {
        matches!(self.current_kind(), TokenKind::LParen)
            && matches!(self.peek_at(1).kind, TokenKind::Operator)
            && matches!(self.peek_at(2).kind, TokenKind::RParen)
    }

    /// A definable name: a plain lower-case identifier, or a parenthesised
    /// operator (`(+)`, `(::)`, ...).
    fn parse_definable_name(&mut self) -> PResult<String> {
        if self.check(&TokenKind::LParen) {
            self.advance();
            let name = self.expect(TokenKind::Operator, "an operator")?.lexeme;
            self.expect(TokenKind::RParen, "`)`")?;
            Ok(name)
        } else {
            Ok(self.expect(TokenKind::Identifier, "a definition name")?.lexeme)
        }
    }

    fn parse_definition_args(&mut self) -> PResult<Vec<ArgPattern>> {
        let mut args = Vec::new();
        while self.starts_arg_pattern() {
            args.push(self.parse_arg_pattern()?);
        }
        Ok(args)
    }

    fn starts_arg_pattern(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Identifier | TokenKind::LParen | TokenKind::LBrace)
    }

    /// An optional `name : Type` signature followed, on the next line at
    /// the same indentation, by `name args = body`; or, with no
    /// signature, directly `name args = body`. The signature and
    /// definition names must match (a mismatch is reported but the
    /// definition is still produced, using the definition's own name).
    fn parse_definition(&mut self) -> PResult<Declaration> {
        let start = self.start_region();
        let first_name = self.parse_definable_name()?;
        if self.check_op(":") {
            self.advance();
            let ty = self.parse_type()?;
            let signature = TypeSignature {
                name: first_name.clone(),
                ty,
                region: self.region_from(start),
            };
            let def_name = self.parse_definable_name()?;
            if def_name != first_name {
                self.error(
                    ParseErrorKind::MismatchedDefinitionName {
                        signature: first_name,
                        definition: def_name.clone(),
                    },
                    self.current().position,
                );
            }
            let args = self.parse_definition_args()?;
            self.expect_op("=", "`=`")?;
            let body = self.parse_expr()?;
            Ok(Declaration::Definition {
                signature: Some(signature),
                name: def_name,
                args,
                body: Box::new(body),
                region: self.region_from(start),
            })
        } else {
            let args = self.parse_definition_args()?;
            self.expect_op("=", "`=`")?;
            let body = self.parse_expr()?;
            Ok(Declaration::Definition {
                signature: None,
                name: first_name,
                args,
                body: Box::new(body),
                region: self.region_from(start),
            })
        }
    }

    /// `<ArgPattern> = <Expr>`, where the pattern is a tuple, record, `_`,
    /// or a variable name — never a bare constructor.
    fn parse_destructuring(&mut self) -> PResult<Declaration> {
        let start = self.start_region();
        let pattern = self.parse_arg_pattern()?;
        self.expect_op("=", "`=`")?;
        let body = self.parse_expr()?;
        Ok(Declaration::Destructuring {
            pattern,
            body: Box::new(body),
            region: self.region_from(start),
        })
    }
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseMode, Parser};
    use lumen_base::SourceMap;
    use lumen_diagnostics::Reporter;
    use lumen_syntax::{scan, OperatorTable};

    fn parse(source: &str) -> (lumen_syntax::Declaration, Vec<lumen_syntax::Declaration>, Reporter) {
        let mut source_map = SourceMap::new();
        source_map.insert("Test.lum", source);
        let tokens = scan(source);
        let mut reporter = Reporter::new();
        let mut operators = OperatorTable::with_builtins();
        let parser = Parser::new(&source_map, "Test.lum", tokens, &mut reporter, &mut operators, ParseMode::FullParse);
        let parsed = parser.parse_module();
        (parsed.module_decl.unwrap(), parsed.declarations, reporter)
    }

    #[test]
    fn module_header_round_trips_name_and_closed_exposing() {
        let (module_decl, _, reporter) = parse("module Foo.Bar exposing (foo, Bar(..), Baz(A, B, C))\n");
        assert!(reporter.is_ok());
        match module_decl {
            Declaration::Module { name, exposing, .. } => {
                assert_eq!(name, vec!["Foo".to_string(), "Bar".to_string()]);
                match exposing {
                    ExposedList::Closed { items, .. } => {
                        assert_eq!(items.len(), 3);
                        assert!(matches!(&items[0], ExposedItem::Value { name, .. } if name == "foo"));
                        assert!(matches!(&items[1], ExposedItem::UnionOpen { name, .. } if name == "Bar"));
                        match &items[2] {
                            ExposedItem::UnionClosed { name, ctors, .. } => {
                                assert_eq!(name, "Baz");
                                assert_eq!(ctors, &vec!["A".to_string(), "B".to_string(), "C".to_string()]);
                            }
                            other => panic!("expected UnionClosed, got {:?}", other),
                        }
                    }
                    other => panic!("expected Closed exposing list, got {:?}", other),
                }
            }
            other => panic!("expected Module, got {:?}", other),
        }
    }

    #[test]
    fn plain_definition_with_args_and_no_signature() {
        let (_, decls, reporter) = parse("module M exposing (..)\nadd a b = a\n");
        assert!(reporter.is_ok());
        match &decls[0] {
            Declaration::Definition { name, args, signature, .. } => {
                assert_eq!(name, "add");
                assert_eq!(args.len(), 2);
                assert!(signature.is_none());
            }
            other => panic!("expected Definition, got {:?}", other),
        }
    }

    #[test]
    fn signature_and_definition_names_must_match() {
        let (_, decls, reporter) = parse("module M exposing (..)\nfoo : Int\nbar = 1\n");
        assert!(!reporter.is_ok());
        assert!(matches!(&decls[0], Declaration::Definition { name, .. } if name == "bar"));
    }

    #[test]
    fn operator_definition_form_is_supported() {
        let (_, decls, reporter) = parse("module M exposing (..)\n(+) : Int -> Int -> Int\n(+) a b = a\n");
        assert!(reporter.is_ok());
        match &decls[0] {
            Declaration::Definition { name, signature, .. } => {
                assert_eq!(name, "+");
                assert!(signature.is_some());
            }
            other => panic!("expected Definition, got {:?}", other),
        }
    }

    #[test]
    fn tuple_destructuring_is_its_own_node() {
        let (_, decls, reporter) = parse("module M exposing (..)\n(a, b) = pair\n");
        assert!(reporter.is_ok());
        assert!(matches!(&decls[0], Declaration::Destructuring { .. }));
    }

    #[test]
    fn union_declaration_collects_constructors() {
        let (_, decls, reporter) = parse("module M exposing (..)\ntype Bool2 = T | F\n");
        assert!(reporter.is_ok());
        match &decls[0] {
            Declaration::Union { name, ctors, .. } => {
                assert_eq!(name, "Bool2");
                assert_eq!(ctors.len(), 2);
            }
            other => panic!("expected Union, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_constructor_name_is_reported() {
        let (_, _, reporter) = parse("module M exposing (..)\ntype T = A | A\n");
        assert!(!reporter.is_ok());
    }

    #[test]
    fn type_alias_round_trips() {
        let (_, decls, reporter) = parse("module M exposing (..)\ntype alias Pair a b = (a, b)\n");
        assert!(reporter.is_ok());
        match &decls[0] {
            Declaration::Alias { name, type_vars, .. } => {
                assert_eq!(name, "Pair");
                assert_eq!(type_vars, &vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected Alias, got {:?}", other),
        }
    }

    #[test]
    fn infix_out_of_range_precedence_still_produces_a_declaration() {
        let (_, decls, reporter) = parse("module M exposing (..)\ninfixl 12 <+>\n");
        assert!(!reporter.is_ok());
        match &decls[0] {
            Declaration::Infix { precedence, .. } => assert_eq!(*precedence, 9),
            other => panic!("expected Infix, got {:?}", other),
        }
    }

    #[test]
    fn import_with_alias_and_closed_exposing() {
        let (_, decls, reporter) = parse("module M exposing (..)\nimport Data.List as L exposing (map)\nx = 1\n");
        assert!(reporter.is_ok());
        match &decls[0] {
            Declaration::Import { name, alias, exposing, .. } => {
                assert_eq!(name, &vec!["Data".to_string(), "List".to_string()]);
                assert_eq!(alias.as_deref(), Some("L"));
                assert!(matches!(exposing, Some(ExposedList::Closed { .. })));
            }
            other => panic!("expected Import, got {:?}", other),
        }
    }

    #[test]
    fn declaration_starting_at_column_one_before_body_is_reported_and_recovered() {
        let (_, decls, reporter) = parse("module M exposing (..)\nx =\nmodule Y exposing (..)\n");
        assert!(!reporter.is_ok());
        // Recovery still produces a placeholder declaration for the
        // unfinished `x`, and the file continues to be parsed afterward.
        assert!(!decls.is_empty());
        let reports = reporter.for_file(std::path::Path::new("Test.lum"));
        assert!(reports
            .iter()
            .any(|r| r.message.contains("new top-level declaration") && r.message.contains("has not finished")));
    }
}
