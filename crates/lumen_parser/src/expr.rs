//! Expression grammar: pratt-style atoms, left-associative function
//! application (flattened into one `FuncApp`), and a precedence-climbing
//! binary-operator loop driven by the package's `OperatorTable`.

use crate::error::{ParseErrorKind, PResult};
use crate::{Bailout, Parser};
use lumen_syntax::{Associativity, Expression, RecordField, TokenKind};

pub trait ExprParsing {
    /// Entry point: a full expression, operators included.
    fn parse_expr(&mut self) -> PResult<Expression>;

    /// A left-associative application chain: an atom followed by as many
    /// further atoms as continue it at the current layout column.
    fn parse_application(&mut self) -> PResult<Expression>;

    /// A single term: literal, identifier/selector, parenthesised form,
    /// record, list, lambda, tuple-constructor, or unary minus.
    fn parse_atom(&mut self) -> PResult<Expression>;
}

impl<'a> ExprParsing for Parser<'a> {
    fn parse_expr(&mut self) -> PResult<Expression> {
        self.parse_binary(0)
    }

    fn parse_application(&mut self) -> PResult<Expression> {
        let start = self.start_region();
        let func = self.parse_atom()?;
        let func_line = self.line_pos(self.last_token_end()).line;
        let mut args = Vec::new();
        while self.continues_application(func_line) {
            args.push(self.parse_atom()?);
        }
        if args.is_empty() {
            return Ok(func);
        }
        let region = self.region_from(start);
        Ok(Expression::FuncApp { func: Box::new(func), args, region })
    }

    fn parse_atom(&mut self) -> PResult<Expression> {
        let start = self.start_region();
        match self.current_kind() {
            TokenKind::Operator if self.current().lexeme == "-" && self.peek_at(1).immediately_follows(self.current()) => {
                self.advance();
                let operand = self.parse_atom()?;
                let region = self.region_from(start);
                Ok(Expression::Unary { op: "-".to_string(), operand: Box::new(operand), region })
            }
            TokenKind::Operator if self.current().lexeme == "." && self.peek_at(1).immediately_follows(self.current()) => {
                self.advance();
                let field = self.expect(TokenKind::Identifier, "a field name")?.lexeme;
                let region = self.region_from(start);
                Ok(Expression::FieldAccessor { field, region })
            }
            TokenKind::Identifier if self.current().lexeme.starts_with(|c: char| c.is_uppercase()) => {
                let mut path = self.parse_module_path()?;
                let name = path.pop().unwrap_or_default();
                let region = self.region_from(start);
                if path.is_empty() {
                    Ok(Expression::Identifier { name, region })
                } else {
                    Ok(Expression::Selector { module_path: path, name, region })
                }
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Expression::Identifier { name, region })
            }
            TokenKind::Int => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Expression::LiteralInt { text, region })
            }
            TokenKind::Float => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Expression::LiteralFloat { text, region })
            }
            TokenKind::Str => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Expression::LiteralString { text, region })
            }
            TokenKind::Char => {
                let text = self.advance().lexeme;
                let region = self.region_from(start);
                Ok(Expression::LiteralChar { text, region })
            }
            TokenKind::True => {
                self.advance();
                let region = self.region_from(start);
                Ok(Expression::LiteralBool { value: true, region })
            }
            TokenKind::False => {
                self.advance();
                let region = self.region_from(start);
                Ok(Expression::LiteralBool { value: false, region })
            }
            TokenKind::Backslash => self.parse_lambda(start),
            TokenKind::If => self.parse_if(start),
            TokenKind::Case => self.parse_case(start),
            TokenKind::Let => self.parse_let(start),
            TokenKind::LBracket => self.parse_list_literal(start),
            TokenKind::LBrace => self.parse_record_or_update(start),
            TokenKind::LParen => self.parse_paren_or_tuple_or_tuple_ctor(start),
            _ => {
                self.error_expected_term("an expression");
                Ok(Expression::Bad { region: self.region_from(start) })
            }
        }
    }
}

impl<'a> Parser<'a> {
    fn last_token_end(&self) -> lumen_base::Position {
        self.last_token.end()
    }

    fn parse_binary(&mut self, min_prec: u8) -> PResult<Expression> {
        let mut lhs = self.parse_application()?;
        loop {
            let Some((op, info)) = self.peek_operator() else { break };
            if info.precedence < min_prec {
                break;
            }
            let op_token = self.advance();
            // `NonAssoc` must not let the recursive call swallow a second
            // operator at the same precedence the way `Right` does — it
            // needs that second operator still unconsumed afterward so the
            // clash check below can see it and refuse to chain.
            let next_min = if info.associativity == Associativity::Right {
                info.precedence
            } else {
                info.precedence + 1
            };
            let rhs = self.parse_binary(next_min)?;
            let region = lhs.region().merge(rhs.region());
            lhs = Expression::Binary {
                op: op.clone(),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                region,
            };
            if info.associativity == Associativity::NonAssoc {
                if let Some((_, next_info)) = self.peek_operator() {
                    if next_info.precedence == info.precedence {
                        self.error(ParseErrorKind::NonAssociativeClash { operator: op }, op_token.position);
                        break;
                    }
                }
            }
        }
        Ok(lhs)
    }

    /// The current token's operator spelling and fixity, if it is one — a
    /// user operator the table knows about in the current module's scope.
    /// An `Operator` token the table has no entry for is not treated as a
    /// binary operator here; it simply ends the expression (the resolver
    /// or a later pass flags the unbound name if it is ever used as one).
    fn peek_operator(&self) -> Option<(String, lumen_syntax::OperatorInfo)> {
        if !matches!(self.current_kind(), TokenKind::Operator) {
            return None;
        }
        let name = self.current().lexeme.clone();
        let info = self.operators.lookup(&name, &self.module_name)?;
        Some((name, info))
    }

    fn continues_application(&self, func_line: u32) -> bool {
        if !self.starts_atom() {
            return false;
        }
        self.continues_item(func_line)
    }

    fn starts_atom(&self) -> bool {
        match self.current_kind() {
            TokenKind::Identifier
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::Char
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Backslash
            | TokenKind::If
            | TokenKind::Case
            | TokenKind::Let
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::LParen => true,
            TokenKind::Operator if self.current().lexeme == "-" || self.current().lexeme == "." => true,
            _ => false,
        }
    }

    fn parse_lambda(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        self.advance(); // `\`
        let mut args = vec![self.parse_arg_pattern_expr()?];
        while !self.check(&TokenKind::Arrow) {
            args.push(self.parse_arg_pattern_expr()?);
        }
        self.expect(TokenKind::Arrow, "`->`")?;
        let body = self.parse_expr()?;
        let region = self.region_from(start);
        Ok(Expression::Lambda { args, body: Box::new(body), region })
    }

    fn parse_arg_pattern_expr(&mut self) -> PResult<lumen_syntax::ArgPattern> {
        use crate::pattern::PatternParsing;
        self.parse_arg_pattern()
    }

    fn parse_if(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        self.advance(); // `if`
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then, "`then`")?;
        let then_branch = self.parse_expr()?;
        self.expect(TokenKind::Else, "`else`")?;
        let else_branch = self.parse_expr()?;
        let region = self.region_from(start);
        Ok(Expression::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
            region,
        })
    }

    fn parse_case(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        use crate::pattern::PatternParsing;
        self.advance(); // `case`
        let subject = self.parse_expr()?;
        self.expect(TokenKind::Of, "`of`")?;
        self.open_block()?;
        let mut branches = Vec::new();
        loop {
            let branch_start = self.start_region();
            let pattern = self.parse_pattern()?;
            self.expect(TokenKind::Arrow, "`->`")?;
            let body = self.parse_expr()?;
            let region = self.region_from(branch_start);
            let end_line = self.line_pos(region.end).line;
            branches.push(lumen_syntax::CaseBranch { pattern, body, region });
            if !self.at_block_item_boundary(end_line) {
                break;
            }
        }
        self.close_block();
        let region = self.region_from(start);
        Ok(Expression::Case { subject: Box::new(subject), branches, region })
    }

    fn parse_let(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        use crate::decl::DeclParsing;
        self.advance(); // `let`
        self.open_block()?;
        let mut decls = vec![self.parse_let_binding()?];
        loop {
            let end_line = self.line_pos(self.last_token_end()).line;
            if !self.at_block_item_boundary(end_line) {
                break;
            }
            decls.push(self.parse_let_binding()?);
        }
        self.close_block();
        self.expect(TokenKind::In, "`in`")?;
        let body = self.parse_expr()?;
        let region = self.region_from(start);
        Ok(Expression::Let { decls, body: Box::new(body), region })
    }

    fn parse_list_literal(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        self.advance(); // `[`
        let mut items = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                items.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;
        let region = self.region_from(start);
        Ok(Expression::List { items, region })
    }

    fn parse_record_or_update(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        self.advance(); // `{`
        if self.check(&TokenKind::RBrace) {
            self.advance();
            let region = self.region_from(start);
            return Ok(Expression::Record { fields: Vec::new(), region });
        }
        if matches!(self.current_kind(), TokenKind::Identifier) && matches!(self.peek_at(1).kind, TokenKind::Pipe) {
            let base_start = self.start_region();
            let base_name = self.advance().lexeme;
            let base = Expression::Identifier { name: base_name, region: self.region_from(base_start) };
            self.advance(); // `|`
            let mut fields = vec![self.parse_record_field_expr()?];
            while self.check(&TokenKind::Comma) {
                self.advance();
                fields.push(self.parse_record_field_expr()?);
            }
            self.expect(TokenKind::RBrace, "`}`")?;
            let region = self.region_from(start);
            return Ok(Expression::RecordUpdate { base: Box::new(base), fields, region });
        }
        let mut fields = vec![self.parse_record_field_expr()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            fields.push(self.parse_record_field_expr()?);
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        let region = self.region_from(start);
        Ok(Expression::Record { fields, region })
    }

    fn parse_record_field_expr(&mut self) -> PResult<RecordField<Expression>> {
        let start = self.start_region();
        let name = self.expect(TokenKind::Identifier, "a field name")?.lexeme;
        self.expect_op("=", "`=`")?;
        let value = self.parse_expr()?;
        let region = self.region_from(start);
        Ok(RecordField { name, value, region })
    }

    /// `(`, followed by either `,`-only tuple-constructor sugar (`(,)`,
    /// `(,,)`, ...), a single parenthesised expression, or a comma
    /// separated tuple literal.
    fn parse_paren_or_tuple_or_tuple_ctor(&mut self, start: lumen_base::Position) -> PResult<Expression> {
        self.advance(); // `(`
        // Operator-as-function: `(+)`, `(::)`, ... references the operator's
        // own value the same way a plain identifier does, per the
        // `parse_definable_name` counterpart in `decl.rs`.
        if matches!(self.current_kind(), TokenKind::Operator) && matches!(self.peek_at(1).kind, TokenKind::RParen) {
            let name = self.advance().lexeme;
            self.advance(); // `)`
            let region = self.region_from(start);
            return Ok(Expression::Identifier { name, region });
        }
        if self.check(&TokenKind::Comma) {
            let mut arity: u8 = 1;
            while self.check(&TokenKind::Comma) {
                self.advance();
                arity += 1;
            }
            self.expect(TokenKind::RParen, "`)`")?;
            let region = self.region_from(start);
            return Ok(Expression::TupleCtor { arity, region });
        }
        if self.check(&TokenKind::RParen) {
            self.advance();
            let region = self.region_from(start);
            return Ok(Expression::Tuple { items: Vec::new(), region });
        }
        let mut items = vec![self.parse_expr()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            items.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RParen, "`)`")?;
        let region = self.region_from(start);
        if items.len() == 1 {
            let inner = items.pop().unwrap();
            Ok(Expression::Paren { inner: Box::new(inner), region })
        } else {
            Ok(Expression::Tuple { items, region })
        }
    }
}
