//! The abstract syntax tree: four parallel sum types — [`Declaration`],
//! [`Expression`], [`Type`] and [`Pattern`]/[`ArgPattern`] — plus a
//! capability-record visitor that walks any of them.
//!
//! Every node is immutable once built and carries its own [`Region`] so
//! diagnostics can always point at exact source text. Nodes reference
//! their children by `Box`, not by arena index: a single parsed file's
//! tree is built bottom-up once and never mutated in place, so ordinary
//! ownership is simpler than an index-addressed arena here (the resolver's
//! scope/object graph, which *does* need shared back-references, uses an
//! arena instead — see `lumen_resolve`).

use lumen_base::{Position, Region};

/// Either fixed precedence side of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
}

/// An exposing list after `module Foo exposing (...)` or
/// `import Foo exposing (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExposedList {
    /// `(..)`
    Open { region: Region },
    /// `(item, item, ...)`
    Closed { items: Vec<ExposedItem>, region: Region },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExposedItem {
    /// A lower-case name or a parenthesised operator: a value.
    Value { name: String, region: Region },
    /// An upper-case name with no constructor list: an opaque type or alias.
    Type { name: String, region: Region },
    /// `Name(..)`: a union exposed with every constructor.
    UnionOpen { name: String, region: Region },
    /// `Name(A, B)`: a union exposed with exactly these constructors.
    UnionClosed {
        name: String,
        ctors: Vec<String>,
        region: Region,
    },
}

impl ExposedList {
    pub fn region(&self) -> Region {
        match self {
            ExposedList::Open { region } => *region,
            ExposedList::Closed { region, .. } => *region,
        }
    }
}

/// A dotted module path, e.g. `Data.List`.
pub type ModulePath = Vec<String>;

/// A union constructor: `Name Type*`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ctor {
    pub name: String,
    pub args: Vec<Type>,
    pub region: Region,
}

/// An optional `name : Type` signature preceding a `Definition`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSignature {
    pub name: String,
    pub ty: Type,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub pattern: Pattern,
    pub body: Expression,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField<T> {
    pub name: String,
    pub value: T,
    pub region: Region,
}

// ---------------------------------------------------------------------
// Declaration
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Module {
        keyword_pos: Position,
        name: ModulePath,
        exposing: ExposedList,
        region: Region,
    },
    Import {
        keyword_pos: Position,
        name: ModulePath,
        alias: Option<String>,
        exposing: Option<ExposedList>,
        region: Region,
    },
    Infix {
        keyword_pos: Position,
        associativity: Associativity,
        precedence: u8,
        operator: String,
        region: Region,
    },
    Alias {
        keyword_pos: Position,
        name: String,
        type_vars: Vec<String>,
        ty: Type,
        region: Region,
    },
    Union {
        keyword_pos: Position,
        name: String,
        type_vars: Vec<String>,
        ctors: Vec<Ctor>,
        region: Region,
    },
    Definition {
        signature: Option<TypeSignature>,
        name: String,
        args: Vec<ArgPattern>,
        body: Box<Expression>,
        region: Region,
    },
    Destructuring {
        pattern: ArgPattern,
        body: Box<Expression>,
        region: Region,
    },
}

impl Declaration {
    pub fn region(&self) -> Region {
        match self {
            Declaration::Module { region, .. }
            | Declaration::Import { region, .. }
            | Declaration::Infix { region, .. }
            | Declaration::Alias { region, .. }
            | Declaration::Union { region, .. }
            | Declaration::Definition { region, .. }
            | Declaration::Destructuring { region, .. } => *region,
        }
    }

    pub fn pos(&self) -> Position {
        self.region().start
    }

    pub fn end(&self) -> Position {
        self.region().end
    }
}

// ---------------------------------------------------------------------
// Expression
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier {
        name: String,
        region: Region,
    },
    /// A qualified selector such as `Data.List.map`.
    Selector {
        module_path: ModulePath,
        name: String,
        region: Region,
    },
    LiteralInt {
        text: String,
        region: Region,
    },
    LiteralFloat {
        text: String,
        region: Region,
    },
    LiteralString {
        text: String,
        region: Region,
    },
    LiteralChar {
        text: String,
        region: Region,
    },
    LiteralBool {
        value: bool,
        region: Region,
    },
    Tuple {
        items: Vec<Expression>,
        region: Region,
    },
    List {
        items: Vec<Expression>,
        region: Region,
    },
    Record {
        fields: Vec<RecordField<Expression>>,
        region: Region,
    },
    RecordUpdate {
        base: Box<Expression>,
        fields: Vec<RecordField<Expression>>,
        region: Region,
    },
    FuncApp {
        func: Box<Expression>,
        args: Vec<Expression>,
        region: Region,
    },
    Lambda {
        args: Vec<ArgPattern>,
        body: Box<Expression>,
        region: Region,
    },
    If {
        cond: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
        region: Region,
    },
    Case {
        subject: Box<Expression>,
        branches: Vec<CaseBranch>,
        region: Region,
    },
    Let {
        decls: Vec<Declaration>,
        body: Box<Expression>,
        region: Region,
    },
    Paren {
        inner: Box<Expression>,
        region: Region,
    },
    Unary {
        op: String,
        operand: Box<Expression>,
        region: Region,
    },
    Binary {
        op: String,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        region: Region,
    },
    /// `.field` used as a one-argument accessor function.
    FieldAccessor {
        field: String,
        region: Region,
    },
    /// `(,)`, `(,,)`, ... — a tuple constructor used as a function.
    TupleCtor {
        arity: u8,
        region: Region,
    },
    /// A syntactically malformed expression the parser recovered from.
    Bad {
        region: Region,
    },
}

impl Expression {
    pub fn region(&self) -> Region {
        match self {
            Expression::Identifier { region, .. }
            | Expression::Selector { region, .. }
            | Expression::LiteralInt { region, .. }
            | Expression::LiteralFloat { region, .. }
            | Expression::LiteralString { region, .. }
            | Expression::LiteralChar { region, .. }
            | Expression::LiteralBool { region, .. }
            | Expression::Tuple { region, .. }
            | Expression::List { region, .. }
            | Expression::Record { region, .. }
            | Expression::RecordUpdate { region, .. }
            | Expression::FuncApp { region, .. }
            | Expression::Lambda { region, .. }
            | Expression::If { region, .. }
            | Expression::Case { region, .. }
            | Expression::Let { region, .. }
            | Expression::Paren { region, .. }
            | Expression::Unary { region, .. }
            | Expression::Binary { region, .. }
            | Expression::FieldAccessor { region, .. }
            | Expression::TupleCtor { region, .. }
            | Expression::Bad { region } => *region,
        }
    }

    pub fn pos(&self) -> Position {
        self.region().start
    }

    pub fn end(&self) -> Position {
        self.region().end
    }
}

// ---------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Named {
        module_path: ModulePath,
        name: String,
        args: Vec<Type>,
        region: Region,
    },
    Var {
        name: String,
        region: Region,
    },
    /// A curried function type `a -> b`; chains of `->` nest on the right.
    Function {
        param: Box<Type>,
        ret: Box<Type>,
        region: Region,
    },
    Record {
        fields: Vec<RecordField<Type>>,
        /// `{ r | field : T }` — the row variable being extended, if any.
        extension: Option<String>,
        region: Region,
    },
    Tuple {
        items: Vec<Type>,
        region: Region,
    },
}

impl Type {
    pub fn region(&self) -> Region {
        match self {
            Type::Named { region, .. }
            | Type::Var { region, .. }
            | Type::Function { region, .. }
            | Type::Record { region, .. }
            | Type::Tuple { region, .. } => *region,
        }
    }

    pub fn pos(&self) -> Position {
        self.region().start
    }

    pub fn end(&self) -> Position {
        self.region().end
    }
}

// ---------------------------------------------------------------------
// Pattern / ArgPattern
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PatternLiteral {
    Int(String),
    Float(String),
    Str(String),
    Char(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Var {
        name: String,
        region: Region,
    },
    Anything {
        region: Region,
    },
    Literal {
        value: PatternLiteral,
        region: Region,
    },
    /// A constructor pattern, including the `::` cons pattern (re-built as
    /// `Ctor { name: "::", args: [head, tail], .. }`).
    Ctor {
        module_path: ModulePath,
        name: String,
        args: Vec<Pattern>,
        region: Region,
    },
    Tuple {
        items: Vec<Pattern>,
        region: Region,
    },
    /// `{ a, b }` — binds `a` and `b` from the matched record.
    Record {
        fields: Vec<String>,
        region: Region,
    },
    List {
        items: Vec<Pattern>,
        region: Region,
    },
    /// `p as x`
    Alias {
        pattern: Box<Pattern>,
        name: String,
        region: Region,
    },
}

impl Pattern {
    pub fn region(&self) -> Region {
        match self {
            Pattern::Var { region, .. }
            | Pattern::Anything { region }
            | Pattern::Literal { region, .. }
            | Pattern::Ctor { region, .. }
            | Pattern::Tuple { region, .. }
            | Pattern::Record { region, .. }
            | Pattern::List { region, .. }
            | Pattern::Alias { region, .. } => *region,
        }
    }

    pub fn pos(&self) -> Position {
        self.region().start
    }

    pub fn end(&self) -> Position {
        self.region().end
    }
}

/// The restricted subset of [`Pattern`] usable as a function argument or a
/// top-level destructuring target: variable, `_`, tuple, record, alias.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgPattern {
    Var {
        name: String,
        region: Region,
    },
    Anything {
        region: Region,
    },
    Tuple {
        items: Vec<ArgPattern>,
        region: Region,
    },
    Record {
        fields: Vec<String>,
        region: Region,
    },
    Alias {
        pattern: Box<ArgPattern>,
        name: String,
        region: Region,
    },
}

impl ArgPattern {
    pub fn region(&self) -> Region {
        match self {
            ArgPattern::Var { region, .. }
            | ArgPattern::Anything { region }
            | ArgPattern::Tuple { region, .. }
            | ArgPattern::Record { region, .. }
            | ArgPattern::Alias { region, .. } => *region,
        }
    }

    pub fn pos(&self) -> Position {
        self.region().start
    }

    pub fn end(&self) -> Position {
        self.region().end
    }

    /// Widens an `ArgPattern` into the full [`Pattern`] sum type, for
    /// contexts (like case branches) that accept any pattern.
    pub fn into_pattern(self) -> Pattern {
        match self {
            ArgPattern::Var { name, region } => Pattern::Var { name, region },
            ArgPattern::Anything { region } => Pattern::Anything { region },
            ArgPattern::Tuple { items, region } => Pattern::Tuple {
                items: items.into_iter().map(ArgPattern::into_pattern).collect(),
                region,
            },
            ArgPattern::Record { fields, region } => Pattern::Record { fields, region },
            ArgPattern::Alias { pattern, name, region } => Pattern::Alias {
                pattern: Box::new(pattern.into_pattern()),
                name,
                region,
            },
        }
    }
}

// ---------------------------------------------------------------------
// Visitor
// ---------------------------------------------------------------------

/// A borrowed reference into any of the four AST sum types, passed to a
/// [`Visitor`] on both entry and (post-order) exit.
pub enum VisitNode<'a> {
    Declaration(&'a Declaration),
    Expression(&'a Expression),
    Type(&'a Type),
    Pattern(&'a Pattern),
    ArgPattern(&'a ArgPattern),
}

/// What a [`Visitor`] wants to happen to a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    VisitChildren,
    Skip,
}

/// A capability record the walker calls on entry and exit of every node.
/// `enter` decides whether to recurse; `leave` runs after children have
/// been visited (a no-op by default), giving post-order passes a hook.
pub trait Visitor {
    fn enter(&mut self, node: VisitNode) -> VisitAction;

    fn leave(&mut self, _node: VisitNode) {}
}

pub fn walk_declaration<V: Visitor>(visitor: &mut V, decl: &Declaration) {
    if visitor.enter(VisitNode::Declaration(decl)) == VisitAction::Skip {
        return;
    }
    match decl {
        Declaration::Module { .. } | Declaration::Import { .. } | Declaration::Infix { .. } => {}
        Declaration::Alias { ty, .. } => walk_type(visitor, ty),
        Declaration::Union { ctors, .. } => {
            for ctor in ctors {
                for arg in &ctor.args {
                    walk_type(visitor, arg);
                }
            }
        }
        Declaration::Definition { signature, args, body, .. } => {
            if let Some(sig) = signature {
                walk_type(visitor, &sig.ty);
            }
            for arg in args {
                walk_arg_pattern(visitor, arg);
            }
            walk_expression(visitor, body);
        }
        Declaration::Destructuring { pattern, body, .. } => {
            walk_arg_pattern(visitor, pattern);
            walk_expression(visitor, body);
        }
    }
    visitor.leave(VisitNode::Declaration(decl));
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    if visitor.enter(VisitNode::Expression(expr)) == VisitAction::Skip {
        return;
    }
    match expr {
        Expression::Identifier { .. }
        | Expression::Selector { .. }
        | Expression::LiteralInt { .. }
        | Expression::LiteralFloat { .. }
        | Expression::LiteralString { .. }
        | Expression::LiteralChar { .. }
        | Expression::LiteralBool { .. }
        | Expression::FieldAccessor { .. }
        | Expression::TupleCtor { .. }
        | Expression::Bad { .. } => {}
        Expression::Tuple { items, .. } | Expression::List { items, .. } => {
            for item in items {
                walk_expression(visitor, item);
            }
        }
        Expression::Record { fields, .. } => {
            for field in fields {
                walk_expression(visitor, &field.value);
            }
        }
        Expression::RecordUpdate { base, fields, .. } => {
            walk_expression(visitor, base);
            for field in fields {
                walk_expression(visitor, &field.value);
            }
        }
        Expression::FuncApp { func, args, .. } => {
            walk_expression(visitor, func);
            for arg in args {
                walk_expression(visitor, arg);
            }
        }
        Expression::Lambda { args, body, .. } => {
            for arg in args {
                walk_arg_pattern(visitor, arg);
            }
            walk_expression(visitor, body);
        }
        Expression::If { cond, then_branch, else_branch, .. } => {
            walk_expression(visitor, cond);
            walk_expression(visitor, then_branch);
            walk_expression(visitor, else_branch);
        }
        Expression::Case { subject, branches, .. } => {
            walk_expression(visitor, subject);
            for branch in branches {
                walk_pattern(visitor, &branch.pattern);
                walk_expression(visitor, &branch.body);
            }
        }
        Expression::Let { decls, body, .. } => {
            for decl in decls {
                walk_declaration(visitor, decl);
            }
            walk_expression(visitor, body);
        }
        Expression::Paren { inner, .. } => walk_expression(visitor, inner),
        Expression::Unary { operand, .. } => walk_expression(visitor, operand),
        Expression::Binary { lhs, rhs, .. } => {
            walk_expression(visitor, lhs);
            walk_expression(visitor, rhs);
        }
    }
    visitor.leave(VisitNode::Expression(expr));
}

pub fn walk_type<V: Visitor>(visitor: &mut V, ty: &Type) {
    if visitor.enter(VisitNode::Type(ty)) == VisitAction::Skip {
        return;
    }
    match ty {
        Type::Named { args, .. } => {
            for arg in args {
                walk_type(visitor, arg);
            }
        }
        Type::Var { .. } => {}
        Type::Function { param, ret, .. } => {
            walk_type(visitor, param);
            walk_type(visitor, ret);
        }
        Type::Record { fields, .. } => {
            for field in fields {
                walk_type(visitor, &field.value);
            }
        }
        Type::Tuple { items, .. } => {
            for item in items {
                walk_type(visitor, item);
            }
        }
    }
    visitor.leave(VisitNode::Type(ty));
}

pub fn walk_pattern<V: Visitor>(visitor: &mut V, pattern: &Pattern) {
    if visitor.enter(VisitNode::Pattern(pattern)) == VisitAction::Skip {
        return;
    }
    match pattern {
        Pattern::Var { .. } | Pattern::Anything { .. } | Pattern::Literal { .. } | Pattern::Record { .. } => {}
        Pattern::Ctor { args, .. } => {
            for arg in args {
                walk_pattern(visitor, arg);
            }
        }
        Pattern::Tuple { items, .. } | Pattern::List { items, .. } => {
            for item in items {
                walk_pattern(visitor, item);
            }
        }
        Pattern::Alias { pattern, .. } => walk_pattern(visitor, pattern),
    }
    visitor.leave(VisitNode::Pattern(pattern));
}

pub fn walk_arg_pattern<V: Visitor>(visitor: &mut V, pattern: &ArgPattern) {
    if visitor.enter(VisitNode::ArgPattern(pattern)) == VisitAction::Skip {
        return;
    }
    match pattern {
        ArgPattern::Var { .. } | ArgPattern::Anything { .. } | ArgPattern::Record { .. } => {}
        ArgPattern::Tuple { items, .. } => {
            for item in items {
                walk_arg_pattern(visitor, item);
            }
        }
        ArgPattern::Alias { pattern, .. } => walk_arg_pattern(visitor, pattern),
    }
    visitor.leave(VisitNode::ArgPattern(pattern));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, start: u32, end: u32) -> Expression {
        Expression::Identifier {
            name: name.to_string(),
            region: Region::new(start, end),
        }
    }

    #[test]
    fn func_app_flattens_into_a_single_node_with_all_args() {
        let app = Expression::FuncApp {
            func: Box::new(ident("f", 0, 1)),
            args: vec![ident("a", 2, 3), ident("b", 4, 5), ident("c", 6, 7)],
            region: Region::new(0, 7),
        };
        match &app {
            Expression::FuncApp { args, .. } => assert_eq!(args.len(), 3),
            _ => panic!("expected FuncApp"),
        }
    }

    #[test]
    fn arg_pattern_widens_into_full_pattern() {
        let arg = ArgPattern::Alias {
            pattern: Box::new(ArgPattern::Var {
                name: "x".into(),
                region: Region::new(0, 1),
            }),
            name: "y".into(),
            region: Region::new(0, 6),
        };
        let widened = arg.into_pattern();
        match widened {
            Pattern::Alias { name, pattern, .. } => {
                assert_eq!(name, "y");
                assert!(matches!(*pattern, Pattern::Var { .. }));
            }
            _ => panic!("expected Alias"),
        }
    }

    struct CountingVisitor {
        entered: usize,
        left: usize,
    }

    impl Visitor for CountingVisitor {
        fn enter(&mut self, _node: VisitNode) -> VisitAction {
            self.entered += 1;
            VisitAction::VisitChildren
        }

        fn leave(&mut self, _node: VisitNode) {
            self.left += 1;
        }
    }

    #[test]
    fn visitor_visits_every_node_exactly_once_each_way() {
        let expr = Expression::Binary {
            op: "+".into(),
            lhs: Box::new(ident("a", 0, 1)),
            rhs: Box::new(Expression::Binary {
                op: "*".into(),
                lhs: Box::new(ident("b", 4, 5)),
                rhs: Box::new(ident("c", 8, 9)),
                region: Region::new(4, 9),
            }),
            region: Region::new(0, 9),
        };
        let mut visitor = CountingVisitor { entered: 0, left: 0 };
        walk_expression(&mut visitor, &expr);
        assert_eq!(visitor.entered, 4);
        assert_eq!(visitor.left, 4);
    }

    struct SkippingVisitor {
        visited_identifiers: Vec<String>,
    }

    impl Visitor for SkippingVisitor {
        fn enter(&mut self, node: VisitNode) -> VisitAction {
            if let VisitNode::Expression(Expression::Identifier { name, .. }) = node {
                self.visited_identifiers.push(name.clone());
            }
            if let VisitNode::Expression(Expression::Paren { .. }) = node {
                return VisitAction::Skip;
            }
            VisitAction::VisitChildren
        }
    }

    #[test]
    fn skip_prunes_children_from_the_walk() {
        let expr = Expression::Tuple {
            items: vec![
                ident("a", 0, 1),
                Expression::Paren {
                    inner: Box::new(ident("hidden", 5, 11)),
                    region: Region::new(4, 12),
                },
            ],
            region: Region::new(0, 13),
        };
        let mut visitor = SkippingVisitor { visited_identifiers: Vec::new() };
        walk_expression(&mut visitor, &expr);
        assert_eq!(visitor.visited_identifiers, vec!["a".to_string()]);
    }

    #[test]
    fn ctor_pattern_rebuilds_cons_uniformly() {
        let cons = Pattern::Ctor {
            module_path: vec![],
            name: "::".into(),
            args: vec![
                Pattern::Var { name: "head".into(), region: Region::new(0, 4) },
                Pattern::Var { name: "tail".into(), region: Region::new(8, 12) },
            ],
            region: Region::new(0, 12),
        };
        match cons {
            Pattern::Ctor { name, args, .. } => {
                assert_eq!(name, "::");
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected Ctor"),
        }
    }
}
