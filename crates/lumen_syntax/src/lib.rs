//! # lumen-syntax
//!
//! Everything downstream of raw bytes but upstream of parsing decisions:
//! the token vocabulary, the scanner that produces tokens from source
//! text, the AST node tree with its visitor, and the operator fixity
//! table the parser consults while building binary expressions.

pub mod ast;
pub mod operator;
pub mod scanner;
pub mod stream;
pub mod token;

pub use ast::{
    ArgPattern, Associativity, CaseBranch, Ctor, Declaration, Expression, ExposedItem, ExposedList, ModulePath,
    Pattern, PatternLiteral, RecordField, Type, TypeSignature, VisitAction, VisitNode, Visitor, walk_arg_pattern,
    walk_declaration, walk_expression, walk_pattern, walk_type,
};
pub use operator::{DuplicateOperator, OperatorInfo, OperatorTable};
pub use scanner::scan;
pub use stream::{Checkpoint, TokenStream};
pub use token::{LexError, Token, TokenKind};
