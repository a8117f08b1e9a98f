//! Parser error kinds and the sentinel bailout used for unrecoverable
//! conditions.
//!
//! Most syntax problems are *recorded*, not fatal: the parser pushes a
//! [`lumen_diagnostics::Report`] into the reporter and keeps going,
//! synthesising a placeholder (`Expression::Bad`, an empty list, ...) so
//! the caller always gets a value back. Three conditions cannot be
//! recovered from locally and instead return `Err(`[`Bailout`]`)`, which
//! unwinds (via `?`) to the nearest declaration boundary: unexpected EOF,
//! a missing type where one is syntactically required, and an invalid
//! argument pattern.

use lumen_syntax::TokenKind;

/// The sentinel "unwind to the declaration boundary" signal. Carries no
/// data — by the time it is raised, the underlying problem has already
/// been recorded in the reporter.
#[derive(Debug, Clone, Copy)]
pub struct Bailout;

pub(crate) type PResult<T> = Result<T, Bailout>;

/// What went wrong, for reports that describe *why* (as opposed to the
/// ones produced purely by other subsystems, e.g. lex errors, which are
/// reported as [`lumen_diagnostics::ReportKind::SyntaxError`] with a
/// plain message by the scanner's caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    Expected { expected: String, found: TokenKind },
    UnexpectedEof,
    NonAssociativeClash { operator: String },
    OutOfRangePrecedence { value: String },
    MismatchedDefinitionName { signature: String, definition: String },
    NewTopLevelDeclarationTooSoon,
    ExpectedMoreIndentation,
    InvalidArgumentPattern,
    DuplicateTypeVariable { name: String },
    DuplicateConstructor { name: String },
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::Expected { expected, found } => {
                write!(f, "expected {}, found {:?}", expected, found)
            }
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected end of file"),
            ParseErrorKind::NonAssociativeClash { operator } => write!(
                f,
                "non-associative operator `{}` used at the same precedence as another; add parentheses",
                operator
            ),
            ParseErrorKind::OutOfRangePrecedence { value } => {
                write!(f, "infix precedence `{}` is out of range 0..9", value)
            }
            ParseErrorKind::MismatchedDefinitionName { signature, definition } => write!(
                f,
                "type signature names `{}` but the definition below it names `{}`",
                signature, definition
            ),
            ParseErrorKind::NewTopLevelDeclarationTooSoon => write!(
                f,
                "this looks like a new top-level declaration, but the previous one has not finished"
            ),
            ParseErrorKind::ExpectedMoreIndentation => write!(f, "expected more indentation"),
            ParseErrorKind::InvalidArgumentPattern => write!(f, "not a valid argument pattern"),
            ParseErrorKind::DuplicateTypeVariable { name } => write!(f, "type variable `{}` is repeated", name),
            ParseErrorKind::DuplicateConstructor { name } => write!(f, "constructor `{}` is repeated", name),
        }
    }
}
