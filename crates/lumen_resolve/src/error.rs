//! The resolver's own error inventory, distinct from `lumen_parser`'s
//! syntax errors: these are all reported as
//! [`lumen_diagnostics::ReportKind::NameError`].

use crate::scope::ObjKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// A value identifier has no matching `Object` in any enclosing scope,
    /// imported name, or builtin.
    UndefinedName { name: String },
    /// A qualified name's module segment (`A.B` in `A.B.c`) is not in
    /// `scope.modules`.
    ModuleNotImported { module: String },
    /// A qualified name's module segment resolved, but the final segment
    /// is not among that module's exposed names.
    ImportError { module: String, name: String },
    /// An `exposing` item at a module's own header names something that
    /// was never declared, or names the wrong kind of thing.
    ExportError { name: String },
    /// An exposed-union item (`Name(...)`) named something that resolved,
    /// but not to a union type.
    ExpectedUnion { name: String },
    /// An exposed or imported constructor name did not belong to the
    /// union it was requested under.
    ExpectedCtor { union: String, name: String },
    /// A record literal or record pattern repeats a field name.
    RepeatedField { name: String },
    /// A name was inserted into a scope that already holds an `Object`
    /// under the same `(name, namespace)` key.
    AlreadyDeclared { name: String, kind: ObjKind },
    /// A union's or alias's type-variable list repeats a name.
    RepeatedVarType { name: String },
    /// A union's constructor list repeats a constructor name.
    RepeatedCtor { name: String },
    /// A value identifier was still unresolved after the builtin table
    /// was consulted (builtins only cover types, so this is the final
    /// verdict for any value name nothing ever declared).
    UnresolvedName { name: String },
    /// A type variable used in a signature or annotation was never bound
    /// by the enclosing union's or alias's own type-variable list.
    UndefinedTypeVar { name: String },
}

impl std::fmt::Display for ResolveErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveErrorKind::UndefinedName { name } => write!(f, "undefined name `{}`", name),
            ResolveErrorKind::ModuleNotImported { module } => {
                write!(f, "module `{}` is not imported", module)
            }
            ResolveErrorKind::ImportError { module, name } => {
                write!(f, "module `{}` does not expose `{}`", module, name)
            }
            ResolveErrorKind::ExportError { name } => {
                write!(f, "cannot expose `{}`: it is not declared in this module", name)
            }
            ResolveErrorKind::ExpectedUnion { name } => write!(f, "`{}` is not a union type", name),
            ResolveErrorKind::ExpectedCtor { union, name } => {
                write!(f, "`{}` is not a constructor of `{}`", name, union)
            }
            ResolveErrorKind::RepeatedField { name } => write!(f, "field `{}` is repeated", name),
            ResolveErrorKind::AlreadyDeclared { name, kind } => {
                write!(f, "`{}` is already declared as a {:?}", name, kind)
            }
            ResolveErrorKind::RepeatedVarType { name } => write!(f, "type variable `{}` is repeated", name),
            ResolveErrorKind::RepeatedCtor { name } => write!(f, "constructor `{}` is repeated", name),
            ResolveErrorKind::UnresolvedName { name } => write!(f, "unresolved name `{}`", name),
            ResolveErrorKind::UndefinedTypeVar { name } => write!(f, "undefined type variable `{}`", name),
        }
    }
}
