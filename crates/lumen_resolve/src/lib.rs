//! # lumen-resolve
//!
//! The name resolver: walks a topologically ordered package of parsed
//! modules, builds lexical scopes, applies import/export rules, and links
//! every identifier occurrence to the [`scope::Object`] it refers to.
//!
//! [`resolver::resolve_package`] is the entry point a driver calls once
//! `lumen_package::DependencyGraph::resolve` has produced a module order
//! and every module in it has been parsed by `lumen_parser`.

pub mod error;
pub mod resolver;
pub mod scope;

pub use error::ResolveErrorKind;
pub use resolver::{resolve_package, ResolvedModule, ResolvedPackage, BUILTIN_TYPES, NATIVE_MODULE_PREFIX};
pub use scope::{ModuleLink, ModuleScope, Namespace, NodeScope, Object, ObjKind, PendingOccurrence};
