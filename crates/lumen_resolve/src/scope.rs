//! `Object`/`ObjKind`, the closed set of named, declared entities a scope
//! can hold, and the two scope shapes ([`NodeScope`], [`ModuleScope`])
//! that track where they are visible.

use std::collections::HashMap;

use lumen_base::{Position, Region};

/// What kind of thing an [`Object`] names. Two disjoint namespaces fall
/// out of this set: [`ObjKind::namespace`] puts `Module`/`NativeModule`/
/// `Type`/`BuiltinType`/`VarType` in the type namespace and
/// `Constructor`/`Var` in the value namespace, so e.g. a type `Pair` and a
/// constructor `Pair` never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    Module,
    NativeModule,
    Type,
    BuiltinType,
    VarType,
    Constructor,
    Var,
}

/// Which of the two namespaces an [`ObjKind`] occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Type,
    Value,
}

impl ObjKind {
    pub fn namespace(self) -> Namespace {
        match self {
            ObjKind::Module | ObjKind::NativeModule | ObjKind::Type | ObjKind::BuiltinType | ObjKind::VarType => {
                Namespace::Type
            }
            ObjKind::Constructor | ObjKind::Var => Namespace::Value,
        }
    }
}

/// A named, declared entity: the thing an identifier occurrence ultimately
/// resolves to. Carries the region of its declaring node rather than a
/// reference to the node itself, since the AST's nodes are plain owned
/// trees with no stable arena address to point back at.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub kind: ObjKind,
    /// The module that declared this object. Builtins use the empty string.
    pub module: String,
    pub region: Region,
}

impl Object {
    pub fn builtin(name: impl Into<String>, kind: ObjKind) -> Self {
        Object {
            name: name.into(),
            kind,
            module: String::new(),
            region: Region::new(lumen_base::NO_POS, lumen_base::NO_POS),
        }
    }
}

/// An identifier occurrence still waiting for a matching `Object`, and
/// where it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOccurrence {
    pub position: Position,
}

/// A lexical scope attached to an AST subtree: a definition's body, a
/// union's or alias's type-variable scope, a `let` block.
///
/// `NodeScope` itself holds no parent pointer — `resolver::Scopes` keeps a
/// stack of these and walks it outward on a lookup miss. A name left in
/// `unresolved` after its enclosing declaration is fully resolved is the
/// module's own problem: either the fixed builtin-type table accounts for
/// it, or it is reported as `UnresolvedName`.
#[derive(Debug, Default)]
pub struct NodeScope {
    pub objects: HashMap<(String, Namespace), Object>,
    pub unresolved: HashMap<(String, Namespace), Vec<PendingOccurrence>>,
}

impl NodeScope {
    pub fn new() -> Self {
        NodeScope::default()
    }

    /// Inserts `object` under `(name, namespace)`. Returns the previous
    /// object, if that slot was already occupied — invariant 1 of the
    /// scope model ("every Object is inserted exactly once") is enforced
    /// by the caller, which turns a `Some` return into an `AlreadyDeclared`
    /// diagnostic.
    pub fn insert(&mut self, object: Object) -> Option<Object> {
        let key = (object.name.clone(), object.kind.namespace());
        self.objects.insert(key, object)
    }

    pub fn lookup_local(&self, name: &str, namespace: Namespace) -> Option<&Object> {
        self.objects.get(&(name.to_string(), namespace))
    }

    pub fn record_unresolved(&mut self, name: &str, namespace: Namespace, position: Position) {
        self.unresolved
            .entry((name.to_string(), namespace))
            .or_default()
            .push(PendingOccurrence { position });
    }
}

/// A link from a name visible in a module (a bare import or an alias) to
/// the module it refers to, plus whether it was imported as native (in
/// which case further member lookups into it are skipped rather than
/// attempted).
#[derive(Debug, Clone)]
pub struct ModuleLink {
    pub module_name: String,
    pub native: bool,
}

/// The top-level scope owned by a module. Extends [`NodeScope`] with the
/// three maps spec'd for cross-module linkage: `exposed` (this module's
/// public surface, computed last), `imported` (names brought into local
/// scope by `import ... exposing`), and `modules` (module names and
/// aliases usable as a qualifier, e.g. the `Data.List` in `Data.List.map`).
#[derive(Debug, Default)]
pub struct ModuleScope {
    pub node: NodeScope,
    pub exposed: HashMap<(String, Namespace), Object>,
    pub imported: HashMap<(String, Namespace), Object>,
    pub modules: HashMap<String, ModuleLink>,
    /// Every identifier/selector occurrence this module's resolution pass
    /// managed to link, keyed by its own source position. This is the
    /// flat side table standing in for a mutated `obj` field on the AST.
    pub bindings: HashMap<Position, Object>,
    /// Each union type's constructor names, in declaration order. Needed
    /// to validate `Name(..)`/`Name(A, B)` exposing and importing items,
    /// since an `Object`'s `ObjKind::Type` alone can't distinguish a union
    /// from a type alias.
    pub union_ctors: HashMap<String, Vec<String>>,
}

impl ModuleScope {
    pub fn new() -> Self {
        ModuleScope::default()
    }

    /// Looks a name up in local declarations first, then in names
    /// imported from other modules — the order invariant 3 in the spec
    /// relies on (builtins are consulted separately, only once every
    /// module-local and imported possibility is exhausted).
    pub fn lookup(&self, name: &str, namespace: Namespace) -> Option<&Object> {
        self.node
            .lookup_local(name, namespace)
            .or_else(|| self.imported.get(&(name.to_string(), namespace)))
    }

    pub fn bind(&mut self, position: Position, object: Object) {
        self.bindings.insert(position, object);
    }
}
