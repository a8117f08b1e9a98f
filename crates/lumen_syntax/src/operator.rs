//! Fixity and precedence for infix operators.
//!
//! Operators are stored globally keyed by `(name, defining module)` — a
//! built-in operator's defining module is `None` — and a per-module index
//! records which defining module each operator name resolves to when used
//! from a given module (populated from local `infix` declarations and from
//! imports during the `ImportsAndFixity` pre-pass).

use crate::ast::Associativity;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub associativity: Associativity,
    pub precedence: u8,
}

impl OperatorInfo {
    pub fn new(associativity: Associativity, precedence: u8) -> Self {
        OperatorInfo { associativity, precedence }
    }
}

/// Raised by [`OperatorTable::add`] when `(name, defining_module)` is
/// already registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOperator {
    pub name: String,
    pub defining_module: Option<String>,
}

impl std::fmt::Display for DuplicateOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.defining_module {
            Some(m) => write!(f, "operator `{}` already defined in module `{}`", self.name, m),
            None => write!(f, "operator `{}` already defined as a built-in", self.name),
        }
    }
}

impl std::error::Error for DuplicateOperator {}

/// `(operator name, defining module)` — `None` means built-in.
type OperatorKey = (String, Option<String>);

#[derive(Default)]
pub struct OperatorTable {
    operators: HashMap<OperatorKey, OperatorInfo>,
    /// module name -> (operator name -> defining module) in scope there.
    module_scope: HashMap<String, HashMap<String, Option<String>>>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table plus every built-in fixity, with built-ins bound
    /// into the scope of every module that asks to look one up (built-ins
    /// need no `bind_to_module` call: [`OperatorTable::lookup`] falls back
    /// to a bare built-in entry when the module scope has nothing bound).
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for (name, assoc, prec) in BUILTIN_OPERATORS {
            table
                .add(name, None, *assoc, *prec)
                .expect("builtin operator table must not contain duplicates");
        }
        table
    }

    /// Registers `name` as defined in `defining_module` (or built-in, if
    /// `None`) with the given fixity. Fails if that exact key is already
    /// present.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        defining_module: Option<String>,
        associativity: Associativity,
        precedence: u8,
    ) -> Result<(), DuplicateOperator> {
        let name = name.into();
        let key = (name.clone(), defining_module.clone());
        if self.operators.contains_key(&key) {
            return Err(DuplicateOperator { name, defining_module });
        }
        self.operators.insert(key, OperatorInfo::new(associativity, precedence));
        Ok(())
    }

    /// Brings `op_name` (as defined in `defining_module`) into scope for
    /// `module` — called once per local `infix` declaration and once per
    /// operator exposed through an `import ... exposing (...)`.
    pub fn bind_to_module(&mut self, module: impl Into<String>, op_name: impl Into<String>, defining_module: Option<String>) {
        self.module_scope
            .entry(module.into())
            .or_default()
            .insert(op_name.into(), defining_module);
    }

    /// Resolves `name` as used from `current_module`. Falls back to a
    /// bare built-in entry (`defining_module = None`) if nothing has been
    /// explicitly bound for that name in that module's scope — built-ins
    /// are always implicitly in scope everywhere.
    pub fn lookup(&self, name: &str, current_module: &str) -> Option<OperatorInfo> {
        let defining_module = self
            .module_scope
            .get(current_module)
            .and_then(|scope| scope.get(name))
            .cloned()
            .unwrap_or(None);
        self.operators.get(&(name.to_string(), defining_module)).copied()
    }

    /// Looks up an operator already known to be defined in a specific
    /// module, bypassing per-module scope resolution.
    pub fn lookup_defined_in(&self, name: &str, defining_module: Option<&str>) -> Option<OperatorInfo> {
        self.operators
            .get(&(name.to_string(), defining_module.map(str::to_string)))
            .copied()
    }
}

const BUILTIN_OPERATORS: &[(&str, Associativity, u8)] = &[
    ("|>", Associativity::Left, 0),
    ("<|", Associativity::Right, 0),
    ("||", Associativity::Right, 2),
    ("&&", Associativity::Right, 3),
    ("==", Associativity::NonAssoc, 4),
    ("/=", Associativity::NonAssoc, 4),
    ("<", Associativity::NonAssoc, 4),
    (">", Associativity::NonAssoc, 4),
    ("<=", Associativity::NonAssoc, 4),
    (">=", Associativity::NonAssoc, 4),
    ("++", Associativity::Right, 5),
    ("::", Associativity::Right, 5),
    ("+", Associativity::Left, 6),
    ("-", Associativity::Left, 6),
    ("*", Associativity::Left, 7),
    ("/", Associativity::Left, 7),
    ("//", Associativity::Left, 7),
    ("%", Associativity::Left, 7),
    ("^", Associativity::Right, 8),
    (">>", Associativity::Left, 9),
    ("<<", Associativity::Right, 9),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_cover_the_standard_arithmetic_fixities() {
        let table = OperatorTable::with_builtins();
        assert_eq!(
            table.lookup("+", "Main"),
            Some(OperatorInfo::new(Associativity::Left, 6))
        );
        assert_eq!(
            table.lookup("*", "Main"),
            Some(OperatorInfo::new(Associativity::Left, 7))
        );
        assert_eq!(
            table.lookup("==", "Main"),
            Some(OperatorInfo::new(Associativity::NonAssoc, 4))
        );
    }

    #[test]
    fn adding_the_same_key_twice_fails() {
        let mut table = OperatorTable::new();
        table.add("<+>", None, Associativity::Left, 6).unwrap();
        let err = table.add("<+>", None, Associativity::Left, 6).unwrap_err();
        assert_eq!(err.name, "<+>");
    }

    #[test]
    fn same_name_different_defining_module_is_allowed() {
        let mut table = OperatorTable::new();
        table.add("<+>", Some("A".into()), Associativity::Left, 6).unwrap();
        table.add("<+>", Some("B".into()), Associativity::Right, 3).unwrap();
        assert_eq!(
            table.lookup_defined_in("<+>", Some("A")),
            Some(OperatorInfo::new(Associativity::Left, 6))
        );
        assert_eq!(
            table.lookup_defined_in("<+>", Some("B")),
            Some(OperatorInfo::new(Associativity::Right, 3))
        );
    }

    #[test]
    fn unbound_custom_operator_is_not_found() {
        let table = OperatorTable::with_builtins();
        assert_eq!(table.lookup("<+>", "Main"), None);
    }

    #[test]
    fn bind_to_module_makes_an_imported_operator_visible_there() {
        let mut table = OperatorTable::with_builtins();
        table.add("<+>", Some("Vector".into()), Associativity::Left, 6).unwrap();
        assert_eq!(table.lookup("<+>", "Main"), None);
        table.bind_to_module("Main", "<+>", Some("Vector".into()));
        assert_eq!(
            table.lookup("<+>", "Main"),
            Some(OperatorInfo::new(Associativity::Left, 6))
        );
    }

    #[test]
    fn builtins_resolve_in_every_module_without_explicit_binding() {
        let table = OperatorTable::with_builtins();
        assert_eq!(table.lookup("+", "SomeOtherModule"), Some(OperatorInfo::new(Associativity::Left, 6)));
    }
}
