//! The per-module resolution procedure described by the name resolver
//! component: register imports, declare every top-level name, resolve
//! each declaration's interior, then resolve the module's own `exposing`
//! list against the now-complete scope.

use std::collections::HashMap;

use lumen_base::Position;
use lumen_diagnostics::{Report, Reporter};
use lumen_parser::ParsedModule;
use lumen_syntax::{ArgPattern, Declaration, Expression, ExposedItem, ExposedList, Pattern, Type};

use crate::error::ResolveErrorKind;
use crate::scope::{ModuleLink, ModuleScope, Namespace, NodeScope, Object, ObjKind};

/// Module names whose members are never looked up in the package — they
/// are provided by the host runtime, not by another `.lum` file.
pub const NATIVE_MODULE_PREFIX: &str = "Native.";

/// The fixed builtin type table: any otherwise-unresolved type reference
/// of one of these names resolves to it instead of raising
/// `UndefinedName`/`UnresolvedName`.
pub const BUILTIN_TYPES: &[&str] = &["Int", "Float", "Bool", "String", "Char", "List"];

/// One module's resolution result: its populated scope plus every
/// diagnostic raised while building it (the diagnostics themselves are
/// also pushed to the shared `Reporter` passed to [`resolve_package`]).
pub struct ResolvedModule {
    pub name: String,
    pub scope: ModuleScope,
}

/// The outcome of resolving an entire topologically ordered package:
/// every module's scope, keyed by name, in the order they were resolved.
pub struct ResolvedPackage {
    pub modules: HashMap<String, ResolvedModule>,
    pub order: Vec<String>,
}

/// Resolves every module in `modules`, processing `order` left to right so
/// that a module is never resolved before anything it imports. `order` is
/// expected to be the output of `lumen_package::DependencyGraph::resolve`.
pub fn resolve_package(
    modules: &HashMap<String, ParsedModule>,
    order: &[String],
    reporter: &mut Reporter,
) -> ResolvedPackage {
    let mut resolved: HashMap<String, ResolvedModule> = HashMap::new();
    for name in order {
        let Some(module) = modules.get(name) else {
            continue;
        };
        log::trace!("entering name resolution for module {}", name);
        let scope = resolve_module(module, &resolved, reporter);
        resolved.insert(name.clone(), ResolvedModule { name: name.clone(), scope });
    }
    ResolvedPackage { modules: resolved, order: order.to_vec() }
}

fn resolve_module(module: &ParsedModule, already_resolved: &HashMap<String, ResolvedModule>, reporter: &mut Reporter) -> ModuleScope {
    let mut scope = ModuleScope::new();

    for import in &module.imports {
        resolve_import(import, &mut scope, already_resolved, &module.path, reporter);
    }

    for decl in &module.declarations {
        declare_top_level(decl, &module.name, &mut scope, &module.path, reporter);
    }

    for decl in &module.declarations {
        resolve_declaration_interior(decl, &mut scope, already_resolved, &module.path, reporter);
    }

    if let Some(module_decl) = &module.module_decl {
        resolve_exposing(module_decl, &mut scope, &module.path, reporter);
    }

    backpatch_builtins_and_report_unresolved(&mut scope, &module.path, reporter);

    scope
}

fn report(reporter: &mut Reporter, file: &std::path::Path, kind: ResolveErrorKind, position: Position) {
    reporter.report(file, Report::name(kind.to_string(), position));
}

// -- imports --------------------------------------------------------------

fn resolve_import(
    decl: &Declaration,
    scope: &mut ModuleScope,
    already_resolved: &HashMap<String, ResolvedModule>,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let Declaration::Import { name, alias, exposing, region, .. } = decl else {
        return;
    };
    let module_name = name.join(".");
    let native = module_name.starts_with(NATIVE_MODULE_PREFIX);

    scope.modules.insert(
        module_name.clone(),
        ModuleLink { module_name: module_name.clone(), native },
    );
    if let Some(alias) = alias {
        scope.modules.insert(alias.clone(), ModuleLink { module_name: module_name.clone(), native });
    }

    if native {
        if let Some(exposing) = exposing {
            for item in exposing_items(exposing) {
                report(
                    reporter,
                    file,
                    ResolveErrorKind::ImportError { module: module_name.clone(), name: item_name(item) },
                    region.start,
                );
            }
        }
        return;
    }

    let Some(imported) = already_resolved.get(&module_name) else {
        report(reporter, file, ResolveErrorKind::ModuleNotImported { module: module_name }, region.start);
        return;
    };

    match exposing {
        None => {}
        Some(ExposedList::Open { .. }) => {
            for (key, object) in &imported.scope.exposed {
                if matches!(key.1, Namespace::Type) && object.kind == ObjKind::Constructor {
                    continue;
                }
                if object.kind == ObjKind::Type || object.kind == ObjKind::Var {
                    scope.imported.insert(key.clone(), object.clone());
                }
            }
        }
        Some(ExposedList::Closed { items, .. }) => {
            for item in items {
                import_closed_item(item, &module_name, imported, scope, file, reporter);
            }
        }
    }
}

fn import_closed_item(
    item: &ExposedItem,
    module_name: &str,
    imported: &ResolvedModule,
    scope: &mut ModuleScope,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    match item {
        ExposedItem::Value { name, region } => {
            match imported.scope.exposed.get(&(name.clone(), Namespace::Value)) {
                Some(object) => {
                    scope.imported.insert((name.clone(), Namespace::Value), object.clone());
                }
                None => report(
                    reporter,
                    file,
                    ResolveErrorKind::ImportError { module: module_name.to_string(), name: name.clone() },
                    region.start,
                ),
            }
        }
        ExposedItem::Type { name, region } => {
            match imported.scope.exposed.get(&(name.clone(), Namespace::Type)) {
                Some(object) => {
                    scope.imported.insert((name.clone(), Namespace::Type), object.clone());
                }
                None => report(
                    reporter,
                    file,
                    ResolveErrorKind::ImportError { module: module_name.to_string(), name: name.clone() },
                    region.start,
                ),
            }
        }
        ExposedItem::UnionOpen { name, region } => {
            import_union(name, None, module_name, imported, scope, *region, file, reporter);
        }
        ExposedItem::UnionClosed { name, ctors, region } => {
            import_union(name, Some(ctors), module_name, imported, scope, *region, file, reporter);
        }
    }
}

fn import_union(
    name: &str,
    ctors: Option<&Vec<String>>,
    module_name: &str,
    imported: &ResolvedModule,
    scope: &mut ModuleScope,
    region: lumen_base::Region,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let Some(type_object) = imported.scope.exposed.get(&(name.to_string(), Namespace::Type)) else {
        report(
            reporter,
            file,
            ResolveErrorKind::ImportError { module: module_name.to_string(), name: name.to_string() },
            region.start,
        );
        return;
    };
    let Some(available_ctors) = imported.scope.union_ctors.get(name) else {
        report(reporter, file, ResolveErrorKind::ExpectedUnion { name: name.to_string() }, region.start);
        return;
    };
    scope.imported.insert((name.to_string(), Namespace::Type), type_object.clone());
    let wanted: Vec<String> = ctors.cloned().unwrap_or_else(|| available_ctors.clone());
    for ctor_name in &wanted {
        if !available_ctors.contains(ctor_name) {
            report(
                reporter,
                file,
                ResolveErrorKind::ExpectedCtor { union: name.to_string(), name: ctor_name.clone() },
                region.start,
            );
            continue;
        }
        if let Some(ctor_object) = imported.scope.exposed.get(&(ctor_name.clone(), Namespace::Value)) {
            scope.imported.insert((ctor_name.clone(), Namespace::Value), ctor_object.clone());
        }
    }
}

fn exposing_items(list: &ExposedList) -> Vec<&ExposedItem> {
    match list {
        ExposedList::Open { .. } => Vec::new(),
        ExposedList::Closed { items, .. } => items.iter().collect(),
    }
}

fn item_name(item: &ExposedItem) -> String {
    match item {
        ExposedItem::Value { name, .. }
        | ExposedItem::Type { name, .. }
        | ExposedItem::UnionOpen { name, .. }
        | ExposedItem::UnionClosed { name, .. } => name.clone(),
    }
}

// -- top-level declarations -------------------------------------------------

fn declare_top_level(decl: &Declaration, module_name: &str, scope: &mut ModuleScope, file: &std::path::Path, reporter: &mut Reporter) {
    match decl {
        Declaration::Definition { name, region, .. } => {
            declare(scope, Object { name: name.clone(), kind: ObjKind::Var, module: module_name.to_string(), region: *region }, file, reporter);
        }
        Declaration::Union { name, ctors, region, .. } => {
            declare(scope, Object { name: name.clone(), kind: ObjKind::Type, module: module_name.to_string(), region: *region }, file, reporter);
            let mut seen = Vec::new();
            for ctor in ctors {
                if seen.contains(&ctor.name) {
                    report(reporter, file, ResolveErrorKind::RepeatedCtor { name: ctor.name.clone() }, ctor.region.start);
                    continue;
                }
                seen.push(ctor.name.clone());
                declare(
                    scope,
                    Object { name: ctor.name.clone(), kind: ObjKind::Constructor, module: module_name.to_string(), region: ctor.region },
                    file,
                    reporter,
                );
            }
            scope.union_ctors.insert(name.clone(), seen);
        }
        Declaration::Alias { name, region, .. } => {
            declare(scope, Object { name: name.clone(), kind: ObjKind::Type, module: module_name.to_string(), region: *region }, file, reporter);
        }
        Declaration::Infix { .. } | Declaration::Module { .. } | Declaration::Import { .. } | Declaration::Destructuring { .. } => {}
    }
}

fn declare(scope: &mut ModuleScope, object: Object, file: &std::path::Path, reporter: &mut Reporter) {
    let name = object.name.clone();
    let kind = object.kind;
    let position = object.region.start;
    if scope.node.insert(object).is_some() {
        report(reporter, file, ResolveErrorKind::AlreadyDeclared { name, kind }, position);
    }
}

// -- declaration interiors --------------------------------------------------

/// A stack of lexical scopes, innermost last, sitting on top of a
/// module's declarations and imports. Value and type lookups both walk
/// this stack before falling back to the module scope.
///
/// Also carries every module resolved before this one, so a qualified
/// reference (`A.B.c`) can consult `A.B`'s own `exposed` set directly
/// instead of relying on whatever this module's `import` statement
/// happened to bring in unqualified via `exposing`.
struct Scopes<'m, 'r> {
    module: &'m mut ModuleScope,
    locals: Vec<NodeScope>,
    already_resolved: &'r HashMap<String, ResolvedModule>,
}

impl<'m, 'r> Scopes<'m, 'r> {
    fn new(module: &'m mut ModuleScope, already_resolved: &'r HashMap<String, ResolvedModule>) -> Self {
        Scopes { module, locals: Vec::new(), already_resolved }
    }

    fn push(&mut self) {
        self.locals.push(NodeScope::new());
    }

    /// Pops the innermost local scope, carrying forward any occurrences
    /// left in its `unresolved` table to the next scope out (or to the
    /// module scope once the local stack is empty) — a name unresolved
    /// inside a lambda or `case` branch is still the enclosing module's
    /// problem per the scope model's invariant 2, not something this
    /// scope's disappearance should silently swallow.
    fn pop(&mut self) {
        let Some(popped) = self.locals.pop() else { return };
        let target = self.locals.last_mut().map(|s| &mut s.unresolved).unwrap_or(&mut self.module.node.unresolved);
        for (key, occurrences) in popped.unresolved {
            target.entry(key).or_default().extend(occurrences);
        }
    }

    fn declare_local(&mut self, object: Object) -> bool {
        let scope = self.locals.last_mut().expect("declare_local called outside a local scope");
        scope.insert(object).is_none()
    }

    fn lookup(&self, name: &str, namespace: Namespace) -> Option<Object> {
        for local in self.locals.iter().rev() {
            if let Some(object) = local.lookup_local(name, namespace) {
                return Some(object.clone());
            }
        }
        self.module.lookup(name, namespace).cloned()
    }

    fn record_unresolved(&mut self, name: &str, namespace: Namespace, position: Position) {
        if let Some(local) = self.locals.last_mut() {
            local.record_unresolved(name, namespace, position);
        } else {
            self.module.node.record_unresolved(name, namespace, position);
        }
    }

    fn bind(&mut self, position: Position, object: Object) {
        self.module.bind(position, object);
    }
}

fn resolve_declaration_interior(
    decl: &Declaration,
    scope: &mut ModuleScope,
    already_resolved: &HashMap<String, ResolvedModule>,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let mut scopes = Scopes::new(scope, already_resolved);
    match decl {
        Declaration::Module { .. } | Declaration::Import { .. } | Declaration::Infix { .. } => {}
        Declaration::Alias { type_vars, ty, .. } => {
            scopes.push();
            declare_type_vars(&mut scopes, type_vars, file, reporter);
            resolve_type(ty, &mut scopes, file, reporter);
            scopes.pop();
        }
        Declaration::Union { type_vars, ctors, .. } => {
            scopes.push();
            declare_type_vars(&mut scopes, type_vars, file, reporter);
            for ctor in ctors {
                for arg in &ctor.args {
                    resolve_type(arg, &mut scopes, file, reporter);
                }
            }
            scopes.pop();
        }
        Declaration::Definition { signature, args, body, .. } => {
            scopes.push();
            if let Some(signature) = signature {
                resolve_type(&signature.ty, &mut scopes, file, reporter);
            }
            for arg in args {
                declare_arg_pattern(arg, &mut scopes, file, reporter);
            }
            resolve_expression(body, &mut scopes, file, reporter);
            scopes.pop();
        }
        Declaration::Destructuring { pattern, body, .. } => {
            resolve_expression(body, &mut scopes, file, reporter);
            scopes.push();
            declare_arg_pattern(pattern, &mut scopes, file, reporter);
            scopes.pop();
        }
    }
}

fn declare_type_vars(scopes: &mut Scopes, type_vars: &[String], file: &std::path::Path, reporter: &mut Reporter) {
    let mut seen = Vec::new();
    for name in type_vars {
        if seen.contains(name) {
            report(reporter, file, ResolveErrorKind::RepeatedVarType { name: name.clone() }, lumen_base::NO_POS);
            continue;
        }
        seen.push(name.clone());
        scopes.declare_local(Object {
            name: name.clone(),
            kind: ObjKind::VarType,
            module: String::new(),
            region: lumen_base::Region::new(lumen_base::NO_POS, lumen_base::NO_POS),
        });
    }
}

fn declare_arg_pattern(pattern: &ArgPattern, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match pattern {
        ArgPattern::Anything { .. } => {}
        ArgPattern::Var { name, region } => {
            declare_local_checked(scopes, name.clone(), *region, file, reporter);
        }
        ArgPattern::Tuple { items, .. } => {
            for item in items {
                declare_arg_pattern(item, scopes, file, reporter);
            }
        }
        ArgPattern::Record { fields, region } => {
            let mut seen = Vec::new();
            for field in fields {
                if seen.contains(field) {
                    report(reporter, file, ResolveErrorKind::RepeatedField { name: field.clone() }, region.start);
                    continue;
                }
                seen.push(field.clone());
                declare_local_checked(scopes, field.clone(), *region, file, reporter);
            }
        }
        ArgPattern::Alias { pattern, name, region } => {
            declare_arg_pattern(pattern, scopes, file, reporter);
            declare_local_checked(scopes, name.clone(), *region, file, reporter);
        }
    }
}

fn declare_pattern(pattern: &Pattern, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match pattern {
        Pattern::Anything { .. } | Pattern::Literal { .. } => {}
        Pattern::Var { name, region } => declare_local_checked(scopes, name.clone(), *region, file, reporter),
        Pattern::Ctor { module_path, name, args, region } => {
            if module_path.is_empty() {
                resolve_value_name(name, *region, scopes);
            } else {
                resolve_qualified_name(module_path, name, *region, scopes, file, reporter);
            }
            for arg in args {
                declare_pattern(arg, scopes, file, reporter);
            }
        }
        Pattern::Tuple { items, .. } | Pattern::List { items, .. } => {
            for item in items {
                declare_pattern(item, scopes, file, reporter);
            }
        }
        Pattern::Record { fields, region } => {
            let mut seen = Vec::new();
            for field in fields {
                if seen.contains(field) {
                    report(reporter, file, ResolveErrorKind::RepeatedField { name: field.clone() }, region.start);
                    continue;
                }
                seen.push(field.clone());
                declare_local_checked(scopes, field.clone(), *region, file, reporter);
            }
        }
        Pattern::Alias { pattern, name, region } => {
            declare_pattern(pattern, scopes, file, reporter);
            declare_local_checked(scopes, name.clone(), *region, file, reporter);
        }
    }
}

fn declare_local_checked(scopes: &mut Scopes, name: String, region: lumen_base::Region, file: &std::path::Path, reporter: &mut Reporter) {
    let position = region.start;
    let kind = ObjKind::Var;
    if !scopes.declare_local(Object { name: name.clone(), kind, module: String::new(), region }) {
        report(reporter, file, ResolveErrorKind::AlreadyDeclared { name, kind }, position);
    }
}

fn resolve_expression(expr: &Expression, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match expr {
        Expression::Identifier { name, region } => {
            resolve_value_name(name, *region, scopes);
        }
        Expression::Selector { module_path, name, region } => {
            resolve_qualified_name(module_path, name, *region, scopes, file, reporter);
        }
        Expression::LiteralInt { .. }
        | Expression::LiteralFloat { .. }
        | Expression::LiteralString { .. }
        | Expression::LiteralChar { .. }
        | Expression::LiteralBool { .. }
        | Expression::FieldAccessor { .. }
        | Expression::TupleCtor { .. }
        | Expression::Bad { .. } => {}
        Expression::Tuple { items, .. } | Expression::List { items, .. } => {
            for item in items {
                resolve_expression(item, scopes, file, reporter);
            }
        }
        Expression::Record { fields, region } => {
            let mut seen = Vec::new();
            for field in fields {
                if seen.contains(&field.name) {
                    report(reporter, file, ResolveErrorKind::RepeatedField { name: field.name.clone() }, region.start);
                } else {
                    seen.push(field.name.clone());
                }
                resolve_expression(&field.value, scopes, file, reporter);
            }
        }
        Expression::RecordUpdate { base, fields, .. } => {
            resolve_expression(base, scopes, file, reporter);
            for field in fields {
                resolve_expression(&field.value, scopes, file, reporter);
            }
        }
        Expression::FuncApp { func, args, .. } => {
            resolve_expression(func, scopes, file, reporter);
            for arg in args {
                resolve_expression(arg, scopes, file, reporter);
            }
        }
        Expression::Lambda { args, body, .. } => {
            scopes.push();
            for arg in args {
                declare_arg_pattern(arg, scopes, file, reporter);
            }
            resolve_expression(body, scopes, file, reporter);
            scopes.pop();
        }
        Expression::If { cond, then_branch, else_branch, .. } => {
            resolve_expression(cond, scopes, file, reporter);
            resolve_expression(then_branch, scopes, file, reporter);
            resolve_expression(else_branch, scopes, file, reporter);
        }
        Expression::Case { subject, branches, .. } => {
            resolve_expression(subject, scopes, file, reporter);
            for branch in branches {
                scopes.push();
                declare_pattern(&branch.pattern, scopes, file, reporter);
                resolve_expression(&branch.body, scopes, file, reporter);
                scopes.pop();
            }
        }
        Expression::Let { decls, body, .. } => {
            scopes.push();
            for decl in decls {
                declare_let_binding(decl, scopes, file, reporter);
            }
            for decl in decls {
                resolve_let_binding_interior(decl, scopes, file, reporter);
            }
            resolve_expression(body, scopes, file, reporter);
            scopes.pop();
        }
        Expression::Paren { inner, .. } => resolve_expression(inner, scopes, file, reporter),
        Expression::Unary { operand, .. } => resolve_expression(operand, scopes, file, reporter),
        Expression::Binary { lhs, rhs, .. } => {
            resolve_expression(lhs, scopes, file, reporter);
            resolve_expression(rhs, scopes, file, reporter);
        }
    }
}

/// `let` bindings are mutually recursive within their own block: every
/// binding's name is declared before any binding's body is resolved.
fn declare_let_binding(decl: &Declaration, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match decl {
        Declaration::Definition { name, region, .. } => {
            declare_local_checked(scopes, name.clone(), *region, file, reporter);
        }
        Declaration::Destructuring { pattern, .. } => {
            declare_arg_pattern(pattern, scopes, file, reporter);
        }
        _ => {}
    }
}

fn resolve_let_binding_interior(decl: &Declaration, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match decl {
        Declaration::Definition { signature, args, body, .. } => {
            scopes.push();
            if let Some(signature) = signature {
                resolve_type(&signature.ty, scopes, file, reporter);
            }
            for arg in args {
                declare_arg_pattern(arg, scopes, file, reporter);
            }
            resolve_expression(body, scopes, file, reporter);
            scopes.pop();
        }
        Declaration::Destructuring { body, .. } => {
            resolve_expression(body, scopes, file, reporter);
        }
        _ => {}
    }
}

fn resolve_type(ty: &Type, scopes: &mut Scopes, file: &std::path::Path, reporter: &mut Reporter) {
    match ty {
        Type::Named { module_path, name, args, region } => {
            if module_path.is_empty() {
                if scopes.lookup(name, Namespace::Type).is_none() && !BUILTIN_TYPES.contains(&name.as_str()) {
                    report(reporter, file, ResolveErrorKind::UndefinedName { name: name.clone() }, region.start);
                }
            } else {
                resolve_qualified_type(module_path, name, *region, scopes, file, reporter);
            }
            for arg in args {
                resolve_type(arg, scopes, file, reporter);
            }
        }
        Type::Var { name, region } => {
            if scopes.lookup(name, Namespace::Type).is_none() {
                report(reporter, file, ResolveErrorKind::UndefinedTypeVar { name: name.clone() }, region.start);
            }
        }
        Type::Function { param, ret, .. } => {
            resolve_type(param, scopes, file, reporter);
            resolve_type(ret, scopes, file, reporter);
        }
        Type::Record { fields, .. } => {
            for field in fields {
                resolve_type(&field.value, scopes, file, reporter);
            }
        }
        Type::Tuple { items, .. } => {
            for item in items {
                resolve_type(item, scopes, file, reporter);
            }
        }
    }
}

fn resolve_value_name(name: &str, region: lumen_base::Region, scopes: &mut Scopes) {
    match scopes.lookup(name, Namespace::Value) {
        Some(object) => scopes.bind(region.start, object),
        None => scopes.record_unresolved(name, Namespace::Value, region.start),
    }
}

fn resolve_qualified_name(
    module_path: &[String],
    name: &str,
    region: lumen_base::Region,
    scopes: &mut Scopes,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let joined = module_path.join(".");
    let Some(link) = scopes.module.modules.get(&joined).cloned() else {
        report(reporter, file, ResolveErrorKind::ModuleNotImported { module: joined }, region.start);
        return;
    };
    if link.native {
        return;
    }
    match scopes.already_resolved.get(&link.module_name).and_then(|m| m.scope.exposed.get(&(name.to_string(), Namespace::Value))) {
        Some(object) => {
            let object = object.clone();
            scopes.bind(region.start, object);
        }
        None => report(
            reporter,
            file,
            ResolveErrorKind::ImportError { module: link.module_name.clone(), name: name.to_string() },
            region.start,
        ),
    }
}

fn resolve_qualified_type(
    module_path: &[String],
    name: &str,
    region: lumen_base::Region,
    scopes: &mut Scopes,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let joined = module_path.join(".");
    let Some(link) = scopes.module.modules.get(&joined).cloned() else {
        report(reporter, file, ResolveErrorKind::ModuleNotImported { module: joined }, region.start);
        return;
    };
    if link.native {
        return;
    }
    if scopes
        .already_resolved
        .get(&link.module_name)
        .and_then(|m| m.scope.exposed.get(&(name.to_string(), Namespace::Type)))
        .is_none()
    {
        report(
            reporter,
            file,
            ResolveErrorKind::ImportError { module: link.module_name.clone(), name: name.to_string() },
            region.start,
        );
    }
}

// -- module exposing --------------------------------------------------------

fn resolve_exposing(module_decl: &Declaration, scope: &mut ModuleScope, file: &std::path::Path, reporter: &mut Reporter) {
    let Declaration::Module { exposing, .. } = module_decl else {
        return;
    };
    match exposing {
        ExposedList::Open { .. } => {
            let objects: Vec<((String, Namespace), Object)> =
                scope.node.objects.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            for (key, object) in objects {
                scope.exposed.insert(key, object);
            }
        }
        ExposedList::Closed { items, .. } => {
            for item in items {
                expose_item(item, scope, file, reporter);
            }
        }
    }
}

fn expose_item(item: &ExposedItem, scope: &mut ModuleScope, file: &std::path::Path, reporter: &mut Reporter) {
    match item {
        ExposedItem::Value { name, region } => match scope.node.lookup_local(name, Namespace::Value).cloned() {
            Some(object) => {
                scope.exposed.insert((name.clone(), Namespace::Value), object);
            }
            None => report(reporter, file, ResolveErrorKind::ExportError { name: name.clone() }, region.start),
        },
        ExposedItem::Type { name, region } => match scope.node.lookup_local(name, Namespace::Type).cloned() {
            Some(object) => {
                scope.exposed.insert((name.clone(), Namespace::Type), object);
            }
            None => report(reporter, file, ResolveErrorKind::ExportError { name: name.clone() }, region.start),
        },
        ExposedItem::UnionOpen { name, region } => expose_union(name, None, *region, scope, file, reporter),
        ExposedItem::UnionClosed { name, ctors, region } => expose_union(name, Some(ctors), *region, scope, file, reporter),
    }
}

fn expose_union(
    name: &str,
    ctors: Option<&Vec<String>>,
    region: lumen_base::Region,
    scope: &mut ModuleScope,
    file: &std::path::Path,
    reporter: &mut Reporter,
) {
    let Some(type_object) = scope.node.lookup_local(name, Namespace::Type).cloned() else {
        report(reporter, file, ResolveErrorKind::ExportError { name: name.to_string() }, region.start);
        return;
    };
    let Some(available) = scope.union_ctors.get(name).cloned() else {
        report(reporter, file, ResolveErrorKind::ExpectedUnion { name: name.to_string() }, region.start);
        return;
    };
    scope.exposed.insert((name.to_string(), Namespace::Type), type_object);
    let wanted = ctors.cloned().unwrap_or(available.clone());
    for ctor_name in &wanted {
        if !available.contains(ctor_name) {
            report(reporter, file, ResolveErrorKind::ExpectedCtor { union: name.to_string(), name: ctor_name.clone() }, region.start);
            continue;
        }
        if let Some(object) = scope.node.lookup_local(ctor_name, Namespace::Value).cloned() {
            scope.exposed.insert((ctor_name.clone(), Namespace::Value), object);
        }
    }
}

// -- builtins and final unresolved sweep -------------------------------------

fn backpatch_builtins_and_report_unresolved(scope: &mut ModuleScope, file: &std::path::Path, reporter: &mut Reporter) {
    let unresolved: Vec<((String, Namespace), Vec<crate::scope::PendingOccurrence>)> =
        scope.node.unresolved.drain().collect();
    for ((name, namespace), occurrences) in unresolved {
        if namespace == Namespace::Type && BUILTIN_TYPES.contains(&name.as_str()) {
            let builtin = Object::builtin(name.clone(), ObjKind::BuiltinType);
            for occurrence in occurrences {
                log::trace!("backpatched builtin type {} at {}", name, occurrence.position);
                scope.bind(occurrence.position, builtin.clone());
            }
            continue;
        }
        for occurrence in occurrences {
            report(reporter, file, ResolveErrorKind::UnresolvedName { name: name.clone() }, occurrence.position);
        }
    }
}
