//! # lumen
//!
//! The facade crate: wires `lumen-package` (manifest + dependency graph),
//! `lumen-parser` (scanner + parse), and `lumen-resolve` (name resolution)
//! into the single pipeline described for the compiler front end —
//! `paths -> package resolves modules -> graph orders modules -> for each
//! module: scan -> parse -> (operator table populated from infix decls) ->
//! resolve the whole package`.
//!
//! This crate owns no grammar or scope logic of its own; it only sequences
//! the lower layers the way `lumen-cli`'s `check` subcommand needs, and the
//! way a downstream type-inference phase would consume the result.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lumen_base::SourceMap;
use lumen_diagnostics::Reporter;
use lumen_package::{DependencyGraph, Loader, LoaderError};
use lumen_parser::{ParseMode, ParsedModule, Parser};
use lumen_resolve::{resolve_package, ResolvedPackage};
use lumen_syntax::OperatorTable;

/// Everything loading and compiling a package produces: the source map
/// every position in every diagnostic refers back to, the operator table
/// as populated by every module's fixity declarations, the resolved
/// package (scopes + bindings), and whatever diagnostics accumulated along
/// the way.
pub struct Compilation {
    pub source_map: SourceMap,
    pub operators: OperatorTable,
    pub resolved: ResolvedPackage,
    pub reporter: Reporter,
}

impl Compilation {
    /// A run is successful iff no error-kind report was recorded in any
    /// phase (loading, parsing, or resolving).
    pub fn is_ok(&self) -> bool {
        self.reporter.is_ok()
    }
}

/// Errors that abort the pipeline outright, before any per-module
/// diagnostics could even be collected: these are package-layer failures
/// (no manifest, a module genuinely missing, dependencies not installed)
/// or a circular import, not ordinary compile errors.
#[derive(Debug)]
pub enum CompileError {
    Loader(LoaderError),
    Circular(lumen_package::CircularDependency),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Loader(e) => write!(f, "{}", e),
            CompileError::Circular(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<LoaderError> for CompileError {
    fn from(e: LoaderError) -> Self {
        CompileError::Loader(e)
    }
}

impl From<lumen_package::CircularDependency> for CompileError {
    fn from(e: lumen_package::CircularDependency) -> Self {
        CompileError::Circular(e)
    }
}

/// Runs the full pipeline over the package rooted at (or above) `start`:
/// discovers the manifest, walks every module reachable from `entry`
/// (the dotted name of the package's entry module) by following imports,
/// builds the dependency graph, parses each module twice (the
/// `ImportsAndFixity` pre-pass populates the shared operator table before
/// any module's full parse begins, per the concurrency model's "operator
/// table is read-only once full parsing starts"), then resolves the whole
/// package.
pub fn compile(start: &Path, entry: &str) -> Result<Compilation, CompileError> {
    let mut loader = Loader::load(start)?;
    let mut source_map = SourceMap::new();
    let mut operators = OperatorTable::with_builtins();
    let mut reporter = Reporter::new();

    let paths = discover_package(&mut loader, entry, &mut source_map, &mut reporter, &mut operators)?;

    let mut graph = DependencyGraph::new();
    for name in paths.keys() {
        graph.add_module(name.clone());
    }
    for (name, (_, prepass)) in &paths {
        for import in &prepass.imports {
            if let lumen_syntax::Declaration::Import { name: dep, .. } = import {
                let dep_name = dep.join(".");
                if !dep_name.starts_with(lumen_resolve::NATIVE_MODULE_PREFIX) {
                    graph.add_dependency(name.clone(), dep_name);
                }
            }
        }
    }
    let order = graph.resolve()?;

    let mut modules: HashMap<String, ParsedModule> = HashMap::new();
    for name in &order {
        let Some((path, _)) = paths.get(name) else {
            continue;
        };
        let path = path.clone();
        let source = source_map.get(&path).expect("source was loaded during discovery");
        let tokens = lumen_syntax::scan(source.text());
        log::trace!("full parse for module {}", name);
        let parser = Parser::new(&source_map, path.clone(), tokens, &mut reporter, &mut operators, ParseMode::FullParse);
        let parsed = parser.parse_module();
        modules.insert(name.clone(), parsed);
    }

    let resolved = resolve_package(&modules, &order, &mut reporter);

    Ok(Compilation {
        source_map,
        operators,
        resolved,
        reporter,
    })
}

/// A module discovered on disk, plus the result of its `ImportsAndFixity`
/// pre-pass (its path, its own parsed imports) — exactly what the
/// dependency graph and the operator table need before any module's full
/// parse begins.
type DiscoveredModule = (PathBuf, lumen_parser::ImportsAndFixity);

/// Breadth-first module discovery starting from `entry`: load and
/// pre-parse each module's imports-and-fixity, follow every import to
/// discover further modules, and stop once the import graph has been
/// fully walked. Populates `operators` with every module's local `infix`
/// declarations as a side effect of running the pre-pass (imported
/// operators are wired into scope by the caller once every module's own
/// fixities are known).
fn discover_package(
    loader: &mut Loader,
    entry: &str,
    source_map: &mut SourceMap,
    reporter: &mut Reporter,
    operators: &mut OperatorTable,
) -> Result<HashMap<String, DiscoveredModule>, CompileError> {
    let mut discovered: HashMap<String, DiscoveredModule> = HashMap::new();
    let mut queue = vec![entry.to_string()];
    while let Some(name) = queue.pop() {
        if discovered.contains_key(&name) {
            continue;
        }
        if name.starts_with(lumen_resolve::NATIVE_MODULE_PREFIX) {
            continue;
        }
        let path = loader.find_module(&name)?;
        let source = source_map.load(&path).map_err(|_| {
            CompileError::Loader(LoaderError::ModuleNotFound(name.clone()))
        })?;
        let tokens = lumen_syntax::scan(source.text());
        let parser = Parser::new(source_map, path.clone(), tokens, reporter, operators, ParseMode::ImportsAndFixity);
        let prepass = parser.parse_imports_and_fixity();
        for import in &prepass.imports {
            if let lumen_syntax::Declaration::Import { name: dep, .. } = import {
                queue.push(dep.join("."));
            }
        }
        discovered.insert(name, (path, prepass));
    }
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_package(root: &Path, modules: &[(&str, &str)]) {
        fs::write(root.join("lumen.json"), r#"{ "name": "app" }"#).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        for (name, text) in modules {
            let mut path = root.join("src");
            for segment in name.split('.') {
                path.push(segment);
            }
            path.set_extension("lum");
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
    }

    #[test]
    fn single_module_with_no_imports_compiles_cleanly() {
        let temp = tempfile::tempdir().unwrap();
        write_package(temp.path(), &[("Main", "module Main exposing (..)\nx = 1\n")]);
        let compilation = compile(temp.path(), "Main").unwrap();
        assert!(compilation.is_ok());
        assert_eq!(compilation.resolved.order, vec!["Main".to_string()]);
    }

    #[test]
    fn import_across_two_modules_resolves_the_exposed_name() {
        let temp = tempfile::tempdir().unwrap();
        write_package(
            temp.path(),
            &[
                ("Foo", "module Foo exposing (foo)\nfoo = 1\n"),
                ("Bar", "module Bar exposing (..)\nimport Foo exposing (foo)\nx = foo\n"),
            ],
        );
        let compilation = compile(temp.path(), "Bar").unwrap();
        assert!(compilation.is_ok(), "unexpected reports: {:?}", compilation.reporter.iter().map(|(_, r)| r.message.clone()).collect::<Vec<_>>());
        assert_eq!(compilation.resolved.order, vec!["Foo".to_string(), "Bar".to_string()]);
    }

    #[test]
    fn using_an_unimported_name_is_a_name_error() {
        let temp = tempfile::tempdir().unwrap();
        write_package(temp.path(), &[("Main", "module Main exposing (..)\nx = undefinedThing\n")]);
        let compilation = compile(temp.path(), "Main").unwrap();
        assert!(!compilation.is_ok());
    }

    #[test]
    fn circular_imports_are_reported_before_resolution_runs() {
        let temp = tempfile::tempdir().unwrap();
        write_package(
            temp.path(),
            &[
                ("A", "module A exposing (..)\nimport B\nx = 1\n"),
                ("B", "module B exposing (..)\nimport A\ny = 1\n"),
            ],
        );
        let err = compile(temp.path(), "A").unwrap_err();
        assert!(matches!(err, CompileError::Circular(_)));
    }

    #[test]
    fn qualified_reference_to_an_imported_value_resolves() {
        let temp = tempfile::tempdir().unwrap();
        write_package(
            temp.path(),
            &[
                ("Data.List", "module Data.List exposing (singleton)\nsingleton = 1\n"),
                ("Main", "module Main exposing (..)\nimport Data.List\nx = Data.List.singleton\n"),
            ],
        );
        let compilation = compile(temp.path(), "Main").unwrap();
        assert!(compilation.is_ok(), "unexpected reports: {:?}", compilation.reporter.iter().map(|(_, r)| r.message.clone()).collect::<Vec<_>>());
    }
}
