use std::fs;
use std::path::Path;

use lumen::compile;
use lumen_resolve::scope::ObjKind;

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
fn an_imported_constructor_resolves_to_the_module_that_declared_it() {
    let temp = tempfile::tempdir().unwrap();
    let bar_source = "module Bar exposing (..)\nimport Foo exposing (foo, Cmp(Gt))\nx = Gt\n";
    write_package(
        temp.path(),
        &[
            ("Foo", "module Foo exposing (foo, bar, Cmp(Eq, Lt, Gt))\ntype Cmp = Eq | Lt | Gt\nfoo = 1\nbar = 2\n"),
            ("Bar", bar_source),
        ],
    );
    let compilation = compile(temp.path(), "Bar").unwrap();
    assert!(
        compilation.is_ok(),
        "unexpected reports: {:?}",
        compilation.reporter.iter().map(|(_, r)| r.message.clone()).collect::<Vec<_>>()
    );

    let bar = compilation.resolved.modules.get("Bar").expect("Bar was resolved");
    let gt_offset = bar_source.rfind("Gt").expect("Gt appears in x = Gt") as u32;
    let binding = bar
        .scope
        .bindings
        .get(&gt_offset)
        .unwrap_or_else(|| panic!("no binding recorded at offset {}", gt_offset));
    assert_eq!(binding.kind, ObjKind::Constructor);
    assert_eq!(binding.name, "Gt");
    assert_eq!(binding.module, "Foo");
}

#[test]
fn importing_a_constructor_that_does_not_belong_to_the_union_reports_it_and_leaves_the_use_unresolved() {
    let temp = tempfile::tempdir().unwrap();
    write_package(
        temp.path(),
        &[
            ("Foo", "module Foo exposing (foo, bar, Cmp(Eq, Lt, Gt))\ntype Cmp = Eq | Lt | Gt\nfoo = 1\nbar = 2\n"),
            ("Bar", "module Bar exposing (..)\nimport Foo exposing (foo, Cmp(Baz))\nx = Gt\n"),
        ],
    );
    let compilation = compile(temp.path(), "Bar").unwrap();
    assert!(!compilation.is_ok());

    let bar_reports: Vec<_> = compilation
        .reporter
        .iter()
        .filter(|(path, _)| path.ends_with("Bar.lum"))
        .map(|(_, r)| r.message.clone())
        .collect();
    assert_eq!(bar_reports.len(), 2, "expected one bad-constructor error and one unresolved name: {:?}", bar_reports);
    assert!(bar_reports.iter().any(|m| m.contains("not a constructor of `Cmp`")));
    assert!(bar_reports.iter().any(|m| m.contains("unresolved name `Gt`")));
}
