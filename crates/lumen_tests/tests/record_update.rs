use lumen_base::SourceMap;
use lumen_diagnostics::Reporter;
use lumen_parser::{ParseMode, Parser};
use lumen_syntax::{scan, Declaration, Expression, OperatorTable};

fn parse_single_definition_body(source: &str) -> Expression {
    let mut source_map = SourceMap::new();
    source_map.insert("Main.lum", source);
    let text = source_map.get("Main.lum").unwrap().text().to_string();
    let tokens = scan(&text);
    let mut reporter = Reporter::new();
    let mut operators = OperatorTable::with_builtins();
    let parser = Parser::new(&source_map, "Main.lum", tokens, &mut reporter, &mut operators, ParseMode::FullParse);
    let module = parser.parse_module();
    assert!(reporter.is_ok(), "unexpected parse errors: {:?}", reporter.iter().collect::<Vec<_>>());
    match module.declarations.into_iter().next() {
        Some(Declaration::Definition { body, .. }) => *body,
        other => panic!("expected a single definition, got {:?}", other),
    }
}

#[test]
fn braces_with_a_leading_identifier_and_pipe_is_a_record_update() {
    let body = parse_single_definition_body("module Main exposing (..)\n\nx = { point | x = 5, y = 2 }\n");
    match body {
        Expression::RecordUpdate { base, fields, .. } => {
            assert!(matches!(*base, Expression::Identifier { ref name, .. } if name == "point"));
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "x");
            assert_eq!(fields[1].name, "y");
        }
        other => panic!("expected a record update, got {:?}", other),
    }
}

#[test]
fn braces_with_only_field_assignments_is_a_record_literal() {
    let body = parse_single_definition_body("module Main exposing (..)\n\nx = { x = 1, y = 2 }\n");
    match body {
        Expression::Record { fields, .. } => {
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "x");
            assert_eq!(fields[1].name, "y");
        }
        other => panic!("expected a record literal, got {:?}", other),
    }
}
