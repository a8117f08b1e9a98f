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

fn binary_op<'a>(expr: &'a Expression) -> (&'a str, &'a Expression, &'a Expression) {
    match expr {
        Expression::Binary { op, lhs, rhs, .. } => (op.as_str(), lhs, rhs),
        other => panic!("expected a binary expression, got {:?}", other),
    }
}

#[test]
fn mixed_precedence_nests_multiplication_inside_addition() {
    let body = parse_single_definition_body("module Main exposing (..)\n\nx = a + b * c - d\n");

    let (top_op, top_lhs, top_rhs) = binary_op(&body);
    assert_eq!(top_op, "-");

    let (plus_op, plus_lhs, plus_rhs) = binary_op(top_lhs);
    assert_eq!(plus_op, "+");
    assert!(matches!(plus_lhs, Expression::Identifier { name, .. } if name == "a"));

    let (times_op, times_lhs, times_rhs) = binary_op(plus_rhs);
    assert_eq!(times_op, "*");
    assert!(matches!(times_lhs, Expression::Identifier { name, .. } if name == "b"));
    assert!(matches!(times_rhs, Expression::Identifier { name, .. } if name == "c"));

    assert!(matches!(top_rhs, Expression::Identifier { name, .. } if name == "d"));
}

#[test]
fn right_associative_equal_precedence_groups_to_the_right() {
    let body = parse_single_definition_body("module Main exposing (..)\n\nx = a ^ b ^ c\n");
    let (op, lhs, rhs) = binary_op(&body);
    assert_eq!(op, "^");
    assert!(matches!(lhs, Expression::Identifier { name, .. } if name == "a"));
    let (inner_op, inner_lhs, inner_rhs) = binary_op(rhs);
    assert_eq!(inner_op, "^");
    assert!(matches!(inner_lhs, Expression::Identifier { name, .. } if name == "b"));
    assert!(matches!(inner_rhs, Expression::Identifier { name, .. } if name == "c"));
}

#[test]
fn non_associative_operators_of_equal_precedence_are_rejected() {
    let mut source_map = SourceMap::new();
    let source = "module Main exposing (..)\n\nx = a == b == c\n";
    source_map.insert("Main.lum", source);
    let text = source_map.get("Main.lum").unwrap().text().to_string();
    let tokens = scan(&text);
    let mut reporter = Reporter::new();
    let mut operators = OperatorTable::with_builtins();
    let parser = Parser::new(&source_map, "Main.lum", tokens, &mut reporter, &mut operators, ParseMode::FullParse);
    parser.parse_module();
    assert!(!reporter.is_ok());
    let reports = reporter.for_file(std::path::Path::new("Main.lum"));
    assert!(reports.iter().any(|r| r.message.contains("non-associative")));
}
