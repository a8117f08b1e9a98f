use lumen_package::DependencyGraph;

/// `a` imports `b` and `c`; `b` imports `e` and `d`; `c` imports `d`;
/// `e` imports `f`; `f` imports `g`; `d` imports `g`.
fn build_sample() -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    graph.add_dependency("a", "b");
    graph.add_dependency("a", "c");
    graph.add_dependency("b", "e");
    graph.add_dependency("b", "d");
    graph.add_dependency("c", "d");
    graph.add_dependency("e", "f");
    graph.add_dependency("f", "g");
    graph.add_dependency("d", "g");
    graph
}

#[test]
fn orders_modules_with_every_dependency_before_its_importer() {
    let graph = build_sample();
    let order = graph.resolve().unwrap();
    let expected: Vec<String> = vec!["g", "f", "e", "d", "b", "c", "a"].into_iter().map(String::from).collect();
    assert_eq!(order, expected);
}

#[test]
fn resolving_twice_yields_byte_identical_output() {
    let graph = build_sample();
    let first = graph.resolve().unwrap();
    let second = graph.resolve().unwrap();
    assert_eq!(first, second);
}

#[test]
fn a_cycle_is_reported_by_name_with_no_partial_ordering() {
    // f imports b, closing the cycle f -> b -> e -> f.
    let mut graph = build_sample();
    graph.add_dependency("f", "b");
    let err = graph.resolve().unwrap_err();
    assert_eq!(err.importer, "f");
    assert_eq!(err.dependency, "b");
}
