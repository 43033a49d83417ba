//! Dependency recording and dumps.

use polar_request::{AnyRequest, Evaluator, EvaluatorOptions, Request};

use crate::helpers::kinds::{CountingSquare, CycleA, CycleB, Fibonacci, SumOfSquares};

#[test]
fn test_dependencies_are_recorded_in_request_order() {
    let mut evaluator = Evaluator::new();
    let root = Request::<SumOfSquares>::new((3,));
    let _ = evaluator.evaluate(&root);

    let deps: Vec<String> = evaluator
        .dependencies_of(&AnyRequest::new(root))
        .map(ToString::to_string)
        .collect();
    assert_eq!(deps, ["CountingSquare(1)", "CountingSquare(2)", "CountingSquare(3)"]);
}

#[test]
fn test_leaf_has_no_dependencies() {
    let mut evaluator = Evaluator::new();
    let leaf = Request::<CountingSquare>::new((2,));
    let _ = evaluator.evaluate(&leaf);
    assert_eq!(evaluator.dependencies_of(&AnyRequest::new(leaf)).count(), 0);
}

#[test]
fn test_dependency_tree_of_flat_request() {
    let mut evaluator = Evaluator::new();
    let root = Request::<SumOfSquares>::new((2,));
    let _ = evaluator.evaluate(&root);

    assert_eq!(
        evaluator.dump_dependencies(&AnyRequest::new(root)),
        " `--SumOfSquares(2) (cached)\n     `--CountingSquare(1) (cached)\n     `--CountingSquare(2) (cached)\n"
    );
}

#[test]
fn test_dependency_tree_marks_open_branches() {
    let mut evaluator = Evaluator::new();
    let root = Request::<Fibonacci>::new((3,));
    let _ = evaluator.evaluate(&root);

    let expected = [
        " `--Fibonacci(3) (cached)",
        "     `--Fibonacci(2) (cached)",
        "    |    `--Fibonacci(1) (cached)",
        "    |    `--Fibonacci(0) (cached)",
        "     `--Fibonacci(1) (cached)",
        "",
    ]
    .join("\n");
    assert_eq!(evaluator.dump_dependencies(&AnyRequest::new(root)), expected);
}

#[test]
fn test_dependency_tree_stops_at_cycle() {
    let mut evaluator = Evaluator::new();
    let root = Request::<CycleA>::new((1,));
    let _ = evaluator.evaluate(&root);

    let expected = [
        " `--CycleA(1)",
        "     `--CycleB(1)",
        "         `--CycleC(1)",
        "             `--CycleA(1) (cyclic dependency)",
        "",
    ]
    .join("\n");
    assert_eq!(evaluator.dump_dependencies(&AnyRequest::new(root)), expected);
}

#[test]
fn test_dependency_tree_of_unknown_request() {
    let evaluator = Evaluator::new();
    let request = AnyRequest::new(Request::<CycleB>::new((8,)));
    assert_eq!(evaluator.dump_dependencies(&request), " `--CycleB(8)\n");
}

#[test]
fn test_graphviz_dump() {
    let mut evaluator = Evaluator::new();
    let _ = evaluator.evaluate(&Request::<SumOfSquares>::new((2,)));

    let mut out = String::new();
    evaluator.print_dependencies_graphviz(&mut out).unwrap();
    assert_eq!(
        out,
        "digraph Dependencies {\n\
         \x20 request_0 [label=\"SumOfSquares(2)\", style=filled];\n\
         \x20 request_1 [label=\"CountingSquare(1)\", style=filled];\n\
         \x20 request_2 [label=\"CountingSquare(2)\", style=filled];\n\
         \n\
         \x20 request_0 -> request_1;\n\
         \x20 request_0 -> request_2;\n\
         }\n"
    );
}

#[test]
fn test_debug_dump_cycles_does_not_change_diagnostics() {
    let options = EvaluatorOptions::new().with_debug_dump_cycles(true);
    let mut evaluator = Evaluator::with_options(options);
    let _ = evaluator.evaluate(&Request::<CycleA>::new((6,)));

    assert!(evaluator.options().debug_dump_cycles);
    assert_eq!(evaluator.diagnostics().len(), 3);
}

#[test]
fn test_clear_cache_drops_dependency_graph() {
    let mut evaluator = Evaluator::new();
    let root = AnyRequest::new(Request::<SumOfSquares>::new((2,)));
    let _ = evaluator.evaluate(&Request::<SumOfSquares>::new((2,)));
    assert_eq!(evaluator.dependency_count(), 2);

    evaluator.clear_cache();
    assert_eq!(evaluator.dependency_count(), 0);
    assert_eq!(evaluator.dependencies_of(&root).count(), 0);
    assert_eq!(evaluator.dump_dependencies(&root), " `--SumOfSquares(2)\n");
}
