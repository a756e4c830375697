use nlsl_ast::{BinaryOperator, TypeName};

use super::*;

fn sample() -> Program {
    let tree = Node::program(vec![
        Node::comment("// tint"),
        Node::declare("tint", TypeName::Float, Node::number("0.5")),
        Node::function(
            "shade",
            TypeName::Vec3,
            vec![("c", TypeName::Vec3)],
            vec![Node::ret(Node::binary(
                BinaryOperator::Mul,
                Node::var("c"),
                Node::var("tint"),
            ))],
        ),
        Node::function("main", TypeName::Void, vec![], vec![]),
    ]);
    nlsl_ir::transform(&tree).unwrap()
}

#[test]
fn test_summary_lists_user_functions_and_globals() {
    let summary = summarize(&sample());
    assert!(summary.contains("built-in overloads: 10"));
    assert!(summary.contains("  shade(vec3) -> vec3 (1 statements)"));
    assert!(summary.contains("  main() -> void (0 statements)"));
    assert!(summary.contains("  tint: float"));
    assert!(!summary.contains("vec4("));
}

#[test]
fn test_render_ir_is_json() {
    let json = render_ir(&sample()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["scope"]["bindings"]["tint"], "float");
    assert!(value["functions"]["shade"].is_array());
}

#[test]
fn test_load_tree_reports_missing_file() {
    let err = load_tree(Path::new("/nonexistent/tree.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}
