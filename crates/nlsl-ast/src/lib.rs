// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! NLSL syntax tree.
//!
//! This crate defines the untyped syntax tree handed to the front end by an
//! external parser. Nothing here is validated beyond its shape: names may be
//! undeclared, types may disagree, and operators may have no overload. All of
//! that is checked when the tree is transformed into IR by `nlsl-ir`.
//!
//! # Interchange
//!
//! The tree is (de)serializable with serde. The JSON form is internally tagged
//! on `"kind"`, so a parser written in any language can produce it:
//!
//! ```json
//! { "kind": "Assignment", "name": "x", "type": "float",
//!   "expression": { "kind": "NumberLiteral", "value": "1.0" } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type names as they appear in source.
///
/// `Void` is only meaningful as a function return type; it is the "no type"
/// marker and can never be the type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Void,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Vec2 => "vec2",
            TypeName::Vec3 => "vec3",
            TypeName::Vec4 => "vec4",
            TypeName::Void => "void",
        };
        f.write_str(name)
    }
}

/// Binary operators accepted in an `OperationalExpression`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// Addition: `a + b`.
    #[serde(rename = "+")]
    Add,
    /// Subtraction: `a - b`.
    #[serde(rename = "-")]
    Sub,
    /// Multiplication: `a * b`.
    #[serde(rename = "*")]
    Mul,
    /// Division: `a / b`.
    #[serde(rename = "/")]
    Div,
    /// Equality: `a == b`.
    #[serde(rename = "==")]
    Eq,
    /// Less than: `a < b`.
    #[serde(rename = "<")]
    Lt,
    /// Greater than: `a > b`.
    #[serde(rename = ">")]
    Gt,
}

impl BinaryOperator {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "==",
            BinaryOperator::Lt => "<",
            BinaryOperator::Gt => ">",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// In-place increment and decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl UnaryOperator {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Increment => "++",
            UnaryOperator::Decrement => "--",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Statement list of a function definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Node>,
}

/// Statement list of a loop body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub content: Vec<Node>,
}

/// A syntax tree node.
///
/// The set of kinds is closed. Which kinds may appear where (a parameter
/// declaration only inside a function definition, a function definition only
/// at top level) is a semantic rule enforced by the transformer, not by this
/// type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    /// Root of a translation unit.
    Program { content: Vec<Node> },

    FunctionDefinition {
        name: String,
        return_type: TypeName,
        /// Parameter declarations, each a [`Node::FunctionArgumentDefinition`].
        arguments: Vec<Node>,
        body: Block,
    },

    FunctionArgumentDefinition {
        name: String,
        #[serde(rename = "type")]
        ty: TypeName,
    },

    /// Single-child wrapper around a statement.
    Statement { content: Vec<Node> },

    /// Single-child wrapper around an expression.
    Expression { content: Vec<Node> },

    /// `name = expression` or, with a type, `type name = expression`.
    Assignment {
        name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeName>,
        expression: Box<Node>,
    },

    /// `name++` / `name--`.
    UnaryAssignment {
        name: String,
        operator: UnaryOperator,
    },

    OperationalExpression {
        operator: BinaryOperator,
        factors: Vec<Node>,
    },

    NumberLiteral {
        /// Lexeme exactly as written, e.g. `"1"` or `"0.5"`.
        value: String,
        /// Integer marker set by parsers that already classified the literal.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        int: Option<bool>,
    },

    /// Variable read, optionally with a swizzle such as `.xy`.
    VariableRef {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component: Option<String>,
    },

    FunctionCall { name: String, arguments: Vec<Node> },

    Comment { value: String },

    If {
        condition: Box<Node>,
        then_body: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_body: Option<Vec<Node>>,
    },

    While { condition: Box<Node>, body: Body },

    For {
        initialization: Box<Node>,
        iterator: Box<Node>,
        condition: Box<Node>,
        body: Body,
    },

    Return { expression: Box<Node> },
}

impl Node {
    /// Name of this node's kind, as used in the `"kind"` tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::FunctionDefinition { .. } => "FunctionDefinition",
            Node::FunctionArgumentDefinition { .. } => "FunctionArgumentDefinition",
            Node::Statement { .. } => "Statement",
            Node::Expression { .. } => "Expression",
            Node::Assignment { .. } => "Assignment",
            Node::UnaryAssignment { .. } => "UnaryAssignment",
            Node::OperationalExpression { .. } => "OperationalExpression",
            Node::NumberLiteral { .. } => "NumberLiteral",
            Node::VariableRef { .. } => "VariableRef",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::Comment { .. } => "Comment",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::For { .. } => "For",
            Node::Return { .. } => "Return",
        }
    }

    /// Parse a tree from its JSON interchange form.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Render this tree in its JSON interchange form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    // === Constructors ===

    pub fn program(content: Vec<Node>) -> Self {
        Node::Program { content }
    }

    pub fn function(
        name: impl Into<String>,
        return_type: TypeName,
        arguments: Vec<(&str, TypeName)>,
        statements: Vec<Node>,
    ) -> Self {
        Node::FunctionDefinition {
            name: name.into(),
            return_type,
            arguments: arguments
                .into_iter()
                .map(|(name, ty)| Node::FunctionArgumentDefinition {
                    name: name.to_string(),
                    ty,
                })
                .collect(),
            body: Block { statements },
        }
    }

    pub fn statement(inner: Node) -> Self {
        Node::Statement {
            content: vec![inner],
        }
    }

    pub fn expression(inner: Node) -> Self {
        Node::Expression {
            content: vec![inner],
        }
    }

    /// Untyped assignment to an existing variable.
    pub fn assign(name: impl Into<String>, expression: Node) -> Self {
        Node::Assignment {
            name: name.into(),
            ty: None,
            expression: Box::new(expression),
        }
    }

    /// Typed assignment declaring a variable.
    pub fn declare(name: impl Into<String>, ty: TypeName, expression: Node) -> Self {
        Node::Assignment {
            name: name.into(),
            ty: Some(ty),
            expression: Box::new(expression),
        }
    }

    pub fn unary(name: impl Into<String>, operator: UnaryOperator) -> Self {
        Node::UnaryAssignment {
            name: name.into(),
            operator,
        }
    }

    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Node::OperationalExpression {
            operator,
            factors: vec![left, right],
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Node::NumberLiteral {
            value: value.into(),
            int: None,
        }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Node::VariableRef {
            value: name.into(),
            component: None,
        }
    }

    pub fn swizzle(name: impl Into<String>, component: impl Into<String>) -> Self {
        Node::VariableRef {
            value: name.into(),
            component: Some(component.into()),
        }
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Node>) -> Self {
        Node::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment {
            value: value.into(),
        }
    }

    pub fn if_else(condition: Node, then_body: Vec<Node>, else_body: Option<Vec<Node>>) -> Self {
        Node::If {
            condition: Box::new(condition),
            then_body,
            else_body,
        }
    }

    pub fn while_loop(condition: Node, content: Vec<Node>) -> Self {
        Node::While {
            condition: Box::new(condition),
            body: Body { content },
        }
    }

    pub fn for_loop(
        initialization: Node,
        condition: Node,
        iterator: Node,
        content: Vec<Node>,
    ) -> Self {
        Node::For {
            initialization: Box::new(initialization),
            iterator: Box::new(iterator),
            condition: Box::new(condition),
            body: Body { content },
        }
    }

    pub fn ret(expression: Node) -> Self {
        Node::Return {
            expression: Box::new(expression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_with_type() {
        let json = r#"{
            "kind": "Assignment",
            "name": "x",
            "type": "float",
            "expression": { "kind": "NumberLiteral", "value": "1.0" }
        }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node, Node::declare("x", TypeName::Float, Node::number("1.0")));
    }

    #[test]
    fn test_parse_assignment_without_type() {
        let json = r#"{
            "kind": "Assignment",
            "name": "x",
            "expression": { "kind": "VariableRef", "value": "y" }
        }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node, Node::assign("x", Node::var("y")));
    }

    #[test]
    fn test_parse_operators() {
        let json = r#"{
            "kind": "OperationalExpression",
            "operator": "<",
            "factors": [
                { "kind": "VariableRef", "value": "i" },
                { "kind": "NumberLiteral", "value": "10" }
            ]
        }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(
            node,
            Node::binary(BinaryOperator::Lt, Node::var("i"), Node::number("10"))
        );

        let json = r#"{ "kind": "UnaryAssignment", "name": "i", "operator": "--" }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node, Node::unary("i", UnaryOperator::Decrement));
    }

    #[test]
    fn test_parse_unknown_operator_fails() {
        let json = r#"{ "kind": "UnaryAssignment", "name": "i", "operator": "**" }"#;
        assert!(Node::from_json(json).is_err());
    }

    #[test]
    fn test_parse_unknown_kind_fails() {
        let json = r#"{ "kind": "Switch", "cases": [] }"#;
        assert!(Node::from_json(json).is_err());
    }

    #[test]
    fn test_parse_swizzle() {
        let json = r#"{ "kind": "VariableRef", "value": "uv", "component": "xy" }"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node, Node::swizzle("uv", "xy"));
    }

    #[test]
    fn test_parse_function_definition() {
        let json = r#"{
            "kind": "FunctionDefinition",
            "name": "scale",
            "return_type": "vec3",
            "arguments": [
                { "kind": "FunctionArgumentDefinition", "name": "v", "type": "vec3" },
                { "kind": "FunctionArgumentDefinition", "name": "s", "type": "float" }
            ],
            "body": { "statements": [
                { "kind": "Return", "expression": {
                    "kind": "OperationalExpression", "operator": "*",
                    "factors": [
                        { "kind": "VariableRef", "value": "v" },
                        { "kind": "VariableRef", "value": "s" }
                    ]
                } }
            ] }
        }"#;
        let node = Node::from_json(json).unwrap();
        let expected = Node::function(
            "scale",
            TypeName::Vec3,
            vec![("v", TypeName::Vec3), ("s", TypeName::Float)],
            vec![Node::ret(Node::binary(
                BinaryOperator::Mul,
                Node::var("v"),
                Node::var("s"),
            ))],
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_parse_control_flow() {
        let json = r#"{
            "kind": "Program",
            "content": [
                { "kind": "If",
                  "condition": { "kind": "OperationalExpression", "operator": "==", "factors": [
                      { "kind": "VariableRef", "value": "a" },
                      { "kind": "VariableRef", "value": "b" } ] },
                  "then_body": [ { "kind": "Comment", "value": "// then" } ] },
                { "kind": "While",
                  "condition": { "kind": "OperationalExpression", "operator": ">", "factors": [
                      { "kind": "VariableRef", "value": "a" },
                      { "kind": "NumberLiteral", "value": "0" } ] },
                  "body": { "content": [ { "kind": "UnaryAssignment", "name": "a", "operator": "--" } ] } },
                { "kind": "For",
                  "initialization": { "kind": "Assignment", "name": "i", "type": "int",
                                      "expression": { "kind": "NumberLiteral", "value": "0" } },
                  "condition": { "kind": "OperationalExpression", "operator": "<", "factors": [
                      { "kind": "VariableRef", "value": "i" },
                      { "kind": "NumberLiteral", "value": "4" } ] },
                  "iterator": { "kind": "UnaryAssignment", "name": "i", "operator": "++" },
                  "body": { "content": [] } }
            ]
        }"#;
        let node = Node::from_json(json).unwrap();
        let Node::Program { content } = &node else {
            panic!("expected program, got {}", node.kind_name());
        };
        assert_eq!(content.len(), 3);
        assert!(matches!(&content[0], Node::If { else_body: None, .. }));
        assert_eq!(content[1].kind_name(), "While");
        assert_eq!(content[2].kind_name(), "For");
    }

    #[test]
    fn test_json_output_is_readable_back() {
        let node = Node::program(vec![Node::function(
            "main",
            TypeName::Void,
            vec![],
            vec![Node::statement(Node::assign(
                "nl_FragColor",
                Node::call(
                    "vec4",
                    vec![
                        Node::number("1.0"),
                        Node::number("0.0"),
                        Node::number("0.0"),
                        Node::number("1.0"),
                    ],
                ),
            ))],
        )]);
        let json = node.to_json().unwrap();
        assert!(json.contains("\"kind\": \"FunctionDefinition\""));
        assert!(json.contains("\"return_type\": \"void\""));
        assert_eq!(Node::from_json(&json).unwrap(), node);
    }
}
