//! Syntax tree to IR transformation.
//!
//! This module turns an untyped [`Node`] tree into a fully typed, resolved
//! [`Program`]. It is where every semantic rule of the language is enforced:
//! variables must be declared before use, assignments must agree with the
//! declared type, operators and calls must resolve to a registered overload,
//! swizzles must exist on the vector they are taken from, and control flow
//! must be guarded by comparisons.
//!
//! # Dispatch
//!
//! [`Transformer::transform_node`] is the single entry point. It matches on
//! the node kind and returns one [`Ir`] node, recursing into children and
//! mutating the current [`Scope`] and the program under construction as it
//! goes. Callers narrow the result with [`Transformer::expr`] or
//! [`Transformer::statement`], which reject nodes found in a position they
//! cannot occupy.
//!
//! # Scoping
//!
//! Function bodies and every control-flow body are transformed in a branch of
//! the enclosing scope, so their declarations disappear once the body is done.
//! A `for` loop's initializer, iterator and body share one branch.
//!
//! # Failure
//!
//! Transformation is all-or-nothing: the first violation aborts it and no
//! partial program is returned.

mod expr;
mod stmt;


use nlsl_ast::Node;
use tracing::{debug, instrument};

use crate::error::{Result, TransformError};
use crate::nodes::{Condition, Expr, Ir, Program, Statement, Value};
use crate::scope::Scope;
use crate::tables::Tables;
use crate::types::Type;

/// Transform a complete syntax tree into a program.
///
/// The root must be a [`Node::Program`]. It is transformed against a fresh
/// root scope holding the environment variables, with the built-in functions
/// already registered.
///
/// # Errors
///
/// Returns the first [`TransformError`] encountered. Nothing is returned for
/// programs that fail part-way.
#[instrument(skip_all, name = "transform")]
pub fn transform(root: &Node) -> Result<Program> {
    let mut scope = Scope::environment();
    let mut transformer = Transformer::new(Tables::global());

    let result = transformer
        .transform_node(root, &mut scope)
        .and_then(|ir| match ir {
            Ir::Program(program) => Ok(program),
            other => Err(TransformError::structural(format!(
                "expected a Program at the root, found a {}",
                other.kind_name()
            ))),
        });

    match &result {
        Ok(program) => debug!(
            functions = program.user_functions().count(),
            globals = program.globals.len(),
            "program transformed"
        ),
        Err(err) => debug!(%err, "transform failed"),
    }
    result
}

/// Function whose body is currently being transformed.
#[derive(Debug, Clone)]
struct FunctionContext {
    name: String,
    return_type: Option<Type>,
}

/// Recursive transformation state.
///
/// Holds the program under construction (so calls can resolve against the
/// functions registered so far) and the function currently being
/// transformed (so `return` can be checked against it).
pub struct Transformer<'t> {
    tables: &'t Tables,
    program: Program,
    building_program: bool,
    function: Option<FunctionContext>,
}

impl<'t> Transformer<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            program: Self::seeded_program(tables),
            building_program: false,
            function: None,
        }
    }

    fn seeded_program(tables: &Tables) -> Program {
        let mut program = Program::default();
        for function in tables.builtins() {
            program.register(function.clone());
        }
        program
    }

    /// Program under construction.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Transform one node against `scope`.
    pub fn transform_node(&mut self, node: &Node, scope: &mut Scope<'_>) -> Result<Ir> {
        match node {
            Node::Program { content } => self.transform_program(content, scope),

            Node::FunctionDefinition {
                name,
                return_type,
                arguments,
                body,
            } => self
                .transform_function(name, *return_type, arguments, &body.statements, scope)
                .map(Ir::Function),

            Node::FunctionArgumentDefinition { name, ty } => self
                .transform_parameter(name, *ty, scope)
                .map(|value| Ir::Expr(Expr::Value(value))),

            Node::Statement { content } | Node::Expression { content } => {
                let [inner] = content.as_slice() else {
                    return Err(TransformError::structural(format!(
                        "{} must wrap exactly one node, found {}",
                        node.kind_name(),
                        content.len()
                    )));
                };
                self.transform_node(inner, scope)
            }

            Node::Assignment {
                name,
                ty,
                expression,
            } => self
                .transform_assignment(name, *ty, expression, scope)
                .map(Ir::Statement),

            Node::UnaryAssignment { name, operator } => self
                .transform_unary(name, *operator, scope)
                .map(Ir::Statement),

            Node::OperationalExpression { operator, factors } => self
                .transform_operation(*operator, factors, scope)
                .map(Ir::Expr),

            Node::NumberLiteral { value, int } => Self::transform_literal(value, *int)
                .map(|value| Ir::Expr(Expr::Value(value))),

            Node::VariableRef { value, component } => self
                .transform_variable(value, component.as_deref(), scope)
                .map(Ir::Expr),

            Node::FunctionCall { name, arguments } => {
                self.transform_call(name, arguments, scope).map(Ir::Expr)
            }

            Node::Comment { value } => Ok(Ir::Statement(Self::transform_comment(value))),

            Node::If {
                condition,
                then_body,
                else_body,
            } => self
                .transform_if(condition, then_body, else_body.as_deref(), scope)
                .map(Ir::Statement),

            Node::While { condition, body } => self
                .transform_while(condition, &body.content, scope)
                .map(Ir::Statement),

            Node::For {
                initialization,
                iterator,
                condition,
                body,
            } => self
                .transform_for(initialization, condition, iterator, &body.content, scope)
                .map(Ir::Statement),

            Node::Return { expression } => {
                self.transform_return(expression, scope).map(Ir::Statement)
            }
        }
    }

    /// Transform a node that must produce an expression.
    pub(crate) fn expr(
        &mut self,
        node: &Node,
        scope: &mut Scope<'_>,
        position: &str,
    ) -> Result<Expr> {
        match self.transform_node(node, scope)? {
            Ir::Expr(expr) => Ok(expr),
            other => Err(TransformError::structural(format!(
                "expected an expression as {}, found a {} ({})",
                position,
                other.kind_name(),
                node.kind_name()
            ))),
        }
    }

    /// Transform a node that must produce a statement. Bare expressions are
    /// wrapped as expression statements.
    pub(crate) fn statement(&mut self, node: &Node, scope: &mut Scope<'_>) -> Result<Statement> {
        match self.transform_node(node, scope)? {
            Ir::Statement(statement) => Ok(statement),
            Ir::Expr(expr) => Ok(Statement::Expression(expr)),
            other => Err(TransformError::structural(format!(
                "a {} cannot appear inside a body",
                other.kind_name()
            ))),
        }
    }

    pub(crate) fn statements(
        &mut self,
        nodes: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Vec<Statement>> {
        nodes
            .iter()
            .map(|node| self.statement(node, scope))
            .collect()
    }

    /// Transform a node that must be a comparison.
    pub(crate) fn condition(
        &mut self,
        node: &Node,
        scope: &mut Scope<'_>,
        construct: &str,
    ) -> Result<Condition> {
        match self.expr(node, scope, "condition")? {
            Expr::Condition(condition) => Ok(condition),
            _ => Err(TransformError::structural(format!(
                "conditional must be a comparative expression (in {})",
                construct
            ))),
        }
    }

    /// Transform a node that must be a plain value.
    pub(crate) fn value(&mut self, node: &Node, scope: &mut Scope<'_>) -> Result<Value> {
        match self.expr(node, scope, "parameter")? {
            Expr::Value(value) => Ok(value),
            _ => Err(TransformError::structural(format!(
                "expected a value, found {}",
                node.kind_name()
            ))),
        }
    }
}
