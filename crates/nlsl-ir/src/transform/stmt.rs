//! Statement rules: programs, functions, assignments and control flow.

use indexmap::IndexMap;
use nlsl_ast::{BinaryOperator, Node, TypeName, UnaryOperator};
use tracing::debug;

use super::{FunctionContext, Transformer};
use crate::error::{Result, TransformError};
use crate::nodes::{
    Comment, Expr, For, Function, If, Ir, Operation, OperatorKind, Return, Statement, Value,
    VariableAssignment, While,
};
use crate::scope::Scope;
use crate::signature::Signature;
use crate::types::{Literal, Type, return_type_name, value_type_name};

/// Resolve a type name in a position that requires a value type.
fn declared_type(name: TypeName, what: &str) -> Result<Type> {
    Type::from_name(name)
        .ok_or_else(|| TransformError::structural(format!("{} cannot be declared void", what)))
}

impl Transformer<'_> {
    /// Top-level program. Function definitions are registered as overloads;
    /// everything else is kept as a global statement.
    pub(super) fn transform_program(
        &mut self,
        content: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Ir> {
        if self.building_program || !scope.is_root() {
            return Err(TransformError::structural(
                "a Program can only appear at the root of the tree",
            ));
        }

        self.building_program = true;
        let result = self.transform_top_level(content, scope);
        self.building_program = false;

        // Reset before propagating so a rejected program leaves nothing behind.
        let fresh = Self::seeded_program(self.tables);
        let mut program = std::mem::replace(&mut self.program, fresh);
        result?;

        program.scope = scope.snapshot();
        Ok(Ir::Program(program))
    }

    fn transform_top_level(&mut self, content: &[Node], scope: &mut Scope<'_>) -> Result<()> {
        for node in content {
            match self.transform_node(node, scope)? {
                Ir::Function(function) => {
                    debug!(signature = %function.signature(), "function registered");
                    self.program.register(function);
                }
                Ir::Statement(statement) => self.program.globals.push(statement),
                Ir::Expr(expr) => self.program.globals.push(Statement::Expression(expr)),
                Ir::Program(_) => {
                    return Err(TransformError::structural("nested Program"));
                }
            }
        }
        Ok(())
    }

    /// Function definition. Parameters and body share one branch of the
    /// enclosing scope.
    pub(super) fn transform_function(
        &mut self,
        name: &str,
        return_type: TypeName,
        arguments: &[Node],
        statements: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Function> {
        if self.function.is_some() {
            return Err(TransformError::structural(format!(
                "function '{}' cannot be defined inside another function",
                name
            )));
        }

        let return_type = Type::from_name(return_type);
        let mut branch = scope.branch();

        let mut params = IndexMap::new();
        for argument in arguments {
            let Node::FunctionArgumentDefinition { name: param, .. } = argument else {
                return Err(TransformError::structural(format!(
                    "parameters of '{}' must be FunctionArgumentDefinition nodes, found {}",
                    name,
                    argument.kind_name()
                )));
            };
            if params.contains_key(param) {
                return Err(TransformError::structural(format!(
                    "duplicate parameter '{}' in '{}'",
                    param, name
                )));
            }
            let placeholder = self.value(argument, &mut branch)?;
            params.insert(param.clone(), placeholder);
        }

        self.function = Some(FunctionContext {
            name: name.to_string(),
            return_type,
        });
        let body = self.statements(statements, &mut branch);
        self.function = None;

        Ok(Function {
            name: name.to_string(),
            params,
            return_type,
            body: body?,
            builtin: false,
        })
    }

    /// Parameter declaration: declares the name and yields a typed placeholder.
    pub(super) fn transform_parameter(
        &mut self,
        name: &str,
        ty: TypeName,
        scope: &mut Scope<'_>,
    ) -> Result<Value> {
        let ty = declared_type(ty, &format!("parameter '{}'", name))?;
        scope.declare(name, ty);
        Ok(Value::placeholder(ty))
    }

    /// Assignment, with or without a declared type.
    ///
    /// Without a type the variable must already be visible and keep its type.
    /// With a type the expression must have exactly that type, the name must
    /// not be visible with a different type, and the variable is declared in
    /// the current scope.
    pub(super) fn transform_assignment(
        &mut self,
        name: &str,
        ty: Option<TypeName>,
        expression: &Node,
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let value = self.expr(expression, scope, "assigned value")?;
        let actual = value.ty();

        let Some(ty) = ty else {
            let declared = scope
                .lookup(name)
                .ok_or_else(|| TransformError::unknown_variable(name))?;
            if let Some(actual) = actual
                && actual != declared
            {
                return Err(TransformError::mismatch(
                    format!("assignment to '{}'", name),
                    declared,
                    actual,
                ));
            }
            return Ok(Statement::Assignment(VariableAssignment {
                name: name.to_string(),
                value,
                declared_type: None,
            }));
        };

        let ty = declared_type(ty, &format!("variable '{}'", name))?;
        if actual != Some(ty) {
            return Err(TransformError::mismatch(
                format!("declaration of '{}'", name),
                ty,
                value_type_name(actual),
            ));
        }
        if let Some(existing) = scope.lookup(name)
            && existing != ty
        {
            return Err(TransformError::mismatch(
                format!("redeclaration of '{}'", name),
                existing,
                ty,
            ));
        }

        scope.declare(name, ty);
        Ok(Statement::Assignment(VariableAssignment {
            name: name.to_string(),
            value,
            declared_type: Some(ty),
        }))
    }

    /// `x++` / `x--`, desugared to `x = x + 1` / `x = x - 1`.
    ///
    /// The operation is keyed on the non-strict signature of the variable's
    /// type and `int`, so a `float` counter becomes a float addition.
    pub(super) fn transform_unary(
        &mut self,
        name: &str,
        operator: UnaryOperator,
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let declared = scope
            .lookup(name)
            .ok_or_else(|| TransformError::unknown_variable(name))?;
        if !declared.is_scalar() {
            return Err(TransformError::structural(format!(
                "only scalar types support unary assignment ('{}' is {})",
                name, declared
            )));
        }

        let op = match operator {
            UnaryOperator::Increment => BinaryOperator::Add,
            UnaryOperator::Decrement => BinaryOperator::Sub,
        };
        let signature = Signature::new(op, declared, Type::Int).fallback();
        let Some(OperatorKind::Operation(kind)) = self.tables.operator(&signature) else {
            return Err(TransformError::InvalidOperation {
                signature: signature.to_string(),
            });
        };

        let operation = Operation {
            kind,
            left: Box::new(Expr::Value(Value::reference(name, declared))),
            right: Box::new(Expr::Value(Value::immediate(Literal::Int(1)))),
            signature,
        };
        Ok(Statement::Assignment(VariableAssignment {
            name: name.to_string(),
            value: Expr::Operation(operation),
            declared_type: None,
        }))
    }

    pub(super) fn transform_if(
        &mut self,
        condition: &Node,
        then_body: &[Node],
        else_body: Option<&[Node]>,
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let condition = self.condition(condition, scope, "if")?;
        let then_body = self.statements(then_body, &mut scope.branch())?;
        let else_body = match else_body {
            Some(nodes) => self.statements(nodes, &mut scope.branch())?,
            None => Vec::new(),
        };
        Ok(Statement::If(If {
            condition,
            then_body,
            else_body,
        }))
    }

    pub(super) fn transform_while(
        &mut self,
        condition: &Node,
        body: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let condition = self.condition(condition, scope, "while")?;
        let body = self.statements(body, &mut scope.branch())?;
        Ok(Statement::While(While { condition, body }))
    }

    pub(super) fn transform_for(
        &mut self,
        initialization: &Node,
        condition: &Node,
        iterator: &Node,
        body: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let mut branch = scope.branch();
        let init = self.statement(initialization, &mut branch)?;
        let condition = self.condition(condition, &mut branch, "for")?;
        let iterator = self.statement(iterator, &mut branch)?;
        let body = self.statements(body, &mut branch)?;
        Ok(Statement::For(For {
            init: Box::new(init),
            condition,
            iterator: Box::new(iterator),
            body,
        }))
    }

    /// Return. Inside a function the value must have the declared return type.
    pub(super) fn transform_return(
        &mut self,
        expression: &Node,
        scope: &mut Scope<'_>,
    ) -> Result<Statement> {
        let value = self.expr(expression, scope, "return value")?;

        if let Some(function) = &self.function
            && value.ty() != function.return_type
        {
            return Err(TransformError::mismatch(
                format!("return from '{}'", function.name),
                return_type_name(function.return_type),
                value_type_name(value.ty()),
            ));
        }

        Ok(Statement::Return(Return { value }))
    }

    /// Comment text without its `//`, `#` or `/* */` markers.
    pub(super) fn transform_comment(text: &str) -> Statement {
        let text = text.trim();
        let text = text.strip_suffix("*/").unwrap_or(text);
        let text = text.trim_start_matches(['/', '*', '#']).trim().to_string();
        Statement::Comment(Comment { text })
    }
}
