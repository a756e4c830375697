//! Expression rules: operators, literals, variables, swizzles and calls.

use nlsl_ast::{BinaryOperator, Node};
use tracing::trace;

use super::Transformer;
use crate::error::{Result, TransformError};
use crate::nodes::{
    ComponentAccess, Condition, Expr, FunctionCall, Operation, OperatorKind, Value,
};
use crate::scope::Scope;
use crate::signature::Signature;
use crate::types::{Literal, value_type_name};

impl Transformer<'_> {
    /// Binary operator expression.
    ///
    /// The operator is looked up first with the operand types in source order.
    /// If that fails, the non-strict key ([`Signature::fallback`]) is tried; a
    /// match there is only accepted when the operator kind is not strict. The
    /// node keeps the source operand order and records whichever signature
    /// matched.
    pub(super) fn transform_operation(
        &mut self,
        operator: BinaryOperator,
        factors: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Expr> {
        let [left, right] = factors else {
            return Err(TransformError::structural(format!(
                "operator '{}' takes exactly two operands, found {}",
                operator,
                factors.len()
            )));
        };

        let left = self.expr(left, scope, "operand")?;
        let right = self.expr(right, scope, "operand")?;

        let (Some(left_ty), Some(right_ty)) = (left.ty(), right.ty()) else {
            return Err(TransformError::InvalidOperation {
                signature: format!(
                    "{} {} {}",
                    operator,
                    value_type_name(left.ty()),
                    value_type_name(right.ty())
                ),
            });
        };

        let requested = Signature::new(operator, left_ty, right_ty);
        let (kind, signature) = self.resolve_operator(requested)?;
        let (left, right) = (Box::new(left), Box::new(right));

        Ok(match kind {
            OperatorKind::Operation(kind) => Expr::Operation(Operation {
                kind,
                left,
                right,
                signature,
            }),
            OperatorKind::Condition(kind) => Expr::Condition(Condition {
                kind,
                left,
                right,
                signature,
            }),
        })
    }

    fn resolve_operator(&self, requested: Signature) -> Result<(OperatorKind, Signature)> {
        if let Some(kind) = self.tables.operator(&requested) {
            trace!(signature = %requested, ?kind, "operator resolved");
            return Ok((kind, requested));
        }

        let fallback = requested.fallback();
        match self.tables.operator(&fallback) {
            Some(kind) if !kind.is_strict() => {
                trace!(%requested, signature = %fallback, ?kind, "operator resolved via fallback");
                Ok((kind, fallback))
            }
            Some(_) => {
                trace!(%requested, signature = %fallback, "strict operator, fallback rejected");
                Err(TransformError::InvalidOperation {
                    signature: requested.to_string(),
                })
            }
            None => Err(TransformError::InvalidOperation {
                signature: requested.to_string(),
            }),
        }
    }

    /// Numeric literal, classified by its lexeme unless the parser already
    /// marked it. Floats must be finite.
    pub(super) fn transform_literal(lexeme: &str, int: Option<bool>) -> Result<Value> {
        let is_int = int.unwrap_or_else(|| !lexeme.contains(['.', 'e', 'E']));
        let literal = if is_int {
            lexeme.parse::<i64>().map(Literal::Int).ok()
        } else {
            lexeme
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Literal::Float)
        };
        literal.map(Value::immediate).ok_or_else(|| {
            TransformError::structural(format!("malformed number literal '{}'", lexeme))
        })
    }

    /// Variable read, with an optional swizzle.
    pub(super) fn transform_variable(
        &self,
        name: &str,
        component: Option<&str>,
        scope: &Scope<'_>,
    ) -> Result<Expr> {
        let ty = scope
            .lookup(name)
            .ok_or_else(|| TransformError::unknown_variable(name))?;
        let base = Value::reference(name, ty);

        let Some(component) = component else {
            return Ok(Expr::Value(base));
        };

        let invalid = || TransformError::InvalidVectorComponent {
            ty,
            component: component.to_string(),
        };
        let swizzle = self.tables.swizzle(component).ok_or_else(invalid)?;
        if !swizzle.accepts(ty) {
            return Err(invalid());
        }

        Ok(Expr::ComponentAccess(ComponentAccess {
            base: Box::new(Expr::Value(base)),
            component: component.to_string(),
            ty: swizzle.result,
        }))
    }

    /// Function call. Arguments must match one overload's parameter types
    /// exactly; there is no coercion.
    pub(super) fn transform_call(
        &mut self,
        name: &str,
        arguments: &[Node],
        scope: &mut Scope<'_>,
    ) -> Result<Expr> {
        if !self.program.has_function(name) {
            return Err(TransformError::UnknownFunction {
                name: name.to_string(),
            });
        }

        let arguments = arguments
            .iter()
            .map(|argument| self.expr(argument, scope, "argument"))
            .collect::<Result<Vec<_>>>()?;
        let types: Vec<_> = arguments.iter().map(Expr::ty).collect();

        let overloads = self.program.overloads(name);
        let matched = overloads
            .iter()
            .find(|function| function.param_types().map(Some).eq(types.iter().copied()));

        let Some(function) = matched else {
            let requested: Vec<&str> = types.iter().map(|ty| value_type_name(*ty)).collect();
            return Err(TransformError::NoMatchingOverload {
                name: name.to_string(),
                requested: format!("{}({})", name, requested.join(", ")),
                candidates: overloads
                    .iter()
                    .map(|function| function.signature().to_string())
                    .collect(),
            });
        };

        trace!(signature = %function.signature(), "call resolved");
        Ok(Expr::Call(FunctionCall {
            name: name.to_string(),
            arguments,
            return_type: function.return_type,
        }))
    }
}
