//! Resolved IR.
//!
//! Every node here is produced once by the transformer and is immutable
//! afterwards. Nodes own their children; nothing is shared. A code generator
//! pattern-matches [`Expr`] and [`Statement`] and needs nothing else from the
//! front end.
//!
//! # Operation families
//!
//! Binary operations come in two families:
//!
//! - [`Operation`]: arithmetic, carrying a value type derived from the
//!   signature it matched
//! - [`Condition`]: comparisons, which produce no value and are the only
//!   expressions accepted as `if`/`while`/`for` conditions
//!
//! Each kind is either *strict* (legal only in the operand order listed in the
//! operator table) or not (the operand order may be swapped during matching).

use indexmap::IndexMap;
use serde::Serialize;

use crate::scope::Scope;
use crate::signature::{FunctionSignature, Signature};
use crate::types::{Literal, Type};

// === Values ===

/// What a [`Value`] holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ValueKind {
    /// Immediate constant.
    Immediate(Literal),
    /// Name of a variable to read or write.
    Reference(String),
    /// Typed slot with no payload, used for function parameters.
    Placeholder,
}

/// Smallest resolved expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub ty: Type,
    pub kind: ValueKind,
}

impl Value {
    pub fn immediate(literal: Literal) -> Self {
        Self {
            ty: literal.ty(),
            kind: ValueKind::Immediate(literal),
        }
    }

    pub fn reference(name: impl Into<String>, ty: Type) -> Self {
        Self {
            ty,
            kind: ValueKind::Reference(name.into()),
        }
    }

    pub fn placeholder(ty: Type) -> Self {
        Self {
            ty,
            kind: ValueKind::Placeholder,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ValueKind::Reference(_))
    }

    /// Variable name, for references.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Reference(name) => Some(name),
            _ => None,
        }
    }
}

// === Operations ===

/// How operand types relate within an operation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperandFamily {
    VectorVector,
    VectorScalar,
    ScalarScalar,
}

/// Arithmetic operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    AddVectorVector,
    SubVectorVector,
    MulVectorVector,
    DivVectorVector,
    AddVectorScalar,
    SubVectorScalar,
    MulVectorScalar,
    DivVectorScalar,
    AddScalarScalar,
    SubScalarScalar,
    MulScalarScalar,
    DivScalarScalar,
}

impl OperationKind {
    pub fn family(self) -> OperandFamily {
        use OperationKind::*;
        match self {
            AddVectorVector | SubVectorVector | MulVectorVector | DivVectorVector => {
                OperandFamily::VectorVector
            }
            AddVectorScalar | SubVectorScalar | MulVectorScalar | DivVectorScalar => {
                OperandFamily::VectorScalar
            }
            AddScalarScalar | SubScalarScalar | MulScalarScalar | DivScalarScalar => {
                OperandFamily::ScalarScalar
            }
        }
    }

    /// Strict kinds only match in the operand order they are registered in.
    pub fn is_strict(self) -> bool {
        use OperationKind::*;
        matches!(
            self,
            SubVectorVector | DivVectorVector | SubVectorScalar | DivVectorScalar
        )
    }

    /// Result type, read off the signature the operation matched.
    ///
    /// Vector-scalar operations take whichever type name sorts last, which is
    /// always the vector. Scalar-scalar operations are `float` as soon as one
    /// side is.
    pub fn result_type(self, signature: &Signature) -> Type {
        match self.family() {
            OperandFamily::VectorVector => signature.left,
            OperandFamily::VectorScalar => {
                if signature.left.name() >= signature.right.name() {
                    signature.left
                } else {
                    signature.right
                }
            }
            OperandFamily::ScalarScalar => {
                if signature.left == Type::Float || signature.right == Type::Float {
                    Type::Float
                } else {
                    Type::Int
                }
            }
        }
    }
}

/// Comparison kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionKind {
    EqualScalarScalar,
    LessScalarScalar,
    GreaterScalarScalar,
    EqualVectorVector,
    LessVectorVector,
    GreaterVectorVector,
}

impl ConditionKind {
    pub fn family(self) -> OperandFamily {
        use ConditionKind::*;
        match self {
            EqualScalarScalar | LessScalarScalar | GreaterScalarScalar => {
                OperandFamily::ScalarScalar
            }
            EqualVectorVector | LessVectorVector | GreaterVectorVector => {
                OperandFamily::VectorVector
            }
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(
            self,
            ConditionKind::LessVectorVector | ConditionKind::GreaterVectorVector
        )
    }
}

/// Entry of the operator table: which node a signature builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    Operation(OperationKind),
    Condition(ConditionKind),
}

impl OperatorKind {
    pub fn is_strict(self) -> bool {
        match self {
            OperatorKind::Operation(kind) => kind.is_strict(),
            OperatorKind::Condition(kind) => kind.is_strict(),
        }
    }
}

/// Arithmetic between two resolved operands.
///
/// Operands keep their source order even when the signature matched is the
/// swapped fallback key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub signature: Signature,
}

impl Operation {
    pub fn ty(&self) -> Type {
        self.kind.result_type(&self.signature)
    }
}

/// Comparison between two resolved operands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub signature: Signature,
}

/// Swizzle such as `v.xy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentAccess {
    pub base: Box<Expr>,
    pub component: String,
    pub ty: Type,
}

/// Call of a resolved function overload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub return_type: Option<Type>,
}

/// Resolved expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Expr {
    Value(Value),
    Operation(Operation),
    Condition(Condition),
    ComponentAccess(ComponentAccess),
    Call(FunctionCall),
}

impl Expr {
    /// Value type of the expression. `None` for conditions and calls of
    /// `void` functions.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Expr::Value(value) => Some(value.ty),
            Expr::Operation(op) => Some(op.ty()),
            Expr::Condition(_) => None,
            Expr::ComponentAccess(access) => Some(access.ty),
            Expr::Call(call) => call.return_type,
        }
    }
}

// === Statements ===

/// Declare-or-update of a variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableAssignment {
    pub name: String,
    pub value: Expr,
    /// Set when the assignment declares the variable in the current scope.
    pub declared_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct If {
    pub condition: Condition,
    pub then_body: Vec<Statement>,
    pub else_body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct While {
    pub condition: Condition,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct For {
    pub init: Box<Statement>,
    pub condition: Condition,
    pub iterator: Box<Statement>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub value: Expr,
}

/// Source comment, carried through for generators that want to keep it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "statement")]
pub enum Statement {
    Assignment(VariableAssignment),
    If(If),
    While(While),
    For(For),
    Return(Return),
    /// Expression evaluated for its effect, typically a call.
    Expression(Expr),
    Comment(Comment),
}

// === Functions and program ===

/// A function overload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    /// Parameters in declaration order, each a [`ValueKind::Placeholder`].
    pub params: IndexMap<String, Value>,
    /// `None` for `void`.
    pub return_type: Option<Type>,
    pub body: Vec<Statement>,
    /// Built-ins have an empty body and are provided by the target runtime.
    pub builtin: bool,
}

impl Function {
    /// Built-in overload with parameters named `a0`, `a1`, ...
    pub fn builtin(name: &str, params: &[Type], return_type: Type) -> Self {
        Self {
            name: name.to_string(),
            params: params
                .iter()
                .enumerate()
                .map(|(i, ty)| (format!("a{}", i), Value::placeholder(*ty)))
                .collect(),
            return_type: Some(return_type),
            body: Vec::new(),
            builtin: true,
        }
    }

    pub fn param_types(&self) -> impl Iterator<Item = Type> + '_ {
        self.params.values().map(|value| value.ty)
    }

    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature {
            name: self.name.clone(),
            params: self.param_types().collect(),
        }
    }
}

/// The transformed program.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    /// Root scope as it stood after the last top-level statement.
    pub scope: Scope<'static>,
    /// Overloads by function name: built-ins first, then user functions in
    /// source order.
    pub functions: IndexMap<String, Vec<Function>>,
    /// Top-level statements other than function definitions, in source order.
    pub globals: Vec<Statement>,
}

impl Program {
    /// Append an overload; existing overloads of the same name are kept.
    pub fn register(&mut self, function: Function) {
        self.functions
            .entry(function.name.clone())
            .or_default()
            .push(function);
    }

    pub fn overloads(&self, name: &str) -> &[Function] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// User-defined overloads in registration order.
    pub fn user_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions
            .values()
            .flatten()
            .filter(|function| !function.builtin)
    }
}

/// Output of a single transformation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Ir {
    Expr(Expr),
    Statement(Statement),
    Function(Function),
    Program(Program),
}

impl Ir {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Ir::Expr(_) => "expression",
            Ir::Statement(_) => "statement",
            Ir::Function(_) => "function definition",
            Ir::Program(_) => "program",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nlsl_ast::BinaryOperator;

    #[test]
    fn test_strictness() {
        assert!(OperationKind::DivVectorScalar.is_strict());
        assert!(OperationKind::SubVectorScalar.is_strict());
        assert!(!OperationKind::MulVectorScalar.is_strict());
        assert!(!OperationKind::AddScalarScalar.is_strict());
        assert!(!ConditionKind::EqualVectorVector.is_strict());
        assert!(OperatorKind::Condition(ConditionKind::LessVectorVector).is_strict());
    }

    #[test]
    fn test_result_type_from_signature() {
        let sig = Signature::new(BinaryOperator::Mul, Type::Vec4, Type::Float);
        assert_eq!(OperationKind::MulVectorScalar.result_type(&sig), Type::Vec4);

        let sig = Signature::new(BinaryOperator::Add, Type::Int, Type::Float);
        assert_eq!(OperationKind::AddScalarScalar.result_type(&sig), Type::Float);

        let sig = Signature::new(BinaryOperator::Add, Type::Int, Type::Int);
        assert_eq!(OperationKind::AddScalarScalar.result_type(&sig), Type::Int);

        let sig = Signature::new(BinaryOperator::Sub, Type::Vec2, Type::Vec2);
        assert_eq!(OperationKind::SubVectorVector.result_type(&sig), Type::Vec2);
    }

    #[test]
    fn test_builtin_params() {
        let f = Function::builtin("vec3", &[Type::Vec2, Type::Float], Type::Vec3);
        assert!(f.builtin);
        assert!(f.body.is_empty());
        assert_eq!(f.params.keys().collect::<Vec<_>>(), vec!["a0", "a1"]);
        assert_eq!(f.signature().to_string(), "vec3(vec2, float)");
    }

    #[test]
    fn test_register_appends_overloads() {
        let mut program = Program::default();
        program.register(Function::builtin("sin", &[Type::Float], Type::Float));
        program.register(Function::builtin("sin", &[Type::Int], Type::Float));
        assert_eq!(program.overloads("sin").len(), 2);
        assert!(program.overloads("cos").is_empty());
        assert_eq!(program.user_functions().count(), 0);
    }

    #[test]
    fn test_condition_has_no_type() {
        let a = Expr::Value(Value::reference("a", Type::Float));
        let b = Expr::Value(Value::immediate(Literal::Float(1.0)));
        let cond = Expr::Condition(Condition {
            kind: ConditionKind::LessScalarScalar,
            left: Box::new(a),
            right: Box::new(b),
            signature: Signature::new(BinaryOperator::Lt, Type::Float, Type::Float),
        });
        assert_eq!(cond.ty(), None);
    }
}
