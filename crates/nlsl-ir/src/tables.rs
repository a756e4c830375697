//! Operator, swizzle and built-in function tables.
//!
//! The tables are read-only data built once on first access and shared by
//! reference with every transformation. They never change after construction.
//!
//! # Operator table
//!
//! Keyed by [`Signature`]. Only the operand orders that make sense are
//! registered: `vec3 / float` exists, `float / vec3` does not. Operators whose
//! kind is not strict are additionally matched in the swapped order through
//! [`Signature::fallback`], so `float * vec3` finds `* vec3 float` without a
//! separate entry.
//!
//! # Swizzle table
//!
//! Keyed by component name; each entry gives the resulting type and the vector
//! sizes the component is legal on.
//!
//! # Built-in functions
//!
//! Vector constructors and `sin`/`cos`, seeded into every program before user
//! functions.

use indexmap::IndexMap;
use nlsl_ast::BinaryOperator;
use std::sync::OnceLock;

use crate::nodes::{ConditionKind, Function, OperationKind, OperatorKind};
use crate::signature::Signature;
use crate::types::Type;

const VECTORS: [Type; 3] = [Type::Vec2, Type::Vec3, Type::Vec4];

/// Scalar operand pairs. Mixed pairs are registered in fallback order only.
const SCALAR_PAIRS: [(Type, Type); 3] = [
    (Type::Int, Type::Int),
    (Type::Float, Type::Float),
    (Type::Int, Type::Float),
];

/// Result of a swizzle and where it is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swizzle {
    pub result: Type,
    pub sizes: &'static [u8],
}

impl Swizzle {
    /// Whether this component may be taken from a value of type `ty`.
    pub fn accepts(&self, ty: Type) -> bool {
        ty.vector_size()
            .is_some_and(|size| self.sizes.contains(&size))
    }
}

/// All static lookup tables used during transformation.
pub struct Tables {
    operators: IndexMap<Signature, OperatorKind>,
    swizzles: IndexMap<&'static str, Swizzle>,
    builtins: Vec<Function>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

impl Tables {
    /// Get or initialize the shared tables.
    pub fn global() -> &'static Tables {
        TABLES.get_or_init(Self::initialize)
    }

    fn initialize() -> Self {
        let mut tables = Self {
            operators: IndexMap::new(),
            swizzles: IndexMap::new(),
            builtins: Vec::new(),
        };
        tables.register_operators();
        tables.register_swizzles();
        tables.register_builtins();
        tables
    }

    /// # Panics
    ///
    /// Panics if the signature is already registered.
    fn register_operator(&mut self, signature: Signature, kind: OperatorKind) {
        if self.operators.insert(signature, kind).is_some() {
            panic!("Duplicate operator registration: {}", signature);
        }
    }

    fn register_operators(&mut self) {
        use BinaryOperator::*;

        let arithmetic = [
            (
                Add,
                OperationKind::AddVectorVector,
                OperationKind::AddVectorScalar,
                OperationKind::AddScalarScalar,
            ),
            (
                Sub,
                OperationKind::SubVectorVector,
                OperationKind::SubVectorScalar,
                OperationKind::SubScalarScalar,
            ),
            (
                Mul,
                OperationKind::MulVectorVector,
                OperationKind::MulVectorScalar,
                OperationKind::MulScalarScalar,
            ),
            (
                Div,
                OperationKind::DivVectorVector,
                OperationKind::DivVectorScalar,
                OperationKind::DivScalarScalar,
            ),
        ];

        for (op, vector_vector, vector_scalar, scalar_scalar) in arithmetic {
            for vector in VECTORS {
                self.register_operator(
                    Signature::new(op, vector, vector),
                    OperatorKind::Operation(vector_vector),
                );
                self.register_operator(
                    Signature::new(op, vector, Type::Float),
                    OperatorKind::Operation(vector_scalar),
                );
            }
            for (left, right) in SCALAR_PAIRS {
                self.register_operator(
                    Signature::new(op, left, right),
                    OperatorKind::Operation(scalar_scalar),
                );
            }
        }

        let comparisons = [
            (
                Eq,
                ConditionKind::EqualScalarScalar,
                ConditionKind::EqualVectorVector,
            ),
            (
                Lt,
                ConditionKind::LessScalarScalar,
                ConditionKind::LessVectorVector,
            ),
            (
                Gt,
                ConditionKind::GreaterScalarScalar,
                ConditionKind::GreaterVectorVector,
            ),
        ];

        for (op, scalar_scalar, vector_vector) in comparisons {
            for (left, right) in SCALAR_PAIRS {
                self.register_operator(
                    Signature::new(op, left, right),
                    OperatorKind::Condition(scalar_scalar),
                );
            }
            for vector in VECTORS {
                self.register_operator(
                    Signature::new(op, vector, vector),
                    OperatorKind::Condition(vector_vector),
                );
            }
        }
    }

    fn register_swizzles(&mut self) {
        let entries: [(&'static str, Type, &'static [u8]); 6] = [
            ("x", Type::Float, &[2, 3, 4]),
            ("y", Type::Float, &[2, 3, 4]),
            ("z", Type::Float, &[3, 4]),
            ("w", Type::Float, &[4]),
            ("xy", Type::Vec2, &[2, 3, 4]),
            ("xyz", Type::Vec3, &[4]),
        ];
        for (component, result, sizes) in entries {
            self.swizzles.insert(component, Swizzle { result, sizes });
        }
    }

    fn register_builtins(&mut self) {
        use Type::*;

        let entries: [(&str, &[Type], Type); 10] = [
            ("vec2", &[Float, Float], Vec2),
            ("vec3", &[Float, Float, Float], Vec3),
            ("vec3", &[Vec2, Float], Vec3),
            ("vec4", &[Float, Float, Float, Float], Vec4),
            ("vec4", &[Vec3, Float], Vec4),
            ("vec4", &[Vec2, Float, Float], Vec4),
            ("sin", &[Float], Float),
            ("sin", &[Int], Float),
            ("cos", &[Float], Float),
            ("cos", &[Int], Float),
        ];
        self.builtins = entries
            .iter()
            .map(|(name, params, ret)| Function::builtin(name, params, *ret))
            .collect();
    }

    /// Exact lookup in the operator table. No fallback is attempted here.
    pub fn operator(&self, signature: &Signature) -> Option<OperatorKind> {
        self.operators.get(signature).copied()
    }

    pub fn swizzle(&self, component: &str) -> Option<&Swizzle> {
        self.swizzles.get(component)
    }

    /// Built-in overloads in registration order.
    pub fn builtins(&self) -> &[Function] {
        &self.builtins
    }

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(op: BinaryOperator, left: Type, right: Type) -> Signature {
        Signature::new(op, left, right)
    }

    #[test]
    fn test_vector_scalar_registered_one_way() {
        let tables = Tables::global();
        assert_eq!(
            tables.operator(&sig(BinaryOperator::Div, Type::Vec3, Type::Float)),
            Some(OperatorKind::Operation(OperationKind::DivVectorScalar))
        );
        assert_eq!(
            tables.operator(&sig(BinaryOperator::Div, Type::Float, Type::Vec3)),
            None
        );
        assert_eq!(
            tables.operator(&sig(BinaryOperator::Mul, Type::Float, Type::Vec3)),
            None
        );
    }

    #[test]
    fn test_mixed_scalars_in_fallback_order() {
        let tables = Tables::global();
        assert!(tables
            .operator(&sig(BinaryOperator::Add, Type::Int, Type::Float))
            .is_some());
        assert!(tables
            .operator(&sig(BinaryOperator::Add, Type::Float, Type::Int))
            .is_none());
        assert_eq!(
            tables.operator(&sig(BinaryOperator::Lt, Type::Int, Type::Float)),
            Some(OperatorKind::Condition(ConditionKind::LessScalarScalar))
        );
    }

    #[test]
    fn test_every_mixed_key_is_its_own_fallback() {
        let tables = Tables::global();
        for (signature, _) in &tables.operators {
            if signature.left != signature.right {
                assert_eq!(signature.fallback(), *signature, "{}", signature);
            }
        }
    }

    #[test]
    fn test_no_vector_int_operators() {
        let tables = Tables::global();
        for vector in VECTORS {
            assert!(tables
                .operator(&sig(BinaryOperator::Mul, vector, Type::Int))
                .is_none());
        }
    }

    #[test]
    fn test_operator_count() {
        // 4 arithmetic ops * (3 vec-vec + 3 vec-float + 3 scalar pairs)
        // + 3 comparisons * (3 scalar pairs + 3 vec-vec)
        assert_eq!(Tables::global().operator_count(), 36 + 18);
    }

    #[test]
    fn test_swizzle_sizes() {
        let tables = Tables::global();
        let w = tables.swizzle("w").unwrap();
        assert!(w.accepts(Type::Vec4));
        assert!(!w.accepts(Type::Vec3));

        let xy = tables.swizzle("xy").unwrap();
        assert_eq!(xy.result, Type::Vec2);
        for vector in VECTORS {
            assert!(xy.accepts(vector));
        }
        assert!(!xy.accepts(Type::Float));

        let xyz = tables.swizzle("xyz").unwrap();
        assert!(xyz.accepts(Type::Vec4));
        assert!(!xyz.accepts(Type::Vec3));

        assert!(tables.swizzle("rgb").is_none());
    }

    #[test]
    fn test_builtin_order() {
        let names: Vec<String> = Tables::global()
            .builtins()
            .iter()
            .map(|f| f.signature().to_string())
            .collect();
        assert_eq!(names[0], "vec2(float, float)");
        assert_eq!(names[1], "vec3(float, float, float)");
        assert_eq!(names[2], "vec3(vec2, float)");
        assert_eq!(names.last().unwrap(), "cos(int)");
    }
}
