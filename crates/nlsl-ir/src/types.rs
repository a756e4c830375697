//! Value types known to the front end.
//!
//! The language has two scalar kinds and three vector widths. Matrices are
//! not represented. The "no type" marker of the syntax tree ([`TypeName::Void`])
//! has no counterpart here, so anything holding a [`Type`] is fully resolved.

use nlsl_ast::TypeName;
use serde::Serialize;
use std::fmt;

/// Resolved value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl Type {
    /// Canonical name, also the spelling used in signatures.
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Vec2 => "vec2",
            Type::Vec3 => "vec3",
            Type::Vec4 => "vec4",
        }
    }

    /// Component count for vectors, `None` for scalars.
    pub fn vector_size(self) -> Option<u8> {
        match self {
            Type::Int | Type::Float => None,
            Type::Vec2 => Some(2),
            Type::Vec3 => Some(3),
            Type::Vec4 => Some(4),
        }
    }

    pub fn is_scalar(self) -> bool {
        self.vector_size().is_none()
    }

    pub fn is_vector(self) -> bool {
        self.vector_size().is_some()
    }

    /// Resolve a source type name. Returns `None` for `void`.
    pub fn from_name(name: TypeName) -> Option<Type> {
        match name {
            TypeName::Int => Some(Type::Int),
            TypeName::Float => Some(Type::Float),
            TypeName::Vec2 => Some(Type::Vec2),
            TypeName::Vec3 => Some(Type::Vec3),
            TypeName::Vec4 => Some(Type::Vec4),
            TypeName::Void => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display helper for function return types, where `None` is `void`.
pub fn return_type_name(ty: Option<Type>) -> &'static str {
    ty.map_or("void", Type::name)
}

/// Display helper for expression types, where `None` means the expression
/// produces no value (a comparison).
pub fn value_type_name(ty: Option<Type>) -> &'static str {
    ty.map_or("none", Type::name)
}

/// Immediate scalar constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
}

impl Literal {
    pub fn ty(self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_sizes() {
        assert_eq!(Type::Int.vector_size(), None);
        assert_eq!(Type::Float.vector_size(), None);
        assert_eq!(Type::Vec2.vector_size(), Some(2));
        assert_eq!(Type::Vec4.vector_size(), Some(4));
        assert!(Type::Float.is_scalar());
        assert!(Type::Vec3.is_vector());
    }

    #[test]
    fn test_void_has_no_type() {
        assert_eq!(Type::from_name(TypeName::Void), None);
        assert_eq!(Type::from_name(TypeName::Vec3), Some(Type::Vec3));
        assert_eq!(return_type_name(None), "void");
        assert_eq!(value_type_name(None), "none");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Int(1).to_string(), "1");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Float(0.25).ty(), Type::Float);
    }
}
