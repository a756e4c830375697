//! Operator and function signatures.
//!
//! Operators are dispatched on a [`Signature`]: the operator plus the two
//! operand types in the order they are matched. Its display form,
//! `"<op> <left> <right>"`, is what diagnostics and generators see.

use nlsl_ast::BinaryOperator;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::types::Type;

/// Lookup key of the operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub op: BinaryOperator,
    pub left: Type,
    pub right: Type,
}

impl Signature {
    pub fn new(op: BinaryOperator, left: Type, right: Type) -> Self {
        Self { op, left, right }
    }

    /// The non-strict lookup key: operand type names sorted lexically, then
    /// reversed.
    ///
    /// `float * vec4` becomes `* vec4 float`, `float + int` becomes
    /// `+ int float`. Applying it twice gives the same key.
    pub fn fallback(self) -> Self {
        let (left, right) = if self.left.name() >= self.right.name() {
            (self.left, self.right)
        } else {
            (self.right, self.left)
        };
        Self {
            op: self.op,
            left,
            right,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.op, self.left, self.right)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Name and ordered parameter types of a function overload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Type>,
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|ty| ty.name()).collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}
