// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! NLSL front end: type checking and lowering to IR.
//!
//! Takes the syntax tree from `nlsl-ast` and produces a fully typed,
//! statically resolved [`Program`] that code generators consume.
//!
//! ```text
//! nlsl-ast   (syntax tree, from an external parser)
//!     ↓
//! nlsl-ir    scope tracking, operator/overload/swizzle resolution
//!     ↓
//! Program    functions (built-in + user) and globals, ready for a generator
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use nlsl_ast::Node;
//!
//! let tree = Node::from_json(&source)?;
//! let program = nlsl_ir::transform(&tree)?;
//! for function in program.user_functions() {
//!     println!("{}", function.signature());
//! }
//! ```

pub mod error;
pub mod nodes;
pub mod scope;
pub mod signature;
pub mod tables;
pub mod transform;
pub mod types;

pub use error::{Result, TransformError, TransformErrorKind};
pub use nodes::*;
pub use scope::{ENVIRONMENT, Scope};
pub use signature::{FunctionSignature, Signature};
pub use tables::Tables;
pub use transform::{Transformer, transform};
pub use types::{Literal, Type};
