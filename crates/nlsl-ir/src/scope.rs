//! Lexical scopes.
//!
//! A [`Scope`] owns the variables declared directly in it and borrows its
//! parent. Lookups walk outward to the root; declarations only ever touch the
//! scope they are made on. Child scopes are created with [`Scope::branch`] at
//! function entry and for every control-flow body, and are dropped once that
//! body has been transformed, so declarations never leak into siblings or
//! enclosing blocks.
//!
//! The borrow of the parent means an enclosing scope cannot be modified while
//! a branch of it is alive, which matches the transformation order: a block is
//! finished before its enclosing block continues.

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::Type;

/// Variables provided by the execution environment to every program.
pub const ENVIRONMENT: &[(&str, Type)] = &[
    ("nl_FragColor", Type::Vec4),
    ("nl_FragCoord", Type::Vec3),
    ("iResolution", Type::Vec3),
    ("iFragCount", Type::Int),
    ("iFragCoord", Type::Vec3),
    ("iGlobalTime", Type::Int),
    ("iFragID", Type::Int),
    ("PI", Type::Float),
];

/// Chained mapping from variable name to declared type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scope<'p> {
    bindings: IndexMap<String, Type>,
    #[serde(skip)]
    parent: Option<&'p Scope<'p>>,
}

impl Scope<'static> {
    /// An empty root scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// A root scope seeded with the [`ENVIRONMENT`] variables.
    pub fn environment() -> Self {
        let mut scope = Self::root();
        for (name, ty) in ENVIRONMENT {
            scope.declare(name, *ty);
        }
        scope
    }
}

impl<'p> Scope<'p> {
    /// Type of `name`, searching this scope first and then each ancestor.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        match self.bindings.get(name) {
            Some(ty) => Some(*ty),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Declare `name` in this scope, returning the type it previously had
    /// *in this scope* if it was already declared here.
    ///
    /// Ancestors are never modified; a declaration of a name that exists in
    /// an ancestor shadows it for this scope and its descendants.
    pub fn declare(&mut self, name: &str, ty: Type) -> Option<Type> {
        self.bindings.insert(name.to_string(), ty)
    }

    /// New empty scope whose parent is `self`.
    pub fn branch(&self) -> Scope<'_> {
        Scope {
            bindings: IndexMap::new(),
            parent: Some(self),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of ancestors between this scope and the root.
    pub fn depth(&self) -> usize {
        self.parent.map_or(0, |parent| parent.depth() + 1)
    }

    /// Variables declared directly in this scope, in declaration order.
    pub fn local_bindings(&self) -> impl Iterator<Item = (&str, Type)> {
        self.bindings.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Detached copy of every visible binding, outermost first, with inner
    /// declarations overriding outer ones.
    pub fn snapshot(&self) -> Scope<'static> {
        let mut bindings = match self.parent {
            Some(parent) => parent.snapshot().bindings,
            None => IndexMap::new(),
        };
        for (name, ty) in &self.bindings {
            bindings.insert(name.clone(), *ty);
        }
        Scope {
            bindings,
            parent: None,
        }
    }
}
