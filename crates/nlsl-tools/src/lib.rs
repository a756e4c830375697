// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! NLSL tools
//!
//! Shared pieces of the command line driver: logging setup, loading syntax
//! trees from disk and rendering transformed programs.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nlsl_ast::Node;
use nlsl_ir::types::return_type_name;
use nlsl_ir::{Program, Statement};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(test)]
mod tests;

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nlsl_ir=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Read a JSON syntax tree from `path`.
pub fn load_tree(path: &Path) -> Result<Node> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Node::from_json(&source)
        .with_context(|| format!("'{}' is not a valid syntax tree", path.display()))
}

/// Human readable overview of a program: user functions with their
/// signatures, then the globals.
pub fn summarize(program: &Program) -> String {
    let mut out = String::new();

    let builtins = program.functions.values().flatten().filter(|f| f.builtin).count();
    let _ = writeln!(out, "built-in overloads: {}", builtins);

    let _ = writeln!(out, "functions:");
    for function in program.user_functions() {
        let _ = writeln!(
            out,
            "  {} -> {} ({} statements)",
            function.signature(),
            return_type_name(function.return_type),
            function.body.len()
        );
    }

    let _ = writeln!(out, "globals:");
    for statement in &program.globals {
        if let Statement::Assignment(assignment) = statement
            && let Some(ty) = assignment.declared_type
        {
            let _ = writeln!(out, "  {}: {}", assignment.name, ty);
        }
    }
    out
}

/// Program as pretty-printed JSON.
pub fn render_ir(program: &Program) -> Result<String> {
    serde_json::to_string_pretty(program).context("failed to serialize program")
}
