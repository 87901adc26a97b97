#![deny(missing_docs)]
//! Predicate AST with a disjunctive normal form rewrite engine.
//!
//! Filter expressions are immutable trees of [`Node`]s: constants, `and` /
//! `or` / `not` junctions, and `exists` / `absent` / `eq` / `ne` leaves over
//! field references or literal values. [`convert`] rewrites any tree into an
//! equivalent one where negations sit on the leaves and the top level is an
//! `or` of `and`s of leaves.
//!
//! Subtrees are shared through reference-counted handles, so rewriting never
//! copies or mutates the input.

mod core;
mod dnf;
mod error;
mod logging;
mod option;

pub use crate::core::{
    FieldRef, Lookup, Node, NodeArgs, NodeBuilder, NodeKind, NodeVisitor, OpCode, Operand, Scalar,
    Value,
};
pub use dnf::{convert, try_convert, Converter};
pub use error::{ConvertError, NodeError};
pub use option::{ConvertOption, DEFAULT_MAX_DEPTH};
