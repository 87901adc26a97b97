use thiserror::Error;

use crate::core::OpCode;

/// Contract violations reported by [`Node::make`](crate::Node::make).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The operation code is reserved and has no node shape.
    #[error("Operation {op} has no node shape")]
    Unsupported {
        /// Offending operation.
        op: OpCode,
    },
    /// The supplied arguments do not match the operation's shape.
    #[error("Invalid arguments for {op}: expected {expected}")]
    ArgumentMismatch {
        /// Operation being built.
        op: OpCode,
        /// Shape the operation requires.
        expected: &'static str,
    },
    /// A junction was given no children.
    #[error("Junction {op} requires at least one child")]
    EmptyJunction {
        /// Junction being built.
        op: OpCode,
    },
    /// A negation was given anything other than exactly one child.
    #[error("Invalid arity for not: expected 1 child, got {got}")]
    NotArity {
        /// Number of children supplied.
        got: usize,
    },
}

/// Errors reported by the guarded [`Converter`](crate::Converter).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The input tree is deeper than the configured limit.
    #[error("Predicate depth {depth} exceeds the limit of {limit}")]
    DepthExceeded {
        /// Depth of the rejected tree.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },
}
