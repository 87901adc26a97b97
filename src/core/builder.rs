//! Builder for composing predicate trees.

use super::{Node, Operand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuilderCombine {
    Leaf,
    Conjunction,
    Disjunction,
}

/// Builder for composing predicates incrementally.
///
/// Clauses are kept exactly as added; no flattening or simplification is
/// applied. Run the result through [`convert`](crate::convert) to normalise it.
#[derive(Debug)]
pub struct NodeBuilder {
    combine: BuilderCombine,
    clauses: Vec<Node>,
}

impl NodeBuilder {
    const fn new(combine: BuilderCombine) -> Self {
        Self {
            combine,
            clauses: Vec::new(),
        }
    }

    /// Creates a builder that expects a single clause.
    #[must_use]
    pub fn leaf() -> Self {
        Self::new(BuilderCombine::Leaf)
    }

    /// Creates a builder that emits an `and` of all clauses.
    #[must_use]
    pub fn and() -> Self {
        Self::new(BuilderCombine::Conjunction)
    }

    /// Creates a builder that emits an `or` of all clauses.
    #[must_use]
    pub fn or() -> Self {
        Self::new(BuilderCombine::Disjunction)
    }

    /// Adds an existing node to the builder.
    #[must_use]
    pub fn node(mut self, node: Node) -> Self {
        self.clauses.push(node);
        self
    }

    /// Adds an `eq` leaf.
    #[must_use]
    pub fn equals<L, R>(self, lhs: L, rhs: R) -> Self
    where
        L: Into<Operand>,
        R: Into<Operand>,
    {
        self.node(Node::eq(lhs, rhs))
    }

    /// Adds a `ne` leaf.
    #[must_use]
    pub fn not_equals<L, R>(self, lhs: L, rhs: R) -> Self
    where
        L: Into<Operand>,
        R: Into<Operand>,
    {
        self.node(Node::ne(lhs, rhs))
    }

    /// Adds an `exists` leaf.
    #[must_use]
    pub fn exists<O>(self, operand: O) -> Self
    where
        O: Into<Operand>,
    {
        self.node(Node::exists(operand))
    }

    /// Adds an `absent` leaf.
    #[must_use]
    pub fn absent<O>(self, operand: O) -> Self
    where
        O: Into<Operand>,
    {
        self.node(Node::absent(operand))
    }

    fn branch<F>(self, combine: BuilderCombine, build: F) -> Self
    where
        F: FnOnce(NodeBuilder) -> NodeBuilder,
    {
        let node = build(NodeBuilder::new(combine)).build();
        self.node(node)
    }

    /// Adds a nested conjunction built by the supplied closure.
    #[must_use]
    pub fn and_group<F>(self, build: F) -> Self
    where
        F: FnOnce(NodeBuilder) -> NodeBuilder,
    {
        self.branch(BuilderCombine::Conjunction, build)
    }

    /// Adds a nested disjunction built by the supplied closure.
    #[must_use]
    pub fn or_group<F>(self, build: F) -> Self
    where
        F: FnOnce(NodeBuilder) -> NodeBuilder,
    {
        self.branch(BuilderCombine::Disjunction, build)
    }

    /// Adds the negation of a conjunction built by the supplied closure.
    #[must_use]
    pub fn not_group<F>(self, build: F) -> Self
    where
        F: FnOnce(NodeBuilder) -> NodeBuilder,
    {
        let inner = build(NodeBuilder::and()).build();
        self.node(Node::not(inner))
    }

    /// Consumes the builder and returns the composed node.
    ///
    /// # Panics
    ///
    /// Panics if no clauses were added, or if a leaf builder holds more than
    /// one clause.
    #[must_use]
    pub fn build(mut self) -> Node {
        assert!(
            !self.clauses.is_empty(),
            "NodeBuilder requires at least one clause"
        );
        match self.combine {
            BuilderCombine::Leaf => {
                assert!(
                    self.clauses.len() == 1,
                    "NodeBuilder::leaf must contain exactly one clause"
                );
                self.clauses.pop().expect("length checked for leaf builder")
            }
            _ if self.clauses.len() == 1 => self.clauses.pop().expect("length checked"),
            BuilderCombine::Conjunction => Node::and(self.clauses),
            BuilderCombine::Disjunction => Node::or(self.clauses),
        }
    }
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::leaf()
    }
}
