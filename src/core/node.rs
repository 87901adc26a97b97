use std::{
    fmt,
    fmt::Write as _,
    mem,
    sync::{Arc, OnceLock},
};

use super::{Lookup, NodeVisitor, OpCode, Operand};
use crate::{error::NodeError, logging::dnf_log};

/// Shapes a predicate node can take; leaf and junction variants coexist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Always-true constant.
    True,
    /// Always-false constant.
    False,
    /// Conjunction over one or more children.
    And(Vec<Node>),
    /// Disjunction over one or more children.
    Or(Vec<Node>),
    /// Logical negation of a single child.
    Not(Node),
    /// Operand has a value.
    Exists(Operand),
    /// Operand has no value.
    Absent(Operand),
    /// Operands are equal.
    Eq {
        /// Left operand.
        lhs: Operand,
        /// Right operand.
        rhs: Operand,
    },
    /// Operands differ.
    Ne {
        /// Left operand.
        lhs: Operand,
        /// Right operand.
        rhs: Operand,
    },
}

impl NodeKind {
    /// Operation code of this shape.
    #[must_use]
    pub fn op(&self) -> OpCode {
        match self {
            NodeKind::True => OpCode::AlwaysTrue,
            NodeKind::False => OpCode::AlwaysFalse,
            NodeKind::And(_) => OpCode::And,
            NodeKind::Or(_) => OpCode::Or,
            NodeKind::Not(_) => OpCode::Not,
            NodeKind::Exists(_) => OpCode::Exists,
            NodeKind::Absent(_) => OpCode::Absent,
            NodeKind::Eq { .. } => OpCode::Eq,
            NodeKind::Ne { .. } => OpCode::Ne,
        }
    }
}

/// Arguments accepted by [`Node::make`].
#[derive(Clone, Debug, PartialEq)]
pub enum NodeArgs {
    /// No payload, for the constants.
    None,
    /// Child list, for junctions.
    Children(Vec<Node>),
    /// Single operand, for `exists` and `absent`.
    Unary(Operand),
    /// Operand pair, for `eq` and `ne`.
    Binary(Operand, Operand),
}

/// Immutable predicate node behind a shared handle.
///
/// Cloning is cheap and never copies the subtree. Equality is structural;
/// use [`Node::ptr_eq`] to compare handles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    kind: Arc<NodeKind>,
}

impl Node {
    /// Wraps a shape in a fresh handle.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is an `and` or `or` without children.
    #[must_use]
    pub fn from_kind(kind: NodeKind) -> Self {
        if let NodeKind::And(children) | NodeKind::Or(children) = &kind {
            assert!(
                !children.is_empty(),
                "Node::{} requires at least one child",
                kind.op()
            );
        }
        Self {
            kind: Arc::new(kind),
        }
    }

    /// Returns the underlying shape.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Operation code, fixed at construction.
    #[must_use]
    pub fn op(&self) -> OpCode {
        self.kind.op()
    }

    /// Returns true when both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind)
    }

    /// Always-true constant.
    #[must_use]
    pub fn always_true() -> Self {
        Self::from_kind(NodeKind::True)
    }

    /// Always-false constant.
    #[must_use]
    pub fn always_false() -> Self {
        Self::from_kind(NodeKind::False)
    }

    /// Conjunction of `children`, kept as given.
    ///
    /// # Panics
    ///
    /// Panics if no children are provided.
    #[must_use]
    pub fn and<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Self::from_kind(NodeKind::And(children.into_iter().collect()))
    }

    /// Disjunction of `children`, kept as given.
    ///
    /// # Panics
    ///
    /// Panics if no children are provided.
    #[must_use]
    pub fn or<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        Self::from_kind(NodeKind::Or(children.into_iter().collect()))
    }

    /// Negation of `child`.
    #[must_use]
    pub fn not(child: Node) -> Self {
        Self::from_kind(NodeKind::Not(child))
    }

    /// Existence check on `operand`.
    #[must_use]
    pub fn exists<O>(operand: O) -> Self
    where
        O: Into<Operand>,
    {
        Self::from_kind(NodeKind::Exists(operand.into()))
    }

    /// Absence check on `operand`.
    #[must_use]
    pub fn absent<O>(operand: O) -> Self
    where
        O: Into<Operand>,
    {
        Self::from_kind(NodeKind::Absent(operand.into()))
    }

    /// Equality between two operands.
    #[must_use]
    pub fn eq<L, R>(lhs: L, rhs: R) -> Self
    where
        L: Into<Operand>,
        R: Into<Operand>,
    {
        Self::from_kind(NodeKind::Eq {
            lhs: lhs.into(),
            rhs: rhs.into(),
        })
    }

    /// Inequality between two operands.
    #[must_use]
    pub fn ne<L, R>(lhs: L, rhs: R) -> Self
    where
        L: Into<Operand>,
        R: Into<Operand>,
    {
        Self::from_kind(NodeKind::Ne {
            lhs: lhs.into(),
            rhs: rhs.into(),
        })
    }

    /// Builds the node shape matching `op` from `args`.
    pub fn make(op: OpCode, args: NodeArgs) -> Result<Self, NodeError> {
        if op.is_reserved() {
            return Err(NodeError::Unsupported { op });
        }
        let kind = match (op, args) {
            (OpCode::AlwaysTrue, NodeArgs::None) => NodeKind::True,
            (OpCode::AlwaysFalse, NodeArgs::None) => NodeKind::False,
            (OpCode::And | OpCode::Or, NodeArgs::Children(children)) if children.is_empty() => {
                return Err(NodeError::EmptyJunction { op });
            }
            (OpCode::And, NodeArgs::Children(children)) => NodeKind::And(children),
            (OpCode::Or, NodeArgs::Children(children)) => NodeKind::Or(children),
            (OpCode::Not, NodeArgs::Children(mut children)) => {
                if children.len() != 1 {
                    return Err(NodeError::NotArity {
                        got: children.len(),
                    });
                }
                NodeKind::Not(children.remove(0))
            }
            (OpCode::Exists, NodeArgs::Unary(operand)) => NodeKind::Exists(operand),
            (OpCode::Absent, NodeArgs::Unary(operand)) => NodeKind::Absent(operand),
            (OpCode::Eq, NodeArgs::Binary(lhs, rhs)) => NodeKind::Eq { lhs, rhs },
            (OpCode::Ne, NodeArgs::Binary(lhs, rhs)) => NodeKind::Ne { lhs, rhs },
            (op, _) => {
                return Err(NodeError::ArgumentMismatch {
                    op,
                    expected: expected_args(op),
                });
            }
        };
        Ok(Self::from_kind(kind))
    }

    /// Direct children of a junction; empty for leaves and constants.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self.kind() {
            NodeKind::And(children) | NodeKind::Or(children) => children,
            NodeKind::Not(child) => std::slice::from_ref(child),
            _ => &[],
        }
    }

    /// Returns true for constants and comparison leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !self.op().is_junction()
    }

    /// Returns true for `always_true` and `always_false`.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self.kind(), NodeKind::True | NodeKind::False)
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// Walks with an explicit stack, so arbitrarily deep trees are safe.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children().iter().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Returns true when the tree is in disjunctive normal form.
    ///
    /// Accepted shapes: a constant, a single non-junction leaf, an `and` of
    /// leaves, or an `or` whose children are leaves or `and`s of leaves.
    /// Constants only appear on their own and `not` never appears.
    #[must_use]
    pub fn is_dnf(&self) -> bool {
        fn is_atom(node: &Node) -> bool {
            node.is_leaf() && !node.is_constant()
        }
        fn is_term(node: &Node) -> bool {
            match node.kind() {
                NodeKind::And(children) => children.len() > 1 && children.iter().all(is_atom),
                _ => is_atom(node),
            }
        }
        match self.kind() {
            NodeKind::True | NodeKind::False => true,
            NodeKind::Or(children) => children.len() > 1 && children.iter().all(is_term),
            _ => is_term(self),
        }
    }

    /// Evaluates the node against `lookup`.
    ///
    /// Only the constants are evaluated; every other shape yields `false`.
    /// Junction and comparison semantics are not defined yet, use a
    /// [`NodeVisitor`] to supply them.
    pub fn eval<L>(&self, _lookup: &L) -> bool
    where
        L: Lookup + ?Sized,
    {
        match self.kind() {
            NodeKind::True => true,
            NodeKind::False => false,
            other => {
                dnf_log!(log::Level::Trace, "eval_unsupported", "op={}", other.op());
                false
            }
        }
    }

    /// Accepts a visitor that walks the tree bottom-up.
    pub fn accept<V>(&self, visitor: &mut V) -> Result<V::Value, V::Error>
    where
        V: NodeVisitor + ?Sized,
    {
        visitor.visit_node(self)
    }

    /// Appends a debug rendering of the tree to `out`.
    pub fn render(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = write!(out, "{self}");
    }
}

fn expected_args(op: OpCode) -> &'static str {
    match op {
        OpCode::AlwaysTrue | OpCode::AlwaysFalse => "no arguments",
        OpCode::And | OpCode::Or => "a child list",
        OpCode::Not => "a single child",
        OpCode::Exists | OpCode::Absent => "one operand",
        _ => "two operands",
    }
}

/// Shared stand-in left behind when a `not` child is detached during drop.
fn detached() -> Node {
    static DETACHED: OnceLock<Node> = OnceLock::new();
    DETACHED.get_or_init(Node::always_true).clone()
}

/// Moves the children of a uniquely owned node into `pending`.
fn detach_children(kind: &mut Arc<NodeKind>, pending: &mut Vec<Node>) {
    let Some(kind) = Arc::get_mut(kind) else {
        return;
    };
    match kind {
        NodeKind::And(children) | NodeKind::Or(children) => pending.append(children),
        NodeKind::Not(child) => pending.push(mem::replace(child, detached())),
        _ => {}
    }
}

impl Drop for Node {
    // Releases the subtree with an explicit stack so deep trees drop safely.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node.kind, &mut pending);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        let op = self.op();
        match self.kind() {
            NodeKind::True | NodeKind::False => write!(f, "{op}"),
            NodeKind::And(children) | NodeKind::Or(children) => {
                write!(f, "{op}(")?;
                list(f, children)?;
                f.write_str(")")
            }
            NodeKind::Not(child) => write!(f, "{op}({child})"),
            NodeKind::Exists(operand) | NodeKind::Absent(operand) => write!(f, "{op}({operand})"),
            NodeKind::Eq { lhs, rhs } | NodeKind::Ne { lhs, rhs } => {
                write!(f, "{op}({lhs}, {rhs})")
            }
        }
    }
}
