use super::{Node, NodeKind};

/// Visitor that walks predicate trees bottom-up and folds them into a value.
///
/// The crate does not define evaluation semantics for junctions or
/// comparisons; callers that need them implement this trait instead.
pub trait NodeVisitor {
    /// Error type used when the walk fails.
    type Error;
    /// Concrete value produced for each subtree.
    type Value;

    /// Evaluates a constant or comparison leaf.
    fn visit_leaf(&mut self, leaf: &Node) -> Result<Self::Value, Self::Error>;

    /// Combines the result of a negated child.
    fn combine_not(
        &mut self,
        original: &Node,
        child: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Combines the results of an `and` node's children.
    fn combine_and(
        &mut self,
        original: &Node,
        children: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    /// Combines the results of an `or` node's children.
    fn combine_or(
        &mut self,
        original: &Node,
        children: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    /// Visits the supplied node by walking its subtree.
    fn visit_node(&mut self, node: &Node) -> Result<Self::Value, Self::Error> {
        match node.kind() {
            NodeKind::Not(inner) => {
                let child = self.visit_node(inner)?;
                self.combine_not(node, child)
            }
            NodeKind::And(clauses) => {
                debug_assert!(!clauses.is_empty(), "and nodes carry at least one child");
                let mut children = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    children.push(self.visit_node(clause)?);
                }
                self.combine_and(node, children)
            }
            NodeKind::Or(clauses) => {
                debug_assert!(!clauses.is_empty(), "or nodes carry at least one child");
                let mut children = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    children.push(self.visit_node(clause)?);
                }
                self.combine_or(node, children)
            }
            _ => {
                debug_assert!(node.is_leaf(), "junctions handled earlier");
                self.visit_leaf(node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, convert::Infallible};

    use super::NodeVisitor;
    use crate::core::{Lookup, Node, NodeKind, Operand, Value};

    /// Evaluates `eq`/`ne`/`exists`/`absent` against a row.
    struct RowEvaluator<'a> {
        row: &'a HashMap<String, Value>,
    }

    impl NodeVisitor for RowEvaluator<'_> {
        type Error = Infallible;
        type Value = bool;

        fn visit_leaf(&mut self, leaf: &Node) -> Result<bool, Infallible> {
            let row: &dyn Lookup = self.row;
            Ok(match leaf.kind() {
                NodeKind::True => true,
                NodeKind::False => false,
                NodeKind::Exists(operand) => !operand.resolve(row).is_absent(),
                NodeKind::Absent(operand) => operand.resolve(row).is_absent(),
                NodeKind::Eq { lhs, rhs } => lhs.resolve(row) == rhs.resolve(row),
                NodeKind::Ne { lhs, rhs } => lhs.resolve(row) != rhs.resolve(row),
                other => unreachable!("not a leaf: {other:?}"),
            })
        }

        fn combine_not(&mut self, _: &Node, child: bool) -> Result<bool, Infallible> {
            Ok(!child)
        }

        fn combine_and(&mut self, _: &Node, children: Vec<bool>) -> Result<bool, Infallible> {
            Ok(children.into_iter().all(|value| value))
        }

        fn combine_or(&mut self, _: &Node, children: Vec<bool>) -> Result<bool, Infallible> {
            Ok(children.into_iter().any(|value| value))
        }
    }

    /// Counts leaves, failing on the first `always_false`.
    struct LeafCounter;

    impl NodeVisitor for LeafCounter {
        type Error = &'static str;
        type Value = usize;

        fn visit_leaf(&mut self, leaf: &Node) -> Result<usize, &'static str> {
            match leaf.kind() {
                NodeKind::False => Err("constant false"),
                _ => Ok(1),
            }
        }

        fn combine_not(&mut self, _: &Node, child: usize) -> Result<usize, &'static str> {
            Ok(child)
        }

        fn combine_and(&mut self, _: &Node, children: Vec<usize>) -> Result<usize, &'static str> {
            Ok(children.into_iter().sum())
        }

        fn combine_or(&mut self, _: &Node, children: Vec<usize>) -> Result<usize, &'static str> {
            Ok(children.into_iter().sum())
        }
    }

    #[test]
    fn visitor_supplies_evaluation_semantics() {
        let mut row = HashMap::new();
        row.insert("k".to_string(), Value::from("1"));
        row.insert("j".to_string(), Value::Int(3));

        let predicate = Node::and([
            Node::or([
                Node::eq(Operand::field("k"), Operand::literal("1")),
                Node::eq(Operand::field("k"), Operand::literal("2")),
            ]),
            Node::not(Node::absent(Operand::field("j"))),
            Node::ne(Operand::field("j"), Operand::literal(4i64)),
        ]);

        let mut evaluator = RowEvaluator { row: &row };
        assert_eq!(predicate.accept(&mut evaluator), Ok(true));

        let missing = Node::exists(Operand::field("nope"));
        assert_eq!(missing.accept(&mut evaluator), Ok(false));
    }

    #[test]
    fn visitor_errors_short_circuit() {
        let ok = Node::or([
            Node::exists(Operand::field("a")),
            Node::not(Node::and([Node::always_true(), Node::absent(Operand::field("b"))])),
        ]);
        assert_eq!(ok.accept(&mut LeafCounter), Ok(3));

        let failing = Node::and([Node::always_false(), Node::exists(Operand::field("a"))]);
        assert_eq!(failing.accept(&mut LeafCounter), Err("constant false"));
    }
}
