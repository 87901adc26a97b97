//! Disjunctive normal form conversion.
//!
//! [`convert`] rewrites a predicate tree into one of:
//!
//! - `always_true` / `always_false`,
//! - a single non-junction leaf,
//! - an `and` of leaves,
//! - an `or` whose children are leaves or `and`s of leaves.
//!
//! Three mutually recursive phases do the work: negation pushing, conjunction
//! handling (with distribution of `or` over `and`) and disjunction handling.
//! Existing nodes are never mutated; unchanged subtrees are shared with the
//! input. Child order is preserved left to right with flattened grandchildren
//! spliced in place of their parent. Equivalent terms are not deduplicated.

use crate::{
    core::{Node, NodeKind},
    error::ConvertError,
    logging::dnf_log,
    option::ConvertOption,
};

/// Rewrites `root` into an equivalent tree in disjunctive normal form.
///
/// Recursion depth follows the depth of `root`; use [`Converter`] to reject
/// trees above a depth limit first.
#[must_use]
pub fn convert(root: &Node) -> Node {
    dnf_log!(log::Level::Debug, "convert_start", "op={}", root.op());
    let converted = convert_node(root);
    dnf_log!(
        log::Level::Debug,
        "convert_done",
        "op={} terms={}",
        converted.op(),
        term_count(&converted)
    );
    converted
}

/// Converts `root` after checking it against `option`.
pub fn try_convert(root: &Node, option: &ConvertOption) -> Result<Node, ConvertError> {
    Converter::new(option.clone()).convert(root)
}

/// DNF converter that enforces a [`ConvertOption`] before rewriting.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    option: ConvertOption,
}

impl Converter {
    /// Creates a converter with the given configuration.
    #[must_use]
    pub fn new(option: ConvertOption) -> Self {
        Self { option }
    }

    /// Configuration in effect.
    #[must_use]
    pub fn option(&self) -> &ConvertOption {
        &self.option
    }

    /// Converts `root`, refusing trees deeper than the configured limit.
    pub fn convert(&self, root: &Node) -> Result<Node, ConvertError> {
        let depth = root.depth();
        let limit = self.option.max_depth;
        if depth > limit {
            dnf_log!(
                log::Level::Warn,
                "convert_rejected",
                "depth={} limit={}",
                depth,
                limit
            );
            return Err(ConvertError::DepthExceeded { depth, limit });
        }
        Ok(convert(root))
    }
}

/// Number of top-level terms: children of an `or`, otherwise one.
fn term_count(node: &Node) -> usize {
    match node.kind() {
        NodeKind::Or(children) => children.len(),
        _ => 1,
    }
}

fn convert_node(node: &Node) -> Node {
    match node.kind() {
        NodeKind::True
        | NodeKind::False
        | NodeKind::Exists(_)
        | NodeKind::Absent(_)
        | NodeKind::Eq { .. }
        | NodeKind::Ne { .. } => node.clone(),
        NodeKind::Not(child) => negate(child),
        NodeKind::And(children) => conjoin(children.iter().map(convert_node)),
        NodeKind::Or(children) => disjoin(children.iter().map(convert_node)),
    }
}

/// Converts `not(node)` by pushing the negation one level down.
fn negate(node: &Node) -> Node {
    match node.kind() {
        NodeKind::True => Node::always_false(),
        NodeKind::False => Node::always_true(),
        NodeKind::Not(inner) => convert_node(inner),
        NodeKind::And(children) => disjoin(children.iter().map(negate)),
        NodeKind::Or(children) => conjoin(children.iter().map(negate)),
        NodeKind::Exists(operand) => Node::absent(operand.clone()),
        NodeKind::Absent(operand) => Node::exists(operand.clone()),
        NodeKind::Eq { lhs, rhs } => Node::ne(lhs.clone(), rhs.clone()),
        NodeKind::Ne { lhs, rhs } => Node::eq(lhs.clone(), rhs.clone()),
    }
}

/// Builds the normal form of the conjunction of already-converted `items`.
fn conjoin<I>(items: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    let mut terms = Vec::new();
    let mut or_children = Vec::new();
    for item in items {
        match item.kind() {
            NodeKind::True => {}
            NodeKind::False => return Node::always_false(),
            NodeKind::And(children) => terms.extend(children.iter().cloned()),
            NodeKind::Or(_) => or_children.push(item),
            _ => terms.push(item),
        }
    }

    match (terms.len(), or_children.len()) {
        (0, 0) => Node::always_true(),
        (1, 0) => terms.pop().expect("length checked"),
        (0, 1) => or_children.pop().expect("length checked"),
        (_, 0) => Node::from_kind(NodeKind::And(terms)),
        _ => distribute(terms, &or_children),
    }
}

/// Distributes `and(terms, or_children...)` into an `or` of `and` terms.
///
/// Each `or` child multiplies the accumulated terms by its branches, so the
/// result holds the product of the branch counts.
fn distribute(terms: Vec<Node>, or_children: &[Node]) -> Node {
    let mut products: Vec<Vec<Node>> = vec![terms];
    for or_child in or_children {
        let branches = or_child.children();
        let mut next = Vec::with_capacity(products.len() * branches.len());
        for product in &products {
            for branch in branches {
                let mut merged = Vec::with_capacity(product.len() + 1);
                merged.extend(product.iter().cloned());
                match branch.kind() {
                    NodeKind::And(children) => merged.extend(children.iter().cloned()),
                    _ => merged.push(branch.clone()),
                }
                next.push(merged);
            }
        }
        products = next;
    }

    dnf_log!(log::Level::Trace, "distribute", "terms={}", products.len());

    let mut disjuncts: Vec<Node> = products
        .into_iter()
        .map(|mut product| {
            if product.len() == 1 {
                product.pop().expect("length checked")
            } else {
                Node::from_kind(NodeKind::And(product))
            }
        })
        .collect();

    if disjuncts.len() == 1 {
        disjuncts.pop().expect("length checked")
    } else {
        Node::from_kind(NodeKind::Or(disjuncts))
    }
}

/// Builds the normal form of the disjunction of already-converted `items`.
fn disjoin<I>(items: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    let mut acc = Vec::new();
    for item in items {
        match item.kind() {
            NodeKind::False => {}
            NodeKind::True => return Node::always_true(),
            NodeKind::Or(children) => acc.extend(children.iter().cloned()),
            _ => acc.push(item),
        }
    }

    match acc.len() {
        0 => Node::always_false(),
        1 => acc.pop().expect("length checked"),
        _ => Node::from_kind(NodeKind::Or(acc)),
    }
}

#[cfg(test)]
mod tests {
    use super::{convert, try_convert, Converter};
    use crate::{
        core::{Node, NodeKind, Operand},
        error::ConvertError,
        option::ConvertOption,
    };

    fn eq(field: &str, value: &str) -> Node {
        Node::eq(Operand::field(field), Operand::literal(value))
    }

    fn leaf(name: &str) -> Node {
        Node::exists(Operand::field(name))
    }

    #[test]
    fn leaves_and_constants_are_returned_unchanged() {
        for node in [
            Node::always_true(),
            Node::always_false(),
            eq("k", "1"),
            Node::ne(Operand::field("k"), Operand::literal("1")),
            leaf("a"),
            Node::absent(Operand::field("a")),
        ] {
            assert!(convert(&node).ptr_eq(&node));
        }
    }

    #[test]
    fn negation_inverts_leaves_and_constants() {
        assert_eq!(
            convert(&Node::not(eq("k", "1"))),
            Node::ne(Operand::field("k"), Operand::literal("1"))
        );
        assert_eq!(
            convert(&Node::not(Node::ne(Operand::field("k"), Operand::literal("1")))),
            eq("k", "1")
        );
        assert_eq!(
            convert(&Node::not(leaf("k"))),
            Node::absent(Operand::field("k"))
        );
        assert_eq!(
            convert(&Node::not(Node::absent(Operand::field("k")))),
            leaf("k")
        );
        assert_eq!(convert(&Node::not(Node::always_true())), Node::always_false());
        assert_eq!(convert(&Node::not(Node::always_false())), Node::always_true());
    }

    #[test]
    fn double_negation_cancels() {
        let inner = Node::and([leaf("a"), Node::and([leaf("b"), leaf("c")])]);
        assert_eq!(
            convert(&Node::not(Node::not(inner.clone()))),
            convert(&inner)
        );
        assert_eq!(convert(&Node::not(Node::not(leaf("a")))), leaf("a"));
    }

    #[test]
    fn de_morgan_over_and_and_or() {
        let negated_and = convert(&Node::not(Node::and([eq("a", "1"), leaf("b")])));
        assert_eq!(
            negated_and,
            Node::or([
                Node::ne(Operand::field("a"), Operand::literal("1")),
                Node::absent(Operand::field("b")),
            ])
        );

        let negated_or = convert(&Node::not(Node::or([eq("a", "1"), leaf("b")])));
        assert_eq!(
            negated_or,
            Node::and([
                Node::ne(Operand::field("a"), Operand::literal("1")),
                Node::absent(Operand::field("b")),
            ])
        );
    }

    #[test]
    fn negated_nested_junctions_stay_flat() {
        let converted = convert(&Node::not(Node::and([
            Node::or([Node::not(leaf("a")), Node::not(leaf("b"))]),
            leaf("c"),
        ])));
        assert_eq!(
            converted,
            Node::or([
                Node::and([leaf("a"), leaf("b")]),
                Node::absent(Operand::field("c")),
            ])
        );
        assert!(converted.is_dnf());
    }

    #[test]
    fn conjunction_short_circuits_and_drops_identity() {
        let x = Node::or([leaf("a"), Node::and([leaf("b"), leaf("c")])]);
        assert_eq!(
            convert(&Node::and([Node::always_false(), x.clone()])),
            Node::always_false()
        );
        assert_eq!(
            convert(&Node::and([x.clone(), Node::always_false()])),
            Node::always_false()
        );
        assert_eq!(
            convert(&Node::and([Node::always_true(), leaf("a")])),
            leaf("a")
        );
        assert_eq!(
            convert(&Node::and([Node::always_true(), Node::always_true()])),
            Node::always_true()
        );
        assert_eq!(convert(&Node::and([Node::always_true(), x.clone()])), x);
    }

    #[test]
    fn disjunction_short_circuits_and_drops_identity() {
        let x = Node::and([leaf("a"), Node::or([leaf("b"), leaf("c")])]);
        assert_eq!(
            convert(&Node::or([Node::always_true(), x.clone()])),
            Node::always_true()
        );
        assert_eq!(
            convert(&Node::or([Node::always_false(), leaf("a")])),
            leaf("a")
        );
        assert_eq!(
            convert(&Node::or([Node::always_false(), Node::always_false()])),
            Node::always_false()
        );
    }

    #[test]
    fn conjunction_flattens_nested_ands() {
        let converted = convert(&Node::and([Node::and([leaf("a"), leaf("b")]), leaf("c")]));
        assert_eq!(converted, Node::and([leaf("a"), leaf("b"), leaf("c")]));
    }

    #[test]
    fn disjunction_flattens_nested_ors() {
        let converted = convert(&Node::or([
            leaf("a"),
            Node::or([leaf("b"), Node::or([leaf("c"), leaf("d")])]),
        ]));
        assert_eq!(
            converted,
            Node::or([leaf("a"), leaf("b"), leaf("c"), leaf("d")])
        );
    }

    #[test]
    fn conjunction_distributes_over_disjunction() {
        let converted = convert(&Node::and([
            Node::or([eq("k", "1"), eq("k", "2")]),
            eq("j", "3"),
        ]));
        let NodeKind::Or(terms) = converted.kind() else {
            panic!("expected or, got {converted}");
        };
        assert_eq!(terms.len(), 2);
        assert!(terms.contains(&Node::and([eq("j", "3"), eq("k", "1")])));
        assert!(terms.contains(&Node::and([eq("j", "3"), eq("k", "2")])));
    }

    #[test]
    fn distribution_multiplies_every_disjunction() {
        let converted = convert(&Node::and([
            Node::or([leaf("a"), leaf("b")]),
            Node::or([leaf("c"), Node::and([leaf("d"), leaf("e")])]),
        ]));
        assert_eq!(
            converted,
            Node::or([
                Node::and([leaf("a"), leaf("c")]),
                Node::and([leaf("a"), leaf("d"), leaf("e")]),
                Node::and([leaf("b"), leaf("c")]),
                Node::and([leaf("b"), leaf("d"), leaf("e")]),
            ])
        );
    }

    #[test]
    fn single_disjunction_is_returned_directly() {
        let converted = convert(&Node::and([Node::or([leaf("a"), leaf("b")])]));
        assert_eq!(converted, Node::or([leaf("a"), leaf("b")]));
    }

    #[test]
    fn converted_subtrees_are_shared() {
        let a = leaf("a");
        let converted = convert(&Node::and([a.clone(), leaf("b")]));
        assert!(converted.children()[0].ptr_eq(&a));
    }

    #[test]
    fn converter_rejects_deep_trees() {
        let mut node = leaf("a");
        for _ in 0..9 {
            node = Node::not(node);
        }
        assert_eq!(node.depth(), 10);

        let option = ConvertOption::default().max_depth(4);
        assert_eq!(
            try_convert(&node, &option),
            Err(ConvertError::DepthExceeded {
                depth: 10,
                limit: 4,
            })
        );

        let converter = Converter::new(ConvertOption::default().max_depth(10));
        assert_eq!(
            converter.convert(&node),
            Ok(Node::absent(Operand::field("a")))
        );
        assert_eq!(converter.option().depth_limit(), 10);
    }
}
