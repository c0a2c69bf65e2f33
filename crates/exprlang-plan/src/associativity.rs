//! The post-hoc associativity rewrite.
//!
//! Each precedence level plans its right operand by recursing into itself,
//! which is the simplest way to let `a - b - c` parse at all without the
//! level needing to loop — but it builds a right-leaning tree, i.e. `a - (b
//! - c)`, which evaluates right to left. This module rotates that tree into
//! the left-leaning `(a - b) - c` a normal reader expects, without cloning
//! any node (an [`exprlang_util::operator::OperatorSymbol`]'s `operator_fn`
//! is not `Clone`).
//!
//! The rotation is applied once, directly after a level builds a binary
//! node, so a chain of `k` same-precedence operators costs `k - 1`
//! rotations overall rather than a second tree-wide pass.

use crate::stage::Stage;

/// Rotate `node` left-leaning by one step if its right child belongs to the
/// same precedence family; otherwise return it unchanged.
///
/// Before:  `node{left: A, right: inner{left: B, right: C}}`
/// After:   `inner{left: node{left: A, right: B}, right: C}`
///
/// `inner` keeps its own identity and so does `node`; only the tree shape
/// and the children each identity sits over change. Applying this
/// repeatedly at the root turns an arbitrarily long right-leaning chain
/// into the equivalent left-leaning one, one rotation per extra operator.
pub fn rewrite_associativity(mut node: Stage) -> Stage {
    let precedence = node.symbol().precedence();
    loop {
        let continues = matches!(
            node.right(),
            Some(right) if right.symbol().precedence() == precedence && right.left().is_some()
        );
        if !continues {
            return node;
        }
        node = rotate_left_lean(node);
    }
}

fn rotate_left_lean(mut node: Stage) -> Stage {
    let mut inner = *node
        .take_right()
        .expect("rotate_left_lean called with no right child");
    let b = inner.take_left();
    let c = inner.take_right();

    node.set_right(b);
    inner.set_left(Some(Box::new(node)));
    inner.set_right(c);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprlang_util::operator::OperatorSymbol;
    use exprlang_util::value::Value;
    use exprlang_util::Span;

    fn leaf(n: i64) -> Stage {
        let span = Span::new(0, 1, 1, 1);
        Stage::new(OperatorSymbol::Literal, span, move |_, _, _| {
            Ok(Value::Int(n))
        })
    }

    fn binary(symbol: OperatorSymbol, left: Stage, right: Stage) -> Stage {
        let span = Span::new(0, 1, 1, 1);
        Stage::new(symbol, span, |_, _, _| Ok(Value::Bool(true)))
            .with_left(left)
            .with_right(right)
    }

    /// Builds the right-leaning tree a naive self-recursive level function
    /// produces for `a - b - c - d` and checks the rewrite turns it into
    /// the left-leaning `((a - b) - c) - d`.
    #[test]
    fn four_term_chain_becomes_left_leaning() {
        let right_leaning = binary(
            OperatorSymbol::Minus,
            leaf(1),
            binary(
                OperatorSymbol::Minus,
                leaf(2),
                binary(OperatorSymbol::Minus, leaf(3), leaf(4)),
            ),
        );
        let rewritten = rewrite_associativity(right_leaning);

        // root: (.. - 4), left is another Minus node, right is leaf 4.
        assert_eq!(rewritten.symbol(), OperatorSymbol::Minus);
        let root_left = rewritten.left().unwrap();
        assert_eq!(root_left.symbol(), OperatorSymbol::Minus);
        let mid_left = root_left.left().unwrap();
        assert_eq!(mid_left.symbol(), OperatorSymbol::Minus);
        assert!(mid_left.left().is_some());
        assert!(mid_left.right().is_some());
    }

    #[test]
    fn single_operator_is_unaffected() {
        let tree = binary(OperatorSymbol::Plus, leaf(1), leaf(2));
        let rewritten = rewrite_associativity(tree);
        assert_eq!(rewritten.symbol(), OperatorSymbol::Plus);
        assert!(rewritten.left().unwrap().left().is_none());
    }

    #[test]
    fn differing_precedence_on_the_right_stops_rotation() {
        // `a - b * c`: Multiply binds tighter, so Minus's right child is a
        // Multiply node and no rotation should occur.
        let tree = binary(
            OperatorSymbol::Minus,
            leaf(1),
            binary(OperatorSymbol::Multiply, leaf(2), leaf(3)),
        );
        let rewritten = rewrite_associativity(tree);
        assert_eq!(rewritten.symbol(), OperatorSymbol::Minus);
        assert_eq!(rewritten.right().unwrap().symbol(), OperatorSymbol::Multiply);
    }
}
