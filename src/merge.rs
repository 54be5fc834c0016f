//! Node merging
//!
//! Merges two aligned nodes into one, recursively merging their aligned
//! children and combining signs through a small commutative algebra.
//! Differently-named nodes merge into a `##mismatch` placeholder instead of
//! recursing. The returned score is the raw alignment cost accumulated
//! through the whole recursion; [`merge`] additionally normalizes it by the
//! two input trees' combined weight so merge quality is comparable across
//! wrappers of very different sizes.

use crate::align::{align_forests, AlignmentInstance};
use crate::error::{DomClusterError, Result};
use crate::node::{Node, Sign, MISMATCH_NAME};

/// Merges `a` and `b`, returning the merged node and a normalized score in
/// `[0, 1]` for same-sized identical trees (lower is a tighter fit).
pub fn merge(a: &Node, b: &Node) -> Result<(Node, f64)> {
    let (node, score) = merge_recurse(Some(a), Some(b))?;
    let normalized = 2.0 * score as f64 / (a.tree_weight() + b.tree_weight()) as f64;
    Ok((node, normalized))
}

fn merge_recurse(a: Option<&Node>, b: Option<&Node>) -> Result<(Node, u64)> {
    match (a, b) {
        (Some(a), Some(b)) => merge_both(a, b),
        (Some(n), None) | (None, Some(n)) => Ok((merge_one_sided(n), 0)),
        (None, None) => unreachable!("an alignment step always has at least one side present"),
    }
}

fn merge_both(a: &Node, b: &Node) -> Result<(Node, u64)> {
    if a.node_name != b.node_name {
        let node = Node::new(MISMATCH_NAME);
        let score = a.tree_weight() + b.tree_weight();
        return Ok((node, score));
    }

    let alignment = align_forests(&a.children, &b.children);
    let mut score = alignment.cost;
    let mut children = Vec::with_capacity(alignment.steps.len());

    for step in &alignment.steps {
        // One-sided steps contribute no further score: their weight was
        // already priced into `alignment.cost` above.
        let (child, child_score) = match *step {
            AlignmentInstance::Sub { ai, bi } => merge_both(&a.children[ai], &b.children[bi])?,
            AlignmentInstance::Del { ai } => (merge_one_sided(&a.children[ai]), 0),
            AlignmentInstance::Ins { bi } => (merge_one_sided(&b.children[bi]), 0),
        };
        score += child_score;
        children.push(child);
    }

    let mut node = Node::new(a.node_name.clone());
    node.children = children;
    node.sign = merge_sign(a.sign, b.sign)?;
    Ok((node, score))
}

/// Builds the merged counterpart of a node present on only one side: its
/// children pass through unchanged, and its sign is promoted to reflect
/// that it's now optional (`1`/`?` become `?`; anything already implying
/// more than one occurrence becomes `*`, since "might not be here at all"
/// plus "used to repeat" no longer pins down a lower bound).
fn merge_one_sided(n: &Node) -> Node {
    let sign = match n.sign {
        Sign::N(1) | Sign::ZeroOne => Sign::ZeroOne,
        _ => Sign::ZeroPlus,
    };
    let mut node = Node::new(n.node_name.clone());
    node.children = n.children.clone();
    node.sign = sign;
    node
}

/// The commutative sign algebra. Larger rank always plays the role of `a`
/// below so the match only needs to enumerate each unordered pair once.
fn merge_sign(a: Sign, b: Sign) -> Result<Sign> {
    use Sign::*;
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    let sign = match (hi, lo) {
        _ if hi == lo => hi,
        (N(1), ZeroOne) => ZeroOne,
        (N(_), ZeroOne) => ZeroPlus,
        (N(_), ZeroPlus) => ZeroPlus,
        (N(_), OnePlus) => OnePlus,
        (N(_), N(_)) => OnePlus,
        (OnePlus, ZeroPlus) => ZeroPlus,
        (OnePlus, ZeroOne) => ZeroPlus,
        (ZeroPlus, ZeroOne) => ZeroPlus,
        _ => return Err(DomClusterError::SignAlgebra { a, b }),
    };
    Ok(sign)
}
