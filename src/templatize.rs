//! Templatization
//!
//! Rewrites repeating sibling runs detected by [`crate::pattern::comb_comp`]
//! into signed nodes: a size-1 repeat mutates the sign of the single
//! surviving instance, a size-`n>1` repeat is wrapped in a `##paren` node
//! carrying the repeat count as its sign. Only nodes with `tree_depth >= 3`
//! are considered worth templatizing — shallow subtrees rarely hide a
//! meaningful repeating structure and templatizing them just adds noise
//! ahead of alignment.

use crate::node::{Node, Sign};
use crate::pattern::comb_comp;
use crate::tagseq::EDIT_DIST_THRESHOLD;

/// Rewrites `node`'s subtree in place, recursing after each level is
/// templatized. `k` bounds the repeat-region size `comb_comp` considers,
/// using the default similarity threshold. See [`templatize_with_threshold`]
/// to override it.
pub fn templatize(node: &mut Node, k: usize) {
    templatize_with_threshold(node, k, EDIT_DIST_THRESHOLD);
}

/// As [`templatize`], but with an explicit region-similarity threshold
/// (the CLI exposes this as `--edit-dist-threshold`).
pub fn templatize_with_threshold(node: &mut Node, k: usize, threshold: f64) {
    if node.tree_depth() >= 3 && !node.is_paren() {
        rewrite_children(node, k, threshold);
    }
    for child in &mut node.children {
        templatize_with_threshold(child, k, threshold);
    }
}

fn rewrite_children(node: &mut Node, k: usize, threshold: f64) {
    let groups = comb_comp(&node.children, k, threshold);
    if groups.is_empty() {
        return;
    }

    let n = node.children.len();
    let mut grouped = vec![false; n];
    for g in &groups {
        for r in &g.regions {
            for idx in r.start..r.start + r.len {
                grouped[idx] = true;
            }
        }
    }

    let old_children = std::mem::take(&mut node.children);
    let mut slots: Vec<Option<Node>> = old_children.into_iter().map(Some).collect();
    let mut new_children = Vec::with_capacity(n);

    for i in 0..n {
        if !grouped[i] {
            if let Some(c) = slots[i].take() {
                new_children.push(c);
            }
            continue;
        }
        for g in &groups {
            let first = g.first_region();
            if first.start != i {
                continue;
            }
            let count = g.regions.len() as u32;
            if first.len == 1 {
                let mut c = slots[i].take().expect("region node consumed exactly once");
                c.invalidate_cache();
                c.sign = Sign::N(count);
                new_children.push(c);
            } else {
                let region_nodes: Vec<Node> = (first.start..first.start + first.len)
                    .map(|idx| slots[idx].take().expect("region node consumed exactly once"))
                    .collect();
                new_children.push(Node::new_paren(region_nodes, Sign::N(count)));
            }
        }
    }

    node.invalidate_cache();
    node.children = new_children;
}
