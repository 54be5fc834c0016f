//! Node model
//!
//! A `Node` is either a DOM element, a `##paren` grouping meta-node that
//! attaches a quantifier to a contiguous run of siblings, or a
//! `##mismatch` placeholder produced when merging disagrees on node
//! names. `tree_depth` and `tree_weight` are the two derived quantities
//! the rest of the pipeline leans on; both are computed lazily and
//! memoized in a `Cell`, so a node must not be read for depth/weight and
//! then have its children or sign mutated afterwards — the templatizer
//! computes `tree_depth` before it rewrites a node's children for
//! exactly this reason.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const PAREN_NAME: &str = "##paren";
pub const MISMATCH_NAME: &str = "##mismatch";

/// The multiplicity quantifier on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// Exactly `n` occurrences, `n >= 1`. A raw `0` on input always
    /// normalizes to `N(1)` before it reaches this type.
    N(u32),
    /// One or more.
    OnePlus,
    /// Zero or more.
    ZeroPlus,
    /// Zero or one.
    ZeroOne,
}

impl Sign {
    /// Normalizes a raw input sign (where `0` means "unspecified", i.e. 1).
    pub fn from_raw(raw: i64) -> Sign {
        match raw {
            0 => Sign::N(1),
            n if n > 0 => Sign::N(n as u32),
            _ => Sign::N(1),
        }
    }

    /// `true` for the two signs that make a subtree's presence optional
    /// and therefore free to align against (`tree_weight` is 0).
    fn is_free(self) -> bool {
        matches!(self, Sign::ZeroPlus | Sign::OnePlus)
    }

    /// Ordering used by the merge sign algebra's "swap so x is larger"
    /// step: any integer N is larger than any symbolic sign, and among
    /// symbolic signs `+` > `*` > `?`, matching the source's constants
    /// (`OnePlus = -1`, `ZeroPlus = -2`, `ZeroOne = -3`).
    fn rank(self) -> i64 {
        match self {
            Sign::N(n) => i64::from(n) + 1, // keeps N ranks stacked above 0
            Sign::OnePlus => -1,
            Sign::ZeroPlus => -2,
            Sign::ZeroOne => -3,
        }
    }

    pub fn render(self) -> String {
        match self {
            Sign::N(n) => n.to_string(),
            Sign::OnePlus => "+".to_string(),
            Sign::ZeroPlus => "*".to_string(),
            Sign::ZeroOne => "?".to_string(),
        }
    }
}

impl PartialOrd for Sign {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sign {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A node in the signed-tree algebra: a DOM element, a `##paren` group,
/// or a `##mismatch` placeholder.
#[derive(Debug, Clone)]
pub struct Node {
    pub node_name: String,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Node>,
    pub sign: Sign,

    tree_depth: Cell<Option<u32>>,
    tree_weight: Cell<Option<u64>>,
}

impl Node {
    pub fn new(node_name: impl Into<String>) -> Node {
        Node {
            node_name: node_name.into(),
            attrs: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            sign: Sign::N(1),
            tree_depth: Cell::new(None),
            tree_weight: Cell::new(None),
        }
    }

    pub fn is_paren(&self) -> bool {
        self.node_name == PAREN_NAME
    }

    pub fn is_mismatch(&self) -> bool {
        self.node_name == MISMATCH_NAME
    }

    /// Builds a `##paren` node wrapping `children` by reference-sharing
    /// (the caller already owns the underlying region's nodes; this is
    /// only ever called with a cloned slice during templatization).
    pub fn new_paren(children: Vec<Node>, sign: Sign) -> Node {
        Node {
            node_name: PAREN_NAME.to_string(),
            attrs: BTreeMap::new(),
            text: String::new(),
            children,
            sign,
            tree_depth: Cell::new(None),
            tree_weight: Cell::new(None),
        }
    }

    /// 1 + max child depth, or 1 for a leaf. Paren nodes count 1 too;
    /// see DESIGN.md for the reasoning.
    pub fn tree_depth(&self) -> u32 {
        if let Some(d) = self.tree_depth.get() {
            return d;
        }
        let max_child = self.children.iter().map(Node::tree_depth).max().unwrap_or(0);
        let depth = 1 + max_child;
        self.tree_depth.set(Some(depth));
        depth
    }

    /// Unit cost used by forest alignment. Zero for `*`/`+` signed nodes
    /// (their absence is free); otherwise 1 (0 if this is a paren node)
    /// plus the sum of child weights, multiplied by `n` if the sign is
    /// an exact count `n > 1`.
    pub fn tree_weight(&self) -> u64 {
        if let Some(w) = self.tree_weight.get() {
            return w;
        }
        let weight = if self.sign.is_free() {
            0
        } else {
            let base: u64 = if self.is_paren() { 0 } else { 1 };
            let mut total = base + self.children.iter().map(Node::tree_weight).sum::<u64>();
            if let Sign::N(n) = self.sign {
                if n > 1 {
                    total *= u64::from(n);
                }
            }
            total
        };
        self.tree_weight.set(Some(weight));
        weight
    }

    /// Invalidates memoized depth/weight. Call before mutating
    /// `children` or `sign` on a node that may already have been read.
    pub fn invalidate_cache(&mut self) {
        self.tree_depth.set(None);
        self.tree_weight.set(None);
    }

    pub fn call_preorder<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.call_preorder(f);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node_name)?;
        if let Some(id) = self.attrs.get("id") {
            write!(f, "#{id}")?;
        }
        if let Some(classes) = self.attrs.get("class") {
            for class in classes.split_whitespace() {
                write!(f, ".{class}")?;
            }
        }
        write!(f, "^{{{}}}", self.sign.render())
    }
}

/// `(uri, dom)` input record; see `crate::io` for the NDJSON wire shape.
#[derive(Debug, Clone)]
pub struct Entry {
    pub uri: String,
    pub dom: Node,
}

/// Wire representation of a `Node` as read from NDJSON input. `sign`
/// defaults to `0` (normalized to 1) when the field is absent, and
/// unknown fields are ignored by `serde`'s default behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(alias = "nodeName")]
    pub node_name: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<RawNode>,
    #[serde(default)]
    pub sign: i64,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Node {
        Node {
            node_name: raw.node_name,
            attrs: raw.attrs,
            text: raw.text,
            children: raw.children.into_iter().map(Node::from).collect(),
            sign: Sign::from_raw(raw.sign),
            tree_depth: Cell::new(None),
            tree_weight: Cell::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Node {
        Node::new(name)
    }

    #[test]
    fn leaf_weight_and_depth_are_one() {
        let n = leaf("li");
        assert_eq!(n.tree_depth(), 1);
        assert_eq!(n.tree_weight(), 1);
    }

    #[test]
    fn weight_sums_children_plus_self() {
        let mut n = Node::new("ul");
        n.children.push(leaf("li"));
        n.children.push(leaf("li"));
        assert_eq!(n.tree_weight(), 3);
        assert_eq!(n.tree_depth(), 2);
    }

    #[test]
    fn free_signs_are_zero_weight() {
        let mut n = Node::new("li");
        n.sign = Sign::ZeroPlus;
        assert_eq!(n.tree_weight(), 0);
        n.invalidate_cache();
        n.sign = Sign::OnePlus;
        assert_eq!(n.tree_weight(), 0);
    }

    #[test]
    fn exact_count_multiplies_weight() {
        let mut n = Node::new("li");
        n.sign = Sign::N(4);
        assert_eq!(n.tree_weight(), 4);
    }

    #[test]
    fn paren_node_itself_costs_nothing() {
        let paren = Node::new_paren(vec![leaf("dt"), leaf("dd")], Sign::N(3));
        // base 0 (paren) + 1 + 1 = 2, times sign 3
        assert_eq!(paren.tree_weight(), 6);
    }

    #[test]
    fn display_renders_id_classes_and_sign() {
        let mut n = Node::new("div");
        n.attrs.insert("id".into(), "x".into());
        n.attrs.insert("class".into(), "row item".into());
        n.sign = Sign::OnePlus;
        assert_eq!(n.to_string(), "div#x.row.item^{+}");
    }

    #[test]
    fn raw_node_zero_sign_normalizes_to_one() {
        let raw = RawNode {
            node_name: "div".into(),
            attrs: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            sign: 0,
        };
        let n: Node = raw.into();
        assert_eq!(n.sign, Sign::N(1));
    }

    #[test]
    fn sign_ordering_puts_integers_above_symbolic() {
        assert!(Sign::N(2) > Sign::OnePlus);
        assert!(Sign::OnePlus > Sign::ZeroPlus);
        assert!(Sign::ZeroPlus > Sign::ZeroOne);
    }
}
