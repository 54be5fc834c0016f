//! Pattern detector (`comb_comp`)
//!
//! Finds repeating adjacent sibling runs in a child list, for every
//! candidate period up to `k`, then resolves overlaps so that smaller
//! periods take precedence (`AAAA` is `A^4`, not `(AA)^2`).
//!
//! Node identity in a pointer-based implementation would be pointer
//! identity;
//! here siblings live in one flat `Vec<Node>` so identity is just the
//! index into it, which is what `NodeRegion` carries (grounded on the
//! "arena + integer index" guidance for cross-language ports of this
//! algorithm).

use crate::node::Node;
use crate::tagseq::{list_to_tag_arr, tag_arr_similar};

/// A contiguous slice of sibling indices `[start, start+len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRegion {
    pub start: usize,
    pub len: usize,
}

impl NodeRegion {
    fn end(&self) -> usize {
        self.start + self.len
    }

    fn overlaps(&self, other: &NodeRegion) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// An ordered run of `>= 2` equal-size adjacent regions that compared
/// similar to their neighbor.
#[derive(Debug, Clone)]
pub struct RegionGroup {
    pub regions: Vec<NodeRegion>,
}

impl RegionGroup {
    pub fn first_region(&self) -> NodeRegion {
        self.regions[0]
    }

    fn overlaps(&self, other: &RegionGroup) -> bool {
        self.regions
            .iter()
            .any(|a| other.regions.iter().any(|b| a.overlaps(b)))
    }
}

/// Finds a set of mutually node-disjoint [`RegionGroup`]s describing
/// repeating sibling runs in `children`, considering region sizes up to
/// `k` (capped at `children.len() / 2`). Adjacent windows compare similar
/// per [`tag_arr_similar`] at `threshold`.
pub fn comb_comp(children: &[Node], k: usize, threshold: f64) -> Vec<RegionGroup> {
    let n = children.len();
    if n <= 1 {
        return Vec::new();
    }
    let k = k.min(n / 2);
    if k == 0 {
        return Vec::new();
    }

    // by_size[s - 1] holds every RegionGroup found for region size s.
    let mut by_size: Vec<Vec<RegionGroup>> = vec![Vec::new(); k];

    for region_size in 1..=k {
        let mut repeat_group: Vec<RegionGroup> = Vec::new();

        for offset in 0..region_size {
            let mut region_start = offset;
            let mut cur_regions: Vec<NodeRegion> = Vec::new();

            let mut next_region = NodeRegion { start: region_start, len: region_size };
            let mut next_tags = list_to_tag_arr(&children[next_region.start..next_region.end()]);

            while region_start + 2 * region_size <= n {
                let this_region = next_region;
                next_region = NodeRegion { start: region_start + region_size, len: region_size };
                let this_tags = next_tags;
                next_tags = list_to_tag_arr(&children[next_region.start..next_region.end()]);

                if tag_arr_similar(&this_tags, &next_tags, threshold) {
                    if let Some(&last) = cur_regions.last() {
                        if last != this_region {
                            repeat_group.push(RegionGroup { regions: std::mem::take(&mut cur_regions) });
                        }
                    }
                    if cur_regions.is_empty() {
                        cur_regions.push(this_region);
                    }
                    cur_regions.push(next_region);
                }
                region_start += region_size;
            }

            if !cur_regions.is_empty() {
                repeat_group.push(RegionGroup { regions: cur_regions });
            }
        }

        by_size[region_size - 1] = repeat_group;
    }

    // Selection pass: largest region_size first so smaller periods get
    // the final word on any overlap. Within one region_size, sort
    // shortest-first so the eviction loop's last-write-wins behavior
    // lets a longer (more-repeated) RegionGroup evict a shorter one it
    // overlaps, rather than the other way around — without the sort,
    // offsets overlapping within the same size could evict a
    // more-complete group arbitrarily, visibly breaking the
    // "dt dd dt dd dt dd -> one paren of sign 3" case.
    let mut selected: Vec<RegionGroup> = Vec::new();
    for size in (1..=k).rev() {
        let mut groups = std::mem::take(&mut by_size[size - 1]);
        groups.sort_by(|a, b| a.regions.len().cmp(&b.regions.len()));
        for group in groups {
            selected.retain(|existing| !existing.overlaps(&group));
            selected.push(group);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagseq::EDIT_DIST_THRESHOLD;

    fn leaf(name: &str) -> Node {
        Node::new(name)
    }

    fn covered(groups: &[RegionGroup]) -> Vec<usize> {
        let mut idx: Vec<usize> = groups
            .iter()
            .flat_map(|g| g.regions.iter().flat_map(|r| r.start..r.end()))
            .collect();
        idx.sort_unstable();
        idx
    }

    #[test]
    fn single_or_empty_children_has_no_groups() {
        assert!(comb_comp(&[], 10, EDIT_DIST_THRESHOLD).is_empty());
        assert!(comb_comp(&[leaf("a")], 10, EDIT_DIST_THRESHOLD).is_empty());
    }

    #[test]
    fn period_one_repetition_is_one_group() {
        let children = vec![leaf("li"), leaf("li"), leaf("li"), leaf("li")];
        let groups = comb_comp(&children, 10, EDIT_DIST_THRESHOLD);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].regions.len(), 4);
        assert_eq!(covered(&groups), vec![0, 1, 2, 3]);
    }

    #[test]
    fn period_one_wins_over_period_two() {
        // a a a a: period-1 (A^4) must win over period-2 ((AA)^2).
        let children = vec![leaf("a"), leaf("a"), leaf("a"), leaf("a")];
        let groups = comb_comp(&children, 10, EDIT_DIST_THRESHOLD);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].regions.len(), 4);
        assert!(groups[0].regions.iter().all(|r| r.len == 1));
    }

    #[test]
    fn alternating_pair_forms_one_full_group() {
        // dt dd dt dd dt dd, dt != dd: one paren group of period 2,
        // spanning every child (3 repeats), not a partial overlap.
        let children = vec![
            leaf("dt"), leaf("dd"), leaf("dt"), leaf("dd"), leaf("dt"), leaf("dd"),
        ];
        let groups = comb_comp(&children, 10, EDIT_DIST_THRESHOLD);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].regions.len(), 3);
        assert!(groups[0].regions.iter().all(|r| r.len == 2));
        assert_eq!(covered(&groups), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn no_repetition_yields_no_groups() {
        let children = vec![leaf("div"), leaf("span"), leaf("p")];
        assert!(comb_comp(&children, 10, EDIT_DIST_THRESHOLD).is_empty());
    }

    #[test]
    fn selected_groups_are_pairwise_disjoint() {
        let children = vec![
            leaf("a"), leaf("a"), leaf("a"), leaf("a"), leaf("b"), leaf("c"),
        ];
        let groups = comb_comp(&children, 10, EDIT_DIST_THRESHOLD);
        for (i, g1) in groups.iter().enumerate() {
            for g2 in groups.iter().skip(i + 1) {
                assert!(!g1.overlaps(g2));
            }
        }
    }

    #[test]
    fn k_is_capped_at_half_length() {
        // k requested far larger than len/2; must not panic or index oob.
        let children = vec![leaf("a"), leaf("a")];
        let groups = comb_comp(&children, 1000, EDIT_DIST_THRESHOLD);
        assert_eq!(groups.len(), 1);
    }
}
