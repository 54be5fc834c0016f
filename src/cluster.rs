//! Clustering
//!
//! Greedily grows wrapper templates out of a corpus of per-page DOM trees.
//! Each round picks a uniformly random remaining page as a new template's
//! seed (via reservoir sampling over an injected, seedable RNG rather than
//! a global one, so a run is reproducible end to end), then repeatedly
//! scans the remaining pages and folds in any whose merge score beats
//! [`MERGE_SCORE_CUTOFF`] — repeating the scan because merging makes the
//! template more general, which can unlock pages that didn't match on an
//! earlier pass.

use crate::error::Result;
use crate::merge;
use crate::node::{Entry, Node};

pub const MERGE_SCORE_CUTOFF: f64 = 0.3;

/// One discovered wrapper: its merged structural template, the pages
/// folded into it, and which page seeded it.
#[derive(Debug, Clone)]
pub struct Template {
    pub wrapper: Node,
    pub num_pages: usize,
    pub base_uri: String,
    pub uris: Vec<String>,
}

impl Template {
    fn seeded_by(uri: String, wrapper: Node) -> Template {
        Template { wrapper, num_pages: 1, base_uri: uri, uris: Vec::new() }
    }

    /// Tries to fold `dom` into this template. Returns `true` (and commits
    /// the merge) iff the normalized merge score beats `cutoff`.
    fn try_add(&mut self, uri: &str, dom: &Node, cutoff: f64) -> Result<bool> {
        let (merged, score) = merge::merge(&self.wrapper, dom)?;
        if score < cutoff {
            self.wrapper = merged;
            self.num_pages += 1;
            self.uris.push(uri.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Clusters `entries` into templates using the default merge-score cutoff,
/// consuming the input. See [`do_cluster_with_cutoff`] to override it.
pub fn do_cluster(entries: Vec<Entry>, rng: &mut fastrand::Rng) -> Result<Vec<Template>> {
    do_cluster_with_cutoff(entries, rng, MERGE_SCORE_CUTOFF)
}

/// As [`do_cluster`], but with an explicit merge-score cutoff (the CLI
/// exposes this as `--merge-cutoff`).
pub fn do_cluster_with_cutoff(
    entries: Vec<Entry>,
    rng: &mut fastrand::Rng,
    cutoff: f64,
) -> Result<Vec<Template>> {
    let mut unused = entries;
    let mut templates = Vec::new();

    while !unused.is_empty() {
        let seed_index = reservoir_pick(unused.len(), rng);
        let Entry { uri, dom } = unused.remove(seed_index);
        let mut template = Template::seeded_by(uri, dom);

        loop {
            let mut found_more = false;
            let mut i = 0;
            while i < unused.len() {
                if template.try_add(&unused[i].uri, &unused[i].dom, cutoff)? {
                    unused.remove(i);
                    found_more = true;
                } else {
                    i += 1;
                }
            }
            if !found_more {
                break;
            }
        }

        templates.push(template);
    }

    Ok(templates)
}

/// Picks a uniformly random index in `0..count` via single-slot reservoir
/// sampling: index `i` replaces the current pick with probability
/// `1/(i+1)`, which leaves every index equally likely regardless of scan
/// order.
fn reservoir_pick(count: usize, rng: &mut fastrand::Rng) -> usize {
    let mut picked = 0;
    for i in 0..count {
        if rng.f64() < 1.0 / (i as f64 + 1.0) {
            picked = i;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uri: &str, node_name: &str) -> Entry {
        Entry { uri: uri.to_string(), dom: Node::new(node_name) }
    }

    #[test]
    fn identical_pages_form_a_single_template() {
        let entries = vec![entry("a", "html"), entry("b", "html"), entry("c", "html")];
        let mut rng = fastrand::Rng::with_seed(1);
        let templates = do_cluster(entries, &mut rng).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].num_pages, 3);
        assert_eq!(templates[0].uris.len(), 2);
    }

    #[test]
    fn two_disjoint_families_cluster_separately() {
        let entries = vec![
            entry("a1", "article"),
            entry("a2", "article"),
            entry("a3", "article"),
            entry("b1", "listing"),
            entry("b2", "listing"),
            entry("b3", "listing"),
        ];
        let mut rng = fastrand::Rng::with_seed(7);
        let templates = do_cluster(entries, &mut rng).unwrap();
        assert_eq!(templates.len(), 2);
        let sizes: Vec<usize> = {
            let mut v: Vec<usize> = templates.iter().map(|t| t.num_pages).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(sizes, vec![3, 3]);
    }

    #[test]
    fn reservoir_pick_stays_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(42);
        for count in 1..10 {
            for _ in 0..20 {
                assert!(reservoir_pick(count, &mut rng) < count);
            }
        }
    }

    #[test]
    fn same_seed_gives_reproducible_clustering() {
        let entries = || {
            vec![entry("a", "html"), entry("b", "html"), entry("c", "article")]
        };
        let mut rng1 = fastrand::Rng::with_seed(99);
        let mut rng2 = fastrand::Rng::with_seed(99);
        let t1 = do_cluster(entries(), &mut rng1).unwrap();
        let t2 = do_cluster(entries(), &mut rng2).unwrap();
        assert_eq!(t1.len(), t2.len());
        for (a, b) in t1.iter().zip(t2.iter()) {
            assert_eq!(a.base_uri, b.base_uri);
            assert_eq!(a.uris, b.uris);
        }
    }

    #[test]
    fn empty_corpus_yields_no_templates() {
        let mut rng = fastrand::Rng::with_seed(3);
        let templates = do_cluster(Vec::new(), &mut rng).unwrap();
        assert!(templates.is_empty());
    }
}
