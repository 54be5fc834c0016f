//! Pipeline configuration
//!
//! Bundles the three named tuning constants into one struct with
//! `Default` set to their documented values, instead of scattering bare
//! constants through the call sites.

use crate::cluster::MERGE_SCORE_CUTOFF;
use crate::tagseq::EDIT_DIST_THRESHOLD;

/// Default maximum repetition period the pattern detector considers.
pub const DEFAULT_K: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Maximum repeating-region size the pattern detector considers.
    pub k: usize,
    /// Tag-sequence similarity tolerance used by the pattern detector.
    pub edit_dist_threshold: f64,
    /// Normalized merge-score cutoff below which a candidate joins a
    /// cluster.
    pub merge_score_cutoff: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            k: DEFAULT_K,
            edit_dist_threshold: EDIT_DIST_THRESHOLD,
            merge_score_cutoff: MERGE_SCORE_CUTOFF,
        }
    }
}
