//! CLI
//!
//! `domcluster <input.ndjson>`: load entries, templatize each DOM into a
//! wrapper, cluster the wrappers, and print the resulting templates as
//! JSON. One positional argument plus optional overrides for the three
//! tuning constants and the clustering seed.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::cluster::{do_cluster_with_cutoff, Template};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io::load_entries;
use crate::log::ActivityLogger;
use crate::templatize::templatize_with_threshold;

#[derive(Parser)]
#[command(name = "domcluster", version, about = "Discover structural templates shared across a corpus of web pages")]
struct Cli {
    /// Path to an NDJSON file of `{"url": ..., "dom": ...}` entries.
    input: PathBuf,

    /// Maximum repeating-region size the pattern detector considers.
    #[arg(long)]
    k: Option<usize>,

    /// Tag-sequence similarity tolerance used by the pattern detector.
    #[arg(long)]
    edit_dist_threshold: Option<f64>,

    /// Normalized merge-score cutoff below which a page joins a cluster.
    #[arg(long)]
    merge_cutoff: Option<f64>,

    /// Seed for the clustering reservoir sampler; omit for a fresh seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to append the pipeline activity log. Defaults to
    /// `domcluster.log` next to the input file.
    #[arg(long)]
    log_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TemplateOutput {
    base_uri: String,
    num_pages: usize,
    uris: Vec<String>,
}

impl From<&Template> for TemplateOutput {
    fn from(t: &Template) -> TemplateOutput {
        TemplateOutput { base_uri: t.base_uri.clone(), num_pages: t.num_pages, uris: t.uris.clone() }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error serializing output: {e}"),
    }
}

/// Parses `argv`, runs the pipeline, and prints the resulting templates.
/// Returns the error to report and exit non-zero on.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg = PipelineConfig {
        k: cli.k.unwrap_or_else(|| PipelineConfig::default().k),
        edit_dist_threshold: cli.edit_dist_threshold.unwrap_or_else(|| PipelineConfig::default().edit_dist_threshold),
        merge_score_cutoff: cli.merge_cutoff.unwrap_or_else(|| PipelineConfig::default().merge_score_cutoff),
    };

    let log_path = cli.log_path.clone().unwrap_or_else(|| {
        cli.input.parent().unwrap_or_else(|| std::path::Path::new(".")).join("domcluster.log")
    });
    let logger = ActivityLogger::new(log_path);

    let file = File::open(&cli.input)?;
    let mut entries = load_entries(BufReader::new(file))?;
    let _ = logger.info("load", Some(&format!("entries={}", entries.len())));

    for entry in &mut entries {
        templatize_with_threshold(&mut entry.dom, cfg.k, cfg.edit_dist_threshold);
    }
    let _ = logger.info("templatize", Some(&format!("wrappers={}", entries.len())));

    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let templates = match do_cluster_with_cutoff(entries, &mut rng, cfg.merge_score_cutoff) {
        Ok(templates) => templates,
        Err(e) => {
            let _ = logger.error("cluster", Some(&e.to_string()));
            return Err(e);
        }
    };
    let _ = logger.info("cluster", Some(&format!("templates={}", templates.len())));

    let output: Vec<TemplateOutput> = templates.iter().map(TemplateOutput::from).collect();
    print_json(&output);

    Ok(())
}
