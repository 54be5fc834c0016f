#![doc = include_str!("../README.md")]

pub mod align;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod io;
pub mod log;
pub mod merge;
pub mod node;
pub mod pattern;
pub mod tagseq;
pub mod templatize;

pub use cluster::{do_cluster, do_cluster_with_cutoff, Template};
pub use config::PipelineConfig;
pub use error::{DomClusterError, Result};
pub use node::{Entry, Node, Sign};
pub use templatize::{templatize, templatize_with_threshold};
