//! NDJSON entry loading
//!
//! Reads newline-delimited `Entry` records: each line
//! is `{"url": ..., "dom": <Node> | null}`, unknown fields are ignored by
//! `serde`'s defaults, and a `dom: null` record is skipped rather than
//! treated as an error. A malformed line is a fatal input error: the
//! caller reports it and exits non-zero rather than proceeding on a
//! truncated corpus.

use std::io::BufRead;

use serde::Deserialize;

use crate::error::{DomClusterError, Result};
use crate::node::{Entry, RawNode};

#[derive(Debug, Deserialize)]
struct RawEntry {
    url: String,
    dom: Option<RawNode>,
}

/// Parses NDJSON from `reader`, one [`Entry`] per non-blank line. Lines
/// whose `dom` is `null` are skipped.
pub fn load_entries(reader: impl BufRead) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawEntry = serde_json::from_str(&line).map_err(|source| DomClusterError::Json {
            line: idx + 1,
            source,
        })?;
        if let Some(dom) = raw.dom {
            entries.push(Entry { uri: raw.url, dom: dom.into() });
        }
    }
    Ok(entries)
}
