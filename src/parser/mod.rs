//! Configuration block parser.
//!
//! Parses the restrictive `name = { key = value, … }` subset of the control
//! configuration language into [`BlockCollection`]s. Sub-modules:
//!
//! - [`source`] – File I/O abstraction (filesystem vs. in-memory)
//!
//! The grammar is intentionally permissive: a block is any `<ident> = { … }`
//! match (non-greedy body, nested braces unsupported); a property inside a
//! body is `<ident> = "<quoted>"` or `<ident> = <bare-token>`. Anything that
//! does not match is skipped silently, never escalated.

pub mod source;

pub use source::*;

use crate::merge::merge_into;
use crate::model::{BlockCollection, BlockEntry, PropertySet, Scalar};
use anyhow::{Context, Result};
use camino::Utf8Path;
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(\w+)\s*=\s*\{(.*?)\}").expect("block pattern"));
static PROP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\w+)\s*=\s*(?:"(.*?)"|([^\s,]+))"#).expect("property pattern"));

/// Parse the raw text of one configuration source.
///
/// Pure function: returns the blocks found in `text`, with duplicate block
/// names accumulated in encounter order. Malformed braces simply fail to
/// match; a source with no blocks yields an empty collection.
pub fn parse_config_text(text: &str) -> BlockCollection {
    let mut blocks = BlockCollection::new();
    for cap in BLOCK_RE.captures_iter(text) {
        let name = &cap[1];
        let body = cap.get(2).map(|m| m.as_str()).unwrap_or("");

        let mut props = PropertySet::new();
        for pcap in PROP_RE.captures_iter(body) {
            let key = pcap[1].to_string();
            // Quoted value wins over a bare token when both groups could
            // match at a position.
            let raw = pcap
                .get(2)
                .or_else(|| pcap.get(3))
                .map(|m| m.as_str())
                .unwrap_or("");
            props.insert(key, Scalar::from_token(raw));
        }

        blocks
            .entry(name.to_string())
            .or_insert_with(BlockEntry::new)
            .push(props);
    }
    blocks
}

/// Options controlling multi-source parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Skip unreadable source files with a warning instead of aborting the
    /// run. Off by default: an unreadable source is a fatal error.
    pub ignore_unreadable: bool,
}

/// Multi-source configuration parser. Generic over [`ContentSource`] so it
/// can read from the filesystem ([`FsSource`]) or an in-memory store.
pub struct ConfigParser<S: ContentSource> {
    source: S,
    options: ParseOptions,
}

impl<S: ContentSource> ConfigParser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(source: S, options: ParseOptions) -> Self {
        Self { source, options }
    }

    /// Parse every `.lua` file in `dir` and merge the results into one
    /// [`BlockCollection`].
    ///
    /// Sources are processed in lexical path order so re-runs are
    /// reproducible regardless of directory enumeration order.
    pub fn parse_dir(&mut self, dir: &Utf8Path) -> Result<BlockCollection> {
        let mut paths = self
            .source
            .list_dir(dir)
            .with_context(|| format!("List configuration sources in {}", dir))?;
        paths.retain(|p| p.extension() == Some("lua"));
        paths.sort();

        let mut merged = BlockCollection::new();
        for path in &paths {
            let text = match self.source.read_to_string(path) {
                Ok(text) => text,
                Err(e) if self.options.ignore_unreadable => {
                    eprintln!("[pidviz] Warning: skipping unreadable source {}: {}", path, e);
                    continue;
                }
                Err(e) => return Err(e.context(format!("Failed to read source {}", path))),
            };
            merge_into(&mut merged, parse_config_text(&text));
        }
        Ok(merged)
    }
}
