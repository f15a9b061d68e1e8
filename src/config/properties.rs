//! Minimal key/value properties file reader
//!
//! Supports the subset of the classic properties format the project
//! config actually uses: one `key=value` (or `key: value`) pair per
//! line, `#`/`!` comments, surrounding whitespace ignored. Line
//! continuations and escapes are intentionally not handled.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{BatonError, Result};

/// Parse properties from text, later keys winning over earlier ones.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut store = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(at) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..at].trim_end();
        let value = line[at + 1..].trim_start();
        if !key.is_empty() {
            store.insert(key.to_string(), value.to_string());
        }
    }
    store
}

/// Load properties from the given path; a missing file yields an empty
/// store, any other read failure is an error.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = fs::read_to_string(path).map_err(|e| BatonError::ConfigLoadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(parse(&text))
}
