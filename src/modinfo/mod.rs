//! Module descriptor parsing and external-dependency resolution
//!
//! Descriptors are scanned with two fixed patterns rather than a full
//! grammar: a `module <name> {` header (mandatory) and any number of
//! `requires <spec>;` clauses, of which only the trailing identifier is
//! kept. The single-line header assumption is a known brittleness,
//! carried on purpose.

pub mod program;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{BatonError, Result};
use crate::log::Log;

/// File name of a module descriptor.
pub const DESCRIPTOR_FILE: &str = "module-info.java";

fn module_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"module\s+([\w.]+)\s*\{").expect("valid module pattern")
    })
}

fn requires_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"(?s)requires\s+(.+?);").expect("valid requires pattern")
    })
}

/// Identity and requirements of one module, parsed from its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Declared module name, unique within a build.
    pub name: String,
    /// Required module names, deduplicated and sorted.
    pub requires: BTreeSet<String>,
}

impl ModuleInfo {
    /// Parse a descriptor from its text. A missing module header is a
    /// hard parse failure.
    pub fn of_source(source: &str) -> Result<Self> {
        let name = module_pattern()
            .captures(source)
            .map(|c| c[1].trim().to_string())
            .ok_or_else(|| BatonError::DescriptorHeaderMissing {
                text: source.chars().take(120).collect(),
            })?;

        let mut requires = BTreeSet::new();
        for captures in requires_pattern().captures_iter(source) {
            // only the trailing identifier; qualifiers like "transitive"
            // or "static" are discarded
            if let Some(last) = captures[1].split_whitespace().last() {
                requires.insert(last.to_string());
            }
        }
        Ok(Self { name, requires })
    }

    /// Parse the descriptor at the given path; a directory is resolved
    /// to the descriptor file within it.
    pub fn of_path(path: &Path) -> Result<Self> {
        let file = if path.is_dir() {
            path.join(DESCRIPTOR_FILE)
        } else {
            path.to_path_buf()
        };
        let source =
            std::fs::read_to_string(&file).map_err(|e| BatonError::DescriptorReadFailed {
                path: file.display().to_string(),
                reason: e.to_string(),
            })?;
        Self::of_source(&source)
    }
}

/// Collect every descriptor file beneath the given roots.
fn find_descriptors(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut descriptors = Vec::new();
    for root in roots {
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| BatonError::WalkFailed {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file()
                && entry.file_name().to_str() == Some(DESCRIPTOR_FILE)
            {
                descriptors.push(entry.into_path());
            }
        }
    }
    Ok(descriptors)
}

/// Calculate external module names over a root set: the union of all
/// required names minus all declared names minus the builtin catalog.
/// Recomputed on every call, never cached.
pub fn find_external_module_names(
    roots: &[PathBuf],
    builtin: &BTreeSet<String>,
) -> Result<BTreeSet<String>> {
    let mut declared = BTreeSet::new();
    let mut required = BTreeSet::new();
    for descriptor in find_descriptors(roots)? {
        let info = ModuleInfo::of_path(&descriptor)?;
        declared.insert(info.name);
        required.extend(info.requires);
    }
    Ok(required
        .difference(&declared)
        .filter(|name| !builtin.contains(*name))
        .cloned()
        .collect())
}

/// Query the host platform's builtin module catalog from the configured
/// launcher at call time. An unavailable inventory yields an empty
/// catalog; every requirement then counts as external.
pub fn platform_module_names(log: &Log, launcher: &str) -> BTreeSet<String> {
    let output = Command::new(launcher).arg("--list-modules").output();
    match output {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.split('@').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
        Ok(output) => {
            log.debug(format!(
                "Module inventory of '{launcher}' failed with {}",
                output.status
            ));
            BTreeSet::new()
        }
        Err(e) => {
            log.debug(format!("Module inventory of '{launcher}' unavailable: {e}"));
            BTreeSet::new()
        }
    }
}
