//! Project model
//!
//! A project is constructed once per invocation from the base directory
//! and configuration, and never mutated. It owns the two realms, `main`
//! and `test`: named source sets compiled against their own module
//! paths. The test realm's module path chains the main realm's target
//! first, so test code resolves main's compiled modules.

pub mod pipeline;

use std::path::{Path, PathBuf};

use crate::config::{Config, Property};

/// A named source set with its own target and module path.
#[derive(Debug, Clone)]
pub struct Realm {
    /// Realm name, `main` or `test`.
    pub name: &'static str,
    /// Directory holding this realm's module sources.
    pub source: PathBuf,
    /// Directory receiving this realm's compiled output.
    pub target: PathBuf,
    /// Ordered directories searched for required modules.
    pub module_path: Vec<PathBuf>,
}

/// Immutable description of the project under the base directory.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name; configured, or derived from the base directory.
    pub name: String,
    /// Project version used to name packaged artifacts.
    pub version: String,
    /// Directory for generated binary assets.
    pub bin: PathBuf,
    /// Directory for third-party modules managed by the operator.
    pub lib: PathBuf,
    /// Local build cache directory.
    pub cache: PathBuf,
    /// Directory for resolved external modules within the cache.
    pub cached_modules: PathBuf,
    /// Main realm.
    pub main: Realm,
    /// Test realm.
    pub test: Realm,
}

impl Project {
    /// Derive the project layout for the given base directory.
    pub fn new(base: &Path, config: &Config) -> Self {
        let name = config
            .lookup(Property::ProjectName.key())
            .map(String::from)
            .unwrap_or_else(|| directory_name(base));
        let version = config.get(Property::ProjectVersion);
        let bin = base.join("bin");
        let lib = base.join("lib");
        let cache = base.join(".baton");
        let cached_modules = cache.join("modules");

        let main = Realm {
            name: "main",
            source: base.join("src"),
            target: bin.join("realm").join("main"),
            module_path: vec![lib.clone(), cached_modules.clone()],
        };
        let test = Realm {
            name: "test",
            source: base.join("src").join("test").join("java"),
            target: bin.join("realm").join("test"),
            module_path: vec![main.target.clone(), lib.clone(), cached_modules.clone()],
        };

        Self {
            name,
            version,
            bin,
            lib,
            cache,
            cached_modules,
            main,
            test,
        }
    }

    /// Source roots that actually exist on disk right now.
    pub fn source_roots(&self) -> Vec<PathBuf> {
        [&self.main, &self.test]
            .iter()
            .map(|realm| realm.source.clone())
            .filter(|source| source.is_dir())
            .collect()
    }
}

/// Name of the base directory, falling back to the built-in default for
/// nameless roots such as the filesystem root.
fn directory_name(base: &Path) -> String {
    let canonical = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| Property::ProjectName.default_value())
}
