//! Run context
//!
//! One `Baton` is constructed per invocation from the base directory and
//! owns everything subsystems share: configuration, logging, the project
//! model and both tool registries. Execution is strictly single-threaded,
//! so the context is passed around as a plain mutable reference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::log::Log;
use crate::project::Project;
use crate::tool::wrappers;

/// In-process tool provider: takes arguments, returns an exit code.
pub type ProviderTool = Box<dyn FnMut(&[String]) -> i32>;

/// Internally mapped side-effecting tool.
pub type MappedTool = fn(&mut Baton, &[String]) -> Result<()>;

/// Build orchestrator context, owned once per run.
pub struct Baton {
    /// Base path, defaults to the user's current working directory.
    pub base: PathBuf,
    /// Logging helper.
    pub log: Log,
    /// Three-tier configuration.
    pub config: Config,
    /// Project model derived from base directory and configuration.
    pub project: Project,
    /// Platform-registered in-process tool providers; consulted first.
    pub providers: BTreeMap<String, ProviderTool>,
    /// Internally mapped tools; consulted second.
    pub tools: BTreeMap<&'static str, MappedTool>,
}

impl Baton {
    /// Initialize the context for the project rooted at `base`.
    pub fn new(
        base: &Path,
        verbose: bool,
        overrides: BTreeMap<String, String>,
    ) -> Result<Self> {
        let config = Config::load(base, overrides)?;
        let project = Project::new(base, &config);
        let mut tools: BTreeMap<&'static str, MappedTool> = BTreeMap::new();
        tools.insert("format", wrappers::format);
        tools.insert("junit", wrappers::junit);
        tools.insert("maven", wrappers::maven);
        Ok(Self {
            base: base.to_path_buf(),
            log: Log::new(verbose),
            config,
            project,
            providers: BTreeMap::new(),
            tools,
        })
    }

    /// Register an in-process tool provider under the given name.
    pub fn register_provider(&mut self, name: &str, provider: ProviderTool) {
        self.providers.insert(name.to_string(), provider);
    }
}
