//! CLI definitions using clap derive API
//!
//! There are no subcommands: everything after the flags is a raw action
//! token stream handed to the dispatcher, so that `baton tool java
//! --show-version` keeps working even though `--show-version` looks like
//! a flag to clap.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};

use crate::error::{BatonError, Result};

/// Baton - build orchestrator for modular projects
#[derive(Parser, Debug)]
#[command(
    name = "baton",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build orchestrator for modular projects",
    long_about = "Baton resolves inter-module dependencies, drives an external toolchain \
                  through a uniform execution abstraction, caches downloaded artifacts, and \
                  sequences a multi-stage build pipeline from an action list.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  baton                                  \x1b[90m# Default action: build\x1b[0m\n   \
                  baton clean build launch               \x1b[90m# Rebuild, then run the main program\x1b[0m\n   \
                  baton erase                            \x1b[90m# Drop binaries and the local cache\x1b[0m\n   \
                  baton -D baton.offline=true build      \x1b[90m# Build without network access\x1b[0m\n   \
                  baton tool java --show-version         \x1b[90m# Run a named tool with raw arguments\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Base directory of the project (defaults to current directory)
    #[arg(long = "base", short = 'C', env = "BATON_BASE")]
    pub base: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Resolve artifacts from local caches only, never the network
    #[arg(long)]
    pub offline: bool,

    /// Override a configuration property, -D key=value (repeatable)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// Actions to perform, in order (default: build)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

impl Cli {
    /// Collect the runtime override tier from `-D` definitions and the
    /// `--offline` shortcut.
    pub fn overrides(&self) -> Result<BTreeMap<String, String>> {
        let mut overrides = BTreeMap::new();
        for definition in &self.define {
            let (key, value) =
                definition
                    .split_once('=')
                    .ok_or_else(|| BatonError::InvalidOverride {
                        argument: definition.clone(),
                    })?;
            overrides.insert(key.trim().to_string(), value.to_string());
        }
        if self.offline {
            overrides.insert("baton.offline".to_string(), "true".to_string());
        }
        Ok(overrides)
    }
}
