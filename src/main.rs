//! Baton - build orchestrator for modular projects
//!
//! Resolves inter-module dependencies, drives the external toolchain
//! through a uniform execution abstraction, caches downloaded artifacts,
//! and sequences a multi-stage build pipeline from a CLI action list.

use std::path::PathBuf;

use clap::Parser;

mod actions;
mod baton;
mod cli;
mod config;
mod download;
mod error;
mod log;
mod modinfo;
mod project;
mod tool;
mod tree;

use baton::Baton;
use cli::Cli;
use error::Result;

fn run(cli: &Cli) -> Result<()> {
    let base = cli
        .base
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let mut baton = Baton::new(&base, cli.verbose, cli.overrides()?)?;
    let actions = actions::parse(&cli.tokens)?;
    actions::run(&mut baton, &actions)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
