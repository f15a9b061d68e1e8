//! Tool execution subsystem
//!
//! One uniform entry point for everything the orchestrator invokes.
//! Resolution order, first match wins: a registered in-process provider,
//! an internally mapped side-effecting tool, and finally an external
//! process launched under the configured redirect policy. All variants
//! block the calling thread until completion.

pub mod redirect;
pub mod wrappers;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::baton::Baton;
use crate::config::Property;
use crate::error::{BatonError, Result};

pub use redirect::RedirectMode;

/// Execute the named tool and return its exit code.
pub fn run(baton: &mut Baton, name: &str, args: &[String]) -> Result<i32> {
    let log = baton.log;
    log.debug(format!("run({name}, {args:?})"));

    if let Some(provider) = baton.providers.get_mut(name) {
        log.debug(format!("Running provided tool in-process: {name}"));
        return Ok(provider(args));
    }

    if let Some(&tool) = baton.tools.get(name) {
        log.debug(format!("Running mapped tool in-process: {name}"));
        tool(baton, args).map_err(|e| BatonError::ToolFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        return Ok(0);
    }

    run_process(baton, name, args)
}

/// Execute the named tool and fail unless the expected and actual exit
/// codes are equal. The failure message carries the fully reconstructed
/// command line.
pub fn run_expecting(baton: &mut Baton, expected: i32, name: &str, args: &[String]) -> Result<()> {
    let actual = run(baton, name, args)?;
    if actual != expected {
        return Err(BatonError::ToolExitMismatch {
            command: command_line(name, args),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Reconstruct the command line for diagnostics.
pub fn command_line(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, args.join(" "))
    }
}

/// Launch `name` as an external process, apply the configured redirect
/// policy, and block until completion.
fn run_process(baton: &mut Baton, name: &str, args: &[String]) -> Result<i32> {
    let log = baton.log;
    let mode = RedirectMode::parse(&baton.config.get(Property::RedirectType));
    let mut command = Command::new(name);
    command.args(args);
    match mode {
        RedirectMode::Inherit => {
            log.debug("Redirect: INHERIT");
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
        RedirectMode::Discard => {
            log.debug("Redirect: DISCARD");
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        RedirectMode::File => {
            let path = redirect_file(baton)?;
            log.debug(format!("Redirect: FILE {}", path.display()));
            let out = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| tool_failed(name, &e))?;
            let err = out.try_clone().map_err(|e| tool_failed(name, &e))?;
            command.stdout(Stdio::from(out)).stderr(Stdio::from(err));
        }
        RedirectMode::Pipe => {
            log.debug("Redirect: PIPE");
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }
    log.debug(format!("Running tool in a new process: {name}"));
    let status = if mode == RedirectMode::Pipe {
        let output = command.output().map_err(|e| tool_failed(name, &e))?;
        log.debug(String::from_utf8_lossy(&output.stdout));
        if !output.stderr.is_empty() {
            log.debug(String::from_utf8_lossy(&output.stderr));
        }
        output.status
    } else {
        command.status().map_err(|e| tool_failed(name, &e))?
    };
    Ok(status.code().unwrap_or(-1))
}

/// Resolve the redirect target file, allocating exactly one fresh
/// temporary file on first use and persisting its path for reuse by
/// subsequent invocations within the same run.
fn redirect_file(baton: &mut Baton) -> Result<PathBuf> {
    let configured = baton.config.get(Property::RedirectFile);
    if !configured.is_empty() {
        return Ok(PathBuf::from(configured));
    }
    let temp = tempfile::Builder::new()
        .prefix("baton-run-")
        .suffix(".txt")
        .tempfile()
        .map_err(BatonError::from)?;
    let (_, path) = temp.keep().map_err(|e| BatonError::IoError {
        message: e.to_string(),
    })?;
    baton
        .config
        .set(Property::RedirectFile.key(), path.display().to_string());
    Ok(path)
}

fn tool_failed(name: &str, error: &dyn std::error::Error) -> BatonError {
    BatonError::ToolFailed {
        name: name.to_string(),
        reason: error.to_string(),
    }
}
