//! Internally mapped side-effecting tools
//!
//! Thin invocation contracts around wrapped tools: each one downloads
//! its archive into the per-user tool home (cache-aware) and delegates
//! to the execution subsystem. The bodies of the wrapped tools
//! themselves are not Baton's concern.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::baton::Baton;
use crate::config::Property;
use crate::download;
use crate::error::{BatonError, Result};
use crate::tool::run_expecting;
use crate::tree;

/// Run the source formatter with raw arguments.
pub fn format(baton: &mut Baton, args: &[String]) -> Result<()> {
    baton.log.debug(format!("format({args:?})"));
    let jar = tool_archive(baton, "format", Property::UriFormat)?;
    let mut arguments = vec!["-jar".to_string(), jar.display().to_string()];
    arguments.extend(args.iter().cloned());
    let launcher = baton.config.get(Property::ToolLauncher);
    run_expecting(baton, 0, &launcher, &arguments)
}

/// Run the source formatter over all compilation units beneath the
/// given roots. Retained as a callable utility; not wired into the
/// default action set.
#[allow(dead_code)]
pub fn format_roots(baton: &mut Baton, replace: bool, roots: &[PathBuf]) -> Result<()> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_dir() {
            files.extend(tree::find_source_files(root)?);
        }
    }
    if files.is_empty() {
        return Ok(());
    }
    let mut args: Vec<String> = if replace {
        vec!["--replace".to_string()]
    } else {
        vec!["--dry-run".to_string(), "--set-exit-if-changed".to_string()]
    };
    args.extend(files.iter().map(|f| f.display().to_string()));
    format(baton, &args)
}

/// Run the test-runner console launcher.
pub fn junit(baton: &mut Baton, args: &[String]) -> Result<()> {
    baton.log.debug(format!("junit({args:?})"));
    let jar = tool_archive(baton, "junit", Property::UriTestRunner)?;
    let mut arguments = vec![
        "--class-path".to_string(),
        jar.display().to_string(),
        "org.junit.platform.console.ConsoleLauncher".to_string(),
    ];
    arguments.extend(args.iter().cloned());
    let launcher = baton.config.get(Property::ToolLauncher);
    run_expecting(baton, 0, &launcher, &arguments)
}

/// Run the packaging client, unpacking its binary archive on first use.
pub fn maven(baton: &mut Baton, args: &[String]) -> Result<()> {
    baton.log.debug(format!("maven({args:?})"));
    let archive = tool_archive(baton, "maven", Property::UriPackagingTool)?;
    baton.log.debug(format!("unpack({})", archive.display()));
    let home = unpack(&archive)?;
    let name = if cfg!(windows) { "mvn.cmd" } else { "mvn" };
    let executable = home.join("bin").join(name);
    make_executable(&executable)?;
    run_expecting(baton, 0, &executable.display().to_string(), args)
}

/// Download a tool archive into `{tool-home}/{tool-name}` and return the
/// local path, honoring offline mode and the timestamp cache.
fn tool_archive(baton: &mut Baton, tool_name: &str, uri_property: Property) -> Result<PathBuf> {
    let home = PathBuf::from(baton.config.get(Property::ToolHome));
    let uri = baton.config.get(uri_property);
    download::download(&baton.log, baton.config.offline(), &home.join(tool_name), &uri)
}

/// Unpack a gzipped tar archive next to itself. When the archive holds a
/// single root directory, that directory is returned; otherwise the
/// parent itself.
fn unpack(archive: &Path) -> Result<PathBuf> {
    let destination = archive
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| BatonError::IoError {
            message: format!("archive has no parent directory: {}", archive.display()),
        })?;
    let file = File::open(archive)?;
    let decoder = flate2::read::GzDecoder::new(file);
    tar::Archive::new(decoder).unpack(&destination)?;

    let mut directories = Vec::new();
    for entry in std::fs::read_dir(&destination)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            directories.push(entry.path());
        }
    }
    match directories.as_slice() {
        [single] => Ok(single.clone()),
        _ => Ok(destination),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        let mut permissions = std::fs::metadata(path)?.permissions();
        permissions.set_mode(permissions.mode() | 0o755);
        std::fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
