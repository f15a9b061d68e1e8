//! Cached artifact download manager
//!
//! Fetch-by-URI into a destination directory with timestamp-based
//! freshness: a local file whose modification time equals the remote
//! resource's Last-Modified value is trusted as identical and the
//! transfer is skipped. No content hashing; the stamp is the sole
//! invalidation signal. Offline mode never touches the network.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{BatonError, Result};
use crate::log::Log;

/// One remote resource opened for transfer.
struct Resource {
    reader: Box<dyn Read>,
    last_modified: SystemTime,
    length: Option<u64>,
}

/// Download the resource at `uri` into the `destination` directory and
/// return the local path. The file name is the last path segment of the
/// URI.
pub fn download(log: &Log, offline: bool, destination: &Path, uri: &str) -> Result<PathBuf> {
    log.debug(format!("download({uri})"));
    let file_name = extract_file_name(uri)?;
    fs::create_dir_all(destination).map_err(|e| failed(uri, destination, &e))?;
    let target = destination.join(&file_name);

    if offline {
        if target.exists() {
            log.debug("Offline mode is active and target already exists.");
            return Ok(target);
        }
        return Err(BatonError::OfflineTargetMissing {
            target: target.display().to_string(),
        });
    }

    let resource = open(uri)?;
    let remote_modified = FileTime::from_system_time(resource.last_modified);
    if target.exists() {
        log.debug("Local target file exists. Comparing last modified timestamps...");
        let local_modified =
            FileTime::from_last_modification_time(&fs::metadata(&target).map_err(|e| failed(uri, &target, &e))?);
        log.debug(format!(" o Remote Last Modified -> {remote_modified:?}"));
        log.debug(format!(" o Target Last Modified -> {local_modified:?}"));
        if local_modified == remote_modified {
            log.debug(format!("Already downloaded {file_name} previously."));
            return Ok(target);
        }
        log.debug("Local target file differs from remote source, replacing it...");
    }

    log.debug(format!("Transferring {uri}"));
    transfer(resource, &target, uri)?;
    filetime::set_file_mtime(&target, remote_modified).map_err(|e| failed(uri, &target, &e))?;
    let size = fs::metadata(&target).map(|m| m.len()).unwrap_or_default();
    log.debug(format!(" o Remote   -> {uri}"));
    log.debug(format!(" o Target   -> {}", target.display()));
    log.debug(format!(" o Modified -> {remote_modified:?}"));
    log.debug(format!(" o Size     -> {size} bytes"));
    log.debug(format!("Downloaded {file_name} successfully."));
    Ok(target)
}

/// Extract the last path element of the URI, without query or fragment.
pub fn extract_file_name(uri: &str) -> Result<String> {
    let path = uri
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() || name.contains(':') {
        return Err(BatonError::InvalidUri {
            uri: uri.to_string(),
            reason: "no file name in path".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Open the remote resource and read its metadata. `file://` URIs are
/// served from the local filesystem, everything else over HTTP.
fn open(uri: &str) -> Result<Resource> {
    if let Some(rest) = uri.strip_prefix("file://") {
        let source = PathBuf::from(rest);
        let metadata = fs::metadata(&source).map_err(|e| failed(uri, &source, &e))?;
        let last_modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        let reader = File::open(&source).map_err(|e| failed(uri, &source, &e))?;
        return Ok(Resource {
            reader: Box::new(reader),
            last_modified,
            length: Some(metadata.len()),
        });
    }

    let response = ureq::get(uri).call().map_err(|e| BatonError::DownloadFailed {
        uri: uri.to_string(),
        target: String::new(),
        reason: e.to_string(),
    })?;
    let last_modified = response
        .header("last-modified")
        .and_then(|value| chrono::DateTime::parse_from_rfc2822(value).ok())
        .map_or_else(SystemTime::now, |parsed| {
            SystemTime::from(parsed.with_timezone(&chrono::Utc))
        });
    let length = response
        .header("content-length")
        .and_then(|value| value.parse::<u64>().ok());
    Ok(Resource {
        reader: Box::new(response.into_reader()),
        last_modified,
        length,
    })
}

/// Stream the resource body to the target file, with a progress bar for
/// sized remote transfers.
fn transfer(resource: Resource, target: &Path, uri: &str) -> Result<()> {
    let mut output = File::create(target).map_err(|e| failed(uri, target, &e))?;
    let mut reader = resource.reader;
    match resource.length {
        Some(length) if length > 0 && !uri.starts_with("file://") => {
            let bar = ProgressBar::new(length);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            let mut wrapped = bar.wrap_read(&mut reader);
            std::io::copy(&mut wrapped, &mut output).map_err(|e| failed(uri, target, &e))?;
            bar.finish_and_clear();
        }
        _ => {
            std::io::copy(&mut reader, &mut output).map_err(|e| failed(uri, target, &e))?;
        }
    }
    Ok(())
}

fn failed(uri: &str, target: &Path, error: &dyn std::error::Error) -> BatonError {
    BatonError::DownloadFailed {
        uri: uri.to_string(),
        target: target.display().to_string(),
        reason: error.to_string(),
    }
}
