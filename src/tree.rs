//! Filtered recursive copy, delete and find over directory trees
//!
//! Foundation for the assembly and cleanup steps of the pipeline. Copies
//! preserve modification times so the single-file timestamp comparison
//! used elsewhere stays meaningful across tree copies.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use walkdir::WalkDir;

use crate::error::{BatonError, Result};

/// Platform path separator used when joining module path entries.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Copy all files and directories from source to target directory.
#[allow(dead_code)]
pub fn copy(source: &Path, target: &Path) -> Result<()> {
    copy_filtered(source, target, &|_| true)
}

/// Copy selected files and directories from source to target directory.
/// Files whose target already exists with an equal modification time are
/// skipped.
#[allow(dead_code)]
pub fn copy_filtered(source: &Path, target: &Path, filter: &dyn Fn(&Path) -> bool) -> Result<()> {
    if !source.exists() {
        return Err(BatonError::TreeCopyFailed {
            message: format!("source must exist: {}", source.display()),
        });
    }
    if !source.is_dir() {
        return Err(BatonError::TreeCopyFailed {
            message: format!("source must be a directory: {}", source.display()),
        });
    }
    if target.exists() {
        if !target.is_dir() {
            return Err(BatonError::TreeCopyFailed {
                message: format!("target must be a directory: {}", target.display()),
            });
        }
        if target == source {
            return Ok(());
        }
        if target.starts_with(source) {
            // copying "a/" into "a/b/" would recurse forever
            return Err(BatonError::TreeCopyFailed {
                message: format!(
                    "target must not be a child of source: {}",
                    target.display()
                ),
            });
        }
    }
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_failed(source, &e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| BatonError::TreeCopyFailed {
                message: e.to_string(),
            })?;
        let destination = target.join(relative);
        let modified = FileTime::from_last_modification_time(&entry.metadata().map_err(|e| walk_failed(source, &e))?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
            continue;
        }
        if filter(entry.path()) {
            if destination.exists() {
                let existing = FileTime::from_last_modification_time(&fs::metadata(&destination)?);
                if existing == modified {
                    continue;
                }
            }
            fs::copy(entry.path(), &destination)?;
            filetime::set_file_mtime(&destination, modified)?;
        }
    }
    Ok(())
}

/// Delete all files and directories from and including the root.
pub fn delete(root: &Path) -> Result<()> {
    delete_filtered(root, &|_| true)
}

/// Delete selected files and directories from and including the root.
/// A missing root is not an error.
pub fn delete_filtered(root: &Path, filter: &dyn Fn(&Path) -> bool) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    // contents first, so directories are empty by the time they go
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = entry.map_err(|e| walk_failed(root, &e))?;
        if !filter(entry.path()) {
            continue;
        }
        let result = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };
        match result {
            Ok(()) => {}
            // a retained child keeps its ancestors alive
            Err(e) if e.kind() == std::io::ErrorKind::DirectoryNotEmpty => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// List all regular files beneath the given roots matching the filter.
pub fn find_files(roots: &[PathBuf], filter: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if !root.exists() {
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_failed(root, &e))?;
            if entry.file_type().is_file() && filter(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// List all source compilation units beneath the given root.
pub fn find_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    find_files(&[root.to_path_buf()], &is_source_file)
}

/// Whether the path points to a source compilation unit: a regular
/// `.java` file whose name contains no further dots.
pub fn is_source_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match name.strip_suffix(".java") {
        Some(stem) => !stem.is_empty() && !stem.contains('.'),
        None => false,
    }
}

/// Join paths into a single string using the platform path separator.
pub fn join(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}

fn walk_failed(root: &Path, error: &dyn std::error::Error) -> BatonError {
    BatonError::WalkFailed {
        path: root.display().to_string(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_copy_recreates_tree_and_preserves_mtime() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let target = temp.path().join("target");
        touch(&source.join("a/one.java"), "class One {}");
        touch(&source.join("b/two.txt"), "two");
        let mtime = FileTime::from_unix_time(1_500_000_000, 0);
        filetime::set_file_mtime(source.join("a/one.java"), mtime).unwrap();

        copy(&source, &target).unwrap();

        assert!(target.join("a/one.java").is_file());
        assert!(target.join("b/two.txt").is_file());
        let copied = FileTime::from_last_modification_time(
            &fs::metadata(target.join("a/one.java")).unwrap(),
        );
        assert_eq!(copied, mtime);
    }

    #[test]
    fn test_copy_filtered_skips_unselected_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let target = temp.path().join("target");
        touch(&source.join("keep.java"), "class Keep {}");
        touch(&source.join("drop.class"), "");

        copy_filtered(&source, &target, &|p| is_source_file(p)).unwrap();

        assert!(target.join("keep.java").is_file());
        assert!(!target.join("drop.class").exists());
    }

    #[test]
    fn test_copy_rejects_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy(&temp.path().join("nope"), &temp.path().join("target"));
        assert!(matches!(result, Err(BatonError::TreeCopyFailed { .. })));
    }

    #[test]
    fn test_copy_rejects_target_inside_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let target = source.join("child");
        fs::create_dir_all(&target).unwrap();
        let result = copy(&source, &target);
        assert!(matches!(result, Err(BatonError::TreeCopyFailed { .. })));
    }

    #[test]
    fn test_delete_removes_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("bin");
        touch(&root.join("realm/main/Foo.class"), "");
        delete(&root).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_delete_missing_root_is_noop() {
        let temp = TempDir::new().unwrap();
        assert!(delete(&temp.path().join("absent")).is_ok());
    }

    #[test]
    fn test_delete_filtered_keeps_unselected() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("bin");
        touch(&root.join("drop.txt"), "");
        touch(&root.join("keep.txt"), "");
        delete_filtered(&root, &|p| {
            p.file_name().and_then(|n| n.to_str()) != Some("keep.txt")
        })
        .unwrap();
        assert!(root.join("keep.txt").exists());
        assert!(!root.join("drop.txt").exists());
    }

    #[test]
    fn test_find_source_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        touch(&root.join("m/Program.java"), "");
        touch(&root.join("m/notes.txt"), "");
        touch(&root.join("m/Weird.extra.java"), "");
        let files = find_source_files(&root).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Program.java"));
    }

    #[test]
    fn test_is_source_file_requires_single_dot() {
        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("Program.java");
        let dotted = temp.path().join("Program.test.java");
        fs::write(&plain, "").unwrap();
        fs::write(&dotted, "").unwrap();
        assert!(is_source_file(&plain));
        assert!(!is_source_file(&dotted));
    }

    #[test]
    fn test_join_uses_platform_separator() {
        let joined = join(&[PathBuf::from("lib"), PathBuf::from("cache")]);
        assert_eq!(joined, format!("lib{}cache", PATH_SEPARATOR));
    }
}
