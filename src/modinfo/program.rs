//! Entry-point discovery
//!
//! A compilation unit qualifies as a program when its text contains the
//! fixed main-entry signature token. The enclosing module is found by
//! walking parent directories up to the nearest descriptor; package and
//! type names come from the first pattern match in the unit itself.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BatonError, Result};
use crate::modinfo::{DESCRIPTOR_FILE, ModuleInfo};
use crate::tree;

/// Fixed token marking a main entry signature.
const ENTRY_POINT_TOKEN: &str = "static void main(String";

fn package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"(?s)package\s+(.+?);").expect("valid package pattern")
    })
}

fn type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"\b(?:class|interface|enum)\s+([A-Za-z_][A-Za-z0-9_]*)")
            .expect("valid type pattern")
    })
}

/// Find the first program beneath the root, or `None` when no unit
/// qualifies.
pub fn find_program(root: &Path) -> Result<Option<String>> {
    let programs = find_programs(root, true)?;
    Ok(programs.into_iter().next())
}

/// Find the first or all programs beneath the root, in directory
/// traversal order. Identifiers take the shape `<module>/<package>.<type>`.
pub fn find_programs(root: &Path, first_only: bool) -> Result<Vec<String>> {
    let mut programs = Vec::new();
    for unit in tree::find_source_files(root)? {
        let source = std::fs::read_to_string(&unit)?;
        if !source.contains(ENTRY_POINT_TOKEN) {
            continue;
        }
        let module_name = enclosing_module(&unit)?.name;
        let package_name = package_pattern()
            .captures(&source)
            .map(|c| c[1].trim().to_string())
            .ok_or_else(|| BatonError::PackageMissing {
                path: unit.display().to_string(),
            })?;
        let type_name = type_pattern()
            .captures(&source)
            .map(|c| c[1].to_string())
            .ok_or_else(|| BatonError::TypeMissing {
                path: unit.display().to_string(),
            })?;
        programs.push(format!("{module_name}/{package_name}.{type_name}"));
        if first_only {
            break;
        }
    }
    Ok(programs)
}

/// Walk parent directories upward until a descriptor file is found.
fn enclosing_module(unit: &Path) -> Result<ModuleInfo> {
    let mut directory = unit.parent();
    while let Some(current) = directory {
        if current.join(DESCRIPTOR_FILE).exists() {
            return ModuleInfo::of_path(current);
        }
        directory = current.parent();
    }
    Err(BatonError::DescriptorNotFound {
        path: unit.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PROGRAM_UNIT: &str = "package modular;\n\
         \n\
         public class Program {\n\
         \x20 public static void main(String... args) {\n\
         \x20   System.out.println(\"hi\");\n\
         \x20 }\n\
         }\n";

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn minimal_module(root: &Path) -> PathBuf {
        let module = root.join("minimal");
        write(&module.join(DESCRIPTOR_FILE), "module minimal {}");
        write(&module.join("modular/Program.java"), PROGRAM_UNIT);
        module
    }

    #[test]
    fn test_find_program_builds_identifier() {
        let temp = TempDir::new().unwrap();
        minimal_module(temp.path());
        let program = find_program(temp.path()).unwrap();
        assert_eq!(program.as_deref(), Some("minimal/modular.Program"));
    }

    #[test]
    fn test_find_program_without_entry_point_is_none() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("quiet");
        write(&module.join(DESCRIPTOR_FILE), "module quiet {}");
        write(
            &module.join("modular/Helper.java"),
            "package modular;\npublic class Helper {}\n",
        );
        assert_eq!(find_program(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_find_programs_collects_all_hits() {
        let temp = TempDir::new().unwrap();
        minimal_module(temp.path());
        let other = temp.path().join("other");
        write(&other.join(DESCRIPTOR_FILE), "module other {}");
        write(
            &other.join("tools/Runner.java"),
            "package tools;\npublic class Runner {\n\
             \x20 public static void main(String[] args) {}\n}\n",
        );
        let programs = find_programs(temp.path(), false).unwrap();
        assert_eq!(
            programs,
            vec!["minimal/modular.Program", "other/tools.Runner"]
        );
    }

    #[test]
    fn test_first_match_mode_stops_at_first_hit() {
        let temp = TempDir::new().unwrap();
        minimal_module(temp.path());
        let other = temp.path().join("zz-later");
        write(&other.join(DESCRIPTOR_FILE), "module later {}");
        write(&other.join("pkg/Late.java"), PROGRAM_UNIT);
        let programs = find_programs(temp.path(), true).unwrap();
        assert_eq!(programs, vec!["minimal/modular.Program"]);
    }

    #[test]
    fn test_missing_descriptor_in_ancestry_fails() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("orphan/Program.java"), PROGRAM_UNIT);
        let result = find_program(temp.path());
        assert!(matches!(result, Err(BatonError::DescriptorNotFound { .. })));
    }

    #[test]
    fn test_missing_package_declaration_fails() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("nopkg");
        write(&module.join(DESCRIPTOR_FILE), "module nopkg {}");
        write(
            &module.join("Program.java"),
            "public class Program {\n\
             \x20 public static void main(String[] args) {}\n}\n",
        );
        let result = find_program(temp.path());
        assert!(matches!(result, Err(BatonError::PackageMissing { .. })));
    }

    #[test]
    fn test_missing_type_declaration_fails() {
        let temp = TempDir::new().unwrap();
        let module = temp.path().join("typeless");
        write(&module.join(DESCRIPTOR_FILE), "module typeless {}");
        write(
            &module.join("Fragment.java"),
            "package typeless;\n// static void main(String token only, no type\n",
        );
        let result = find_program(temp.path());
        assert!(matches!(result, Err(BatonError::TypeMissing { .. })));
    }
}
