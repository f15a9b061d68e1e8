//! Multi-realm build pipeline
//!
//! Stages run strictly ordered with no branching back:
//! INIT → ASSEMBLE → COMPILE(main) → COMPILE(test) → PACKAGE → DONE.
//! A non-zero compiler exit aborts the whole build immediately; an
//! unmapped external module does not abort assembly but surfaces later
//! as a resolution gap in the compile stage.

use std::fs;
use std::path::PathBuf;

use crate::baton::Baton;
use crate::config::Property;
use crate::download;
use crate::error::Result;
use crate::modinfo::{self, program};
use crate::project::Realm;
use crate::tool;
use crate::tree;

/// Build all and everything.
pub fn build(baton: &mut Baton) -> Result<()> {
    let log = baton.log;
    log.debug("build()");
    assemble(baton)?;
    let main = baton.project.main.clone();
    compile(baton, &main)?;
    let test = baton.project.test.clone();
    if test.source.is_dir() {
        compile(baton, &test)?;
    }
    package(baton)?;
    log.info("Build successful.");
    Ok(())
}

/// Format all realm sources, then resolve external modules into the
/// project cache.
pub fn assemble(baton: &mut Baton) -> Result<()> {
    let log = baton.log;
    log.debug("assemble()");

    let roots = baton.project.source_roots();
    let mut units = Vec::new();
    for root in &roots {
        units.extend(tree::find_source_files(root)?);
    }
    if !units.is_empty() {
        let mut args = vec!["--replace".to_string()];
        args.extend(units.iter().map(|unit| unit.display().to_string()));
        tool::run_expecting(baton, 0, "format", &args)?;
    }

    let launcher = baton.config.get(Property::ToolLauncher);
    let builtin = modinfo::platform_module_names(&log, &launcher);
    let externals = modinfo::find_external_module_names(&roots, &builtin)?;
    if externals.is_empty() {
        return Ok(());
    }
    log.debug(format!(
        "External module names: [{}]",
        externals.iter().cloned().collect::<Vec<_>>().join(", ")
    ));
    let cached_modules = baton.project.cached_modules.clone();
    let offline = baton.config.offline();
    for name in &externals {
        let Some(uri) = baton.config.lookup(&format!("module.{name}")) else {
            // deferred failure: compiling will surface the gap
            log.error(format!("External module not mapped: {name}"));
            continue;
        };
        let resolved = download::download(&log, offline, &cached_modules, uri)?;
        log.debug(format!("Resolved {}", resolved.display()));
    }
    Ok(())
}

/// Compile one realm against its module path with the configured
/// compiler; any non-zero exit aborts the build.
pub fn compile(baton: &mut Baton, realm: &Realm) -> Result<()> {
    let log = baton.log;
    log.debug(format!("{}.compile()", realm.name));
    if !realm.source.is_dir() {
        log.debug(format!("No source directory for realm {}.", realm.name));
        return Ok(());
    }
    let units = tree::find_source_files(&realm.source)?;
    if units.is_empty() {
        log.debug("No compilation units found, nothing to compile.");
        return Ok(());
    }
    fs::create_dir_all(&realm.target)?;

    let mut args = vec![
        "-d".to_string(),
        realm.target.display().to_string(),
        "--module-source-path".to_string(),
        realm.source.display().to_string(),
    ];
    let module_path: Vec<PathBuf> = realm
        .module_path
        .iter()
        .filter(|entry| entry.exists())
        .cloned()
        .collect();
    if !module_path.is_empty() {
        args.push("--module-path".to_string());
        args.push(tree::join(&module_path));
    }
    args.extend(units.iter().map(|unit| unit.display().to_string()));

    let compiler = baton.config.get(Property::ToolCompiler);
    tool::run_expecting(baton, 0, &compiler, &args)
}

/// Produce one versioned artifact per compiled module, scoped to a
/// per-realm directory so equally named modules in different realms
/// never collide.
pub fn package(baton: &mut Baton) -> Result<()> {
    let log = baton.log;
    log.debug("package()");
    let project = baton.project.clone();
    let packager = baton.config.get(Property::ToolPackager);
    for realm in [&project.main, &project.test] {
        if !realm.target.is_dir() {
            continue;
        }
        let modules = project.bin.join("modules").join(realm.name);
        fs::create_dir_all(&modules)?;
        for entry in fs::read_dir(&realm.target)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let module = entry.file_name().to_string_lossy().into_owned();
            let artifact = modules.join(format!("{module}-{}.jar", project.version));
            log.debug(format!("Packaging {}", artifact.display()));
            let args = vec![
                "--create".to_string(),
                "--file".to_string(),
                artifact.display().to_string(),
                "-C".to_string(),
                entry.path().display().to_string(),
                ".".to_string(),
            ];
            tool::run_expecting(baton, 0, &packager, &args)?;
        }
    }
    Ok(())
}

/// Start the project's main program. Without a configured launch module
/// and without a discoverable entry point this logs and does nothing.
pub fn launch(baton: &mut Baton) -> Result<()> {
    let log = baton.log;
    log.debug("launch()");
    let program = match baton.config.lookup(Property::LaunchModule.key()) {
        Some(configured) => Some(configured.to_string()),
        None => program::find_program(&baton.project.main.source)?,
    };
    let Some(program) = program else {
        log.info("No <module>[/<main-class>] supplied, no launch.");
        return Ok(());
    };
    log.info(format!("Launching {program}..."));

    let module_path: Vec<PathBuf> = baton
        .project
        .test
        .module_path
        .iter()
        .filter(|entry| entry.exists())
        .cloned()
        .collect();
    let mut args = Vec::new();
    if !module_path.is_empty() {
        args.push("--module-path".to_string());
        args.push(tree::join(&module_path));
    }
    args.push("--module".to_string());
    args.push(program);
    args.extend(baton.config.get_split(Property::LaunchOptions, r"\s+")?);
    let launcher = baton.config.get(Property::ToolLauncher);
    tool::run_expecting(baton, 0, &launcher, &args)
}

/// Create a custom runtime image from the compiled main modules.
/// Callable utility; not part of the default action set.
#[allow(dead_code)]
pub fn link(baton: &mut Baton) -> Result<()> {
    let log = baton.log;
    log.info("Creating custom runtime image...");
    let project = baton.project.clone();
    let mut modules = Vec::new();
    for root in project.source_roots() {
        for unit in tree::find_files(&[root], &|p| {
            p.file_name().and_then(|n| n.to_str()) == Some(modinfo::DESCRIPTOR_FILE)
        })? {
            modules.push(modinfo::ModuleInfo::of_path(&unit)?.name);
        }
    }
    let output = project.bin.join("image");
    if output.exists() {
        tree::delete(&output)?;
    }
    let module_path: Vec<PathBuf> = project
        .test
        .module_path
        .iter()
        .filter(|entry| entry.exists())
        .cloned()
        .collect();
    let mut args = Vec::new();
    if !module_path.is_empty() {
        args.push("--module-path".to_string());
        args.push(tree::join(&module_path));
    }
    args.extend([
        "--add-modules".to_string(),
        modules.join(","),
        "--output".to_string(),
        output.display().to_string(),
    ]);
    let linker = baton.config.get(Property::ToolLinker);
    tool::run_expecting(baton, 0, &linker, &args)
}
