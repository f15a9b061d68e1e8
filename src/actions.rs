//! Action dispatcher
//!
//! Turns the CLI token stream into an ordered action list and executes
//! it strictly in order. Each action is gated by a configuration key
//! `baton.action.<id>.enabled` that defaults to enabled; a disabled
//! action is skipped without side effects. The first failure aborts
//! everything still queued.

use std::fs;

use crate::baton::Baton;
use crate::error::{BatonError, Result};
use crate::project::pipeline;
use crate::tool;
use crate::tree;

/// One unit of orchestrated work requested via the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Build the modular project in the base directory.
    Build,
    /// Delete generated binary assets, keeping caches intact.
    Clean,
    /// Delete generated binary assets and the project cache directory.
    Erase,
    /// Print the help screen on standard out.
    Help,
    /// Start the project's main program.
    Launch,
    /// Create a modular sample project in the base directory.
    Scaffold,
    /// Run the named tool with all remaining tokens as its arguments.
    Tool { name: String, args: Vec<String> },
}

/// Identifier, help lines. Order matters for the help screen.
const DESCRIPTIONS: &[(&str, &[&str])] = &[
    ("build", &["Build modular project in base directory."]),
    ("clean", &["Delete all generated assets - but keep caches intact."]),
    ("erase", &["Delete all generated assets - and also delete caches."]),
    ("help", &["Print this help screen on standard out... F1, F1, F1!"]),
    ("launch", &["Start project's main program."]),
    (
        "tool",
        &[
            "Run named tool consuming all remaining arguments:",
            "  tool <name> <args...>",
            "  tool java --show-version Program.java",
        ],
    ),
    ("scaffold", &["Create modular sample project in base directory."]),
];

impl Action {
    /// Lower-case identifier, also the middle segment of the gate key.
    pub fn id(&self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::Clean => "clean",
            Action::Erase => "erase",
            Action::Help => "help",
            Action::Launch => "launch",
            Action::Scaffold => "scaffold",
            Action::Tool { .. } => "tool",
        }
    }
}

/// Transform tokens to actions. An empty stream yields exactly one
/// default build action. Only "tool" is variadic: it takes the next
/// token as a tool name and the entire remainder as arguments.
pub fn parse(tokens: &[String]) -> Result<Vec<Action>> {
    if tokens.is_empty() {
        return Ok(vec![Action::Build]);
    }
    let mut actions = Vec::new();
    let mut remaining = tokens.iter();
    while let Some(token) = remaining.next() {
        let action = match token.to_lowercase().as_str() {
            "build" => Action::Build,
            "clean" => Action::Clean,
            "erase" => Action::Erase,
            "help" => Action::Help,
            "launch" => Action::Launch,
            "scaffold" => Action::Scaffold,
            "tool" => {
                let name = remaining.next().ok_or(BatonError::MissingToolName)?;
                let args = remaining.map(String::clone).collect();
                actions.push(Action::Tool {
                    name: name.clone(),
                    args,
                });
                break;
            }
            _ => {
                return Err(BatonError::UnknownAction {
                    token: token.clone(),
                });
            }
        };
        actions.push(action);
    }
    Ok(actions)
}

/// Execute actions sequentially, gate-checked, fail-fast.
pub fn run(baton: &mut Baton, actions: &[Action]) -> Result<()> {
    let log = baton.log;
    log.debug(format!("Performing {} action(s)...", actions.len()));
    for action in actions {
        let gate = format!("baton.action.{}.enabled", action.id());
        if !baton.config.is_enabled(&gate) {
            log.info(format!("Action {} disabled.", action.id()));
            continue;
        }
        log.debug(format!(">> {}", action.id()));
        if let Err(e) = perform(baton, action) {
            log.error(e.to_string());
            return Err(BatonError::ActionFailed {
                action: action.id().to_string(),
                source: Box::new(e),
            });
        }
        log.debug(format!("<< {}", action.id()));
    }
    Ok(())
}

fn perform(baton: &mut Baton, action: &Action) -> Result<()> {
    match action {
        Action::Build => pipeline::build(baton),
        Action::Clean => clean(baton),
        Action::Erase => erase(baton),
        Action::Help => {
            help(baton);
            Ok(())
        }
        Action::Launch => pipeline::launch(baton),
        Action::Scaffold => scaffold(baton),
        Action::Tool { name, args } => tool::run_expecting(baton, 0, name, args),
    }
}

/// Delete generated binary assets.
fn clean(baton: &mut Baton) -> Result<()> {
    baton.log.debug("clean()");
    if baton.project.bin.exists() {
        tree::delete(&baton.project.bin)?;
    }
    Ok(())
}

/// Delete generated binary assets and the project cache directory.
fn erase(baton: &mut Baton) -> Result<()> {
    baton.log.debug("erase()");
    clean(baton)?;
    if baton.project.cache.exists() {
        tree::delete(&baton.project.cache)?;
    }
    Ok(())
}

/// Print the help screen on standard out.
fn help(baton: &Baton) {
    baton.log.debug("help()");
    println!();
    println!(
        "Usage of Baton ({}):  baton [<action>...]",
        env!("CARGO_PKG_VERSION")
    );
    println!("Available default actions are:");
    for (name, lines) in DESCRIPTIONS {
        let mut lines = lines.iter();
        if let Some(first) = lines.next() {
            println!(" {name:<9}    {first}");
        }
        for line in lines {
            println!("{}{line}", " ".repeat(14));
        }
    }
    println!();
}

/// Create a minimal modular sample project beneath the base directory.
fn scaffold(baton: &mut Baton) -> Result<()> {
    baton.log.debug("scaffold()");
    let log = baton.log;
    let name = baton.project.name.clone();
    let module = name.replace('-', ".");
    let root = baton.base.join("src").join(&module);
    if root.exists() {
        log.info(format!("Skipping scaffold, {} exists.", root.display()));
        return Ok(());
    }
    let package = root.join(&module);
    fs::create_dir_all(&package)?;
    fs::write(
        root.join("module-info.java"),
        format!("module {module} {{}}\n"),
    )?;
    fs::write(
        package.join("Main.java"),
        format!(
            "package {module};\n\n\
             public class Main {{\n\
             \x20 public static void main(String... args) {{\n\
             \x20   System.out.println(\"{module}\");\n\
             \x20 }}\n\
             }}\n"
        ),
    )?;
    log.info(format!("Created sample module {module}."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::Path;
    use tempfile::TempDir;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn baton_with(base: &Path, overrides: &[(&str, &str)]) -> Baton {
        let overrides = overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        Baton::new(base, false, overrides).unwrap()
    }

    #[test]
    fn test_parse_empty_yields_default_build() {
        assert_eq!(parse(&[]).unwrap(), vec![Action::Build]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let actions = parse(&tokens(&["CLEAN", "Build", "hElP"])).unwrap();
        assert_eq!(actions, vec![Action::Clean, Action::Build, Action::Help]);
    }

    #[test]
    fn test_parse_tool_consumes_all_remaining_tokens() {
        let actions = parse(&tokens(&["clean", "tool", "echo", "hi", "there"])).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Clean,
                Action::Tool {
                    name: "echo".to_string(),
                    args: tokens(&["hi", "there"]),
                }
            ]
        );
    }

    #[test]
    fn test_parse_tool_without_name_fails() {
        let err = parse(&tokens(&["tool"])).unwrap_err();
        assert!(matches!(err, BatonError::MissingToolName));
    }

    #[test]
    fn test_parse_unknown_token_fails() {
        let err = parse(&tokens(&["bogus"])).unwrap_err();
        match err {
            BatonError::UnknownAction { token } => assert_eq!(token, "bogus"),
            other => panic!("expected UnknownAction, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_deletes_bin_and_keeps_cache() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("bin/realm/main")).unwrap();
        fs::create_dir_all(base.join(".baton/modules")).unwrap();
        let mut baton = baton_with(base, &[]);

        run(&mut baton, &[Action::Clean]).unwrap();

        assert!(!base.join("bin").exists());
        assert!(base.join(".baton/modules").is_dir());
    }

    #[test]
    fn test_erase_also_deletes_cache() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("bin")).unwrap();
        fs::create_dir_all(base.join(".baton/modules")).unwrap();
        let mut baton = baton_with(base, &[]);

        run(&mut baton, &[Action::Erase]).unwrap();

        assert!(!base.join("bin").exists());
        assert!(!base.join(".baton").exists());
    }

    #[test]
    fn test_disabled_gate_skips_action_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("bin")).unwrap();
        fs::create_dir_all(base.join(".baton")).unwrap();
        let mut baton = baton_with(base, &[("baton.action.clean.enabled", "false")]);

        run(&mut baton, &[Action::Clean, Action::Erase]).unwrap();

        // clean was skipped, erase still ran
        assert!(!base.join("bin").exists());
        assert!(!base.join(".baton").exists());
    }

    #[test]
    fn test_failure_aborts_remaining_actions() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("bin")).unwrap();
        let mut baton = baton_with(base, &[]);
        baton.register_provider("failing", Box::new(|_| 1));

        let failing = Action::Tool {
            name: "failing".to_string(),
            args: Vec::new(),
        };
        let err = run(&mut baton, &[failing, Action::Clean]).unwrap_err();

        match err {
            BatonError::ActionFailed { action, source } => {
                assert_eq!(action, "tool");
                assert!(matches!(*source, BatonError::ToolExitMismatch { .. }));
            }
            other => panic!("expected ActionFailed, got {other:?}"),
        }
        // clean never ran
        assert!(base.join("bin").is_dir());
    }

    #[test]
    fn test_tool_action_runs_provider_with_arguments() {
        let temp = TempDir::new().unwrap();
        let mut baton = baton_with(temp.path(), &[]);
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let recorder = std::rc::Rc::clone(&seen);
        baton.register_provider(
            "echo",
            Box::new(move |args| {
                recorder.borrow_mut().extend(args.to_vec());
                0
            }),
        );

        let action = Action::Tool {
            name: "echo".to_string(),
            args: tokens(&["hi", "there"]),
        };
        run(&mut baton, &[action]).unwrap();
        assert_eq!(*seen.borrow(), tokens(&["hi", "there"]));
    }

    #[test]
    fn test_scaffold_creates_sample_module() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        let mut baton = baton_with(base, &[("baton.project.name", "demo")]);

        run(&mut baton, &[Action::Scaffold]).unwrap();

        let descriptor = base.join("src/demo/module-info.java");
        assert!(descriptor.is_file());
        let info = crate::modinfo::ModuleInfo::of_path(&descriptor).unwrap();
        assert_eq!(info.name, "demo");
        let program = crate::modinfo::program::find_program(&base.join("src")).unwrap();
        assert_eq!(program.as_deref(), Some("demo/demo.Main"));
    }

    #[test]
    fn test_scaffold_skips_existing_module_directory() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("src/demo")).unwrap();
        let mut baton = baton_with(base, &[("baton.project.name", "demo")]);

        run(&mut baton, &[Action::Scaffold]).unwrap();
        assert!(!base.join("src/demo/module-info.java").exists());
    }
}
