//! Built-in property catalog
//!
//! Every configurable knob has a fixed key under the `baton.` prefix and
//! a built-in default. Defaults are immutable; resolution happens in
//! [`crate::config::Config`].

use std::path::PathBuf;

/// Well-known properties with their keys and built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Offline mode flag.
    Offline,
    /// Project name; falls back to the base directory name when unset.
    ProjectName,
    /// Project version used to name packaged artifacts.
    ProjectVersion,
    /// Module (and optional entry type) to launch, `<module>[/<main-class>]`.
    LaunchModule,
    /// Extra arguments passed to the launched program.
    LaunchOptions,
    /// Redirect policy for subprocess tool runs.
    RedirectType,
    /// Redirect target file; empty means allocate a temporary file lazily.
    RedirectFile,
    /// Home directory for downloadable tool archives.
    ToolHome,
    /// Name of the external compiler tool.
    ToolCompiler,
    /// Name of the external packager tool.
    ToolPackager,
    /// Name of the external launcher tool.
    ToolLauncher,
    /// Name of the external linker tool.
    ToolLinker,
    /// URI to the formatter "all-deps" archive.
    UriFormat,
    /// URI to the test-runner console archive.
    UriTestRunner,
    /// URI to the packaging-tool binary archive.
    UriPackagingTool,
}

impl Property {
    /// The namespaced key of this property.
    pub fn key(self) -> &'static str {
        match self {
            Property::Offline => "baton.offline",
            Property::ProjectName => "baton.project.name",
            Property::ProjectVersion => "baton.project.version",
            Property::LaunchModule => "baton.project.launch.module",
            Property::LaunchOptions => "baton.project.launch.options",
            Property::RedirectType => "baton.run.redirect.type",
            Property::RedirectFile => "baton.run.redirect.file",
            Property::ToolHome => "baton.tool.home",
            Property::ToolCompiler => "baton.tool.compiler",
            Property::ToolPackager => "baton.tool.packager",
            Property::ToolLauncher => "baton.tool.launcher",
            Property::ToolLinker => "baton.tool.linker",
            Property::UriFormat => "baton.tool.uri.format",
            Property::UriTestRunner => "baton.tool.uri.junit",
            Property::UriPackagingTool => "baton.tool.uri.maven",
        }
    }

    /// The built-in default value of this property.
    pub fn default_value(self) -> String {
        match self {
            Property::Offline => "false".to_string(),
            Property::ProjectName => "project".to_string(),
            Property::ProjectVersion => "1.0.0-SNAPSHOT".to_string(),
            Property::LaunchModule => "<module>[/<main-class>]".to_string(),
            Property::LaunchOptions => String::new(),
            // Empty: create a temporary file on first use
            Property::RedirectFile => String::new(),
            Property::RedirectType => "PIPE".to_string(),
            Property::ToolHome => tool_home().display().to_string(),
            Property::ToolCompiler => "javac".to_string(),
            Property::ToolPackager => "jar".to_string(),
            Property::ToolLauncher => "java".to_string(),
            Property::ToolLinker => "jlink".to_string(),
            Property::UriFormat => concat!(
                "https://github.com/",
                "google/google-java-format/releases/download/google-java-format-1.7/",
                "google-java-format-1.7-all-deps.jar"
            )
            .to_string(),
            Property::UriTestRunner => concat!(
                "https://repo1.maven.org/maven2",
                "/org/junit/platform/junit-platform-console-standalone/1.4.0/",
                "junit-platform-console-standalone-1.4.0.jar"
            )
            .to_string(),
            Property::UriPackagingTool => concat!(
                "https://archive.apache.org/",
                "dist/maven/maven-3/3.6.0/binaries/",
                "apache-maven-3.6.0-bin.tar.gz"
            )
            .to_string(),
        }
    }
}

/// Per-user home for downloaded tool archives, `~/.baton/tool`.
fn tool_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".baton")
        .join("tool")
}
