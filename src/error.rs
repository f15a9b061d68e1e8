//! Error types and handling for Baton
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Every failure surfaces to the operator; no layer retries on its own.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Baton operations
#[derive(Error, Diagnostic, Debug)]
pub enum BatonError {
    // Action errors
    #[error("Unknown action: {token}")]
    #[diagnostic(
        code(baton::action::unknown),
        help("Run 'baton help' to list the available actions")
    )]
    UnknownAction { token: String },

    #[error("Action {action} failed")]
    #[diagnostic(code(baton::action::failed))]
    ActionFailed {
        action: String,
        #[source]
        source: Box<BatonError>,
    },

    #[error("No name supplied for action tool")]
    #[diagnostic(
        code(baton::action::missing_tool_name),
        help("Usage: baton tool <name> [<args>...]")
    )]
    MissingToolName,

    // Tool errors
    #[error("Expected {expected}, but got {actual} as result of: {command}")]
    #[diagnostic(code(baton::tool::exit_mismatch))]
    ToolExitMismatch {
        command: String,
        expected: i32,
        actual: i32,
    },

    #[error("Running tool '{name}' failed: {reason}")]
    #[diagnostic(code(baton::tool::failed))]
    ToolFailed { name: String, reason: String },

    // Configuration errors
    #[error("Loading properties failed: {path}")]
    #[diagnostic(code(baton::config::load_failed))]
    ConfigLoadFailed { path: String, reason: String },

    #[error("Invalid override '{argument}'")]
    #[diagnostic(
        code(baton::config::invalid_override),
        help("Overrides take the form -D key=value")
    )]
    InvalidOverride { argument: String },

    #[error("Invalid separator pattern '{pattern}': {reason}")]
    #[diagnostic(code(baton::config::invalid_pattern))]
    InvalidPattern { pattern: String, reason: String },

    // Descriptor errors
    #[error("Expected module descriptor unit, but got: {text}")]
    #[diagnostic(
        code(baton::descriptor::header_missing),
        help("A descriptor must contain a 'module <name> {{' header")
    )]
    DescriptorHeaderMissing { text: String },

    #[error("Reading descriptor '{path}' failed: {reason}")]
    #[diagnostic(code(baton::descriptor::read_failed))]
    DescriptorReadFailed { path: String, reason: String },

    #[error("Expected a module descriptor in parent directories of {path}")]
    #[diagnostic(code(baton::descriptor::not_found))]
    DescriptorNotFound { path: String },

    #[error("Expected package to be declared in {path}")]
    #[diagnostic(code(baton::descriptor::package_missing))]
    PackageMissing { path: String },

    #[error("Expected a type declaration in compilation unit: {path}")]
    #[diagnostic(code(baton::descriptor::type_missing))]
    TypeMissing { path: String },

    // Download errors
    #[error("Download of '{uri}' to '{target}' failed: {reason}")]
    #[diagnostic(code(baton::download::failed))]
    DownloadFailed {
        uri: String,
        target: String,
        reason: String,
    },

    #[error("Target is missing and being offline: {target}")]
    #[diagnostic(
        code(baton::download::offline_target_missing),
        help("Disable offline mode (baton.offline=false) or provide the artifact locally")
    )]
    OfflineTargetMissing { target: String },

    #[error("Invalid artifact URI: {uri}: {reason}")]
    #[diagnostic(code(baton::download::invalid_uri))]
    InvalidUri { uri: String, reason: String },

    // File system errors
    #[error("Walking path failed for: {path}: {reason}")]
    #[diagnostic(code(baton::fs::walk_failed))]
    WalkFailed { path: String, reason: String },

    #[error("Tree copy failed: {message}")]
    #[diagnostic(code(baton::fs::tree_copy_failed))]
    TreeCopyFailed { message: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(baton::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for BatonError {
    fn from(err: std::io::Error) -> Self {
        BatonError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, BatonError>;
