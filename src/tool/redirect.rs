//! Subprocess output redirection policy

/// Handling of a subprocess's output and error streams. Selected by the
/// `baton.run.redirect.type` property; an unrecognized value falls back
/// to the default, `Pipe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectMode {
    /// Subprocess shares the caller's standard streams.
    Inherit,
    /// Output and error streams are dropped.
    Discard,
    /// Combined stdout and stderr appended to the configured file.
    File,
    /// Streams captured by the caller.
    #[default]
    Pipe,
}

impl RedirectMode {
    /// Parse a configured value, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "INHERIT" => RedirectMode::Inherit,
            "DISCARD" => RedirectMode::Discard,
            "FILE" => RedirectMode::File,
            _ => RedirectMode::Pipe,
        }
    }
}
