//! Console output helper
//!
//! All subsystems report through a single `Log` value owned by the run
//! context. Error lines always reach stderr; debug lines appear only in
//! verbose mode. Threshold filtering beyond the verbose flag is out of
//! scope here.

use console::style;

/// Logging helper shared by all subsystems of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Log {
    verbose: bool,
}

impl Log {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Log a debug message; suppressed unless verbose mode is active.
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbose {
            println!("{}", style(message.as_ref()).dim());
        }
    }

    /// Log an informational message to standard out.
    pub fn info(&self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
    }

    /// Log an error message to standard error.
    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("{}", style(message.as_ref()).red());
    }
}
