//! Output abstraction layer for consistent CLI output
//!
//! Detects the output mode (interactive, CI, plain) and routes every line a
//! command prints through one place, so colors and symbols follow the mode.

use std::io::{self, IsTerminal};

use colored::Colorize;
use serde::Serialize;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive terminal with colors and unicode
    Interactive,
    /// CI environment - plain text, no colors
    CI,
    /// Piped output - plain text, no colors
    Plain,
}

impl OutputMode {
    /// Detect the appropriate output mode based on environment
    pub fn detect() -> Self {
        if is_ci::cached() {
            return OutputMode::CI;
        }

        if io::stdout().is_terminal() {
            OutputMode::Interactive
        } else {
            OutputMode::Plain
        }
    }

    /// Whether colors should be used
    pub fn colors_enabled(&self) -> bool {
        matches!(self, OutputMode::Interactive)
    }

    /// Whether unicode symbols should be used
    pub fn unicode_enabled(&self) -> bool {
        matches!(self, OutputMode::Interactive)
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::detect()
    }
}

/// Centralized printer that respects output mode
#[derive(Debug, Clone)]
pub struct Printer {
    mode: OutputMode,
    quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    /// Create a new printer with auto-detected mode
    pub fn new() -> Self {
        Self::with_mode(OutputMode::detect())
    }

    /// Create a printer with a specific mode
    pub fn with_mode(mode: OutputMode) -> Self {
        Self { mode, quiet: false }
    }

    /// Suppress informational lines; results and errors still print
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn symbol(&self, unicode: &'static str, ascii: &'static str) -> &'static str {
        if self.mode.unicode_enabled() {
            unicode
        } else {
            ascii
        }
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize>(&self, value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a header with emphasis
    pub fn header(&self, text: &str) {
        if self.mode.colors_enabled() {
            println!("{}", text.cyan().bold());
        } else {
            println!("{}", text);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        let symbol = self.symbol("✓", "[OK]");
        if self.mode.colors_enabled() {
            println!("{} {}", symbol.green(), message.green());
        } else {
            println!("{} {}", symbol, message);
        }
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        let symbol = self.symbol("✗", "[ERROR]");
        if self.mode.colors_enabled() {
            eprintln!("{} {}", symbol.red(), message.red());
        } else {
            eprintln!("{} {}", symbol, message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        let symbol = self.symbol("⚠", "[WARN]");
        if self.mode.colors_enabled() {
            println!("{} {}", symbol.yellow(), message.yellow());
        } else {
            println!("{} {}", symbol, message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let symbol = self.symbol("ℹ", "[INFO]");
        if self.mode.colors_enabled() {
            println!("{} {}", symbol.cyan(), message);
        } else {
            println!("{} {}", symbol, message);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.mode.colors_enabled() {
            println!("  {}: {}", key.cyan(), value.yellow());
        } else {
            println!("  {}: {}", key, value);
        }
    }

    /// Print one list entry, optionally with a dimmed note
    pub fn item(&self, value: &str, note: Option<&str>) {
        match (note, self.mode.colors_enabled()) {
            (None, _) => println!("  {}", value),
            (Some(note), true) => println!("  {} {}", value, format!("({note})").dimmed()),
            (Some(note), false) => println!("  {} ({})", value, note),
        }
    }

    /// Print dimmed/secondary text
    pub fn dimmed(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.mode.colors_enabled() {
            println!("{}", message.dimmed());
        } else {
            println!("{}", message);
        }
    }
}
