//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable).

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use reshape_core::Object;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a converted object or mapping
    fn format_object(&self, object: &Object) -> Result<String>;

    /// Format the registered method table
    fn format_methods(&self, methods: &BTreeMap<&str, Option<&str>>) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human readers get pretty JSON for structured data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_object(&self, object: &Object) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(reshape_core::codec::encode(object)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(reshape_core::codec::encode_pretty(object)?)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(object)?),
        }
    }

    fn format_methods(&self, methods: &BTreeMap<&str, Option<&str>>) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_methods_human(methods)),
            _ => self.format(methods),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose == 0 || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
        } else {
            self.writeln(&format!("DEBUG: {}", message))
        }
    }

    /// Write an object in the configured format
    pub fn object(&mut self, object: &Object) -> Result<()> {
        trace!(fields = object.len(), "Outputting object");
        let formatted = self.format.format_object(object)?;
        self.emit(&formatted)
    }

    /// Write the registered method table
    pub fn methods(&mut self, methods: &BTreeMap<&str, Option<&str>>) -> Result<()> {
        let formatted = self.format.format_methods(methods)?;
        self.emit(&formatted)
    }

    /// Save an object to `path`, choosing YAML or JSON by extension
    pub fn save_object(&mut self, object: &Object, path: &Path) -> Result<()> {
        let content = if crate::config::is_yaml(path) {
            OutputFormat::Yaml.format_object(object)?
        } else {
            OutputFormat::JsonPretty.format_object(object)?
        };

        std::fs::write(path, content)?;
        self.success(&format!("✓ Saved to {}", path.display()))
    }

    fn emit(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Format the method table for human reading
fn format_methods_human(methods: &BTreeMap<&str, Option<&str>>) -> String {
    let width = methods
        .keys()
        .map(|name| name.len())
        .chain(std::iter::once("METHOD".len()))
        .max()
        .unwrap_or(0);

    let mut output = format!("{:width$}   INVERSE\n", "METHOD", width = width);
    for (name, inverse) in methods {
        output.push_str(&format!(
            "{:width$} ↔ {}\n",
            name,
            inverse.unwrap_or("-"),
            width = width
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
