//! Presentation-level configuration
//!
//! Configuration for how the board is rendered, assembled from the
//! `[output]` file section and CLI flags.

use crate::cli::commands::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Include archived rounds in the full board
    pub show_archive: bool,
    /// Print the raw token stream
    pub show_diagnostics: bool,
    /// Show a live spinner while a round runs
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Full,
            color: true,
            show_archive: true,
            show_diagnostics: false,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Apply the color setting to the whole process.
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
