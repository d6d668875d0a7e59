// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for Voyager.
//!
//! Uses clap's derive API. A run is fully described by the migration file, so
//! the command line only selects that file and how results are presented.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Output format for CLI results.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON summary for programmatic consumption
    Json,
}

/// Global output configuration passed to the runner.
#[derive(Clone, Debug)]
pub struct OutputContext {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Enable verbose output (info-level logging)
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && matches!(self.format, OutputFormat::Text)
    }

    /// Returns true if per-issue lines should be printed.
    pub fn is_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text)
    }
}

/// Voyager - migrate GitHub issues to another repository or a Jira CSV.
///
/// Reads a migration file (TOML or JSON) describing the source repository,
/// the destination, which issues to move, and how to map users and labels.
#[derive(Parser, Debug)]
#[command(name = "voyager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Migration file (defaults to voyager.toml, then config.json)
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Select and transform issues without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format (text, json)
    #[arg(long, short = 'o', default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Enable verbose output (info-level logging)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
