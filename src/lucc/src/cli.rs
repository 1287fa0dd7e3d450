//! Top-level argument definitions
//!
//! Global options come before the command name. Everything after the command
//! name belongs to the commandlet and is parsed by it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lucc", version)]
#[command(about = "Unreal package commandlets: browse packages and export their assets")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Configured game to use (defaults to the configured default game)
    #[arg(long, env = "LUCC_GAME")]
    pub game: Option<String>,

    /// Config file to use instead of the per-user one
    #[arg(long, env = "LUCC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra folder to search for packages (repeatable, searched first)
    #[arg(long = "package-dir", value_name = "DIR")]
    pub package_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Invocation>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// A commandlet name followed by its arguments
    #[command(external_subcommand)]
    Command(Vec<String>),
}

impl Invocation {
    pub fn name(&self) -> &str {
        let Invocation::Command(words) = self;
        words.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        let Invocation::Command(words) = self;
        words.get(1..).unwrap_or_default()
    }
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
