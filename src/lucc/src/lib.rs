//! # lucc
//!
//! UCC-style commandlets for browsing Unreal packages and exporting their
//! contents: scripts, textures, sounds, music, meshes and levels.
//!
//! The binary parses the global options, builds a [`CommandContext`] and
//! hands the remaining arguments to the named [`Commandlet`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use commands::{CommandContext, Commandlet, Registry};
pub use error::LuccError;

use cli::Cli;

/// Run the command named on the command line
pub fn run(cli: &Cli, registry: &Registry) -> Result<(), LuccError> {
    let Some(invocation) = &cli.command else {
        print!("{}", registry.usage());
        return Err(LuccError::BadArgs("no command given".to_string()));
    };

    // Fail on unknown commands before touching the config
    let command = registry
        .get(invocation.name())
        .ok_or_else(|| LuccError::UnknownCommand(invocation.name().to_string()))?;

    let ctx = CommandContext::from_cli(cli).map_err(LuccError::Init)?;
    tracing::debug!("Running {} {:?}", command.name(), invocation.args());
    command.run(invocation.args(), &ctx)
}
