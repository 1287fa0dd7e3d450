//! Configuration command
//!
//! Registers game installs and picks the default one.

use clap::Parser;
use std::path::Path;

use super::{parse_args, CommandContext, Commandlet};
use crate::config::Config;
use crate::error::LuccError;

pub struct Configure;

#[derive(Parser, Debug)]
struct ConfigureArgs {
    /// Register a game install
    #[arg(long, num_args = 2, value_names = ["NAME", "PATH"])]
    add_game: Option<Vec<String>>,

    /// Set the default game
    #[arg(long = "default", value_name = "NAME")]
    default_game: Option<String>,

    /// Show current configuration
    #[arg(long)]
    show: bool,
}

impl Commandlet for Configure {
    fn name(&self) -> &'static str {
        "configure"
    }

    fn about(&self) -> &'static str {
        "Register game installs and set the default game"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: ConfigureArgs = parse_args(self.name(), args)?;

        if args.add_game.is_none() && args.default_game.is_none() {
            if args.show {
                show_config(&ctx.config, &ctx.config_path);
            } else {
                show_usage();
            }
            return Ok(());
        }

        let mut config = Config::load_from(&ctx.config_path).map_err(LuccError::Init)?;

        if let Some([name, path]) = args.add_game.as_deref() {
            let path = ctx.working_dir.join(path);
            if !path.is_dir() {
                return Err(LuccError::BadArgs(format!(
                    "Game folder {} does not exist",
                    path.display()
                )));
            }
            println!("Added game '{}' at {}", name, path.display());
            config.add_game(name.clone(), path);
        }

        if let Some(name) = &args.default_game {
            config
                .set_default_game(name)
                .map_err(|e| LuccError::BadArgs(e.to_string()))?;
            println!("Default game: {}", name);
        }

        config.save_to(&ctx.config_path).map_err(LuccError::Init)?;
        println!("Config saved to: {}", ctx.config_path.display());

        if args.show {
            show_config(&config, &ctx.config_path);
        }
        Ok(())
    }
}

/// Display current configuration
fn show_config(config: &Config, path: &Path) {
    if config.games.is_empty() {
        println!("No games configured");
    }
    for game in &config.games {
        let marker = if config.default_game.as_deref() == Some(game.name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{}{}: {}", game.name, marker, game.path.display());
    }
    println!("Config file: {}", path.display());
}

fn show_usage() {
    println!("Usage: lucc configure --add-game NAME PATH");
    println!("   or: lucc configure --default NAME");
    println!("   or: lucc configure --show");
}
