//! Per-run state shared by every commandlet

use anyhow::{Context, Result};
use lucc_core::{DumpLoader, Package, PackageLoader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{Config, GameConfig};
use crate::error::LuccError;

pub struct CommandContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub game: Option<GameConfig>,
    pub loader: Box<dyn PackageLoader>,
    /// Root for default output folders: the game folder, or the working directory
    pub output_root: PathBuf,
    /// Relative `-p` paths resolve against this
    pub working_dir: PathBuf,
}

impl CommandContext {
    /// Context for a run with the given loader and no configured game
    pub fn new(loader: Box<dyn PackageLoader>, working_dir: PathBuf) -> Self {
        Self {
            config: Config::default(),
            config_path: working_dir.join("config.toml"),
            game: None,
            loader,
            output_root: working_dir.clone(),
            working_dir,
        }
    }

    /// Build the context from the global options
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        let config = Config::load_from(&config_path)?;
        let working_dir =
            std::env::current_dir().context("Could not determine the working directory")?;

        let game = config.selected_game(cli.game.as_deref())?.cloned();

        let mut search_dirs = cli.package_dirs.clone();
        if let Some(game) = &game {
            debug!("Using game '{}' at {}", game.name, game.path.display());
            search_dirs.extend(game.search_dirs());
        }
        search_dirs.push(working_dir.clone());

        let output_root = game
            .as_ref()
            .map(|game| game.path.clone())
            .unwrap_or_else(|| working_dir.clone());

        Ok(Self {
            config,
            config_path,
            game,
            loader: Box::new(DumpLoader::new(search_dirs)),
            output_root,
            working_dir,
        })
    }

    pub fn with_output_root(mut self, output_root: PathBuf) -> Self {
        self.output_root = output_root;
        self
    }

    pub fn open_package(&self, name: &str) -> Result<Box<dyn Package>, LuccError> {
        self.loader
            .open(name)
            .map_err(|source| LuccError::MissingPackage {
                name: name.to_string(),
                source,
            })
    }

    /// Output folder: `-p` if given (relative to the working directory),
    /// otherwise the command's default under the output root
    pub fn output_base(&self, path: Option<&Path>, default: impl FnOnce(&Path) -> PathBuf) -> PathBuf {
        match path {
            Some(path) => self.working_dir.join(path),
            None => default(&self.output_root),
        }
    }
}
