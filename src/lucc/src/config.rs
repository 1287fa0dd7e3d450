//! Configuration management for lucc
//!
//! The config file records installed games so packages can be found without
//! passing search folders on every run.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Game used when `--game` is not given
    pub default_game: Option<String>,
    #[serde(default)]
    pub games: Vec<GameConfig>,
}

/// An installed game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub name: String,
    /// Game root folder (the one holding `System/`)
    pub path: PathBuf,
}

impl GameConfig {
    /// Standard package folders under a game root
    pub const PACKAGE_FOLDERS: [&'static str; 6] =
        ["System", "Maps", "Textures", "Sounds", "Music", "Meshes"];

    /// Folders searched for packages, followed by the game root itself
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        Self::PACKAGE_FOLDERS
            .iter()
            .map(|folder| self.path.join(folder))
            .chain(std::iter::once(self.path.clone()))
            .collect()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("lucc");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or the default if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    pub fn game(&self, name: &str) -> Option<&GameConfig> {
        self.games.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Add a game, replacing any game with the same name
    ///
    /// The first game added becomes the default.
    pub fn add_game(&mut self, name: String, path: PathBuf) {
        match self.games.iter_mut().find(|g| g.name.eq_ignore_ascii_case(&name)) {
            Some(game) => game.path = path,
            None => self.games.push(GameConfig {
                name: name.clone(),
                path,
            }),
        }
        if self.default_game.is_none() {
            self.default_game = Some(name);
        }
    }

    pub fn set_default_game(&mut self, name: &str) -> Result<()> {
        let Some(game) = self.game(name) else {
            bail!("Unknown game '{}'; add it with --add-game first", name);
        };
        self.default_game = Some(game.name.clone());
        Ok(())
    }

    /// The game to use for this run
    ///
    /// An explicitly requested game must exist; otherwise the default game is
    /// used if one is configured.
    pub fn selected_game(&self, requested: Option<&str>) -> Result<Option<&GameConfig>> {
        match requested {
            Some(name) => match self.game(name) {
                Some(game) => Ok(Some(game)),
                None => bail!("Game '{}' is not configured", name),
            },
            None => Ok(self.default_game.as_deref().and_then(|name| self.game(name))),
        }
    }
}
