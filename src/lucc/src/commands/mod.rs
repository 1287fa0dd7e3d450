//! Commandlets and their registry
//!
//! Every command is a [`Commandlet`] registered by name. Names are matched
//! case-insensitively, so `TextureExport` and `textureexport` run the same
//! command.

mod assets;
mod batch;
mod browsepackage;
mod classexport;
mod configure;
mod context;
mod fullpkgexport;
mod levelexport;
mod missingnativefields;
mod objectexport;

pub use assets::{AssetArgs, AssetExport, AssetSpec, MeshExport};
pub use batch::{BatchExport, BatchSummary};
pub use browsepackage::BrowsePackage;
pub use classexport::ClassExport;
pub use configure::Configure;
pub use context::CommandContext;
pub use fullpkgexport::FullPackageExport;
pub use levelexport::LevelExport;
pub use missingnativefields::MissingNativeFields;
pub use objectexport::ObjectExport;

use clap::{Args, Parser};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::LuccError;

/// A named command
pub trait Commandlet {
    /// Name used on the command line (lowercase)
    fn name(&self) -> &'static str;

    /// One line description for the command list
    fn about(&self) -> &'static str;

    /// Run with the arguments that followed the command name
    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError>;
}

/// Commandlets by lowercase name
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, Box<dyn Commandlet>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in commandlet
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ClassExport);
        registry.register(AssetExport::textures());
        registry.register(AssetExport::sounds());
        registry.register(AssetExport::music());
        registry.register(MeshExport);
        registry.register(LevelExport);
        registry.register(FullPackageExport);
        registry.register(ObjectExport);
        registry.register(MissingNativeFields);
        registry.register(BrowsePackage);
        registry.register(Configure);
        registry
    }

    /// Add a commandlet, replacing any with the same name
    pub fn register(&mut self, command: impl Commandlet + 'static) {
        self.commands
            .insert(command.name().to_ascii_lowercase(), Box::new(command));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Commandlet> {
        self.commands
            .get(&name.to_ascii_lowercase())
            .map(|command| command.as_ref())
    }

    /// Commandlets in name order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Commandlet> {
        self.commands.values().map(|command| command.as_ref())
    }

    pub fn run(&self, name: &str, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let command = self
            .get(name)
            .ok_or_else(|| LuccError::UnknownCommand(name.to_string()))?;
        command.run(args, ctx)
    }

    /// Printable command list
    pub fn usage(&self) -> String {
        let width = self.iter().map(|c| c.name().len()).max().unwrap_or(0);
        let mut text = String::from("Available commands:\n");
        for command in self.iter() {
            text.push_str(&format!("  {:width$}  {}\n", command.name(), command.about()));
        }
        text
    }
}

/// Parse a commandlet's arguments
pub fn parse_args<T: Parser>(name: &str, args: &[String]) -> Result<T, LuccError> {
    let argv = std::iter::once(name.to_string()).chain(args.iter().cloned());
    Ok(T::try_parse_from(argv)?)
}

/// Options shared by the batch export commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonArgs {
    /// Folder (p)ath to export to
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Export a (s)ingle object by name
    #[arg(short = 's', long = "single", value_name = "NAME")]
    pub single: Option<String>,

    /// Export objects into sub-folders based on their (g)roup
    #[arg(short = 'g', long = "group")]
    pub group: bool,

    /// Keep going when an object fails to load or export
    #[arg(long)]
    pub keep_going: bool,

    /// Package to export from
    pub package: String,
}

/// Package name without folders or extensions, used in default output paths
pub fn package_stem(name: &str) -> &str {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    file_name.split('.').next().unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::builtin();
        let names: Vec<_> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            [
                "browsepackage",
                "classexport",
                "configure",
                "fullpkgexport",
                "levelexport",
                "meshexport",
                "missingnativefields",
                "musicexport",
                "objectexport",
                "soundexport",
                "textureexport",
            ]
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = Registry::builtin();
        assert_eq!(registry.get("TextureExport").unwrap().name(), "textureexport");
        assert!(registry.get("playmusic").is_none());
    }

    #[test]
    fn test_usage_lists_commands() {
        let usage = Registry::builtin().usage();
        assert!(usage.starts_with("Available commands:\n"));
        assert!(usage.contains("  fullpkgexport "));
        assert_eq!(usage.lines().count(), 12);
    }

    #[test]
    fn test_package_stem() {
        assert_eq!(package_stem("Engine"), "Engine");
        assert_eq!(package_stem("Engine.u"), "Engine");
        assert_eq!(package_stem("dumps/DM-Deck16.unr.json"), "DM-Deck16");
    }

    #[test]
    fn test_parse_common_args() {
        #[derive(Parser)]
        struct Test {
            #[command(flatten)]
            common: CommonArgs,
        }

        let args: Vec<String> = ["-g", "-s", "Skaarj", "--keep-going", "UnrealI"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed: Test = parse_args("test", &args).unwrap();
        assert!(parsed.common.group);
        assert!(parsed.common.keep_going);
        assert_eq!(parsed.common.single.as_deref(), Some("Skaarj"));
        assert_eq!(parsed.common.package, "UnrealI");
        assert_eq!(parsed.common.path, None);
    }

    #[test]
    fn test_missing_package_is_bad_args() {
        #[derive(Parser, Debug)]
        struct Test {
            #[command(flatten)]
            common: CommonArgs,
        }

        let err = parse_args::<Test>("test", &[]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::ERR_BAD_ARGS);
    }
}
