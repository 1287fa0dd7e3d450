//! Texture, sound, music and mesh export commands
//!
//! These commands differ only in the class they select, the kind of object
//! they expect and the folder their output lands in.

use clap::{Args, Parser};
use lucc_core::export::MeshFormat;
use lucc_core::{ClassFilter, ClassMatch, ExportOptions, ExportSelection, ObjectKind};
use std::path::{Path, PathBuf};

use super::{package_stem, parse_args, BatchExport, CommandContext, Commandlet, CommonArgs};
use crate::error::LuccError;

/// Arguments shared by the asset export commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Export to <Package>/<Folder> like UCC instead of <Folder>/<Package>
    #[arg(short = 'u', long = "ucc-folder")]
    pub ucc_folder: bool,

    /// How the class name is matched: exact, prefix or substring
    #[arg(long = "match", value_name = "MODE")]
    pub match_mode: Option<ClassMatch>,
}

/// What an asset export command selects and where it writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub class_pattern: &'static str,
    pub default_match: ClassMatch,
    pub kind: ObjectKind,
    pub folder: &'static str,
    /// Default output gets a per-package sub-folder
    pub per_package: bool,
}

impl AssetSpec {
    fn selection(&self, args: &AssetArgs) -> ExportSelection {
        let mode = args.match_mode.unwrap_or(self.default_match);
        ExportSelection::default()
            .with_single_object(args.common.single.clone())
            .with_class_filter(Some(ClassFilter::new(self.class_pattern, mode)))
            .with_group_paths(args.common.group)
    }

    /// Default output folder under `root`
    fn default_base(&self, root: &Path, package: &str, ucc_folder: bool) -> PathBuf {
        let stem = package_stem(package);
        if ucc_folder {
            root.join(stem).join(self.folder)
        } else if self.per_package {
            root.join(self.folder).join(stem)
        } else {
            root.join(self.folder)
        }
    }

    fn run(&self, args: &AssetArgs, options: ExportOptions, ctx: &CommandContext) -> Result<(), LuccError> {
        let common = &args.common;
        let base = ctx.output_base(common.path.as_deref(), |root| {
            self.default_base(root, &common.package, args.ucc_folder)
        });
        lucc_core::ensure_dir(&base)?;

        let package = ctx.open_package(&common.package)?;
        BatchExport::new(package.as_ref(), base, self.selection(args))
            .with_expected(self.kind)
            .with_options(options)
            .with_keep_going(common.keep_going)
            .run()?;
        Ok(())
    }
}

/// Texture, sound or music export
pub struct AssetExport(pub AssetSpec);

impl AssetExport {
    pub fn textures() -> Self {
        Self(AssetSpec {
            name: "textureexport",
            about: "Export textures from a package as PNG",
            class_pattern: "Texture",
            default_match: ClassMatch::Substring,
            kind: ObjectKind::Texture,
            folder: "Textures",
            per_package: true,
        })
    }

    pub fn sounds() -> Self {
        Self(AssetSpec {
            name: "soundexport",
            about: "Export sounds from a package",
            class_pattern: "Sound",
            default_match: ClassMatch::Prefix,
            kind: ObjectKind::Sound,
            folder: "Sounds",
            per_package: true,
        })
    }

    pub fn music() -> Self {
        Self(AssetSpec {
            name: "musicexport",
            about: "Export music from a package",
            class_pattern: "Music",
            default_match: ClassMatch::Prefix,
            kind: ObjectKind::Music,
            folder: "Music",
            per_package: false,
        })
    }
}

#[derive(Parser, Debug)]
struct AssetExportArgs {
    #[command(flatten)]
    asset: AssetArgs,
}

impl Commandlet for AssetExport {
    fn name(&self) -> &'static str {
        self.0.name
    }

    fn about(&self) -> &'static str {
        self.0.about
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: AssetExportArgs = parse_args(self.name(), args)?;
        self.0.run(&args.asset, ExportOptions::default(), ctx)
    }
}

/// Mesh export
pub struct MeshExport;

const MESHES: AssetSpec = AssetSpec {
    name: "meshexport",
    about: "Export meshes from a package (u3d or obj)",
    class_pattern: "Mesh",
    default_match: ClassMatch::Substring,
    kind: ObjectKind::Mesh,
    folder: "Models",
    per_package: true,
};

#[derive(Parser, Debug)]
struct MeshExportArgs {
    #[command(flatten)]
    asset: AssetArgs,

    /// Output (t)ype
    #[arg(short = 't', long = "type", value_name = "FORMAT", value_parser = MeshFormat::NAMES)]
    format: Option<String>,

    /// Animation (f)rame to export (default: all frames for u3d, frame 0 for obj)
    #[arg(short = 'f', long = "frame")]
    frame: Option<usize>,
}

impl Commandlet for MeshExport {
    fn name(&self) -> &'static str {
        MESHES.name
    }

    fn about(&self) -> &'static str {
        MESHES.about
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: MeshExportArgs = parse_args(self.name(), args)?;
        let options = ExportOptions::default()
            .with_format(args.format)
            .with_frame(args.frame);
        MESHES.run(&args.asset, options, ctx)
    }
}
