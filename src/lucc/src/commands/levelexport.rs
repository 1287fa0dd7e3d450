//! Export a map's level as T3D

use clap::Parser;
use lucc_core::{export_object, ExportOptions, ExportSelection, ObjectKind, ASSET_CATEGORIES};
use std::path::PathBuf;
use tracing::info;

use super::{package_stem, parse_args, BatchExport, CommandContext, Commandlet};
use crate::error::LuccError;

/// Export name every map stores its level under
const LEVEL_OBJECT: &str = "MyLevel";

pub struct LevelExport;

#[derive(Parser, Debug)]
struct LevelExportArgs {
    /// Folder (p)ath to export to
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    path: Option<PathBuf>,

    /// Also export the (m)ap's embedded assets next to the .t3d
    #[arg(short = 'm', long = "my-level-assets")]
    assets: bool,

    /// Export embedded assets into sub-folders based on their (g)roup
    #[arg(short = 'g', long = "group", requires = "assets")]
    group: bool,

    /// Keep going when an embedded asset fails to load or export
    #[arg(long)]
    keep_going: bool,

    /// Map package to export
    package: String,
}

impl Commandlet for LevelExport {
    fn name(&self) -> &'static str {
        "levelexport"
    }

    fn about(&self) -> &'static str {
        "Export a map to T3D, optionally with its embedded assets"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: LevelExportArgs = parse_args(self.name(), args)?;

        let mut base = ctx.output_base(args.path.as_deref(), |root| root.join("Maps"));
        if args.assets {
            base.push(package_stem(&args.package));
        }
        lucc_core::ensure_dir(&base)?;

        let package = ctx.open_package(&args.package)?;
        let label = format!("{}.{}", package.name(), LEVEL_OBJECT);
        let index = package
            .find_export(LEVEL_OBJECT)
            .ok_or_else(|| LuccError::ObjectNotFound(label.clone()))?;

        let level = package
            .load_object(index, Some(ObjectKind::Level))
            .map_err(|source| LuccError::BadObject {
                object: label.clone(),
                source,
            })?;
        let written = export_object(&level, &base, &ExportOptions::default())
            .map_err(|source| LuccError::Export {
                object: label,
                source,
            })?;
        for path in &written {
            info!("Exported level to {}", path.display());
        }

        if args.assets {
            let selection = ExportSelection::default().with_group_paths(args.group);
            BatchExport::new(package.as_ref(), base, selection)
                .with_categories(&ASSET_CATEGORIES)
                .with_keep_going(args.keep_going)
                .run()?;
        }
        Ok(())
    }
}
