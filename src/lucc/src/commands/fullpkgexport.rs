//! Export everything exportable from a package
//!
//! Objects are routed by class through the asset category table into
//! `Classes/`, `Textures/`, `Sounds/`, `Music/` and `Models/` under the
//! package folder.

use clap::Parser;
use lucc_core::{ExportSelection, ASSET_CATEGORIES};

use super::{package_stem, parse_args, BatchExport, CommandContext, Commandlet, CommonArgs};
use crate::error::LuccError;

pub struct FullPackageExport;

#[derive(Parser, Debug)]
struct FullPackageExportArgs {
    #[command(flatten)]
    common: CommonArgs,
}

impl Commandlet for FullPackageExport {
    fn name(&self) -> &'static str {
        "fullpkgexport"
    }

    fn about(&self) -> &'static str {
        "Export all classes, textures, sounds, music and meshes from a package"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let FullPackageExportArgs { common } = parse_args(self.name(), args)?;

        let base = ctx.output_base(common.path.as_deref(), |root| {
            root.join(package_stem(&common.package))
        });
        lucc_core::ensure_dir(&base)?;

        let package = ctx.open_package(&common.package)?;
        let selection = ExportSelection::default()
            .with_single_object(common.single.clone())
            .with_group_paths(common.group);

        BatchExport::new(package.as_ref(), base, selection)
            .with_categories(&ASSET_CATEGORIES)
            .with_keep_going(common.keep_going)
            .run()?;
        Ok(())
    }
}
