//! Export UnrealScript classes from a package

use clap::Parser;
use lucc_core::{ClassFilter, ClassMatch, ExportSelection, ObjectKind, NONE_NAME};

use super::{package_stem, parse_args, BatchExport, CommandContext, Commandlet, CommonArgs};
use crate::error::LuccError;

pub struct ClassExport;

#[derive(Parser, Debug)]
struct ClassExportArgs {
    #[command(flatten)]
    common: CommonArgs,
}

impl Commandlet for ClassExport {
    fn name(&self) -> &'static str {
        "classexport"
    }

    fn about(&self) -> &'static str {
        "Export UnrealScript classes from a package"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let ClassExportArgs { common } = parse_args(self.name(), args)?;

        let base = ctx.output_base(common.path.as_deref(), |root| {
            root.join(package_stem(&common.package)).join("Classes")
        });
        lucc_core::ensure_dir(&base)?;

        let package = ctx.open_package(&common.package)?;

        // Classes are the exports whose class reference is null
        let selection = ExportSelection::default()
            .with_single_object(common.single.clone())
            .with_class_filter(Some(ClassFilter::new(NONE_NAME, ClassMatch::Exact)))
            .with_group_paths(common.group);

        BatchExport::new(package.as_ref(), base, selection)
            .with_expected(ObjectKind::Class)
            .with_keep_going(common.keep_going)
            .run()?;
        Ok(())
    }
}
