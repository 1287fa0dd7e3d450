//! Export a single named object

use clap::Parser;
use lucc_core::{
    classified, ClassFilter, ClassMatch, ExportOptions, ExportSelection, PackageError,
};

use super::{package_stem, parse_args, BatchExport, CommandContext, Commandlet, CommonArgs};
use crate::error::LuccError;

pub struct ObjectExport;

#[derive(Parser, Debug)]
struct ObjectExportArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Only export the object if its (c)lass matches
    #[arg(short = 'c', long = "class", value_name = "CLASS")]
    class: Option<String>,

    /// How --class is matched: exact, prefix or substring
    #[arg(long = "match", value_name = "MODE", default_value = "exact")]
    match_mode: ClassMatch,

    /// Output (t)ype, for objects with more than one export format
    #[arg(short = 't', long = "type", value_name = "FORMAT")]
    format: Option<String>,
}

impl Commandlet for ObjectExport {
    fn name(&self) -> &'static str {
        "objectexport"
    }

    fn about(&self) -> &'static str {
        "Export one object from a package by name"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: ObjectExportArgs = parse_args(self.name(), args)?;
        let common = &args.common;
        let Some(object_name) = common.single.clone() else {
            return Err(LuccError::BadArgs(
                "objectexport needs an object name (-s NAME)".to_string(),
            ));
        };

        let base = ctx.output_base(common.path.as_deref(), |root| {
            root.join(package_stem(&common.package))
        });
        lucc_core::ensure_dir(&base)?;

        let package = ctx.open_package(&common.package)?;
        let label = format!("{}.{}", package.name(), object_name);

        let filter = args
            .class
            .as_ref()
            .map(|class| ClassFilter::new(class.as_str(), args.match_mode));
        let by_name = ExportSelection::default().with_single_object(Some(object_name));
        let selection = by_name
            .clone()
            .with_class_filter(filter.clone())
            .with_group_paths(common.group);

        // Entries of the wrong class are skipped; only fail when no entry
        // with the name has the class
        let bad_object = |source: PackageError| LuccError::BadObject {
            object: label.clone(),
            source,
        };
        if classified(package.as_ref(), &selection, None)
            .next()
            .transpose()
            .map_err(bad_object)?
            .is_none()
        {
            let found = classified(package.as_ref(), &by_name, None)
                .next()
                .transpose()
                .map_err(bad_object)?;
            return Err(match (found, filter) {
                (Some(found), Some(filter)) => LuccError::MissingClass {
                    object: label,
                    expected: filter.pattern,
                    actual: found.class_name.to_string(),
                },
                _ => LuccError::ObjectNotFound(label),
            });
        }

        BatchExport::new(package.as_ref(), base, selection)
            .with_options(ExportOptions::default().with_format(args.format.clone()))
            .with_keep_going(common.keep_going)
            .run()?;
        Ok(())
    }
}
