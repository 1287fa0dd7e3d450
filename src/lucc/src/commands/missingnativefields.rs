//! Report script properties with no native counterpart

use clap::Parser;
use lucc_core::native::missing_native_fields;
use lucc_core::{
    classified, ClassFilter, ClassMatch, ExportSelection, ObjectData, ObjectKind, Package, NONE_NAME,
};
use tracing::info;

use super::{parse_args, CommandContext, Commandlet};
use crate::error::LuccError;

pub struct MissingNativeFields;

#[derive(Parser, Debug)]
struct MissingNativeFieldsArgs {
    /// Only report this (s)ingle class
    #[arg(short = 's', long = "single", value_name = "NAME")]
    single: Option<String>,

    /// Package to scan
    package: String,
}

/// Reports for the selected classes that have missing native fields
fn class_reports(package: &dyn Package, single: Option<String>) -> Result<Vec<String>, LuccError> {
    let selection = ExportSelection::default()
        .with_single_object(single)
        .with_class_filter(Some(ClassFilter::new(NONE_NAME, ClassMatch::Exact)));

    let mut reports = Vec::new();
    for class in classified(package, &selection, None) {
        let class = class.map_err(|source| LuccError::BadObject {
            object: package.name().to_string(),
            source,
        })?;
        let label = format!("{}.{}", package.name(), class.object_name);
        let object = package
            .load_object(class.index, Some(ObjectKind::Class))
            .map_err(|source| LuccError::BadObject {
                object: label,
                source,
            })?;
        let ObjectData::Class(data) = &object.data else {
            continue;
        };

        if let Some(report) = missing_native_fields(&object.name, data) {
            reports.push(report);
        }
    }
    Ok(reports)
}

impl Commandlet for MissingNativeFields {
    fn name(&self) -> &'static str {
        "missingnativefields"
    }

    fn about(&self) -> &'static str {
        "Print C++ declarations for script properties missing from native classes"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: MissingNativeFieldsArgs = parse_args(self.name(), args)?;
        let package = ctx.open_package(&args.package)?;

        let reports = class_reports(package.as_ref(), args.single)?;
        for report in &reports {
            print!("{}", report);
        }

        info!(
            "{} class(es) with missing native fields in '{}'",
            reports.len(),
            package.name()
        );
        Ok(())
    }
}
