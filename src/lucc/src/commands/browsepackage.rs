//! List a package's export table

use clap::Parser;
use lucc_core::{
    classified, ClassFilter, ClassMatch, Classified, ExportSelection, Package, ASSET_CATEGORIES,
};
use tracing::info;

use super::{parse_args, CommandContext, Commandlet};
use crate::error::LuccError;

pub struct BrowsePackage;

#[derive(Parser, Debug)]
struct BrowsePackageArgs {
    /// Only list the (s)ingle object with this name
    #[arg(short = 's', long = "single", value_name = "NAME")]
    single: Option<String>,

    /// Only list objects whose (c)lass matches
    #[arg(short = 'c', long = "class", value_name = "CLASS")]
    class: Option<String>,

    /// How --class is matched: exact, prefix or substring
    #[arg(long = "match", value_name = "MODE", default_value = "exact")]
    match_mode: ClassMatch,

    /// Only list exportable assets and show the folder each one exports to
    #[arg(long)]
    categories: bool,

    /// Package to list
    package: String,
}

fn format_row(item: &Classified<'_>) -> String {
    let mut row = format!(
        "{:>6}  {:<32} {:<20} {}",
        item.index, item.object_name, item.class_name, item.group_name
    );
    if let Some(category) = item.category {
        row.push_str(&format!("  -> {}", category.folder));
    }
    row
}

/// Rows for the exports the arguments select, in table order
fn listing(package: &dyn Package, args: &BrowsePackageArgs) -> Result<Vec<String>, LuccError> {
    let filter = args
        .class
        .as_ref()
        .map(|class| ClassFilter::new(class.as_str(), args.match_mode));
    let selection = ExportSelection::default()
        .with_single_object(args.single.clone())
        .with_class_filter(filter);
    let categories = args.categories.then_some(&ASSET_CATEGORIES[..]);

    classified(package, &selection, categories)
        .map(|item| {
            item.map(|item| format_row(&item))
                .map_err(|source| LuccError::BadObject {
                    object: package.name().to_string(),
                    source,
                })
        })
        .collect()
}

impl Commandlet for BrowsePackage {
    fn name(&self) -> &'static str {
        "browsepackage"
    }

    fn about(&self) -> &'static str {
        "List the objects in a package"
    }

    fn run(&self, args: &[String], ctx: &CommandContext) -> Result<(), LuccError> {
        let args: BrowsePackageArgs = parse_args(self.name(), args)?;
        let package = ctx.open_package(&args.package)?;

        let rows = listing(package.as_ref(), &args)?;

        println!("{:>6}  {:<32} {:<20} {}", "Index", "Name", "Class", "Group");
        for row in &rows {
            println!("{}", row);
        }

        info!(
            "{} of {} export(s) listed from '{}'",
            rows.len(),
            package.exports().len(),
            package.name()
        );
        Ok(())
    }
}
