//! Walk, load and export loop shared by the export commands

use lucc_core::{
    export_object, walk, AssetCategory, ExportOptions, ExportSelection, ObjectKind, Package,
};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::LuccError;

/// One batch export over a package
pub struct BatchExport<'a> {
    pub package: &'a dyn Package,
    pub base: PathBuf,
    pub selection: ExportSelection,
    /// Route objects through the category table (full package exports)
    pub categories: Option<&'static [AssetCategory]>,
    /// Kind every selected object must load as
    pub expected: Option<ObjectKind>,
    pub options: ExportOptions,
    /// Log per-object failures and continue instead of aborting
    pub keep_going: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Objects the selection picked
    pub selected: usize,
    pub exported: usize,
    pub failed: usize,
}

impl<'a> BatchExport<'a> {
    pub fn new(package: &'a dyn Package, base: PathBuf, selection: ExportSelection) -> Self {
        Self {
            package,
            base,
            selection,
            categories: None,
            expected: None,
            options: ExportOptions::default(),
            keep_going: false,
        }
    }

    pub fn with_categories(mut self, categories: &'static [AssetCategory]) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_expected(mut self, kind: ObjectKind) -> Self {
        self.expected = Some(kind);
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn run(&self) -> Result<BatchSummary, LuccError> {
        let mut summary = BatchSummary::default();

        for item in walk(self.package, &self.base, &self.selection, self.categories)? {
            let item = item?;
            summary.selected += 1;
            let label = format!("{}.{}", self.package.name(), item.object_name);

            let result = self
                .package
                .load_object(item.index, self.expected)
                .map_err(|source| LuccError::BadObject {
                    object: label.clone(),
                    source,
                })
                .and_then(|object| {
                    export_object(&object, &item.output_dir, &self.options).map_err(|source| {
                        LuccError::Export {
                            object: label.clone(),
                            source,
                        }
                    })
                });

            match result {
                Ok(_) => summary.exported += 1,
                Err(err) if self.keep_going => {
                    warn!("{}", err.chain());
                    summary.failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Exported {} of {} object(s) from '{}' to {}",
            summary.exported,
            summary.selected,
            self.package.name(),
            self.base.display()
        );
        if summary.failed > 0 {
            warn!("{} object(s) failed", summary.failed);
        }
        Ok(summary)
    }
}
