//! # lucc-core
//!
//! Package browsing and asset export building blocks for the `lucc` commandlets.
//!
//! This library provides:
//! - The package collaborator interface ([`Package`], [`PackageLoader`])
//! - A loader for JSON package dumps ([`DumpLoader`])
//! - The asset category table used by full package exports
//! - The export table walker that routes entries to output directories
//! - Per-kind exporters (scripts, textures, sounds, music, meshes, levels)
//!
//! ## Example
//!
//! ```no_run
//! use lucc_core::{walk, DumpLoader, ExportSelection, PackageLoader, ASSET_CATEGORIES};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = DumpLoader::new(vec!["System".into()]);
//! let package = loader.open("Engine")?;
//!
//! let selection = ExportSelection::default().with_group_paths(true);
//! for item in walk(package.as_ref(), Path::new("out"), &selection, Some(&ASSET_CATEGORIES[..]))? {
//!     let item = item?;
//!     println!("{} -> {}", item.object_name, item.output_dir.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod dump;
pub mod export;
pub mod hash;
pub mod native;
pub mod object;
pub mod package;
pub mod walker;

#[doc(inline)]
pub use category::{category_for, AssetCategory, ASSET_CATEGORIES};
#[doc(inline)]
pub use dump::{DumpLoader, DumpPackage, PackageDump};
#[doc(inline)]
pub use export::{export_object, ExportError, ExportOptions};
#[doc(inline)]
pub use hash::name_hash;
#[doc(inline)]
pub use object::{Object, ObjectData, ObjectKind};
#[doc(inline)]
pub use package::{ExportEntry, ObjectRef, Package, PackageError, PackageLoader, NONE_NAME};
#[doc(inline)]
pub use walker::{
    classified, classify, ensure_dir, walk, ClassFilter, ClassMatch, Classified, ExportSelection, WalkError,
    WalkItem, Walker,
};
